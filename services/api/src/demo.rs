use crate::infra::{FixtureDataSource, ProfileFixture};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use life_compass::config::AppConfig;
use life_compass::error::AppError;
use life_compass::workflows::profile_strength::{
    AreaWeights, BonusKind, CheckInRecord, FileLedgerStore, GoalRecord, HabitRecord,
    IdentityTestRecord, InMemoryLedgerStore, JournalEntryRecord, LedgerStore, LifeWheelCategory,
    ProfileStrengthResult, ProfileStrengthService, RefreshOutcome, VisionImageRecord,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON fixture with the six domain row lists; any list may be {"error": "..."}
    #[arg(long)]
    pub(crate) fixture: PathBuf,
    /// User whose ledger is read and updated (defaults to the demo user)
    #[arg(long)]
    pub(crate) user: Option<String>,
    /// Previous result JSON to diff against when detecting resolved tasks
    #[arg(long)]
    pub(crate) previous: Option<PathBuf>,
    /// Write the new result here so it can seed the next --previous
    #[arg(long)]
    pub(crate) write_result: Option<PathBuf>,
    /// Override the configured ledger directory
    #[arg(long)]
    pub(crate) ledger_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// User id for the in-memory ledger (defaults to the demo user)
    #[arg(long)]
    pub(crate) user: Option<String>,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let outcome = score_fixture(args, config.scoring.weights, config.ledger.dir).await?;
    render_outcome("Profile strength", &outcome);
    Ok(())
}

async fn score_fixture(
    args: ScoreArgs,
    weights: AreaWeights,
    ledger_dir: PathBuf,
) -> Result<RefreshOutcome, AppError> {
    let ScoreArgs {
        fixture,
        user,
        previous,
        write_result,
        ledger_dir: ledger_override,
    } = args;

    let fixture = ProfileFixture::from_path(&fixture)?;
    let previous = previous.as_deref().map(read_result).transpose()?;
    let store = FileLedgerStore::new(ledger_override.unwrap_or(ledger_dir));
    let service = ProfileStrengthService::new(
        Arc::new(FixtureDataSource::new(fixture)),
        Arc::new(store),
        weights,
    );

    let outcome = service
        .refresh_from(user.as_deref(), previous.as_ref(), Utc::now())
        .await?;

    if let Some(path) = write_result {
        std::fs::write(&path, serde_json::to_string_pretty(&outcome.result)?)?;
        println!("Result written to {}", path.display());
    }

    Ok(outcome)
}

fn read_result(path: &Path) -> Result<ProfileStrengthResult, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let now = Utc::now();
    let source = Arc::new(FixtureDataSource::new(sparse_fixture(now)));
    let store = Arc::new(InMemoryLedgerStore::default());
    let service = ProfileStrengthService::new(source.clone(), store, AreaWeights::default());

    println!("Profile strength demo");
    let [sparse, completed, repeated] =
        run_demo_passes(&service, &source, args.user.as_deref(), now).await?;

    render_outcome("\n1. Sparse profile", &sparse);
    render_outcome("\n2. Profile after a week of setup", &completed);
    render_outcome("\n3. Same profile refreshed again", &repeated);

    let total: u32 = [&sparse, &completed, &repeated]
        .iter()
        .map(|outcome| outcome.xp_awarded)
        .sum();
    println!("\nTotal XP across the demo: {total}");
    Ok(())
}

async fn run_demo_passes<L>(
    service: &ProfileStrengthService<FixtureDataSource, L>,
    source: &FixtureDataSource,
    user: Option<&str>,
    now: DateTime<Utc>,
) -> Result<[RefreshOutcome; 3], AppError>
where
    L: LedgerStore + 'static,
{
    let sparse = service.refresh(user, now).await?;
    source.replace(complete_fixture(now));
    let completed = service.refresh(user, now).await?;
    let repeated = service.refresh(user, now).await?;
    Ok([sparse, completed, repeated])
}

fn render_outcome(heading: &str, outcome: &RefreshOutcome) {
    let result = &outcome.result;
    println!("{heading}");
    match result.overall_percent {
        Some(percent) => println!("- Overall strength: {percent}%"),
        None => println!("- Overall strength: unavailable (some areas could not be loaded)"),
    }

    for (area, score) in result.area_scores.iter() {
        let score = score
            .map(|value| format!("{value:>2}/10"))
            .unwrap_or_else(|| " --/10".to_string());
        let reasons: Vec<&str> = result.reasons_by_area[area]
            .iter()
            .map(|reason| reason.label())
            .collect();
        if reasons.is_empty() {
            println!("  - {:<13}{}", area.label(), score);
        } else {
            println!("  - {:<13}{} ({})", area.label(), score, reasons.join(", "));
        }
    }

    match &result.global_next_task {
        Some(task) => println!(
            "- Next step: {} ({} min, +{} XP)",
            task.title, task.eta_minutes, task.xp_reward
        ),
        None => println!("- Next step: nothing left to improve"),
    }

    if outcome.events.is_empty() {
        println!("- XP earned: none");
    } else {
        println!("- XP earned: {}", outcome.xp_awarded);
        for event in &outcome.events {
            println!("    + {:>3} XP  {}", event.xp, event.title);
        }
    }

    let bonuses: Vec<&str> = BonusKind::ALL
        .into_iter()
        .filter(|bonus| outcome.ledger.bonuses.is_awarded(*bonus))
        .map(BonusKind::title)
        .collect();
    println!(
        "- Ledger: {} tasks completed | bonuses: {}",
        outcome.ledger.completed_task_ids.len(),
        if bonuses.is_empty() {
            "none".to_string()
        } else {
            bonuses.join(", ")
        }
    );
}

fn days_ago(now: DateTime<Utc>, days: i64) -> String {
    (now - Duration::days(days)).format("%Y-%m-%d").to_string()
}

fn sparse_fixture(now: DateTime<Utc>) -> ProfileFixture {
    ProfileFixture {
        goals: vec![GoalRecord {
            id: "goal-1".to_string(),
            title: "Get fit".to_string(),
            category: Some(LifeWheelCategory::Health.as_str().to_string()),
            created_at: Some(days_ago(now, 40)),
            ..GoalRecord::default()
        }]
        .into(),
        journal_entries: vec![JournalEntryRecord {
            id: "entry-1".to_string(),
            entry_date: Some(days_ago(now, 20)),
            content: "Tired.".to_string(),
            ..JournalEntryRecord::default()
        }]
        .into(),
        ..ProfileFixture::default()
    }
}

fn complete_fixture(now: DateTime<Utc>) -> ProfileFixture {
    let goals = LifeWheelCategory::ALL
        .into_iter()
        .map(|category| GoalRecord {
            id: format!("goal-{}", category.as_str()),
            title: format!("Invest in {}", category.as_str().replace('_', " ")),
            category: Some(category.as_str().to_string()),
            description: Some("One concrete, measurable step each week".to_string()),
            target_date: Some((now + Duration::days(120)).format("%Y-%m-%d").to_string()),
            updated_at: Some(days_ago(now, 1)),
            ..GoalRecord::default()
        })
        .collect::<Vec<_>>();

    let habits = LifeWheelCategory::ALL
        .into_iter()
        .flat_map(|category| {
            (0..2).map(move |index| HabitRecord {
                id: format!("habit-{}-{index}", category.as_str()),
                name: format!("{} routine {}", category.as_str(), index + 1),
                domain: Some(category.as_str().to_string()),
                cue: Some("After morning coffee".to_string()),
                last_completed_at: Some(days_ago(now, 1)),
                ..HabitRecord::default()
            })
        })
        .collect::<Vec<_>>();

    let journal_entries = (0..8)
        .map(|day| JournalEntryRecord {
            id: format!("entry-{day}"),
            entry_date: Some(days_ago(now, day + 1)),
            content: "Noticed what gave me energy today".to_string(),
            mood: Some(4),
            tags: vec!["reflection".to_string()],
            ..JournalEntryRecord::default()
        })
        .collect::<Vec<_>>();

    let vision_images = LifeWheelCategory::ALL
        .into_iter()
        .map(|category| VisionImageRecord {
            id: format!("vision-{}", category.as_str()),
            caption: Some("Where this part of life is headed".to_string()),
            category: Some(category.as_str().to_string()),
            created_at: Some(days_ago(now, 10)),
            last_reviewed_at: Some(days_ago(now, 2)),
            review_interval_days: Some(30),
        })
        .collect::<Vec<_>>();

    let check_ins = vec![CheckInRecord {
        id: "check-in-1".to_string(),
        created_at: Some(days_ago(now, 1)),
        scores: LifeWheelCategory::ALL
            .into_iter()
            .map(|category| (category.as_str().to_string(), 7.0))
            .collect(),
        note: Some("Steady week".to_string()),
    }];

    let identity_tests = ["mbti", "enneagram", "strengths"]
        .into_iter()
        .map(|kind| IdentityTestRecord {
            id: format!("test-{kind}"),
            test_type: kind.to_string(),
            completed_at: Some(days_ago(now, 16)),
            result_summary: Some("Reflective planner".to_string()),
        })
        .collect::<Vec<_>>();

    ProfileFixture {
        goals: goals.into(),
        habits: habits.into(),
        journal_entries: journal_entries.into(),
        vision_images: vision_images.into(),
        check_ins: check_ins.into(),
        identity_tests: identity_tests.into(),
    }
}
