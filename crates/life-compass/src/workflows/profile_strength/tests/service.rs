use std::sync::Arc;

use chrono::Duration;

use super::common::*;
use crate::workflows::profile_strength::domain::LifeWheelCategory;
use crate::workflows::profile_strength::ledger::{
    ledger_key, InMemoryLedgerStore, LedgerStore, XpEventKind, XpLedgerState,
};
use crate::workflows::profile_strength::scoring::AreaWeights;
use crate::workflows::profile_strength::service::{ProfileStrengthError, ProfileStrengthService};

#[tokio::test]
async fn first_refresh_only_pays_reached_milestones() {
    let (service, store) = build_service(ScriptedSource::complete());

    let outcome = service
        .refresh(Some("user-1"), now())
        .await
        .expect("refresh succeeds");

    assert_eq!(outcome.result.overall_percent, Some(98));
    assert!(outcome
        .events
        .iter()
        .all(|event| event.kind == XpEventKind::Bonus));
    assert_eq!(outcome.xp_awarded, 350);
    assert!(outcome.ledger.bonuses.goals_coverage);
    assert!(outcome.ledger.bonuses.habits_coverage);

    let persisted = store
        .read(&ledger_key(Some("user-1")))
        .expect("store readable")
        .expect("ledger persisted");
    assert_eq!(XpLedgerState::from_json(&persisted), outcome.ledger);
}

#[tokio::test]
async fn resolving_a_task_pays_exactly_once_across_refreshes() {
    let source = ScriptedSource::complete();
    source.set_goals(Ok(vec![rich_goal(LifeWheelCategory::Health)]));
    let (service, _store) = build_service(source.clone());

    let first = service
        .refresh(Some("user-2"), now())
        .await
        .expect("first refresh");
    assert!(first
        .result
        .next_tasks_by_area
        .goals
        .iter()
        .any(|task| task.id == "profile-strength-goals-coverage"));

    source.set_goals(Ok(LifeWheelCategory::ALL
        .into_iter()
        .take(4)
        .map(rich_goal)
        .collect()));

    let second = service
        .refresh(Some("user-2"), now() + Duration::hours(1))
        .await
        .expect("second refresh");
    let task_events: Vec<&str> = second
        .events
        .iter()
        .filter(|event| event.kind == XpEventKind::Task)
        .map(|event| event.id.as_str())
        .collect();
    assert_eq!(task_events, vec!["profile-strength-goals-coverage"]);
    assert!(second
        .ledger
        .is_completed("profile-strength-goals-coverage"));

    let third = service
        .refresh(Some("user-2"), now() + Duration::hours(2))
        .await
        .expect("third refresh");
    assert!(third.events.is_empty());
    assert_eq!(third.xp_awarded, 0);
}

#[tokio::test]
async fn regressing_and_fixing_again_does_not_pay_twice() {
    let source = ScriptedSource::complete();
    source.set_habits(Ok(Vec::new()));
    let (service, _store) = build_service(source.clone());

    service.refresh(None, now()).await.expect("empty habits");
    source.set_habits(Ok(vec![habit(LifeWheelCategory::Health, 0)]));
    let fixed = service.refresh(None, now()).await.expect("first habit");
    assert!(fixed
        .events
        .iter()
        .any(|event| event.id == "profile-strength-habits-start"));

    source.set_habits(Ok(Vec::new()));
    service.refresh(None, now()).await.expect("habits removed");
    source.set_habits(Ok(vec![habit(LifeWheelCategory::Health, 0)]));
    let refixed = service.refresh(None, now()).await.expect("habit restored");

    assert!(refixed
        .events
        .iter()
        .all(|event| event.id != "profile-strength-habits-start"));
}

#[tokio::test]
async fn caller_supplied_baseline_drives_detection() {
    let sparse = ScriptedSource::default();
    let (sparse_service, _) = build_service(sparse);
    let baseline = sparse_service
        .refresh(None, now())
        .await
        .expect("sparse refresh")
        .result;
    assert_eq!(baseline.overall_percent, Some(0));

    let (service, _store) = build_service(ScriptedSource::complete());
    let outcome = service
        .refresh_from(Some("user-3"), Some(&baseline), now())
        .await
        .expect("refresh from baseline");

    let task_ids: Vec<&str> = outcome
        .events
        .iter()
        .filter(|event| event.kind == XpEventKind::Task)
        .map(|event| event.id.as_str())
        .collect();
    // Every area's start task is resolved; `ok` habits now carry a review reason instead.
    assert_eq!(task_ids.len(), 6);
    assert!(task_ids.contains(&"profile-strength-identity-start"));
    assert_eq!(outcome.xp_awarded, 6 * 25 + 350);
}

#[tokio::test]
async fn persist_failure_surfaces_and_keeps_the_previous_baseline() {
    let source = ScriptedSource::complete();
    let service = ProfileStrengthService::new(
        Arc::new(source),
        Arc::new(ReadOnlyLedgerStore),
        AreaWeights::default(),
    );

    let error = service
        .refresh(Some("user-4"), now())
        .await
        .expect_err("bonus persist fails");

    assert!(matches!(error, ProfileStrengthError::Ledger(_)));
    assert!(service.previous(Some("user-4")).is_none());
}

#[tokio::test]
async fn corrupt_ledger_is_treated_as_empty() {
    let store = Arc::new(InMemoryLedgerStore::with_entry(
        ledger_key(Some("user-5")),
        "corrupted",
    ));
    let service = ProfileStrengthService::new(
        Arc::new(ScriptedSource::complete()),
        store,
        AreaWeights::default(),
    );

    let outcome = service
        .refresh(Some("user-5"), now())
        .await
        .expect("refresh succeeds");

    assert_eq!(outcome.xp_awarded, 350);
    assert_eq!(outcome.ledger.version, 1);
}

#[tokio::test]
async fn each_user_is_scored_from_their_own_rows() {
    let planner = ScriptedSource::default();
    planner.set_goals(Ok(LifeWheelCategory::ALL.into_iter().map(rich_goal).collect()));
    let source = PerUserSource::default().with_user("planner", planner);
    let service = ProfileStrengthService::new(
        Arc::new(source),
        Arc::new(InMemoryLedgerStore::default()),
        AreaWeights::default(),
    );

    let planner = service
        .refresh(Some("planner"), now())
        .await
        .expect("planner refresh");
    let newcomer = service
        .refresh(Some("newcomer"), now())
        .await
        .expect("newcomer refresh");

    assert_eq!(newcomer.result.area_scores.goals, Some(0));
    assert!(planner.result.area_scores.goals > Some(0));
    assert!(planner.ledger.bonuses.goals_coverage);
    assert!(!newcomer.ledger.bonuses.goals_coverage);
    assert_eq!(newcomer.xp_awarded, 0);
    assert!(planner.xp_awarded > 0);
}

#[tokio::test]
async fn snapshot_cache_drops_the_least_recently_refreshed_user() {
    let (service, _store) = build_service(ScriptedSource::complete());
    let service = service.with_snapshot_capacity(2);

    for user in ["user-a", "user-b", "user-a", "user-c"] {
        service.refresh(Some(user), now()).await.expect("refresh");
    }

    assert_eq!(service.cached_snapshots(), 2);
    assert!(service.previous(Some("user-b")).is_none());
    assert!(service.previous(Some("user-a")).is_some());
    assert!(service.previous(Some("user-c")).is_some());
}

#[tokio::test]
async fn evicted_user_keeps_their_ledger() {
    let (service, _store) = build_service(ScriptedSource::complete());
    let service = service.with_snapshot_capacity(1);

    let first = service
        .refresh(Some("user-a"), now())
        .await
        .expect("first refresh");
    service
        .refresh(Some("user-b"), now())
        .await
        .expect("other user");
    assert!(service.previous(Some("user-a")).is_none());

    let again = service
        .refresh(Some("user-a"), now())
        .await
        .expect("refresh after eviction");
    assert_eq!(first.xp_awarded, 350);
    assert!(again.events.is_empty());
}
