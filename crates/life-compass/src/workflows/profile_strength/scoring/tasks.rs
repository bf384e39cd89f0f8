//! Fixed catalog of micro-tasks keyed by `(area, reason)`.
//!
//! Task ids are the ledger's idempotency key, so ids and copy here are part of the persisted
//! contract.

use super::super::domain::{AreaKey, NextTask, ReasonCode, TASK_XP_REWARD};

struct TaskTemplate {
    title: &'static str,
    description: &'static str,
    eta_minutes: u8,
}

const fn template(title: &'static str, description: &'static str, eta_minutes: u8) -> TaskTemplate {
    TaskTemplate {
        title,
        description,
        eta_minutes,
    }
}

pub fn task_id(area: AreaKey, reason: ReasonCode) -> String {
    format!("profile-strength-{}-{}", area.as_str(), reason.slug())
}

/// Builds the task resolving `reason` for `area`. Informational reasons have no task.
pub fn task_for(area: AreaKey, reason: ReasonCode) -> Option<NextTask> {
    let template = lookup(area, reason)?;
    Some(NextTask {
        id: task_id(area, reason),
        area,
        title: template.title.to_string(),
        description: template.description.to_string(),
        eta_minutes: template.eta_minutes,
        xp_reward: TASK_XP_REWARD,
        reasons: vec![reason],
        target: area.navigation_target(),
    })
}

fn lookup(area: AreaKey, reason: ReasonCode) -> Option<TaskTemplate> {
    use AreaKey::*;
    use ReasonCode::*;

    let template = match (area, reason) {
        (Goals, NoData) => template(
            "Set your first goal",
            "Pick one thing you want to change this season and write it down as a goal.",
            3,
        ),
        (Goals, LowCoverage) => template(
            "Add a goal in a new life area",
            "Your goals cluster in a few areas. Add one for a life-wheel category you have not covered yet.",
            3,
        ),
        (Goals, LowQuality) => template(
            "Give a goal more detail",
            "Add a description, a target date, or a progress note to one of your goals.",
            2,
        ),
        (Goals, LowRecency) => template(
            "Update a goal's progress",
            "Log a quick progress note on the goal you care about most right now.",
            2,
        ),
        (Goals, NeedsReview) => template(
            "Review an at-risk goal",
            "One of your goals is flagged at risk or off track. Adjust the plan or the timeline.",
            3,
        ),
        (Habits, NoData) => template(
            "Start your first habit",
            "Choose a small daily action you can repeat and add it as a habit.",
            2,
        ),
        (Habits, LowCoverage) => template(
            "Add a habit for another life area",
            "Balance your routine with a habit in a life-wheel area you are not tracking yet.",
            2,
        ),
        (Habits, LowQuality) => template(
            "Add a cue to a habit",
            "Describe when and where a habit happens, or set a weekly target for it.",
            2,
        ),
        (Habits, LowRecency) => template(
            "Check in on your habits",
            "Mark today's completed habits to keep your streaks current.",
            2,
        ),
        (Habits, NeedsReview) => template(
            "Trim your habit list",
            "You are tracking more than twelve active habits. Pause the ones that no longer serve you.",
            3,
        ),
        (Journal, NoData) => template(
            "Write your first journal entry",
            "Spend a couple of minutes capturing how today went.",
            3,
        ),
        (Journal, LowCoverage) => template(
            "Journal a few more times this week",
            "Aim for a short entry most days over the next two weeks.",
            3,
        ),
        (Journal, LowQuality) => template(
            "Add depth to a journal entry",
            "Write a few more sentences, or tag an entry with your mood and topics.",
            3,
        ),
        (Journal, LowRecency) => template(
            "Write a quick journal entry",
            "It has been a while. Jot down one thing you are grateful for today.",
            2,
        ),
        (Journal, NeedsReview) => template(
            "Reflect on recent entries",
            "Read back over your last few entries and note any patterns.",
            3,
        ),
        (VisionBoard, NoData) => template(
            "Pin your first vision image",
            "Add an image that represents something you want your life to include.",
            2,
        ),
        (VisionBoard, LowCoverage) => template(
            "Add a vision image for another area",
            "Your board focuses on a few areas. Add an image for a life-wheel category it is missing.",
            2,
        ),
        (VisionBoard, LowQuality) => template(
            "Caption a vision image",
            "Give an image a caption and a life-wheel category so it means something at a glance.",
            2,
        ),
        (VisionBoard, LowRecency) => template(
            "Refresh your vision board",
            "Swap in or add one image that reflects where you are headed now.",
            2,
        ),
        (VisionBoard, NeedsReview) => template(
            "Review your vision board",
            "Some images are past their review date. Confirm they still inspire you.",
            2,
        ),
        (LifeWheel, NoData) => template(
            "Complete your first life-wheel check-in",
            "Rate each area of your life from 0 to 10 to get a baseline.",
            3,
        ),
        (LifeWheel, LowCoverage) => template(
            "Rate every life-wheel area",
            "Your last check-in skipped some areas. Fill in a rating for each one.",
            3,
        ),
        (LifeWheel, LowQuality) => template(
            "Do a complete check-in",
            "Complete a check-in that rates all eight life-wheel areas.",
            3,
        ),
        (LifeWheel, LowRecency) => template(
            "Do a life-wheel check-in",
            "Take a fresh snapshot of how each area of your life feels today.",
            3,
        ),
        (LifeWheel, NeedsReview) => template(
            "Rebalance your life wheel",
            "Your last check-in shows a big gap between areas. Pick one low area to focus on.",
            3,
        ),
        (Identity, NoData) => template(
            "Take a personality test",
            "Complete a short identity test to learn more about how you work best.",
            3,
        ),
        (Identity, LowCoverage) => template(
            "Try another identity test",
            "Take a different kind of test to round out your self-profile.",
            3,
        ),
        (Identity, LowQuality) => template(
            "Save your test results",
            "Add a short summary of what a test result means for you.",
            2,
        ),
        (Identity, LowRecency) => template(
            "Revisit your identity profile",
            "Look over your past results and note what still feels true.",
            2,
        ),
        (Identity, NeedsReview) => template(
            "Retake an identity test",
            "Your latest test is more than six months old. Retake it to see what changed.",
            3,
        ),
        (_, StaleSnapshot) | (_, ErrorFallback) => return None,
    };

    Some(template)
}
