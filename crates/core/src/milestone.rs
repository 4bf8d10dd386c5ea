//! Milestone status constants and approval state machine.
//!
//! The approval workflow moves a milestone through
//! `planned -> in_progress -> in_review -> completed`, with one backward
//! edge: a client rejection returns `in_review` to `in_progress`. The
//! transition rules live here so both the repository layer and the API
//! handlers validate against the same logic.

/// Milestone has been created but work has not started.
pub const STATUS_PLANNED: &str = "planned";

/// Work on the milestone is underway.
pub const STATUS_IN_PROGRESS: &str = "in_progress";

/// A team member signed the milestone off; it awaits the client's decision.
pub const STATUS_IN_REVIEW: &str = "in_review";

/// The client approved the milestone.
pub const STATUS_COMPLETED: &str = "completed";

/// All valid status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PLANNED,
    STATUS_IN_PROGRESS,
    STATUS_IN_REVIEW,
    STATUS_COMPLETED,
];

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), String> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid milestone status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

/// Check that a milestone in `status` may be signed off for client review.
///
/// Sign-off is legal from `planned` and `in_progress` (the latter covers the
/// re-review path after a rejection). A milestone already in review or
/// completed cannot be signed off again.
pub fn can_sign_off(status: &str) -> Result<(), String> {
    match status {
        STATUS_PLANNED | STATUS_IN_PROGRESS => Ok(()),
        STATUS_IN_REVIEW => Err("Milestone is already awaiting client review".to_string()),
        STATUS_COMPLETED => Err("Milestone is already completed".to_string()),
        other => Err(format!("Unknown milestone status '{other}'")),
    }
}

/// Check that a milestone in `status` may receive a client decision.
///
/// Approve/reject is only legal while the milestone is `in_review`; after a
/// rejection a fresh sign-off is required before the client can decide
/// again.
pub fn can_decide(status: &str) -> Result<(), String> {
    match status {
        STATUS_IN_REVIEW => Ok(()),
        _ => Err(format!(
            "Milestone must be in review to approve or reject (current status: '{status}')"
        )),
    }
}

/// The status a milestone moves to after a client decision.
pub fn decision_target(approved: bool) -> &'static str {
    if approved {
        STATUS_COMPLETED
    } else {
        STATUS_IN_PROGRESS
    }
}

/// Derive a milestone's task progress as a whole percentage.
///
/// Computed on read from the milestone's task counts; never persisted.
/// A milestone with no tasks reports 0%.
pub fn task_progress(completed_tasks: i64, total_tasks: i64) -> u8 {
    if total_tasks <= 0 {
        return 0;
    }
    let completed = completed_tasks.clamp(0, total_tasks);
    ((completed * 100) / total_tasks) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_statuses_accepted() {
        for status in VALID_STATUSES {
            assert!(validate_status(status).is_ok());
        }
    }

    #[test]
    fn test_invalid_status_rejected() {
        let result = validate_status("cancelled");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid milestone status"));
    }

    #[test]
    fn test_sign_off_from_planned_and_in_progress() {
        assert!(can_sign_off(STATUS_PLANNED).is_ok());
        assert!(can_sign_off(STATUS_IN_PROGRESS).is_ok());
    }

    #[test]
    fn test_sign_off_rejected_when_in_review_or_completed() {
        assert!(can_sign_off(STATUS_IN_REVIEW).is_err());
        assert!(can_sign_off(STATUS_COMPLETED).is_err());
    }

    #[test]
    fn test_decision_requires_in_review() {
        assert!(can_decide(STATUS_IN_REVIEW).is_ok());
        assert!(can_decide(STATUS_PLANNED).is_err());
        assert!(can_decide(STATUS_IN_PROGRESS).is_err());
        assert!(can_decide(STATUS_COMPLETED).is_err());
    }

    #[test]
    fn test_approval_completes_rejection_reopens() {
        assert_eq!(decision_target(true), STATUS_COMPLETED);
        assert_eq!(decision_target(false), STATUS_IN_PROGRESS);
    }

    #[test]
    fn test_task_progress_half_done() {
        assert_eq!(task_progress(1, 2), 50);
    }

    #[test]
    fn test_task_progress_no_tasks_is_zero() {
        assert_eq!(task_progress(0, 0), 0);
    }

    #[test]
    fn test_task_progress_all_done() {
        assert_eq!(task_progress(3, 3), 100);
    }

    #[test]
    fn test_task_progress_clamps_bad_counts() {
        // Completed count can never exceed the total.
        assert_eq!(task_progress(5, 3), 100);
        assert_eq!(task_progress(-1, 3), 0);
    }
}
