// responses.rs — Boundary-layer rendering of goals and errors.
//
// The engine reports errors with ids and raw values; the boundary turns
// them into messages a person can read, and replaces opaque author ids
// with display names (usernames for user goals, community names for
// community goals). The engine knows nothing about any of this.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::GoalError;
use crate::goal::{Goal, GoalState};

/// A goal shaped for the frontend: author resolved to a display name,
/// state made explicit, logical id surfaced instead of the storage id.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GoalView {
    pub id: Uuid,
    pub author: String,
    pub name: String,
    pub unit: String,
    pub amount: f64,
    pub progress: f64,
    pub state: GoalState,
    pub created_at: DateTime<Utc>,
    pub target_date: DateTime<Utc>,
}

/// Render one goal, resolving the author through the caller's lookup
/// (session store, community directory). Falls back to the author's
/// `Display` form when the lookup has no name for it.
pub fn goal_view<A, F>(goal: &Goal<A>, resolve_author: F) -> GoalView
where
    A: fmt::Display,
    F: Fn(&A) -> Option<String>,
{
    GoalView {
        id: goal.logical_id(),
        author: resolve_author(&goal.author).unwrap_or_else(|| goal.author.to_string()),
        name: goal.name.clone(),
        unit: goal.unit.clone(),
        amount: goal.amount,
        progress: goal.progress,
        state: goal.state(),
        created_at: goal.created_at,
        target_date: goal.target_date,
    }
}

/// Render a list of goals with one author resolver.
pub fn goal_views<A, F>(goals: &[Goal<A>], resolve_author: F) -> Vec<GoalView>
where
    A: fmt::Display,
    F: Fn(&A) -> Option<String>,
{
    goals.iter().map(|g| goal_view(g, &resolve_author)).collect()
}

/// The error-to-message table. One entry per engine error; the boundary
/// picks the HTTP status from [`GoalError::kind`] and the body from here.
pub fn error_message(err: &GoalError) -> String {
    match err {
        GoalError::EmptyName => "Goal name cannot be empty!".to_string(),
        GoalError::NonPositiveAmount(_) => "Goal amount must be positive!".to_string(),
        GoalError::NonPositiveProgress(_) => "Progress must be positive!".to_string(),
        GoalError::DeadlineNotFuture(_) => {
            "Target completion date must be in the future!".to_string()
        }
        GoalError::NotAuthor { actor, goal_id } => {
            format!("{} is not the author of goal {}!", actor, goal_id)
        }
        GoalError::NotFound(id) => format!("Goal {} does not exist!", id),
        GoalError::Io { .. } | GoalError::Serialization(_) => {
            "Something went wrong, please try again.".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn view_resolves_author_name() {
        let author = Uuid::new_v4();
        let goal = Goal::new(author, "Run", "km", 10.0, Utc::now() + Duration::days(7));

        let view = goal_view(&goal, |a| {
            (*a == author).then(|| "alice".to_string())
        });
        assert_eq!(view.author, "alice");
        assert_eq!(view.id, goal.id);
        assert_eq!(view.state, GoalState::Incomplete);
    }

    #[test]
    fn view_falls_back_to_display_form() {
        let author = Uuid::new_v4();
        let goal = Goal::new(author, "Run", "km", 10.0, Utc::now() + Duration::days(7));

        let view = goal_view(&goal, |_| None);
        assert_eq!(view.author, author.to_string());
    }

    #[test]
    fn view_surfaces_logical_id_for_completed_goal() {
        let original = Uuid::new_v4();
        let mut goal = Goal::new(
            Uuid::new_v4(),
            "Run",
            "km",
            10.0,
            Utc::now() + Duration::days(7),
        );
        goal.completed_from = Some(original);

        let view = goal_view(&goal, |_| None);
        assert_eq!(view.id, original);
        assert_eq!(view.state, GoalState::Complete);
    }

    #[test]
    fn messages_match_error_variants() {
        assert_eq!(error_message(&GoalError::EmptyName), "Goal name cannot be empty!");
        assert_eq!(
            error_message(&GoalError::NonPositiveAmount(-5.0)),
            "Goal amount must be positive!"
        );
        let id = Uuid::new_v4();
        assert!(error_message(&GoalError::NotFound(id)).contains(&id.to_string()));
    }
}
