//! Output formatter trait

use montage_application::RoundStatus;
use montage_domain::{AllocationPlan, Entry, Round, Vote};

/// Trait for formatting command results
pub trait OutputFormatter {
    /// A freshly created round and its entries
    fn format_round(&self, round: &Round, entries: &[Entry]) -> String;

    /// An allocation plan; `applied` distinguishes `process` from `plan`
    fn format_plan(&self, plan: &AllocationPlan, applied: bool) -> String;

    /// Voting progress of a round
    fn format_status(&self, status: &RoundStatus) -> String;

    /// A single vote, or the absence of one
    fn format_vote(&self, vote: Option<&Vote>) -> String;
}
