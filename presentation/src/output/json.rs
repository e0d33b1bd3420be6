//! JSON output formatter

use crate::output::formatter::OutputFormatter;
use montage_application::RoundStatus;
use montage_domain::{AllocationPlan, Entry, Round, Vote};
use serde::Serialize;
use serde_json::json;

/// Formats results as pretty-printed JSON, one document per command
pub struct JsonFormatter;

impl JsonFormatter {
    fn render<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_round(&self, round: &Round, entries: &[Entry]) -> String {
        Self::render(&json!({ "round": round, "entries": entries }))
    }

    fn format_plan(&self, plan: &AllocationPlan, applied: bool) -> String {
        Self::render(&json!({ "applied": applied, "plan": plan }))
    }

    fn format_status(&self, status: &RoundStatus) -> String {
        Self::render(status)
    }

    fn format_vote(&self, vote: Option<&Vote>) -> String {
        Self::render(&vote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use montage_domain::{EntryId, JurorId, RoundId, VoteId};

    #[test]
    fn test_plan_json() {
        let plan = AllocationPlan {
            new_quorum: 3,
            votes_to_create: 30,
            ..Default::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_plan(&plan, true)).unwrap();
        assert_eq!(value["applied"], true);
        assert_eq!(value["plan"]["votes_to_create"], 30);
        assert_eq!(value["plan"]["new_quorum"], 3);
    }

    #[test]
    fn test_vote_json() {
        let vote = Vote::new(VoteId(2), EntryId(5), 0).bound_to(JurorId::new("ann"));
        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_vote(Some(&vote))).unwrap();
        assert_eq!(value["id"], 2);
        assert_eq!(value["juror"], "ann");
        assert_eq!(JsonFormatter.format_vote(None), "null");
    }

    #[test]
    fn test_round_json() {
        let round = Round::new(RoundId(1), "R1");
        let entries = vec![Entry::new(EntryId(1), RoundId(1), "a.jpg")];
        let value: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_round(&round, &entries)).unwrap();
        assert_eq!(value["round"]["name"], "R1");
        assert_eq!(value["entries"][0]["name"], "a.jpg");
    }
}
