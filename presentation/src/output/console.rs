//! Console output formatter for allocation results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use montage_application::RoundStatus;
use montage_domain::{AllocationPlan, Entry, Round, Vote};

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format_round(round: &Round, entries: &[Entry]) -> String {
        let mut output = String::new();
        output.push_str(&Self::header(&format!("{}: {}", round.id, round.name)));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Entries:".cyan().bold(),
            entries.len()
        ));
        for entry in entries {
            output.push_str(&format!("  {} {}\n", entry.id.to_string().dimmed(), entry.name));
        }
        output.push_str(&Self::footer());
        output
    }

    pub fn format_plan(plan: &AllocationPlan, applied: bool) -> String {
        let mut output = String::new();

        let title = if applied {
            "Allocation Applied"
        } else {
            "Allocation Plan (dry run)"
        };
        output.push_str(&Self::header(title));
        output.push('\n');

        output.push_str(&format!(
            "{} {} -> {}\n",
            "Quorum:".cyan().bold(),
            plan.old_quorum,
            plan.new_quorum
        ));

        if plan.is_noop() {
            output.push_str(&format!("\n{}\n", "Nothing to change.".green()));
        } else {
            output.push_str(&Self::section_header("Changes"));
            output.push_str(&format!("  votes to create:  {}\n", plan.votes_to_create));
            output.push_str(&format!("  votes to cancel:  {}\n", plan.votes_to_cancel));
            output.push_str(&format!("  votes to rebind:  {}\n", plan.votes_to_rebind));
        }

        if plan.disqualified_entry_count > 0 || plan.requalified_entry_count > 0 {
            output.push_str(&Self::section_header("Entries"));
            if plan.disqualified_entry_count > 0 {
                output.push_str(&format!(
                    "  {} {}\n",
                    "disqualified:".red(),
                    plan.disqualified_entry_count
                ));
            }
            if plan.requalified_entry_count > 0 {
                output.push_str(&format!(
                    "  {} {}\n",
                    "requalified:".green(),
                    plan.requalified_entry_count
                ));
            }
        }

        if !plan.total_votes_per_juror.is_empty() {
            output.push_str(&Self::section_header("Votes per juror (open / total)"));
            for (juror, total) in &plan.total_votes_per_juror {
                let open = plan.open_votes_per_juror.get(juror).copied().unwrap_or(0);
                output.push_str(&format!(
                    "  {} {:>5} / {}\n",
                    format!("{:<24}", juror.as_str()).yellow(),
                    open,
                    total
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_status(status: &RoundStatus) -> String {
        let mut output = String::new();
        output.push_str(&Self::header(&format!("{}: {}", status.round, status.name)));
        output.push('\n');

        output.push_str(&format!(
            "{} {}   {} {}   {} {}\n",
            "Quorum:".cyan().bold(),
            status.quorum,
            "Entries:".cyan().bold(),
            status.entry_count,
            "Active votes:".cyan().bold(),
            status.active_votes
        ));
        if status.cancelled_votes > 0 {
            output.push_str(&format!(
                "{}\n",
                format!("({} cancelled votes)", status.cancelled_votes).dimmed()
            ));
        }

        if status.jurors.is_empty() {
            output.push_str(&format!("\n{}\n", "No votes allocated yet.".dimmed()));
        } else {
            output.push_str(&Self::section_header("Jurors (done / total)"));
            for (juror, progress) in &status.jurors {
                let done = format!("{:>5} / {}", progress.completed(), progress.total);
                let done = if progress.open == 0 {
                    done.green()
                } else {
                    done.normal()
                };
                output.push_str(&format!(
                    "  {} {}\n",
                    format!("{:<24}", juror.as_str()).yellow(),
                    done
                ));
            }
        }

        if status.is_complete() {
            output.push_str(&format!("\n{}\n", "All votes are in.".green().bold()));
        }

        output.push_str(&Self::footer());
        output
    }

    pub fn format_vote(vote: Option<&Vote>) -> String {
        let Some(vote) = vote else {
            return format!("{}\n", "No open votes.".green());
        };
        let rating = match vote.rating {
            Some(r) => r.value().to_string(),
            None => "-".to_string(),
        };
        format!(
            "{} {} {}  slot {}  {} {}  rating {}\n",
            vote.id.to_string().yellow().bold(),
            "on".dimmed(),
            vote.entry,
            vote.slot,
            "status".dimmed(),
            vote.status,
            rating
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_round(&self, round: &Round, entries: &[Entry]) -> String {
        Self::format_round(round, entries)
    }

    fn format_plan(&self, plan: &AllocationPlan, applied: bool) -> String {
        Self::format_plan(plan, applied)
    }

    fn format_status(&self, status: &RoundStatus) -> String {
        Self::format_status(status)
    }

    fn format_vote(&self, vote: Option<&Vote>) -> String {
        Self::format_vote(vote)
    }
}
