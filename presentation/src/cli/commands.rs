//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use montage_application::{AllocationParams, AllocationRequest};
use montage_domain::{AllocationError, JurorWeightMap, RoundId};
use std::path::PathBuf;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable, colored text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// CLI arguments for montage
#[derive(Parser, Debug)]
#[command(name = "montage")]
#[command(author, version, about = "Vote allocation and quorum reconciliation for judging rounds")]
#[command(long_about = r#"
Montage distributes the entries of a judging round among jurors and keeps
that distribution consistent when the quorum or the jury changes.

Each entry needs `quorum` active votes. The first allocation shuffles the
entries once; later increases replay the same order, and decreases retire
votes of discarded jurors.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./montage.toml      Project-level config
3. ~/.config/montage/config.toml   Global config

Example:
  montage init-round "Wiki Loves Monuments 2024" -e a.jpg -e b.jpg -e c.jpg
  montage process --round 1 --quorum 3 -j alice -j bob -j carol
  montage process --round 1 --quorum 2 -j alice=2 --discard bob --discard carol
  montage next --round 1 --juror alice
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Vote store snapshot (overrides `[store] path`)
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,
}

impl Cli {
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a round and add its entries
    InitRound {
        /// Round name
        name: String,

        /// Entry name (can be specified multiple times)
        #[arg(short, long = "entry", value_name = "NAME")]
        entries: Vec<String>,

        /// File with one entry name per line
        #[arg(long, value_name = "PATH")]
        entries_file: Option<PathBuf>,
    },

    /// Show what `process` would change, without writing anything
    Plan(AllocateArgs),

    /// Reconcile the round's votes with the given quorum and jury
    Process(AllocateArgs),

    /// Show per-juror progress of a round
    Status {
        #[arg(long)]
        round: u64,
    },

    /// Show a juror's next open vote
    Next {
        #[arg(long)]
        round: u64,

        #[arg(long)]
        juror: String,
    },

    /// Rate one of a juror's open votes
    Rate {
        #[arg(long)]
        round: u64,

        #[arg(long)]
        vote: u64,

        #[arg(long)]
        juror: String,

        /// Score from 1 to 5
        #[arg(long)]
        rating: u8,
    },

    /// Show configuration file locations and the merged configuration
    ShowConfig,
}

/// Arguments shared by `plan` and `process`
#[derive(Args, Debug, Clone)]
pub struct AllocateArgs {
    #[arg(long)]
    pub round: u64,

    /// Number of active votes every entry needs
    #[arg(long)]
    pub quorum: u32,

    /// Juror with optional weight, `name` or `name=weight` (repeatable)
    #[arg(short, long = "juror", value_name = "NAME[=WEIGHT]", value_parser = parse_juror_weight)]
    pub jurors: Vec<(String, u32)>,

    /// Juror whose votes may be retired on a quorum decrease (repeatable)
    #[arg(long = "discard", value_name = "NAME")]
    pub discard: Vec<String>,

    /// Discard strategy: random or keep_best (defaults to `[allocation] strategy`)
    #[arg(long)]
    pub strategy: Option<String>,

    /// Seed for the shuffle (defaults to `[allocation] seed`)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl AllocateArgs {
    /// Build an allocation request, falling back to configured defaults
    pub fn to_request(
        &self,
        params: &AllocationParams,
    ) -> Result<AllocationRequest, AllocationError> {
        let weights = JurorWeightMap::from_pairs(self.jurors.iter().cloned())?;
        let mut request =
            AllocationRequest::from_params(RoundId(self.round), weights, self.quorum, params)
                .with_discard_jurors(self.discard.iter().cloned());
        if let Some(strategy) = &self.strategy {
            request = request.with_strategy(strategy.clone());
        }
        if let Some(seed) = self.seed {
            request = request.with_seed(seed);
        }
        Ok(request)
    }
}

/// Parse `name` or `name=weight`
pub fn parse_juror_weight(s: &str) -> Result<(String, u32), String> {
    let (name, weight) = match s.split_once('=') {
        Some((name, weight)) => {
            let weight = weight
                .trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid weight '{}': {}", weight, e))?;
            (name.trim(), weight)
        }
        None => (s.trim(), 1),
    };
    if name.is_empty() {
        return Err("juror name must not be empty".to_string());
    }
    Ok((name.to_string(), weight))
}
