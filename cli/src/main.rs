use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qa_rank_core::choice::{choice_accuracy, ChoiceSplit};
use qa_rank_core::ranking::compute_map_mrr;
use serde::Serialize;
use std::path::{Path, PathBuf};

mod logging;
mod run_file;

/// App Configuration
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,

    /// Outputs the logs in JSON format (useful for telemetry)
    #[clap(long, env, global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute MAP and MRR over a recorded ranking run.
    ///
    /// The run file holds one JSON group per line, each with the ground-truth
    /// `labels` and predicted `scores` for one question's candidates.
    Rank {
        /// Path to the run file
        #[clap(long, env)]
        run_file: PathBuf,

        /// Write the JSON report to this path instead of stdout
        #[clap(long, env)]
        output: Option<PathBuf>,
    },

    /// Compute two-choice accuracy over a recorded run.
    ///
    /// Every group must hold exactly two candidates. The leading groups form
    /// the dev partition, the rest the test partition; accuracies are divided
    /// by the configured partition sizes.
    Choice {
        /// Path to the run file
        #[clap(long, env)]
        run_file: PathBuf,

        /// Number of leading groups forming the dev partition
        #[clap(default_value = "500", long, env)]
        dev_size: usize,

        /// Number of remaining groups forming the test partition
        #[clap(default_value = "500", long, env)]
        test_size: usize,

        /// Write the JSON report to this path instead of stdout
        #[clap(long, env)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Pattern match configuration
    let args: Args = Args::parse();

    // Initialize logging
    logging::init_logging(args.json_output);

    tracing::info!("{args:?}");

    match args.command {
        Command::Rank { run_file, output } => {
            let groups = run_file::load_groups(&run_file)?;
            tracing::info!("loaded {} groups from {}", groups.len(), run_file.display());

            let stats = compute_map_mrr(&groups)?;
            write_report(&stats, output.as_deref())
        }
        Command::Choice {
            run_file,
            dev_size,
            test_size,
            output,
        } => {
            let groups = run_file::load_groups(&run_file)?;
            tracing::info!("loaded {} groups from {}", groups.len(), run_file.display());

            let split = ChoiceSplit {
                dev_size,
                test_size,
            };
            let accuracy = choice_accuracy(&groups, split)?;
            write_report(&accuracy, output.as_deref())
        }
    }
}

fn write_report<T: Serialize>(report: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write report to `{}`", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
