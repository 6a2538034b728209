mod error;

use std::ffi::OsString;
use std::fs;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use error::Result;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
/// Checks transition systems against LTL properties via automata-theoretic
/// model checking.
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a transition system satisfies an LTL formula.
    Check {
        /// Path to a transition system in the textual format (spec §6).
        ts_file: OsString,
        /// The LTL formula to check, e.g. "G (p -> X !p)".
        formula: String,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(satisfied) => {
            if satisfied {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Commands::Check { ts_file, formula } => {
            let content = fs::read_to_string(ts_file)
                .map_err(|e| error::Error::Io(ts_file.to_string_lossy().into_owned(), e))?;
            let graph = ts::TsGraph::parse(&content)?;
            let node = ltl::Node::parse(formula)?;

            let satisfied = verify::verify_ltl(&node, &graph)?;
            if satisfied {
                println!("satisfied");
            } else {
                println!("violated");
            }
            Ok(satisfied)
        }
    }
}
