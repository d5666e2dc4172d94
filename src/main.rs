use caste::config::{self, Config};
use caste::display::{render_gpus, render_hwfacts, render_tier};
use caste::{classify, logging, probe_host};
use clap::Parser;
use std::process;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "caste", version)]
#[command(about = "Prints a single-word hardware class", long_about = None)]
struct Args {
    /// Include a short explanation
    #[arg(long)]
    reason: bool,

    /// Dump the detected hardware facts as key=value lines
    #[arg(long)]
    hwfacts: bool,

    /// List every GPU candidate with its selection score
    #[arg(long)]
    gpus: bool,

    /// Config file (default: ~/.config/caste/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<String>,

    /// Log more to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", err);
    process::exit(1)
}

fn main() {
    let args = Args::parse();

    let config: Config = config::load_config(args.config.as_deref()).unwrap_or_else(|e| fail(e));
    if let Err(e) = logging::init_logging(args.verbose, config.logging.level.as_deref()) {
        fail(e);
    }

    let probe = probe_host();
    let facts = config.overrides.apply(probe.facts());
    debug!(?facts, "classifying");
    let result = classify(&facts);

    if args.hwfacts {
        print!("{}", render_hwfacts(&facts));
    }
    if args.gpus {
        print!("{}", render_gpus(&probe));
    }

    let with_reason = args.reason || config.output.reason;
    println!("{}", render_tier(&result, with_reason, &config.output.separator));
}
