use anyhow::{bail, Result};
use clap::Parser;
use isagen_cli::{run, Options, Outcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate grammar, AST, lowering, encoder, decoder and ordinal sources from one opcode table
#[derive(Parser, Debug)]
#[command(name = "isagen", version, about)]
struct Cli {
    /// Workspace root; every configured path is relative to it
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Configuration file (defaults to <root>/isagen.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail if any generated file is out of date instead of writing
    #[arg(long)]
    check: bool,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let options = Options {
        root: cli.root,
        config: cli.config,
        check: cli.check,
    };

    match run(&options)? {
        Outcome::Written { artifacts } => {
            tracing::info!(artifacts, "generation complete");
        }
        Outcome::UpToDate => {
            tracing::info!("all generated files are up to date");
        }
        Outcome::Stale(paths) => {
            let list: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            bail!(
                "{} generated file(s) out of date, re-run isagen: {}",
                paths.len(),
                list.join(", ")
            );
        }
    }
    Ok(())
}
