use clap::Parser;
use filesift::cli::{OrganizeCommand, run_cli_with_config};
use std::path::PathBuf;

/// Sort the files of a directory into category subdirectories.
#[derive(Parser)]
#[command(name = "filesift", version, about)]
struct Args {
    /// Directory to organize
    path: PathBuf,

    /// Report the plan without moving any files
    #[arg(long)]
    dry_run: bool,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit the report as JSON instead of styled text
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let command = OrganizeCommand::Organize {
        dry_run: args.dry_run,
    };

    if let Err(e) = run_cli_with_config(command, &args.path, args.config.as_deref(), args.json) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
