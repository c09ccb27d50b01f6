mod cmd_branch;
mod cmd_commit;
mod cmd_init;
mod cmd_log;
mod cmd_merge;
mod cmd_ota;
mod cmd_status;
mod cmd_switch;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitctx", version, about = "Version control for AI context")]
struct Cli {
    /// Repository root (default: nearest parent containing .gitcontext)
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a .gitcontext repository
    Init,
    /// Stage an OTA log entry (thought / action / result)
    Ota {
        #[arg(short, long)]
        thought: String,
        #[arg(short, long)]
        action: String,
        #[arg(short, long)]
        result: String,
        /// Affected file path (repeatable)
        #[arg(long = "file")]
        files: Vec<String>,
    },
    /// Create a branch
    Branch {
        name: String,
        /// Fork point (default: current branch)
        #[arg(long)]
        from: Option<String>,
    },
    /// Switch to a branch
    Switch { name: String },
    /// Commit staged logs with optional decisions and alternatives
    Commit {
        message: String,
        /// Decision made (repeatable)
        #[arg(long = "decision")]
        decisions: Vec<String>,
        /// Rejected alternative as "what=why" (repeatable)
        #[arg(long = "alt")]
        alternatives: Vec<String>,
        /// JSON file with a path -> digest files snapshot
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Merge a branch into the current branch (squash by default)
    Merge {
        branch: String,
        /// Merge target (default: current branch)
        #[arg(long)]
        into: Option<String>,
        /// Replay every commit instead of squashing
        #[arg(long)]
        no_squash: bool,
    },
    /// Show commit history, newest first
    Log {
        #[arg(long)]
        branch: Option<String>,
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show repository status
    Status,
    /// Delete a branch (its history is archived)
    Delete { name: String },
    /// Discard all staged OTA logs
    Discard,
}

fn repo_root(cli_repo: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(root) = cli_repo {
        return Ok(root);
    }
    Ok(std::env::current_dir()?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("GITCTX_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let root = repo_root(cli.repo)?;

    match cli.cmd {
        Command::Init => cmd_init::execute(&root),
        Command::Ota {
            thought,
            action,
            result,
            files,
        } => cmd_ota::execute(&root, &thought, &action, &result, files),
        Command::Branch { name, from } => cmd_branch::create(&root, &name, from.as_deref()),
        Command::Switch { name } => cmd_switch::execute(&root, &name),
        Command::Commit {
            message,
            decisions,
            alternatives,
            snapshot,
        } => cmd_commit::execute(&root, &message, decisions, &alternatives, snapshot.as_deref()),
        Command::Merge {
            branch,
            into,
            no_squash,
        } => cmd_merge::execute(&root, &branch, into.as_deref(), !no_squash),
        Command::Log {
            branch,
            limit,
            json,
        } => cmd_log::execute(&root, branch.as_deref(), limit, json),
        Command::Status => cmd_status::execute(&root),
        Command::Delete { name } => cmd_branch::delete(&root, &name),
        Command::Discard => cmd_ota::discard(&root),
    }
}
