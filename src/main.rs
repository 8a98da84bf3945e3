//! gitree CLI - browse a git revision as a read-only filesystem

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitree::ops::ls_tree;
use gitree::{Config, FileSystem, Repository};

#[derive(Parser)]
#[command(name = "gitree")]
#[command(about = "read-only filesystem view of a git revision")]
#[command(version)]
struct Cli {
    /// git directory (discovered from the working directory if omitted)
    #[arg(long, env = "GIT_DIR")]
    git_dir: Option<PathBuf>,

    /// revision to browse
    #[arg(short, long)]
    rev: Option<String>,

    /// toml config file with defaults for the options above
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// more logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// show metadata of a path
    Stat {
        /// path within the tree
        path: String,
    },

    /// list directory contents
    Ls {
        /// path within the tree
        #[arg(default_value = "")]
        path: String,

        /// list recursively
        #[arg(short, long)]
        recursive: bool,

        /// include object sizes
        #[arg(short, long)]
        long: bool,

        /// print entries as json lines
        #[arg(long, conflicts_with = "long")]
        json: bool,
    },

    /// write a file's content to stdout
    Cat {
        /// path within the tree
        path: String,
    },

    /// print the identity of the view
    Describe,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> gitree::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(rev) = &cli.rev {
        config = config.with_revision(rev.as_str());
    }
    if let Some(dir) = &cli.git_dir {
        config = config.with_git_dir(dir);
    }
    Ok(config)
}

fn stdout_error(e: io::Error) -> gitree::Error {
    gitree::Error::Io {
        path: "stdout".into(),
        source: e,
    }
}

fn run(cli: Cli) -> gitree::Result<()> {
    let config = load_config(&cli)?;
    let repo = Repository::open(&config)?;

    match cli.command {
        Commands::Stat { path } => {
            let info = repo.stat(&path)?;
            println!("path: {}", info.path());
            println!("name: {}", info.name());
            println!("type: {}", info.kind().type_name());
            println!("mode: {:06o}", info.mode());
            println!("id: {}", info.id());
            if info.is_regular() {
                println!("size: {}", info.size());
            }
            println!("modified: {}", info.mod_time().to_rfc2822());
        }

        Commands::Ls {
            path,
            recursive,
            long,
            json,
        } => {
            let entries = ls_tree(&repo, &path, recursive)?;
            let mut out = io::stdout().lock();

            for entry in entries {
                let line = if json {
                    serde_json::to_string(&entry).map_err(|e| stdout_error(e.into()))?
                } else if long {
                    entry.long()
                } else {
                    entry.to_string()
                };
                writeln!(out, "{}", line).map_err(stdout_error)?;
            }
        }

        Commands::Cat { path } => {
            let data = repo.read(&path)?;
            io::stdout().write_all(&data).map_err(stdout_error)?;
        }

        Commands::Describe => {
            println!("{}", repo.describe());
            if let Some(dir) = repo.git_dir() {
                println!("git dir: {}", dir.display());
            }
        }
    }

    Ok(())
}
