use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use error_set::error_set;
use git_diff_parser::{DecodeError, Patch, Patches};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

error_set! {
    /// Errors from the command line front end
    CliError := {
        #[display("Failed to read {path}: {message}")]
        ReadFailed { path: String, message: String },
        #[display("No patch found for {file}")]
        PatchNotFound { file: String },
        #[display("Failed to render JSON: {message}")]
        JsonFailed { message: String },
        #[display("Failed to write output: {message}")]
        WriteFailed { message: String },
        DecodeError(DecodeError),
    }
}

#[derive(Parser)]
#[command(name = "git-diff-parser")]
#[command(about = "Split git diff output into per-file patches")]
struct Cli {
    /// Drop invalid UTF-8 sequences instead of rejecting the input
    #[arg(long, global = true)]
    scrub: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List file paths, one per patch
    Files {
        /// Diff to read (stdin if omitted or "-")
        input: Option<PathBuf>,
    },
    /// List change type, prior path and path of every patch
    List {
        /// Diff to read (stdin if omitted or "-")
        input: Option<PathBuf>,
    },
    /// Print the raw hunk text of the first patch for FILE
    Show {
        file: String,
        /// Diff to read (stdin if omitted or "-")
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print changed lines of FILE with explicit line numbers
    Lines {
        file: String,
        /// Diff to read (stdin if omitted or "-")
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print every patch as JSON
    Json {
        /// Diff to read (stdin if omitted or "-")
        input: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// Generate shell completions
    Completions { shell: Shell },
    /// Generate a man page
    Man,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(cli)?;
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let scrub = cli.scrub;

    match cli.command {
        Commands::Files { input } => {
            for file in read_patches(input.as_deref(), scrub)?.files() {
                println!("{}", file);
            }
        }
        Commands::List { input } => {
            for patch in &read_patches(input.as_deref(), scrub)? {
                println!(
                    "{}\t{}\t{}",
                    patch.diff_type(),
                    patch.orig_file().unwrap_or("/dev/null"),
                    patch.file()
                );
            }
        }
        Commands::Show { file, input } => {
            let patches = read_patches(input.as_deref(), scrub)?;
            print!("{}", find_patch(&patches, &file)?.body());
        }
        Commands::Lines { file, input } => {
            let patches = read_patches(input.as_deref(), scrub)?;
            print!("{}", find_patch(&patches, &file)?.format_changes());
        }
        Commands::Json { input, pretty } => {
            let patches = read_patches(input.as_deref(), scrub)?;
            let json = if pretty {
                serde_json::to_string_pretty(&patches)
            } else {
                serde_json::to_string(&patches)
            }
            .map_err(|e| CliError::JsonFailed {
                message: e.to_string(),
            })?;
            println!("{}", json);
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "git-diff-parser",
                &mut io::stdout(),
            );
        }
        Commands::Man => {
            clap_mangen::Man::new(Cli::command())
                .render(&mut io::stdout())
                .map_err(|e| CliError::WriteFailed {
                    message: e.to_string(),
                })?;
        }
    }

    Ok(())
}

/// Read a diff from `input` (stdin for `None` or `-`) and parse it
fn read_patches(input: Option<&Path>, scrub: bool) -> Result<Patches, CliError> {
    let bytes = match input {
        Some(path) if path != Path::new("-") => {
            std::fs::read(path).map_err(|e| CliError::ReadFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        }
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| CliError::ReadFailed {
                    path: "stdin".to_string(),
                    message: e.to_string(),
                })?;
            buf
        }
    };
    debug!(bytes = bytes.len(), scrub, "read diff input");

    if scrub {
        Ok(Patches::parse_lossy(&bytes))
    } else {
        Ok(Patches::from_utf8(&bytes)?)
    }
}

fn find_patch<'a>(patches: &'a Patches, file: &str) -> Result<&'a Patch, CliError> {
    patches
        .find_patch_by_file(file)
        .ok_or_else(|| CliError::PatchNotFound {
            file: file.to_string(),
        })
}
