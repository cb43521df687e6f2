use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use confdiff::infrastructure::config::resolve_config_path;
use confdiff::presentation::cli_summary::{print_perf_summary, print_summary};
use confdiff::presentation::writers::{all_writers, write_to_file, writer_for};
use confdiff::{AppConfig, DiffError, LogLevel, ObjectType, Side};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "confdiff",
    version,
    about = "Confdiff: compare configuration objects between two service instances."
)]
struct Cli {
    /// Config file. Defaults to ./confdiff.toml, then the user config dir.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging, including SQL queries.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Errors only.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare the left and right sources and print the differences.
    Compare {
        /// Overrides `[compare] object_type`.
        #[arg(short = 't', long)]
        object_type: Option<ObjectType>,

        /// "text", "json", "html" or "all". Overrides `[output] format`.
        #[arg(short, long)]
        format: Option<String>,

        /// Write reports under this directory instead of printing to stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Also list matched records without changes.
        #[arg(long)]
        show_unchanged: bool,

        /// Print a coloured summary table to stderr.
        #[arg(long)]
        summary: bool,

        /// Print per-source fetch and compare timings to stderr.
        #[arg(long)]
        timing: bool,
    },
    /// Capture one side's raw records to a JSON snapshot file.
    Snapshot {
        #[arg(short, long, value_enum, default_value_t = SideArg::Left)]
        side: SideArg,

        /// Overrides `[compare] object_type`.
        #[arg(short = 't', long)]
        object_type: Option<ObjectType>,

        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SideArg {
    Left,
    Right,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Left => Side::Left,
            SideArg::Right => Side::Right,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LogLevel::Debug
    } else if cli.quiet {
        LogLevel::Error
    } else {
        LogLevel::Info
    };
    confdiff::init_tracing(level);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let code = err
                .downcast_ref::<DiffError>()
                .map(DiffError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let path = resolve_config_path(cli.config.as_deref())?;
    let mut cfg = AppConfig::load(&path)?;

    match cli.command {
        Command::Compare {
            object_type,
            format,
            out,
            show_unchanged,
            summary,
            timing,
        } => {
            if let Some(object_type) = object_type {
                cfg.compare.object_type = object_type;
            }
            if let Some(format) = format {
                cfg.output.format = format;
            }
            cfg.output.show_unchanged |= show_unchanged;

            let (run, perf) = confdiff::run_with_timing(&cfg).await?;
            emit(&cfg, &run, out.as_deref())?;

            if summary {
                print_summary(&run);
            }
            if timing {
                print_perf_summary(&perf);
            }
        }
        Command::Snapshot {
            side,
            object_type,
            out,
        } => {
            if let Some(object_type) = object_type {
                cfg.compare.object_type = object_type;
            }
            let count = confdiff::snapshot(&cfg, side.into(), &out).await?;
            info!(records = count, path = %out.display(), "snapshot complete");
        }
    }

    Ok(())
}

/// Print the report to stdout, or write it under `out` when given.
/// `all` always writes files, under `[output] dir` by default.
fn emit(cfg: &AppConfig, run: &confdiff::ComparisonRun, out: Option<&Path>) -> Result<()> {
    let show_unchanged = cfg.output.show_unchanged;
    let format = cfg.output.format.as_str();

    let dir = match out {
        Some(dir) => dir,
        None if format == "all" => Path::new(&cfg.output.dir),
        None => {
            let writer = writer_for(format, show_unchanged)
                .ok_or_else(|| anyhow::anyhow!("Unknown format: {}", format))?;
            print!("{}", writer.format(run)?);
            return Ok(());
        }
    };

    let writers = match format {
        "all" => all_writers(show_unchanged),
        fmt => vec![writer_for(fmt, show_unchanged)
            .ok_or_else(|| anyhow::anyhow!("Unknown format: {}", fmt))?],
    };
    for writer in writers {
        let path = write_to_file(writer.as_ref(), run, dir)?;
        eprintln!("Report written to {}", path.display());
    }
    Ok(())
}
