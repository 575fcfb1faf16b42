//! CLI argument definitions for the step-generation compiler.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "stepgen",
    version,
    about = "Compile liquid-handling protocol steps into robot commands",
    long_about = "Compile a protocol's high-level steps (transfer, mix, distribute,\n\
                  consolidate, pause, module commands) into low-level robot commands,\n\
                  simulating tip usage, well volumes, and module state along the way.\n\
                  Invalid steps produce structured errors, never a crash."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile a protocol file and report the timeline.
    Compile(CompileArgs),

    /// List all supported step types.
    Steps,
}

#[derive(Parser)]
pub struct CompileArgs {
    /// Path to the protocol JSON file.
    #[arg(value_name = "PROTOCOL")]
    pub protocol: PathBuf,

    /// Write the full compiled timeline as JSON to this path.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also print per-well substep rows for each step.
    #[arg(long = "substeps")]
    pub substeps: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
