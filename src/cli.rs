//! CLI argument parsing for the intake tool.
//!
//! A thin layer that wires config and I/O around the library, so the same
//! operations can be driven from anywhere.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use laboral_intake::intake::DEFAULT_CASE_ID;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "laboral-intake",
    version,
    about = "Operator-driven intake and triage for labor-dispute cases",
    after_help = "Commands:\n  session                  Serve JSON-lines tool calls on stdin/stdout\n  demo --case-id <id>      Run the scripted intake for one case\n  instructions             Print the operator script for the driver\n  config                   Print a config stub\n\nExamples:\n  echo '{\"tool\":\"create_case\",\"case_id\":\"LAB-0001\"}' | laboral-intake session\n  laboral-intake session --config intake.json --strict\n  laboral-intake demo --case-id LAB-0002",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Session(SessionArgs),
    Demo(DemoArgs),
    Instructions(InstructionsArgs),
    Config(ConfigArgs),
}

/// Options shared by commands that build an intake.
#[derive(Parser, Debug)]
pub struct IntakeOptions {
    /// Intake config JSON (schema_version, default_case_id, ...)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Narratives JSON consulted before the built-in samples
    #[arg(long, value_name = "PATH")]
    pub narratives: Option<PathBuf>,

    /// Reject out-of-order operations instead of only recording state
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Serve JSON-lines tool calls on stdin, one result per line on stdout")]
pub struct SessionArgs {
    #[command(flatten)]
    pub intake: IntakeOptions,
}

#[derive(Parser, Debug)]
#[command(about = "Run the scripted intake sequence for one case")]
pub struct DemoArgs {
    #[command(flatten)]
    pub intake: IntakeOptions,

    /// Case to walk through
    #[arg(long, value_name = "ID", default_value = DEFAULT_CASE_ID)]
    pub case_id: String,

    /// Emit every result envelope as JSON lines instead of the expediente
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Print the operator script for the conversational driver")]
pub struct InstructionsArgs {}

#[derive(Parser, Debug)]
#[command(about = "Print a config stub, or write it to a file")]
pub struct ConfigArgs {
    /// Write the stub here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long, requires = "out")]
    pub force: bool,
}
