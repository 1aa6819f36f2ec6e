use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Interactive shell over an in-memory list of text lines: reads an
/// integer opcode and its arguments from stdin and applies the
/// matching list operation, writing results to stdout.
#[derive(Parser, Debug)]
#[command(name = "line-list", about, version)]
pub struct CliOptions {
  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  pub verbosity: u8,

  /// Save logs to a specific file instead of stderr
  #[arg(long = "log", value_name = "FILE")]
  pub log_file: Option<PathBuf>,
}
