use std::path::Path;

use anyhow::Result;
use clap::Parser;

use crate::cli::CliOptions;

mod cli;
mod dispatch;

fn main() -> Result<()> {
  let options = CliOptions::parse();
  setup_logging(options.verbosity, options.log_file.as_deref())?;

  let stdin = std::io::stdin();
  let stdout = std::io::stdout();
  dispatch::run(stdin.lock(), stdout.lock())?;
  Ok(())
}

fn setup_logging(verbosity: u8, log_file: Option<&Path>) -> Result<()> {
  let level = match verbosity {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };

  let dispatch = fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.level(),
        record.target(),
        message
      ))
    })
    .level(level);

  // Results go to stdout, so diagnostics stay off it.
  let dispatch = match log_file {
    Some(path) => dispatch.chain(fern::log_file(path)?),
    None => dispatch.chain(std::io::stderr()),
  };

  dispatch.apply()?;
  Ok(())
}
