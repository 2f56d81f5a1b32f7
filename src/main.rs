use std::process::ExitCode;

use clap::Parser;
use scriptor::{Config, Scriptor, cli::Cli};
use tracing::Level;

fn main() -> ExitCode {
	let config = Config::from(Cli::parse());
	let level = if config.verbose { Level::DEBUG } else { Level::WARN };
	tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();

	if let Err(e) = Scriptor::new(config).run_file() {
		eprintln!("Failed run file: {e}");
		return ExitCode::FAILURE;
	}
	ExitCode::SUCCESS
}
