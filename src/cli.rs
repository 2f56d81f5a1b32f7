use std::path::PathBuf;

use clap::Parser;

use crate::{Config, interpreter::DEFAULT_MAX_CALL_DEPTH};

#[derive(Parser, Debug)]
#[command(name = "scriptor", version, about = "Compile a script to bytecode and run it.")]
pub struct Cli {
	/// Script to run
	pub input:                       PathBuf,
	/// Log the pipeline stages to stderr
	#[arg(short, long)]
	pub verbose:                     bool,
	/// Function the program starts in
	#[arg(long, default_value = "main")]
	pub entry_point:                 String,
	/// Print the lowered instructions instead of running
	#[arg(long)]
	pub dump_instructions:           bool,
	/// Print each frame's variables when it returns
	#[arg(long)]
	pub dump_stack_frames:           bool,
	/// Reading a void value is a runtime error
	#[arg(long)]
	pub treat_void_as_error:         bool,
	/// Reject operators between different types
	#[arg(long)]
	pub disable_implicit_conversion: bool,
	/// Drop functions the entry point never reaches
	#[arg(long)]
	pub remove_unused_symbols:       bool,
	/// Fold redundant moves through cache slots
	#[arg(long)]
	pub optimize_instructions:       bool,
	#[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
	pub max_call_depth:              usize,
}

impl From<Cli> for Config {
	fn from(cli: Cli) -> Self {
		Self {
			input:                       cli.input,
			verbose:                     cli.verbose,
			entry_point:                 cli.entry_point,
			dump_instructions:           cli.dump_instructions,
			dump_stack_frames:           cli.dump_stack_frames,
			treat_void_as_error:         cli.treat_void_as_error,
			disable_implicit_conversion: cli.disable_implicit_conversion,
			remove_unused_symbols:       cli.remove_unused_symbols,
			optimize_instructions:       cli.optimize_instructions,
			max_call_depth:              cli.max_call_depth,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn flags_map_onto_the_config() {
		let cli = Cli::try_parse_from(["scriptor", "prog.script", "-v", "--entry-point", "start", "--remove-unused-symbols"])
			.unwrap();
		let config = Config::from(cli);
		assert_eq!(config.input, PathBuf::from("prog.script"));
		assert!(config.verbose && config.remove_unused_symbols);
		assert!(!config.dump_instructions);
		assert_eq!(config.entry_point, "start");
		assert_eq!(config.max_call_depth, DEFAULT_MAX_CALL_DEPTH);
	}

	#[test]
	fn input_is_required() { assert!(Cli::try_parse_from(["scriptor"]).is_err()) }
}
