use std::path::PathBuf;

use crate::{
	interpreter::{DEFAULT_MAX_CALL_DEPTH, RuntimeOptions},
	parser::ParserOptions,
};

/// Everything a run is configured with, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
	pub input:                       PathBuf,
	pub verbose:                     bool,
	pub entry_point:                 String,
	/// Print the lowered instructions instead of running
	pub dump_instructions:           bool,
	/// Print every frame as it is destroyed
	pub dump_stack_frames:           bool,
	pub treat_void_as_error:         bool,
	pub disable_implicit_conversion: bool,
	pub remove_unused_symbols:       bool,
	pub optimize_instructions:       bool,
	pub max_call_depth:              usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			input:                       PathBuf::new(),
			verbose:                     false,
			entry_point:                 "main".to_string(),
			dump_instructions:           false,
			dump_stack_frames:           false,
			treat_void_as_error:         false,
			disable_implicit_conversion: false,
			remove_unused_symbols:       false,
			optimize_instructions:       false,
			max_call_depth:              DEFAULT_MAX_CALL_DEPTH,
		}
	}
}

impl Config {
	pub fn parser_options(&self) -> ParserOptions {
		ParserOptions {
			entry_point:                 self.entry_point.clone(),
			disable_implicit_conversion: self.disable_implicit_conversion,
			remove_unused_symbols:       self.remove_unused_symbols,
			optimize_instructions:       self.optimize_instructions,
		}
	}

	pub fn runtime_options(&self) -> RuntimeOptions {
		RuntimeOptions {
			treat_void_as_error: self.treat_void_as_error,
			dump_stack_frames:   self.dump_stack_frames,
			max_call_depth:      self.max_call_depth,
		}
	}
}
