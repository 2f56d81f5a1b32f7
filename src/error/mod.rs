pub mod interpreter;
pub mod parser;

pub use interpreter::InterpreterError;
pub use parser::{ParseError, ParseErrorType};

/// ScriptError is the top-level error type for the scriptor pipeline.
#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
	/// Host failure outside the language itself, e.g. an unreadable file
	#[error("CompilerInternalError: {0:#}")]
	InternalError(#[from] anyhow::Error),
	/// A module named by `import` could not be resolved
	#[error("Failed import \"{path}\": {error:#}")]
	ImportError { path: String, error: anyhow::Error },
	/// Syntax, structural or type error found while lowering
	#[error("Syntax error: {0}")]
	ParseError(#[from] ParseError),
	/// Runtime errors encountered during interpretation
	#[error("Runtime error: {0}")]
	RuntimeError(#[from] InterpreterError),
}
