use crate::instruction::DataType;

/// Errors that can occur during interpretation
#[derive(thiserror::Error, Debug)]
pub enum InterpreterError {
	#[error("Unknown function '{0}'")]
	UnknownFunction(String),
	#[error("Entry point '{0}' not found")]
	EntryPointNotFound(String),
	#[error("Variable '{0}' not found")]
	VariableNotFound(String),
	#[error("Pull from empty buffer '{0}'")]
	EmptyBuffer(String),
	/// Reaching this means the lowering produced something it should not have
	#[error("line {0}: Invalid instruction")]
	InvalidInstruction(usize),
	/// Error for invalid binary operations
	#[error("Invalid binary operation: {0}")]
	BinaryOperationError(String),
	#[error("Invalid comparison: {0}")]
	ComparisonError(String),
	#[error("Cannot convert {value} to {to}")]
	InvalidConversion { value: String, to: DataType },
	#[error("Invalid {data_type} literal '{literal}'")]
	InvalidLiteral { literal: String, data_type: DataType },
	#[error("Jump offset {0} leaves the function")]
	InvalidJumpTarget(i64),
	#[error("Jump without a numeric offset")]
	MissingJumpOffset,
	#[error("Pop of the function scope")]
	ScopeUnderflow,
	#[error("Return without an active call")]
	StackUnderflow,
	#[error("'{0}' does not hold a pointer")]
	NotAPointer(String),
	#[error("'{0}' points at storage that no longer exists")]
	DanglingPointer(String),
	#[error("Access to void variable '{0}'")]
	VoidAccess(String),
	#[error("Call depth exceeded {0} frames")]
	CallDepthExceeded(usize),
	#[error("Index {index} out of range for string of length {length}")]
	IndexOutOfRange { index: i64, length: usize },
	#[error("I/O failure: {0}")]
	Io(#[from] std::io::Error),
}
