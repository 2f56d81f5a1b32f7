use crate::instruction::DataType;

/// A lowering error with the line it was found on.
#[derive(thiserror::Error, Debug, PartialEq)]
#[error("line {line}: {type}")]
pub struct ParseError {
	pub line:   usize,
	pub r#type: ParseErrorType,
}

impl ParseError {
	pub fn new(line: usize, r#type: ParseErrorType) -> Self { Self { line, r#type } }
}

#[derive(Debug, PartialEq)]
pub enum ParseErrorType {
	UnbalancedBrackets { open: char, close: char },
	UnexpectedToken(String),
	InvalidToken(String),
	ExpectedToken(&'static str),
	ExpectedExpression,
	ExpectedIdentifier(String),
	UndeclaredIdentifier(String),
	Redeclaration(String),
	DuplicateFunction(String),
	DuplicateParameter(String),
	WrongArgumentCount { function: String, expected: usize, found: usize },
	FunctionNotCalled(String),
	VoidValue(String),
	ReturnFromVoid(String),
	GlobalVariable(String),
	NestedFunction(String),
	UserTypeDeclaration,
	UnsupportedOperator(String),
	ComparisonOutsideCondition,
	InvalidAssignmentTarget,
	AddressOfInExpression,
	NotAPointer(String),
	ElseWithoutIf,
	StringOperand { left: DataType, right: DataType },
	StringOperator(&'static str),
	UserTypeOperator,
	PointerOperator(&'static str),
	PointerMismatch { left: DataType, right: DataType },
	ImplicitConversion { from: DataType, to: DataType },
}

impl std::fmt::Display for ParseErrorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use ParseErrorType::*;
		match self {
			UnbalancedBrackets { open, close } => write!(f, "Unbalanced brackets '{open}' and '{close}'"),
			UnexpectedToken(token) => write!(f, "Unexpected token '{token}'"),
			InvalidToken(token) => write!(f, "Invalid token {token}"),
			ExpectedToken(token) => write!(f, "Expected '{token}'"),
			ExpectedExpression => write!(f, "Expected expression"),
			ExpectedIdentifier(found) => write!(f, "Expected identifier, found '{found}'"),
			UndeclaredIdentifier(name) => write!(f, "Use of undeclared identifier '{name}'"),
			Redeclaration(name) => write!(f, "Redeclaration of '{name}' in the same scope"),
			DuplicateFunction(name) => write!(f, "Function '{name}' is defined more than once"),
			DuplicateParameter(name) => write!(f, "Parameter '{name}' is declared more than once"),
			WrongArgumentCount { function, expected, found } => {
				write!(f, "Function '{function}' takes {expected} arguments but {found} were given")
			}
			FunctionNotCalled(name) => write!(f, "Function '{name}' used as a value without being called"),
			VoidValue(name) => write!(f, "Void function '{name}' used as a value"),
			ReturnFromVoid(name) => write!(f, "Void function '{name}' cannot return a value"),
			GlobalVariable(name) => write!(f, "Global variable '{name}' is not supported"),
			NestedFunction(name) => write!(f, "Function '{name}' cannot be defined inside another function"),
			UserTypeDeclaration => write!(f, "User defined types are not supported"),
			UnsupportedOperator(operator) => write!(f, "Unsupported operator '{operator}'"),
			ComparisonOutsideCondition => write!(f, "Comparisons are only valid in conditions"),
			InvalidAssignmentTarget => write!(f, "Invalid assignment target"),
			AddressOfInExpression => write!(f, "Address-of must be the whole right-hand side"),
			NotAPointer(name) => write!(f, "'{name}' is not a pointer"),
			ElseWithoutIf => write!(f, "'else' without a preceding 'if'"),
			StringOperand { left, right } => write!(f, "Cannot mix {left} and {right}, only strings go with strings"),
			StringOperator(operator) => write!(f, "Operator '{operator}' cannot be used on strings"),
			UserTypeOperator => write!(f, "Operators cannot be used on user defined types"),
			PointerOperator(operator) => write!(f, "Operator '{operator}' cannot be used on pointers"),
			PointerMismatch { left, right } => write!(f, "Cannot mix {left} and {right}"),
			ImplicitConversion { from, to } => write!(f, "Implicit conversion from {from} to {to} is disabled"),
		}
	}
}
