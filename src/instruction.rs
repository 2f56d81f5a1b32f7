//! The flat bytecode shared by the parser and the interpreter.
//!
//! Every instruction has exactly two operands, both described by a
//! [`VariableInfo`]. An operand is either a reference to a variable (by name)
//! or an immediate constant (`literal_value` is set). Names starting with `%`
//! are process-wide cache slots, names starting with `$` are frame-local
//! temporaries introduced by the lowering.
use std::fmt::Display;

use DataType::*;

/// Accumulator used while lowering arithmetic.
pub const CALCULATION_SLOT: &str = "%fcv";
/// Slot a callee leaves its return value in.
pub const RETURN_SLOT: &str = "%frv";
/// Left operand of a lowered comparison.
pub const LEFT_COMPARISON_SLOT: &str = "%lbv";
/// Right operand of a lowered comparison.
pub const RIGHT_COMPARISON_SLOT: &str = "%rbv";
/// FIFO relaying call arguments to the callee's parameters.
pub const PARAMETER_BUFFER: &str = "%bpv";

/// Static type of a variable or literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
	#[default]
	Invalid,
	Float,
	Char,
	Int,
	String,
	Void,
	UserType,
	FloatConst,
	CharConst,
	IntConst,
	StringConst,
	Pointer,
	UInt64,
}

impl DataType {
	/// Constants collapse to their storage type.
	pub fn base(self) -> Self {
		match self {
			FloatConst => Float,
			CharConst => Char,
			IntConst => Int,
			StringConst => String,
			other => other,
		}
	}

	pub fn is_string(self) -> bool { self.base() == String }

	/// Whether the type is known well enough for the legality checks.
	pub fn is_resolved(self) -> bool { !matches!(self, Void | Invalid) }

	/// Storage size of a value of this type, zero for dynamically sized ones.
	pub fn size(self) -> u32 {
		match self.base() {
			Float => 8,
			Char => 4,
			Int => 8,
			UInt64 => 8,
			Pointer => 24,
			_ => 0,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Invalid => "invalid",
			Float => "float",
			Char => "char",
			Int => "int",
			String => "string",
			Void => "void",
			UserType => "struct",
			FloatConst => "const float",
			CharConst => "const char",
			IntConst => "const int",
			StringConst => "const string",
			Pointer => "pointer",
			UInt64 => "uint64",
		}
	}
}

impl Display for DataType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.name()) }
}

/// Declarative descriptor of an operand or a declaration.
#[derive(Debug, Clone, Default, Eq)]
pub struct VariableInfo {
	pub name:          std::string::String,
	pub data_type:     DataType,
	pub size:          u32,
	pub literal_value: Option<std::string::String>,
}

impl VariableInfo {
	pub fn new(name: impl Into<std::string::String>, data_type: DataType) -> Self {
		Self { name: name.into(), data_type, size: data_type.size(), literal_value: None }
	}

	pub fn literal(value: impl Into<std::string::String>, data_type: DataType) -> Self {
		Self { name: std::string::String::new(), data_type, size: data_type.size(), literal_value: Some(value.into()) }
	}

	pub fn with_type(&self, data_type: DataType) -> Self {
		Self { data_type, size: data_type.size(), ..self.clone() }
	}

	pub fn is_literal(&self) -> bool { self.literal_value.is_some() }

	pub fn is_cache_slot(&self) -> bool { !self.is_literal() && is_cache_name(&self.name) }

	pub fn is_temporary(&self) -> bool { !self.is_literal() && self.name.starts_with('$') }

	/// Whether the operand carries anything at all.
	pub fn is_empty(&self) -> bool { self.name.is_empty() && !self.is_literal() }
}

impl PartialEq for VariableInfo {
	fn eq(&self, other: &Self) -> bool {
		match (&self.literal_value, &other.literal_value) {
			(Some(l), Some(r)) => self.name.is_empty() && other.name.is_empty() && l == r && self.data_type == other.data_type,
			(None, None) => self.name == other.name && self.data_type == other.data_type,
			_ => false,
		}
	}
}

impl Display for VariableInfo {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match (&self.literal_value, self.data_type.base()) {
			(Some(value), String) => write!(f, "\"{value}\""),
			(Some(value), Char) => write!(f, "'{value}'"),
			(Some(value), _) => write!(f, "{value}"),
			(None, _) => write!(f, "{}", self.name),
		}
	}
}

pub fn is_cache_name(name: &str) -> bool { name.starts_with('%') }

/// The calculation slot used at a given expression nesting depth.
pub fn calculation_slot(depth: usize) -> VariableInfo {
	match depth {
		0 => VariableInfo::new(CALCULATION_SLOT, Void),
		depth => VariableInfo::new(format!("{CALCULATION_SLOT}{depth}"), Void),
	}
}

pub fn return_slot(data_type: DataType) -> VariableInfo { VariableInfo::new(RETURN_SLOT, data_type) }

pub fn parameter_buffer(data_type: DataType) -> VariableInfo { VariableInfo::new(PARAMETER_BUFFER, data_type) }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InstructionType {
	#[default]
	Invalid,
	Add,
	Subtract,
	Multiply,
	Divide,
	Equal,
	NotEqual,
	Greater,
	Less,
	EqualOrGreater,
	EqualOrLess,
	Assign,
	Declare,
	Push,
	Pull,
	Call,
	Return,
	Jump,
	PushScope,
	PopScope,
	Dereference,
	AssignLocation,
}

impl InstructionType {
	pub fn is_arithmetic(self) -> bool {
		use InstructionType::*;
		matches!(self, Add | Subtract | Multiply | Divide)
	}

	pub fn is_comparison(self) -> bool {
		use InstructionType::*;
		matches!(self, Equal | NotEqual | Greater | Less | EqualOrGreater | EqualOrLess)
	}
}

impl Display for InstructionType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		use InstructionType::*;
		let name = match self {
			Invalid => "INVALID",
			Add => "ADD",
			Subtract => "SUB",
			Multiply => "MUL",
			Divide => "DIV",
			Equal => "EQUAL",
			NotEqual => "NOT_EQUAL",
			Greater => "GREATER",
			Less => "LESS",
			EqualOrGreater => "EQUAL_OR_GREATER",
			EqualOrLess => "EQUAL_OR_LESS",
			Assign => "ASSIGN",
			Declare => "DECLARE",
			Push => "PUSH",
			Pull => "PULL",
			Call => "CALL",
			Return => "RETURN",
			Jump => "JUMP",
			PushScope => "PUSH_SCOPE",
			PopScope => "POP_SCOPE",
			Dereference => "DEREFERENCE",
			AssignLocation => "ASSIGN_LOCATION",
		};
		write!(f, "{name}")
	}
}

/// One flat, two operand instruction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Instruction {
	pub r#type:   InstructionType,
	pub operand1: VariableInfo,
	pub operand2: VariableInfo,
	/// Source line the instruction was lowered from, zero when synthetic.
	pub line:     usize,
}

impl Instruction {
	pub fn new(r#type: InstructionType) -> Self { Self { r#type, ..Default::default() } }

	pub fn with_operands(r#type: InstructionType, operand1: VariableInfo, operand2: VariableInfo) -> Self {
		Self { r#type, operand1, operand2, line: 0 }
	}

	pub fn at_line(mut self, line: usize) -> Self {
		self.line = line;
		self
	}

	pub fn jump(offset: i64) -> Self {
		Self::with_operands(InstructionType::Jump, VariableInfo::literal(offset.to_string(), IntConst), VariableInfo::default())
	}

	/// Relative offset of a jump, `None` if the operand is not a number.
	pub fn jump_offset(&self) -> Option<i64> { self.operand1.literal_value.as_deref()?.parse().ok() }

	pub fn set_jump_offset(&mut self, offset: i64) { self.operand1 = VariableInfo::literal(offset.to_string(), IntConst) }

	pub fn is_self_assignment(&self) -> bool {
		self.r#type == InstructionType::Assign && !self.operand1.is_literal() && self.operand1.name == self.operand2.name
	}
}

impl Display for Instruction {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {} {}", self.r#type, self.operand1, self.operand2)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn constants_collapse_to_base_type() {
		assert_eq!(IntConst.base(), Int);
		assert_eq!(StringConst.base(), String);
		assert_eq!(Pointer.base(), Pointer);
		assert!(StringConst.is_string());
		assert!(!Void.is_resolved());
	}

	#[test]
	fn literals_compare_by_value() {
		assert_eq!(VariableInfo::literal("5", IntConst), VariableInfo::literal("5", IntConst));
		assert_ne!(VariableInfo::literal("5", IntConst), VariableInfo::literal("6", IntConst));
		assert_ne!(VariableInfo::literal("5", IntConst), VariableInfo::literal("5", FloatConst));
		assert_ne!(VariableInfo::literal("x", StringConst), VariableInfo::new("x", String));
	}

	#[test]
	fn variables_compare_by_name_and_type() {
		assert_eq!(VariableInfo::new("x", Int), VariableInfo::new("x", Int));
		assert_ne!(VariableInfo::new("x", Int), VariableInfo::new("x", Float));
	}

	#[test]
	fn slots_are_classified() {
		assert!(calculation_slot(0).is_cache_slot());
		assert_eq!(calculation_slot(2).name, "%fcv2");
		assert!(VariableInfo::new("$t0", Void).is_temporary());
		assert!(!VariableInfo::literal("%", StringConst).is_cache_slot());
	}

	#[test]
	fn jump_offsets_round_trip_through_the_operand() {
		let mut jump = Instruction::jump(-4);
		assert_eq!(jump.jump_offset(), Some(-4));
		jump.set_jump_offset(7);
		assert_eq!(jump.jump_offset(), Some(7));
		assert_eq!(Instruction::new(InstructionType::Jump).jump_offset(), None);
	}
}
