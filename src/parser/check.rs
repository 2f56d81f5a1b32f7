//! Static legality of lowered instructions.
//!
//! Runs over each function's instructions after lowering. Operands whose type
//! is not known statically (`void` slots and parameters) are not checked.
use crate::{
	error::{ParseError, ParseErrorType},
	instruction::{DataType, Instruction, InstructionType},
};

pub(super) fn check_instruction(instruction: &Instruction, strict: bool) -> Result<(), ParseError> {
	use InstructionType::*;

	let operator = match instruction.r#type {
		Add => "+",
		Subtract => "-",
		Multiply => "*",
		Divide => "/",
		Assign | Push => "=",
		Equal => "==",
		NotEqual => "!=",
		Greater => ">",
		Less => "<",
		EqualOrGreater => ">=",
		EqualOrLess => "<=",
		_ => return Ok(()),
	};
	let left = instruction.operand1.data_type.base();
	let right = instruction.operand2.data_type.base();
	if !left.is_resolved() || !right.is_resolved() {
		return Ok(());
	}

	let error = |r#type| Err(ParseError::new(instruction.line, r#type));
	if left == DataType::UserType || right == DataType::UserType {
		return error(ParseErrorType::UserTypeOperator);
	}
	if left.is_string() != right.is_string() {
		return error(ParseErrorType::StringOperand { left, right });
	}
	if left.is_string() && matches!(instruction.r#type, Subtract | Multiply | Divide) {
		return error(ParseErrorType::StringOperator(operator));
	}
	if (left == DataType::Pointer) != (right == DataType::Pointer) {
		return error(ParseErrorType::PointerMismatch { left, right });
	}
	if left == DataType::Pointer && !matches!(instruction.r#type, Assign | Push | Equal | NotEqual) {
		return error(ParseErrorType::PointerOperator(operator));
	}
	if strict && left != right {
		return error(ParseErrorType::ImplicitConversion { from: right, to: left });
	}
	Ok(())
}
