//! Text renderings of tokens, instructions and frames for the dump flags.
use std::fmt::Write;

use crate::{
	environment::Frame,
	function::Function,
	instruction::{Instruction, VariableInfo},
	interpreter::value::Variable,
	lexer::Token,
};

const TYPE_WIDTH: usize = 18;
const OPERAND_WIDTH: usize = 26;

fn operand(operand: &VariableInfo) -> String {
	if operand.is_empty() {
		return String::new();
	}
	if operand.is_literal() {
		return format!("{operand} ({})", operand.data_type);
	}
	format!("{}: {}", operand.name, operand.data_type)
}

/// One instruction in fixed columns: type, operand1, operand2.
pub fn dump_instruction(instruction: &Instruction) -> String {
	let line = format!(
		"{:<TYPE_WIDTH$}{:<OPERAND_WIDTH$}{}",
		instruction.r#type.to_string(),
		operand(&instruction.operand1),
		operand(&instruction.operand2)
	);
	line.trim_end().to_string()
}

pub fn dump_instructions(instructions: &[Instruction]) -> String {
	instructions.iter().enumerate().fold(String::new(), |mut dump, (index, instruction)| {
		let _ = writeln!(dump, "{index:0>4}: {}", dump_instruction(instruction));
		dump
	})
}

pub fn dump_function(function: &Function) -> String {
	let kind = if function.is_native() { "native" } else { "script" };
	format!("{} [{kind}]\n{}", function.signature(), dump_instructions(function.instructions()))
}

/// Every scope of a frame, outermost first, with its live variables.
pub fn dump_frame(name: &str, frame: &Frame<Variable>) -> String {
	let mut dump = format!("frame {name}\n");
	for (index, scope) in frame.scopes().iter().enumerate() {
		let _ = writeln!(dump, "  scope {index}");
		for (name, variable) in scope.iter() {
			let _ = writeln!(dump, "    {name:<16}{:<10}{}", variable.data_type.to_string(), variable.value);
		}
	}
	dump
}

pub fn dump_tokens(tokens: &[Token]) -> String {
	tokens.iter().fold(String::new(), |mut dump, token| {
		let _ = writeln!(dump, "{token}");
		dump
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		instruction::{DataType, InstructionType},
		lexer::Lexer,
	};

	#[test]
	fn instructions_render_in_columns() {
		let instruction = Instruction::with_operands(
			InstructionType::Assign,
			VariableInfo::new("x", DataType::Int),
			VariableInfo::literal("5", DataType::IntConst),
		);
		let rendered = dump_instruction(&instruction);
		assert!(rendered.starts_with("ASSIGN"));
		assert_eq!(rendered.find("x: int"), Some(TYPE_WIDTH));
		assert_eq!(rendered.find("5 (const int)"), Some(TYPE_WIDTH + OPERAND_WIDTH));
		assert_eq!(dump_instruction(&Instruction::new(InstructionType::Return)), "RETURN");
		assert!(dump_instructions(&[Instruction::jump(3)]).starts_with("0000: JUMP"));
	}

	#[test]
	fn frames_render_every_scope() {
		let mut frame = Frame::new();
		frame.declare("total", Variable::new("total", DataType::Int));
		frame.push_scope();
		frame.declare("name", Variable::new("name", DataType::String));
		let dump = dump_frame("main", &frame);
		assert!(dump.starts_with("frame main\n  scope 0\n    total"));
		assert!(dump.contains("  scope 1\n    name"));
	}

	#[test]
	fn tokens_render_one_per_line() {
		let dump = dump_tokens(&Lexer::new("int x = 1;").lex());
		assert_eq!(dump.lines().count(), 5);
		assert!(dump.lines().next().is_some_and(|line| line.contains("int")));
	}
}
