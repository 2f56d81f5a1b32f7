use std::fmt::Debug;

use crate::{
	error::InterpreterError,
	instruction::{DataType, Instruction, InstructionType, VariableInfo, parameter_buffer},
	interpreter::Interpreter,
};

/// Host implementation of an extern function. Parameters are already bound in
/// the active frame when it runs.
pub type NativeFunction = fn(&mut Interpreter) -> Result<(), InterpreterError>;

/// Name, parameters and return type of a function as written in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
	pub name:        String,
	pub parameters:  Vec<VariableInfo>,
	pub return_type: DataType,
	pub is_extern:   bool,
}

#[derive(Clone)]
pub enum FunctionBody {
	Native(NativeFunction),
	Script,
}

impl Debug for FunctionBody {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Native(_) => f.debug_tuple("Native").field(&"Function Pointer").finish(),
			Self::Script => f.debug_tuple("Script").finish(),
		}
	}
}

/// A callable unit. Script and native functions share the parameter binding
/// prologue and both end by executing `Return`.
#[derive(Debug, Clone)]
pub struct Function {
	pub name:         String,
	pub parameters:   Vec<VariableInfo>,
	pub return_type:  DataType,
	pub body:         FunctionBody,
	/// Prologue followed, for script functions, by the lowered body.
	instructions: Vec<Instruction>,
}

impl Function {
	pub fn script(signature: FunctionSignature, body: Vec<Instruction>) -> Self {
		let mut instructions = prologue(&signature.parameters);
		instructions.extend(body);
		Self {
			name: signature.name,
			parameters: signature.parameters,
			return_type: signature.return_type,
			body: FunctionBody::Script,
			instructions,
		}
	}

	pub fn native(name: &str, parameters: Vec<VariableInfo>, return_type: DataType, native: NativeFunction) -> Self {
		let instructions = prologue(&parameters);
		Self { name: name.to_string(), parameters, return_type, body: FunctionBody::Native(native), instructions }
	}

	pub fn instructions(&self) -> &[Instruction] { &self.instructions }

	/// Instructions after the parameter binding prologue.
	pub fn body_instructions(&self) -> &[Instruction] { &self.instructions[self.parameters.len() * 2..] }

	pub fn is_native(&self) -> bool { matches!(self.body, FunctionBody::Native(_)) }

	pub fn signature(&self) -> String {
		let parameters: Vec<String> =
			self.parameters.iter().map(|parameter| format!("{} {}", parameter.data_type, parameter.name)).collect();
		format!("{} {}({})", self.return_type, self.name, parameters.join(", "))
	}

	/// Bind the parameters and run the body in the frame the caller pushed.
	pub fn execute(&self, interpreter: &mut Interpreter) -> Result<(), InterpreterError> {
		interpreter.execute_instructions(&self.instructions)?;
		if let FunctionBody::Native(native) = self.body {
			native(interpreter)?;
			interpreter.execute_instruction(&Instruction::new(InstructionType::Return))?;
		}
		Ok(())
	}
}

/// `Declare p; Pull %bpv -> p` for every parameter, in declaration order.
fn prologue(parameters: &[VariableInfo]) -> Vec<Instruction> {
	parameters
		.iter()
		.flat_map(|parameter| {
			[
				Instruction::with_operands(InstructionType::Declare, parameter.clone(), VariableInfo::default()),
				Instruction::with_operands(InstructionType::Pull, parameter_buffer(DataType::Void), parameter.clone()),
			]
		})
		.collect()
}
