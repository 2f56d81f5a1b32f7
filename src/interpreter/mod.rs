//! Bytecode interpreter.
//!
//! Executes the flat instruction lists produced by the parser with an
//! instruction pointer. There is no conditional jump: a comparison that holds
//! skips the instruction right after it, which the lowering always makes an
//! unconditional `Jump` around the guarded body.
//!
//! State lives in one [`Interpreter`]: the function table, the process-wide
//! cache slots (`%fcv`, `%frv`, `%lbv`, `%rbv`, ...), the named FIFO buffers
//! used to relay call arguments and the call stack of frames. Only the top
//! frame is visible to name resolution; cache slots are visible everywhere.
//!
//! Script calls do not recurse on the host stack. Each active script function
//! is an [`Activation`] holding its own instruction pointer, and a `Call`
//! pushes a new one that the same loop keeps running.
pub mod native;
pub mod value;

use std::{
	collections::{HashMap, VecDeque},
	io::{BufRead, Write},
	rc::Rc,
};

use tracing::trace;
use value::{Location, Value, Variable};

use crate::{
	ast::AbstractSyntaxTree,
	debug,
	environment::{CallStack, Scope},
	error::InterpreterError,
	function::Function,
	instruction::{
		CALCULATION_SLOT, DataType, Instruction, InstructionType, LEFT_COMPARISON_SLOT, PARAMETER_BUFFER,
		RETURN_SLOT, RIGHT_COMPARISON_SLOT, VariableInfo, is_cache_name,
	},
};

pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// Runtime switches taken from the configuration.
#[derive(Debug, Clone)]
pub struct RuntimeOptions {
	/// Reading a void value from a variable is an error
	pub treat_void_as_error: bool,
	/// Render every frame as it is destroyed
	pub dump_stack_frames:   bool,
	pub max_call_depth:      usize,
}

impl Default for RuntimeOptions {
	fn default() -> Self {
		Self { treat_void_as_error: false, dump_stack_frames: false, max_call_depth: DEFAULT_MAX_CALL_DEPTH }
	}
}

/// What the instruction pointer does after an instruction.
#[derive(Debug, PartialEq)]
enum Flow {
	Next,
	SkipNext,
	Jump(i64),
	Call(String),
	Return,
}

/// A script function in progress and where it will continue.
struct Activation {
	function: Rc<Function>,
	pointer:  usize,
}

pub struct Interpreter {
	options:     RuntimeOptions,
	functions:   HashMap<String, Rc<Function>>,
	cache:       Scope<Variable>,
	buffers:     HashMap<String, VecDeque<Variable>>,
	stack:       CallStack<Variable>,
	activations: Vec<Activation>,
	/// Names of the active calls, parallel to the frames above the base frame
	call_trace:  Vec<String>,
	frame_dumps: Vec<String>,
	input:       Box<dyn BufRead>,
	output:      Box<dyn Write>,
}

impl Interpreter {
	pub fn new(options: RuntimeOptions) -> Self {
		Self::with_io(options, Box::new(std::io::BufReader::new(std::io::stdin())), Box::new(std::io::stdout()))
	}

	pub fn with_io(options: RuntimeOptions, input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
		let mut cache = Scope::new();
		for name in [CALCULATION_SLOT, RETURN_SLOT, LEFT_COMPARISON_SLOT, RIGHT_COMPARISON_SLOT] {
			cache.insert(name, Variable::new(name, DataType::Void));
		}
		let buffers = HashMap::from([(PARAMETER_BUFFER.to_string(), VecDeque::new())]);
		Self {
			options,
			functions: HashMap::new(),
			cache,
			buffers,
			stack: CallStack::new(),
			activations: Vec::new(),
			call_trace: Vec::new(),
			frame_dumps: Vec::new(),
			input,
			output,
		}
	}

	/// Install every function of a lowered program.
	pub fn install(&mut self, ast: AbstractSyntaxTree) {
		for function in ast.functions {
			self.install_function(function);
		}
	}

	pub fn install_function(&mut self, function: Function) {
		self.functions.insert(function.name.clone(), Rc::new(function));
	}

	pub fn function(&self, name: &str) -> Option<&Function> { self.functions.get(name).map(Rc::as_ref) }

	/// Call the entry point and return what it left in the return slot.
	pub fn run(&mut self, entry_point: &str) -> Result<Option<Value>, InterpreterError> {
		if !self.functions.contains_key(entry_point) {
			return Err(InterpreterError::EntryPointNotFound(entry_point.to_string()));
		}
		self.call(entry_point)?;
		Ok(self.return_slot().filter(|value| *value != Value::Void))
	}

	/// Current content of the return slot.
	pub fn return_slot(&self) -> Option<Value> { self.cache.get(RETURN_SLOT).map(|slot| slot.value.clone()) }

	/// Hand a native function's result back through the return slot.
	pub fn return_value(&mut self, value: Value) {
		self.cache.insert(RETURN_SLOT, Variable { value, ..Variable::new(RETURN_SLOT, DataType::Void) });
	}

	/// Frames rendered on destruction while `dump_stack_frames` is set.
	pub fn frame_dumps(&self) -> &[String] { &self.frame_dumps }

	pub fn output(&mut self) -> &mut dyn Write { self.output.as_mut() }

	/// Read one line from the input without its line ending.
	pub fn read_line(&mut self) -> Result<String, InterpreterError> {
		let mut line = String::new();
		self.input.read_line(&mut line)?;
		let trimmed = line.trim_end_matches(['\n', '\r']).len();
		line.truncate(trimmed);
		Ok(line)
	}

	/// Resolve a variable: cache slots first, then the top frame.
	pub fn variable(&self, name: &str) -> Result<&Variable, InterpreterError> {
		self
			.cache
			.get(name)
			.or_else(|| self.stack.top().get(name))
			.ok_or_else(|| InterpreterError::VariableNotFound(name.to_string()))
	}

	fn variable_mut(&mut self, name: &str) -> Result<&mut Variable, InterpreterError> {
		if is_cache_name(name) {
			if !self.cache.contains(name) {
				self.cache.insert(name, Variable::new(name, DataType::Void));
			}
			return self.cache.get_mut(name).ok_or_else(|| InterpreterError::VariableNotFound(name.to_string()));
		}
		self.stack.top_mut().get_mut(name).ok_or_else(|| InterpreterError::VariableNotFound(name.to_string()))
	}

	/// Value of an operand: a parsed literal or a variable's content.
	fn value_of(&self, operand: &VariableInfo) -> Result<Value, InterpreterError> {
		if let Some(literal) = &operand.literal_value {
			return Value::parse_literal(literal, operand.data_type).ok_or_else(|| InterpreterError::InvalidLiteral {
				literal:   literal.clone(),
				data_type: operand.data_type,
			});
		}
		let value = self.variable(&operand.name)?.value.clone();
		if self.options.treat_void_as_error && value == Value::Void {
			return Err(InterpreterError::VoidAccess(operand.name.clone()));
		}
		Ok(value)
	}

	fn store(&mut self, target: &VariableInfo, value: Value) -> Result<(), InterpreterError> {
		let variable = self.variable_mut(&target.name)?;
		let shown = value.to_string();
		variable.store(value).ok_or(InterpreterError::InvalidConversion { value: shown, to: variable.data_type })
	}

	/// Run an instruction list until it returns or falls off the end.
	pub fn execute_instructions(&mut self, instructions: &[Instruction]) -> Result<(), InterpreterError> {
		let mut pointer = 0usize;
		while let Some(instruction) = instructions.get(pointer) {
			pointer = match self.execute(instruction)? {
				Flow::Next => pointer + 1,
				Flow::SkipNext => pointer + 2,
				Flow::Jump(offset) => jump_target(pointer, offset, instructions.len())?,
				Flow::Call(name) => {
					self.call(&name)?;
					pointer + 1
				}
				Flow::Return => return Ok(()),
			};
		}
		Ok(())
	}

	/// Execute a single instruction outside of any instruction list.
	pub fn execute_instruction(&mut self, instruction: &Instruction) -> Result<(), InterpreterError> {
		match self.execute(instruction)? {
			Flow::Call(name) => self.call(&name),
			_ => Ok(()),
		}
	}

	fn execute(&mut self, instruction: &Instruction) -> Result<Flow, InterpreterError> {
		use InstructionType::*;

		let Instruction { r#type, operand1, operand2, line } = instruction;
		match r#type {
			Add | Subtract | Multiply | Divide => {
				let right = self.value_of(operand2)?;
				let left = self.variable(&operand1.name)?.value.clone();
				let result = left.binary_op(*r#type, &right).ok_or_else(|| {
					InterpreterError::BinaryOperationError(format!("line {line}: {left} {} {right}", r#type))
				})?;
				self.store(operand1, result)?;
			}
			Equal | NotEqual | Greater | Less | EqualOrGreater | EqualOrLess => {
				let left = self.value_of(operand1)?;
				let right = self.value_of(operand2)?;
				let holds = left.compare(*r#type, &right).ok_or_else(|| {
					InterpreterError::ComparisonError(format!("line {line}: {left} {} {right}", r#type))
				})?;
				if holds {
					return Ok(Flow::SkipNext);
				}
			}
			Assign => {
				let mut value = self.value_of(operand2)?;
				if operand1.is_cache_slot() && operand1.data_type.base().is_resolved() {
					let shown = value.to_string();
					value = value
						.convert(operand1.data_type)
						.ok_or(InterpreterError::InvalidConversion { value: shown, to: operand1.data_type.base() })?;
				}
				self.store(operand1, value)?;
				if operand2.is_cache_slot() && operand2.name != operand1.name {
					self.cache.insert(&operand2.name, Variable::new(&operand2.name, DataType::Void));
				}
			}
			Declare => {
				self.stack.top_mut().declare(&operand1.name, Variable::new(&operand1.name, operand1.data_type));
			}
			Push => {
				let value = self.value_of(operand2)?;
				let entry = Variable { value, origin: Some(operand2.name.clone()), ..Variable::new(&operand2.name, DataType::Void) };
				self.buffers.entry(operand1.name.clone()).or_default().push_back(entry);
			}
			Pull => {
				let entry = self
					.buffers
					.get_mut(&operand1.name)
					.and_then(VecDeque::pop_front)
					.ok_or_else(|| InterpreterError::EmptyBuffer(operand1.name.clone()))?;
				self.store(operand2, entry.value)?;
				let target = self.variable_mut(&operand2.name)?;
				target.origin = entry.origin.filter(|origin| !origin.is_empty());
			}
			Call => return Ok(Flow::Call(operand1.name.clone())),
			Return => {
				self.pop_frame(true)?;
				return Ok(Flow::Return);
			}
			Jump => {
				let offset = instruction.jump_offset().ok_or(InterpreterError::MissingJumpOffset)?;
				return Ok(Flow::Jump(offset));
			}
			PushScope => self.stack.push_scope(),
			PopScope => {
				self.stack.top_mut().pop_scope().ok_or(InterpreterError::ScopeUnderflow)?;
			}
			AssignLocation => {
				let frame = self.stack.top();
				let (scope, slot) =
					frame.locate(&operand2.name).ok_or_else(|| InterpreterError::VariableNotFound(operand2.name.clone()))?;
				let scope_id = frame.scope_id(scope).ok_or(InterpreterError::ScopeUnderflow)?;
				let location = Location { frame: self.stack.top_index(), scope, scope_id, slot };
				self.store(operand1, Value::Pointer(location))?;
			}
			Dereference => {
				let Value::Pointer(location) = self.value_of(operand1)? else {
					return Err(InterpreterError::NotAPointer(operand1.name.clone()));
				};
				// A scope that was popped and replaced keeps its index but not its id.
				let value = self
					.stack
					.frame(location.frame)
					.filter(|frame| frame.scope_id(location.scope) == Some(location.scope_id))
					.and_then(|frame| frame.at(location.scope, location.slot))
					.map(|variable| variable.value.clone())
					.ok_or_else(|| InterpreterError::DanglingPointer(operand1.name.clone()))?;
				self.store(operand2, value)?;
			}
			Invalid => return Err(InterpreterError::InvalidInstruction(*line)),
		}
		Ok(Flow::Next)
	}

	/// Run `name` to completion along with every script call it makes.
	fn call(&mut self, name: &str) -> Result<(), InterpreterError> {
		let depth = self.stack.len();
		let base = self.activations.len();
		let result = self.enter(name).and_then(|()| self.resume(base));
		self.activations.truncate(base);
		// Unwind frames a failed or fall-through body left behind.
		while self.stack.len() > depth {
			self.pop_frame(false)?;
		}
		result
	}

	/// Push a frame for `name`. A native runs to completion at once, a script
	/// function becomes the new top activation.
	fn enter(&mut self, name: &str) -> Result<(), InterpreterError> {
		let function = self.functions.get(name).cloned().ok_or_else(|| InterpreterError::UnknownFunction(name.to_string()))?;
		if self.call_trace.len() >= self.options.max_call_depth {
			return Err(InterpreterError::CallDepthExceeded(self.options.max_call_depth));
		}
		trace!(function = name, depth = self.call_trace.len(), "call");
		self.stack.push_frame();
		self.call_trace.push(name.to_string());
		if function.is_native() {
			return function.execute(self);
		}
		self.activations.push(Activation { function, pointer: 0 });
		Ok(())
	}

	/// Step the top activation until every activation above `base` is done.
	fn resume(&mut self, base: usize) -> Result<(), InterpreterError> {
		while self.activations.len() > base {
			let top = self.activations.len() - 1;
			let function = Rc::clone(&self.activations[top].function);
			let pointer = self.activations[top].pointer;
			let instructions = function.instructions();
			let Some(instruction) = instructions.get(pointer) else {
				self.activations.pop();
				self.pop_frame(false)?;
				continue;
			};
			let next = match self.execute(instruction)? {
				Flow::Next => pointer + 1,
				Flow::SkipNext => pointer + 2,
				Flow::Jump(offset) => jump_target(pointer, offset, instructions.len())?,
				Flow::Call(name) => {
					self.activations[top].pointer = pointer + 1;
					self.enter(&name)?;
					continue;
				}
				Flow::Return => {
					self.activations.pop();
					continue;
				}
			};
			self.activations[top].pointer = next;
		}
		Ok(())
	}

	fn pop_frame(&mut self, returning: bool) -> Result<(), InterpreterError> {
		let frame = self.stack.pop_frame().ok_or(InterpreterError::StackUnderflow)?;
		let name = self.call_trace.pop().unwrap_or_default();
		if returning && self.options.dump_stack_frames {
			self.frame_dumps.push(debug::dump_frame(&name, &frame));
		}
		trace!(function = name, "return");
		Ok(())
	}
}

fn jump_target(pointer: usize, offset: i64, length: usize) -> Result<usize, InterpreterError> {
	isize::try_from(offset)
		.ok()
		.and_then(|offset| pointer.checked_add_signed(offset))
		.filter(|&target| target <= length)
		.ok_or(InterpreterError::InvalidJumpTarget(offset))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		function::FunctionSignature,
		instruction::{parameter_buffer, return_slot},
		utils::SharedBuffer,
	};

	fn int(name: &str) -> VariableInfo { VariableInfo::new(name, DataType::Int) }

	fn literal(value: &str) -> VariableInfo { VariableInfo::literal(value, DataType::IntConst) }

	fn op(r#type: InstructionType, operand1: VariableInfo, operand2: VariableInfo) -> Instruction {
		Instruction::with_operands(r#type, operand1, operand2)
	}

	fn declare(name: &str) -> Instruction { op(InstructionType::Declare, int(name), VariableInfo::default()) }

	fn script(name: &str, parameters: Vec<VariableInfo>, body: Vec<Instruction>) -> Function {
		let signature = FunctionSignature { name: name.into(), parameters, return_type: DataType::Int, is_extern: false };
		Function::script(signature, body)
	}

	fn interpreter() -> Interpreter { Interpreter::with_io(RuntimeOptions::default(), Box::new(&b""[..]), Box::new(std::io::sink())) }

	fn run(body: Vec<Instruction>) -> Result<Option<Value>, InterpreterError> {
		let mut interpreter = interpreter();
		interpreter.install_function(script("main", vec![], body));
		interpreter.run("main")
	}

	#[test]
	fn arithmetic_writes_back_into_the_first_operand() {
		use InstructionType::*;
		let result = run(vec![
			declare("x"),
			op(Assign, int("x"), literal("2")),
			op(Add, int("x"), literal("3")),
			op(Multiply, int("x"), literal("4")),
			op(Assign, return_slot(DataType::Int), int("x")),
			Instruction::new(Return),
		]);
		assert_eq!(result.unwrap(), Some(Value::Int(20)));
	}

	#[test]
	fn true_comparison_skips_the_jump() {
		use InstructionType::*;
		// if (1 < 2) { x = 7; }
		let body = |left: &str| {
			vec![
				declare("x"),
				op(Less, literal(left), literal("2")),
				Instruction::jump(4),
				Instruction::new(PushScope),
				op(Assign, int("x"), literal("7")),
				Instruction::new(PopScope),
				op(Assign, return_slot(DataType::Int), int("x")),
				Instruction::new(Return),
			]
		};
		assert_eq!(run(body("1")).unwrap(), Some(Value::Int(7)));
		assert_eq!(run(body("5")).unwrap(), Some(Value::Int(0)));
	}

	#[test]
	fn backward_jumps_loop() {
		use InstructionType::*;
		// while (i < 5) { i += 1; }
		let result = run(vec![
			declare("i"),
			op(Less, int("i"), literal("5")),
			Instruction::jump(5),
			Instruction::new(PushScope),
			op(Add, int("i"), literal("1")),
			Instruction::new(PopScope),
			Instruction::jump(-5),
			op(Assign, return_slot(DataType::Int), int("i")),
			Instruction::new(Return),
		]);
		assert_eq!(result.unwrap(), Some(Value::Int(5)));
	}

	#[test]
	fn calls_relay_arguments_and_return_values() {
		use InstructionType::*;
		let mut interpreter = interpreter();
		interpreter.install_function(script("add", vec![int("a"), int("b")], vec![
			op(Assign, return_slot(DataType::Int), int("a")),
			op(Add, return_slot(DataType::Int), int("b")),
			Instruction::new(Return),
		]));
		interpreter.install_function(script("main", vec![], vec![
			declare("r"),
			op(Push, parameter_buffer(DataType::Int), literal("2")),
			op(Push, parameter_buffer(DataType::Int), literal("3")),
			op(Call, int("add"), VariableInfo::default()),
			op(Assign, int("r"), return_slot(DataType::Int)),
			op(Assign, return_slot(DataType::Int), int("r")),
			Instruction::new(Return),
		]));
		assert_eq!(interpreter.run("main").unwrap(), Some(Value::Int(5)));
		assert_eq!(interpreter.stack.len(), 1);
	}

	#[test]
	fn assigning_from_a_cache_slot_consumes_it() {
		use InstructionType::*;
		let mut interpreter = interpreter();
		interpreter.stack.push_frame();
		interpreter.execute_instructions(&[
			declare("x"),
			op(Assign, VariableInfo::new(CALCULATION_SLOT, DataType::Void), literal("9")),
			op(Assign, int("x"), VariableInfo::new(CALCULATION_SLOT, DataType::Void)),
		])
		.unwrap();
		assert_eq!(interpreter.variable("x").unwrap().value, Value::Int(9));
		assert_eq!(interpreter.variable(CALCULATION_SLOT).unwrap().value, Value::Void);
	}

	#[test]
	fn pull_from_empty_buffer_is_fatal() {
		let result = run(vec![declare("a"), op(InstructionType::Pull, parameter_buffer(DataType::Void), int("a"))]);
		assert!(matches!(result, Err(InterpreterError::EmptyBuffer(name)) if name == PARAMETER_BUFFER));
	}

	#[test]
	fn invalid_instruction_and_unknown_names_are_fatal() {
		assert!(matches!(run(vec![Instruction::new(InstructionType::Invalid)]), Err(InterpreterError::InvalidInstruction(_))));
		assert!(matches!(
			run(vec![op(InstructionType::Call, int("missing"), VariableInfo::default())]),
			Err(InterpreterError::UnknownFunction(_))
		));
		assert!(matches!(
			run(vec![op(InstructionType::Add, int("nope"), literal("1"))]),
			Err(InterpreterError::VariableNotFound(_))
		));
		assert!(matches!(interpreter().run("main"), Err(InterpreterError::EntryPointNotFound(_))));
	}

	#[test]
	fn scopes_hide_inner_declarations() {
		use InstructionType::*;
		let result = run(vec![
			Instruction::new(PushScope),
			declare("inner"),
			Instruction::new(PopScope),
			op(Assign, int("inner"), literal("1")),
		]);
		assert!(matches!(result, Err(InterpreterError::VariableNotFound(_))));
		assert!(matches!(run(vec![Instruction::new(PopScope)]), Err(InterpreterError::ScopeUnderflow)));
	}

	#[test]
	fn pointers_read_through_locations() {
		use InstructionType::*;
		let pointer = VariableInfo::new("p", DataType::Pointer);
		let result = run(vec![
			declare("x"),
			op(Assign, int("x"), literal("41")),
			op(Declare, pointer.clone(), VariableInfo::default()),
			op(AssignLocation, pointer.clone(), int("x")),
			op(Add, int("x"), literal("1")),
			declare("y"),
			op(Dereference, pointer, int("y")),
			op(Assign, return_slot(DataType::Int), int("y")),
			Instruction::new(Return),
		]);
		assert_eq!(result.unwrap(), Some(Value::Int(42)));
	}

	#[test]
	fn void_access_can_be_an_error() {
		use InstructionType::*;
		let body = vec![
			op(Declare, VariableInfo::new("v", DataType::Void), VariableInfo::default()),
			declare("x"),
			op(Assign, int("x"), VariableInfo::new("v", DataType::Void)),
		];
		assert!(run(body.clone()).is_ok());

		let options = RuntimeOptions { treat_void_as_error: true, ..Default::default() };
		let mut interpreter = Interpreter::with_io(options, Box::new(&b""[..]), Box::new(std::io::sink()));
		interpreter.install_function(script("main", vec![], body));
		assert!(matches!(interpreter.run("main"), Err(InterpreterError::VoidAccess(name)) if name == "v"));
	}

	#[test]
	fn runaway_recursion_is_caught() {
		let options = RuntimeOptions { max_call_depth: 16, ..Default::default() };
		let mut interpreter = Interpreter::with_io(options, Box::new(&b""[..]), Box::new(std::io::sink()));
		interpreter.install_function(script("main", vec![], vec![op(InstructionType::Call, int("main"), VariableInfo::default())]));
		assert!(matches!(interpreter.run("main"), Err(InterpreterError::CallDepthExceeded(16))));
		assert_eq!(interpreter.stack.len(), 1);
	}

	#[test]
	fn recursion_at_the_default_limit_does_not_grow_the_host_stack() {
		let mut interpreter = interpreter();
		interpreter.install_function(script("main", vec![], vec![op(InstructionType::Call, int("main"), VariableInfo::default())]));
		let result = interpreter.run("main");
		assert!(matches!(result, Err(InterpreterError::CallDepthExceeded(DEFAULT_MAX_CALL_DEPTH))));
		assert_eq!(interpreter.stack.len(), 1);
		assert!(interpreter.activations.is_empty());

		let options = RuntimeOptions { max_call_depth: 100_000, ..Default::default() };
		let mut deep = Interpreter::with_io(options, Box::new(&b""[..]), Box::new(std::io::sink()));
		deep.install_function(script("main", vec![], vec![op(InstructionType::Call, int("main"), VariableInfo::default())]));
		assert!(matches!(deep.run("main"), Err(InterpreterError::CallDepthExceeded(100_000))));
	}

	#[test]
	fn pointers_into_popped_scopes_dangle() {
		use InstructionType::*;
		let pointer = VariableInfo::new("p", DataType::Pointer);
		// int& p; { int a = 1; p = &a; } { int c = 42; y = *p; }
		let result = run(vec![
			op(Declare, pointer.clone(), VariableInfo::default()),
			declare("y"),
			Instruction::new(PushScope),
			declare("a"),
			op(Assign, int("a"), literal("1")),
			op(AssignLocation, pointer.clone(), int("a")),
			Instruction::new(PopScope),
			Instruction::new(PushScope),
			declare("c"),
			op(Assign, int("c"), literal("42")),
			op(Dereference, pointer, int("y")),
			Instruction::new(PopScope),
		]);
		assert!(matches!(result, Err(InterpreterError::DanglingPointer(name)) if name == "p"));
	}

	#[test]
	fn frames_are_dumped_on_return() {
		use InstructionType::*;
		let output = SharedBuffer::default();
		let options = RuntimeOptions { dump_stack_frames: true, ..Default::default() };
		let mut interpreter = Interpreter::with_io(options, Box::new(&b""[..]), Box::new(output));
		interpreter.install_function(script("main", vec![], vec![declare("answer"), Instruction::new(Return)]));
		interpreter.run("main").unwrap();
		assert_eq!(interpreter.frame_dumps().len(), 1);
		assert!(interpreter.frame_dumps()[0].contains("main"));
		assert!(interpreter.frame_dumps()[0].contains("answer"));
	}
}
