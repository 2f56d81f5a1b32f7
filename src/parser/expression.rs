//! Expression lowering.
//!
//! An rvalue is evaluated into an accumulator with one instruction per
//! operator, the accumulator being the first operand of every arithmetic
//! instruction. Operands that are themselves expressions go into a nested
//! calculation slot one level deeper (`%fcv1`, `%fcv2`, ...). Once an
//! expression contains a call, every intermediate result goes into a frame
//! local temporary instead, because the callee uses the same cache slots.
use super::{Parser, closing, split, top_level};
use crate::{
	error::{ParseError, ParseErrorType},
	instruction::{
		DataType, Instruction, InstructionType, LEFT_COMPARISON_SLOT, RETURN_SLOT, RIGHT_COMPARISON_SLOT, VariableInfo,
		calculation_slot, parameter_buffer, return_slot,
	},
	lexer::{Lexeme, Token},
};

impl Parser {
	/// Declared type of a variable visible in the current function.
	pub(super) fn declared(&self, name: &str) -> Result<DataType, ParseError> {
		if let Some(data_type) = self.frame.get(name) {
			return Ok(*data_type);
		}
		if self.signatures.contains_key(name) {
			return Err(self.error(ParseErrorType::FunctionNotCalled(name.to_string())));
		}
		Err(self.error(ParseErrorType::UndeclaredIdentifier(name.to_string())))
	}

	/// A literal, a negative number or a variable, usable as an operand as is.
	fn simple_operand(&self, tokens: &[Token]) -> Result<Option<VariableInfo>, ParseError> {
		match tokens {
			[literal] if literal.lexeme.literal_type().is_some() => {
				Ok(literal.lexeme.literal_type().map(|data_type| VariableInfo::literal(&literal.content, data_type)))
			}
			[minus, number] if minus.is(Lexeme::Minus) && matches!(number.lexeme, Lexeme::LiteralInt | Lexeme::LiteralFloat) => {
				Ok(number.lexeme.literal_type().map(|data_type| VariableInfo::literal(format!("-{}", number.content), data_type)))
			}
			[name] if name.is(Lexeme::Identifier) => Ok(Some(VariableInfo::new(&name.content, self.declared(&name.content)?))),
			_ => Ok(None),
		}
	}

	/// `name ( ... )` spanning all of `tokens`.
	pub(super) fn is_call(&self, tokens: &[Token]) -> bool {
		tokens.len() >= 3
			&& tokens[0].is(Lexeme::Identifier)
			&& tokens[1].is(Lexeme::OpenParenthesis)
			&& closing(tokens, 1).is_ok_and(|close| close == tokens.len() - 1)
	}

	/// Evaluate `tokens` into `destination`. Returns the type of the value.
	pub(super) fn lower_rvalue(&mut self, tokens: &[Token], destination: &VariableInfo) -> Result<DataType, ParseError> {
		if tokens.is_empty() {
			return Err(self.error(ParseErrorType::ExpectedExpression));
		}
		if tokens[0].is(Lexeme::Ampersand) {
			return Err(self.error(ParseErrorType::AddressOfInExpression));
		}
		if let Some(operand) = self.simple_operand(tokens)? {
			let data_type = operand.data_type.base();
			self.emit(Instruction::with_operands(InstructionType::Assign, destination.clone(), operand));
			return Ok(data_type);
		}
		if self.is_call(tokens) {
			let data_type = self.lower_call(tokens)?;
			if data_type == DataType::Void {
				return Err(self.error(ParseErrorType::VoidValue(tokens[0].content.clone())));
			}
			if destination.name != RETURN_SLOT || destination.data_type != data_type {
				self.emit(Instruction::with_operands(InstructionType::Assign, destination.clone(), return_slot(data_type)));
			}
			return Ok(data_type);
		}

		let has_call = contains_call(tokens);
		let accumulator = if has_call && !destination.is_temporary() { self.temporary() } else { destination.clone() };
		let data_type = self.lower_sum(tokens, &accumulator, 0, has_call)?;
		let converts = destination.data_type.is_resolved() && destination.data_type.base() != data_type;
		if accumulator.name != destination.name || converts {
			self.emit(Instruction::with_operands(
				InstructionType::Assign,
				destination.clone(),
				accumulator.with_type(data_type),
			));
		}
		Ok(data_type)
	}

	/// `product ( ( "+" | "-" ) product )*` into `accumulator`.
	fn lower_sum(
		&mut self,
		tokens: &[Token],
		accumulator: &VariableInfo,
		depth: usize,
		has_call: bool,
	) -> Result<DataType, ParseError> {
		let segments = self.split_operators(tokens, &[Lexeme::Plus, Lexeme::Minus])?;
		let mut data_type = self.lower_product(segments[0].1, accumulator, depth, has_call)?;
		for &(r#type, segment) in &segments[1..] {
			data_type = self.apply(r#type, segment, accumulator, data_type, depth, has_call)?;
		}
		Ok(data_type)
	}

	/// `unary ( ( "*" | "/" ) unary )*` into `accumulator`.
	fn lower_product(
		&mut self,
		tokens: &[Token],
		accumulator: &VariableInfo,
		depth: usize,
		has_call: bool,
	) -> Result<DataType, ParseError> {
		let segments = self.split_operators(tokens, &[Lexeme::Multiply, Lexeme::Divide])?;
		let mut data_type = self.lower_unary(segments[0].1, accumulator, depth, has_call)?;
		for &(r#type, segment) in &segments[1..] {
			data_type = self.apply(r#type, segment, accumulator, data_type, depth, has_call)?;
		}
		Ok(data_type)
	}

	/// Emit `accumulator <op>= segment`, returning the promoted type.
	fn apply(
		&mut self,
		r#type: InstructionType,
		segment: &[Token],
		accumulator: &VariableInfo,
		data_type: DataType,
		depth: usize,
		has_call: bool,
	) -> Result<DataType, ParseError> {
		let operand = self.operand_value(segment, depth, has_call)?;
		let promoted = promote(data_type, operand.data_type.base());
		self.emit(Instruction::with_operands(r#type, accumulator.with_type(data_type), operand));
		Ok(promoted)
	}

	fn lower_unary(
		&mut self,
		tokens: &[Token],
		accumulator: &VariableInfo,
		depth: usize,
		has_call: bool,
	) -> Result<DataType, ParseError> {
		if tokens.len() > 1 && tokens[0].is(Lexeme::Minus) && self.simple_operand(tokens)?.is_none() {
			let data_type = self.lower_unary(&tokens[1..], accumulator, depth, has_call)?;
			self.emit(Instruction::with_operands(
				InstructionType::Multiply,
				accumulator.with_type(data_type),
				VariableInfo::literal("-1", DataType::IntConst),
			));
			return Ok(data_type);
		}
		self.lower_primary(tokens, accumulator, depth, has_call)
	}

	fn lower_primary(
		&mut self,
		tokens: &[Token],
		accumulator: &VariableInfo,
		depth: usize,
		has_call: bool,
	) -> Result<DataType, ParseError> {
		if let Some(operand) = self.simple_operand(tokens)? {
			let data_type = operand.data_type.base();
			self.emit(Instruction::with_operands(InstructionType::Assign, accumulator.with_type(data_type), operand));
			return Ok(data_type);
		}
		let first = &tokens[0];
		match first.lexeme {
			Lexeme::OpenParenthesis if closing(tokens, 0).is_ok_and(|close| close == tokens.len() - 1) => {
				return self.lower_sum(&tokens[1..tokens.len() - 1], accumulator, depth, has_call);
			}
			Lexeme::Identifier if self.is_call(tokens) => {
				let data_type = self.lower_call(tokens)?;
				if data_type == DataType::Void {
					return Err(self.error(ParseErrorType::VoidValue(first.content.clone())));
				}
				self.emit(Instruction::with_operands(
					InstructionType::Assign,
					accumulator.with_type(data_type),
					return_slot(data_type),
				));
				return Ok(data_type);
			}
			Lexeme::Multiply if tokens.len() == 2 && tokens[1].is(Lexeme::Identifier) => {
				let name = &tokens[1].content;
				let pointer = self.declared(name)?;
				if !matches!(pointer, DataType::Pointer | DataType::Void) {
					return Err(self.error(ParseErrorType::NotAPointer(name.clone())));
				}
				self.emit(Instruction::with_operands(
					InstructionType::Dereference,
					VariableInfo::new(name, pointer),
					accumulator.with_type(DataType::Void),
				));
				return Ok(DataType::Void);
			}
			Lexeme::Ampersand => return Err(self.error(ParseErrorType::AddressOfInExpression)),
			_ => {}
		}

		if tokens.iter().any(|token| token.lexeme.is_comparison()) {
			return Err(self.error(ParseErrorType::ComparisonOutsideCondition));
		}
		if let Some(operator) = tokens.iter().find(|token| token.is_operator()) {
			return Err(self.error(ParseErrorType::UnsupportedOperator(operator.content.clone())));
		}
		let unexpected = tokens.get(1).unwrap_or(first);
		Err(self.error(ParseErrorType::UnexpectedToken(unexpected.content.clone())))
	}

	/// An operand for an arithmetic instruction, evaluating `tokens` into a
	/// nested slot when they are not a plain operand.
	fn operand_value(&mut self, tokens: &[Token], depth: usize, has_call: bool) -> Result<VariableInfo, ParseError> {
		if let Some(operand) = self.simple_operand(tokens)? {
			return Ok(operand);
		}
		let slot = if has_call { self.temporary() } else { calculation_slot(depth + 1) };
		let data_type = self.lower_sum(tokens, &slot, depth + 1, has_call)?;
		Ok(slot.with_type(data_type))
	}

	/// Split at top level binary operators of one precedence level. An
	/// operator right after another operator is a unary sign, not a split.
	fn split_operators<'t>(
		&self,
		tokens: &'t [Token],
		operators: &[Lexeme],
	) -> Result<Vec<(InstructionType, &'t [Token])>, ParseError> {
		let mut segments = Vec::new();
		let mut start = 0;
		let mut r#type = InstructionType::Assign;
		for index in top_level(tokens) {
			let token = &tokens[index];
			if !operators.contains(&token.lexeme) || index == start || tokens[index - 1].is_operator() {
				continue;
			}
			segments.push((r#type, &tokens[start..index]));
			r#type = arithmetic(token.lexeme);
			start = index + 1;
		}
		segments.push((r#type, &tokens[start..]));
		if segments.iter().any(|(_, segment)| segment.is_empty()) {
			return Err(self.error(ParseErrorType::ExpectedExpression));
		}
		Ok(segments)
	}

	/// Push the arguments and emit the call. Returns the callee's return type.
	pub(super) fn lower_call(&mut self, tokens: &[Token]) -> Result<DataType, ParseError> {
		let name = &tokens[0].content;
		let Some(signature) = self.signatures.get(name).cloned() else {
			return Err(self.error(ParseErrorType::UndeclaredIdentifier(name.clone())));
		};
		let arguments = split(&tokens[2..tokens.len() - 1], Lexeme::Comma);
		if arguments.len() != signature.parameters.len() {
			return Err(self.error(ParseErrorType::WrongArgumentCount {
				function: name.clone(),
				expected: signature.parameters.len(),
				found:    arguments.len(),
			}));
		}
		if arguments.iter().any(|argument| argument.is_empty()) {
			return Err(self.error(ParseErrorType::ExpectedExpression));
		}
		self.calls.entry(self.current.name.clone()).or_default().insert(name.clone());

		// Nested calls run before the first push so they cannot consume this
		// call's arguments from the buffer.
		let mut evaluated = Vec::with_capacity(arguments.len());
		for argument in &arguments {
			evaluated.push(if contains_call(argument) {
				let temporary = self.temporary();
				let data_type = self.lower_rvalue(argument, &temporary)?;
				Some(temporary.with_type(data_type))
			} else {
				None
			});
		}

		for ((argument, evaluated), parameter) in arguments.iter().zip(evaluated).zip(&signature.parameters) {
			let operand = match evaluated {
				Some(operand) => operand,
				None => match self.simple_operand(argument)? {
					Some(operand) => operand,
					None => {
						let data_type = self.lower_rvalue(argument, &calculation_slot(0))?;
						calculation_slot(0).with_type(data_type)
					}
				},
			};
			self.emit(Instruction::with_operands(InstructionType::Push, parameter_buffer(parameter.data_type), operand));
		}
		self.emit(Instruction::with_operands(
			InstructionType::Call,
			VariableInfo::new(name, signature.return_type),
			VariableInfo::default(),
		));
		Ok(signature.return_type)
	}

	/// Emit the comparison of a condition followed by a jump with no offset
	/// yet. Returns the index of that jump, to be patched past the guarded
	/// code.
	pub(super) fn lower_condition(&mut self, tokens: &[Token]) -> Result<usize, ParseError> {
		if tokens.is_empty() {
			return Err(self.error(ParseErrorType::ExpectedExpression));
		}
		let has_call = contains_call(tokens);
		let comparison = top_level(tokens).find(|&index| tokens[index].lexeme.is_comparison());
		let (left, right) = match comparison {
			Some(index) => (&tokens[..index], Some(&tokens[index + 1..])),
			None => (tokens, None),
		};
		let r#type = comparison.map_or(InstructionType::NotEqual, |index| comparison_type(tokens[index].lexeme));

		let left = self.condition_operand(left, LEFT_COMPARISON_SLOT, has_call)?;
		let right = match right {
			Some(right) => self.condition_operand(right, RIGHT_COMPARISON_SLOT, has_call)?,
			None => VariableInfo::literal("0", DataType::IntConst),
		};
		self.emit(Instruction::with_operands(r#type, left, right));
		Ok(self.emit(Instruction::new(InstructionType::Jump)))
	}

	fn condition_operand(&mut self, tokens: &[Token], slot: &str, has_call: bool) -> Result<VariableInfo, ParseError> {
		if tokens.is_empty() {
			return Err(self.error(ParseErrorType::ExpectedExpression));
		}
		if let Some(operand) = self.simple_operand(tokens)? {
			return Ok(operand);
		}
		let destination = if has_call { self.temporary() } else { VariableInfo::new(slot, DataType::Void) };
		let data_type = self.lower_rvalue(tokens, &destination)?;
		Ok(destination.with_type(data_type))
	}

	/// Declare a fresh frame local temporary.
	fn temporary(&mut self) -> VariableInfo {
		let temporary = VariableInfo::new(format!("$t{}", self.temporaries), DataType::Void);
		self.temporaries += 1;
		self.emit(Instruction::with_operands(InstructionType::Declare, temporary.clone(), VariableInfo::default()));
		temporary
	}
}

fn contains_call(tokens: &[Token]) -> bool {
	tokens.windows(2).any(|pair| pair[0].is(Lexeme::Identifier) && pair[1].is(Lexeme::OpenParenthesis))
}

fn arithmetic(lexeme: Lexeme) -> InstructionType {
	match lexeme {
		Lexeme::Plus => InstructionType::Add,
		Lexeme::Minus => InstructionType::Subtract,
		Lexeme::Multiply => InstructionType::Multiply,
		Lexeme::Divide => InstructionType::Divide,
		_ => InstructionType::Invalid,
	}
}

fn comparison_type(lexeme: Lexeme) -> InstructionType {
	match lexeme {
		Lexeme::Is => InstructionType::Equal,
		Lexeme::IsNot => InstructionType::NotEqual,
		Lexeme::Greater => InstructionType::Greater,
		Lexeme::Less => InstructionType::Less,
		Lexeme::IsOrGreater => InstructionType::EqualOrGreater,
		Lexeme::IsOrLess => InstructionType::EqualOrLess,
		_ => InstructionType::Invalid,
	}
}

/// Static type of an arithmetic result.
fn promote(left: DataType, right: DataType) -> DataType {
	use DataType::*;
	match (left.base(), right.base()) {
		(left, right) if left == right => left,
		(String, _) | (_, String) => String,
		(Void, _) | (_, Void) | (Invalid, _) | (_, Invalid) => Void,
		(Float, _) | (_, Float) => Float,
		(left, _) if left == Pointer || left == UserType => left,
		_ => Int,
	}
}
