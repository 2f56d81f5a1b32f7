use std::borrow::Cow;

use super::{Parser, closing, declared_type, identifier, split, statement_end, top_level};
use crate::{
	error::{ParseError, ParseErrorType},
	instruction::{CALCULATION_SLOT, DataType, Instruction, InstructionType, VariableInfo, calculation_slot, return_slot},
	lexer::{Lexeme, LexicalClass, Token},
};

impl Parser {
	/// Lower every statement of one scope's tokens.
	pub(super) fn lower_scope(&mut self, tokens: &[Token]) -> Result<(), ParseError> {
		let mut index = 0;
		while index < tokens.len() {
			index = self.lower_statement(tokens, index)?;
		}
		Ok(())
	}

	/// `PushScope`, the block's statements, `PopScope`.
	fn lower_block(&mut self, tokens: &[Token]) -> Result<(), ParseError> {
		self.emit(Instruction::new(InstructionType::PushScope));
		self.frame.push_scope();
		self.lower_scope(tokens)?;
		self.frame.pop_scope();
		self.emit(Instruction::new(InstructionType::PopScope));
		Ok(())
	}

	/// Lower the statement starting at `start`, returning the index after it.
	fn lower_statement(&mut self, tokens: &[Token], start: usize) -> Result<usize, ParseError> {
		let token = &tokens[start];
		self.line = token.line;
		match token.lexeme {
			Lexeme::EndLine => Ok(start + 1),
			Lexeme::OpenCBracket => {
				let close = closing(tokens, start)?;
				self.lower_block(&tokens[start + 1..close])?;
				Ok(close + 1)
			}
			Lexeme::If => self.lower_if(tokens, start),
			Lexeme::While => self.lower_while(tokens, start),
			Lexeme::For => self.lower_for(tokens, start),
			Lexeme::Else => Err(self.error(ParseErrorType::ElseWithoutIf)),
			Lexeme::Return => {
				let end = statement_end(tokens, start)?;
				self.lower_return(&tokens[start + 1..end])?;
				Ok(end + 1)
			}
			_ if token.class == LexicalClass::DataType => {
				let (_, name_index) = declared_type(tokens, start)?;
				if tokens.get(name_index + 1).is_some_and(|next| next.is(Lexeme::OpenParenthesis)) {
					return Err(self.error(ParseErrorType::NestedFunction(identifier(tokens, name_index)?)));
				}
				let end = statement_end(tokens, start)?;
				self.lower_declaration(&tokens[start..end])?;
				Ok(end + 1)
			}
			Lexeme::Identifier | Lexeme::PlusPlus | Lexeme::MinusMinus => {
				let end = statement_end(tokens, start)?;
				self.lower_expression_statement(&tokens[start..end])?;
				Ok(end + 1)
			}
			_ => Err(self.error(ParseErrorType::UnexpectedToken(token.content.clone()))),
		}
	}

	/// `type [&] name [= rvalue]`
	fn lower_declaration(&mut self, tokens: &[Token]) -> Result<(), ParseError> {
		let (data_type, name_index) = declared_type(tokens, 0)?;
		if data_type == DataType::UserType {
			return Err(self.error(ParseErrorType::UserTypeDeclaration));
		}
		let name = identifier(tokens, name_index)?;
		match tokens.get(name_index + 1) {
			None => {}
			Some(token) if token.is(Lexeme::Equals) => {}
			Some(token) => return Err(self.error(ParseErrorType::UnexpectedToken(token.content.clone()))),
		}
		if self.frame.contains_innermost(&name) {
			return Err(self.error(ParseErrorType::Redeclaration(name)));
		}

		let target = VariableInfo::new(&name, data_type);
		self.emit(Instruction::with_operands(InstructionType::Declare, target.clone(), VariableInfo::default()));
		self.frame.declare(&name, data_type);
		if tokens.len() > name_index + 1 {
			self.lower_assignment(&target, Lexeme::Equals, &tokens[name_index + 2..])?;
		}
		Ok(())
	}

	/// Assignment, compound assignment, increment or a call for its effect.
	fn lower_expression_statement(&mut self, tokens: &[Token]) -> Result<(), ParseError> {
		let tokens = desugar_increment(tokens);
		if self.is_call(&tokens) {
			self.lower_call(&tokens)?;
			return Ok(());
		}
		let Some(position) = top_level(&tokens).find(|&index| tokens[index].lexeme.is_assignment()) else {
			return Err(self.error(ParseErrorType::ExpectedToken("=")));
		};
		let [target] = &tokens[..position] else {
			return Err(self.error(ParseErrorType::InvalidAssignmentTarget));
		};
		let is_function = self.frame.get(&target.content).is_none() && self.signatures.contains_key(&target.content);
		if !target.is(Lexeme::Identifier) || is_function {
			return Err(self.error(ParseErrorType::InvalidAssignmentTarget));
		}
		let data_type = self.declared(&target.content)?;
		let target = VariableInfo::new(&target.content, data_type);
		self.lower_assignment(&target, tokens[position].lexeme, &tokens[position + 1..])
	}

	/// Evaluate `rvalue` and apply it to `target` with the operation `operator`
	/// stands for.
	fn lower_assignment(&mut self, target: &VariableInfo, operator: Lexeme, rvalue: &[Token]) -> Result<(), ParseError> {
		if rvalue.first().is_some_and(|token| token.is(Lexeme::Ampersand)) {
			return self.lower_address_of(target, operator, rvalue);
		}
		let r#type = match operator {
			Lexeme::PlusEquals => InstructionType::Add,
			Lexeme::MinusEquals => InstructionType::Subtract,
			Lexeme::MultiplyEquals => InstructionType::Multiply,
			Lexeme::DivideEquals => InstructionType::Divide,
			_ => InstructionType::Assign,
		};

		let data_type = self.lower_rvalue(rvalue, &calculation_slot(0))?;
		// The value went through the calculation slot in a single hop, so the
		// operation can take its source directly.
		let operand = match self.instructions.last() {
			Some(last)
				if last.r#type == InstructionType::Assign
					&& last.operand1.name == CALCULATION_SLOT
					&& !last.operand2.is_empty() =>
			{
				let operand = last.operand2.clone();
				self.instructions.pop();
				operand
			}
			_ => calculation_slot(0).with_type(data_type),
		};
		self.emit(Instruction::with_operands(r#type, target.clone(), operand));
		Ok(())
	}

	/// `target = &name`
	fn lower_address_of(&mut self, target: &VariableInfo, operator: Lexeme, rvalue: &[Token]) -> Result<(), ParseError> {
		if operator != Lexeme::Equals {
			return Err(self.error(ParseErrorType::UnsupportedOperator("&".to_string())));
		}
		let [_, name] = rvalue else {
			return Err(self.error(ParseErrorType::AddressOfInExpression));
		};
		if !name.is(Lexeme::Identifier) {
			return Err(self.error(ParseErrorType::ExpectedIdentifier(name.content.clone())));
		}
		if !matches!(target.data_type, DataType::Pointer | DataType::Void) {
			return Err(self.error(ParseErrorType::NotAPointer(target.name.clone())));
		}
		let source = VariableInfo::new(&name.content, self.declared(&name.content)?);
		self.emit(Instruction::with_operands(InstructionType::AssignLocation, target.clone(), source));
		Ok(())
	}

	fn lower_return(&mut self, tokens: &[Token]) -> Result<(), ParseError> {
		if !tokens.is_empty() {
			let return_type = self.current.return_type;
			if return_type == DataType::Void {
				return Err(self.error(ParseErrorType::ReturnFromVoid(self.current.name.clone())));
			}
			self.lower_rvalue(tokens, &return_slot(return_type))?;
		}
		self.emit(Instruction::new(InstructionType::Return));
		Ok(())
	}

	/// `if (condition) { ... } [else { ... } | else if ...]`
	fn lower_if(&mut self, tokens: &[Token], start: usize) -> Result<usize, ParseError> {
		let (condition, open) = self.condition_group(tokens, start)?;
		let close = closing(tokens, open)?;
		let skip_body = self.lower_condition(condition)?;
		self.lower_block(&tokens[open + 1..close])?;

		if !tokens.get(close + 1).is_some_and(|token| token.is(Lexeme::Else)) {
			self.patch_jump(skip_body);
			return Ok(close + 1);
		}
		let skip_else = self.emit(Instruction::new(InstructionType::Jump));
		self.patch_jump(skip_body);
		let next = match tokens.get(close + 2) {
			Some(token) if token.is(Lexeme::OpenCBracket) => {
				let else_close = closing(tokens, close + 2)?;
				self.lower_block(&tokens[close + 3..else_close])?;
				else_close + 1
			}
			Some(token) if token.is(Lexeme::If) => {
				self.line = token.line;
				self.lower_if(tokens, close + 2)?
			}
			_ => return Err(self.error(ParseErrorType::ExpectedToken("{"))),
		};
		self.patch_jump(skip_else);
		Ok(next)
	}

	/// `while (condition) { ... }`
	fn lower_while(&mut self, tokens: &[Token], start: usize) -> Result<usize, ParseError> {
		let (condition, open) = self.condition_group(tokens, start)?;
		let close = closing(tokens, open)?;
		let loop_start = self.instructions.len();
		let exit = self.lower_condition(condition)?;
		self.lower_block(&tokens[open + 1..close])?;
		self.jump_back(loop_start);
		self.patch_jump(exit);
		Ok(close + 1)
	}

	/// `for (init; condition; post) { ... }`. The loop variable lives in a
	/// scope around the whole loop, the body gets its own per iteration.
	fn lower_for(&mut self, tokens: &[Token], start: usize) -> Result<usize, ParseError> {
		let (header, open) = self.condition_group(tokens, start)?;
		let close = closing(tokens, open)?;
		let parts = split(header, Lexeme::EndLine);
		let [init, condition, post] = parts[..] else {
			return Err(self.error(ParseErrorType::ExpectedToken(";")));
		};

		self.emit(Instruction::new(InstructionType::PushScope));
		self.frame.push_scope();
		match init.first() {
			None => {}
			Some(token) if token.class == LexicalClass::DataType => self.lower_declaration(init)?,
			Some(_) => self.lower_expression_statement(init)?,
		}
		let loop_start = self.instructions.len();
		let exit = if condition.is_empty() { None } else { Some(self.lower_condition(condition)?) };
		self.lower_block(&tokens[open + 1..close])?;
		if !post.is_empty() {
			self.lower_expression_statement(post)?;
		}
		self.jump_back(loop_start);
		if let Some(exit) = exit {
			self.patch_jump(exit);
		}
		self.frame.pop_scope();
		self.emit(Instruction::new(InstructionType::PopScope));
		Ok(close + 1)
	}

	/// The parenthesised tokens after a keyword at `start` and the index of
	/// the `{` that must follow them.
	fn condition_group<'t>(&self, tokens: &'t [Token], start: usize) -> Result<(&'t [Token], usize), ParseError> {
		if !tokens.get(start + 1).is_some_and(|token| token.is(Lexeme::OpenParenthesis)) {
			return Err(self.error(ParseErrorType::ExpectedToken("(")));
		}
		let close = closing(tokens, start + 1)?;
		if !tokens.get(close + 1).is_some_and(|token| token.is(Lexeme::OpenCBracket)) {
			return Err(self.error(ParseErrorType::ExpectedToken("{")));
		}
		Ok((&tokens[start + 2..close], close + 1))
	}

	fn jump_back(&mut self, target: usize) {
		let offset = target as i64 - self.instructions.len() as i64;
		self.emit(Instruction::jump(offset));
	}
}

/// Rewrite `x++`, `++x`, `x--` and `--x` as `x += 1` or `x -= 1`.
fn desugar_increment(tokens: &[Token]) -> Cow<'_, [Token]> {
	let (name, operator) = match tokens {
		[name, operator] | [operator, name]
			if name.is(Lexeme::Identifier) && (operator.is(Lexeme::PlusPlus) || operator.is(Lexeme::MinusMinus)) =>
		{
			(name, operator)
		}
		_ => return Cow::Borrowed(tokens),
	};
	let compound = if operator.is(Lexeme::PlusPlus) {
		Token::new("+=", LexicalClass::Operator, Lexeme::PlusEquals, operator.line)
	} else {
		Token::new("-=", LexicalClass::Operator, Lexeme::MinusEquals, operator.line)
	};
	let one = Token::new("1", LexicalClass::Literal, Lexeme::LiteralInt, operator.line);
	Cow::Owned(vec![name.clone(), compound, one])
}
