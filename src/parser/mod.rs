//! The `Parser` lowers tokens straight into flat bytecode. No tree is kept:
//! every statement is turned into instructions as soon as it is recognised,
//! and a simulated frame of declared types stands in for the symbol table.
//!
//! Grammar, one function body at a time:
//!
//! ``` BNF
//! program     → ( "extern"? signature ( ";" | block ) )* ;
//! signature   → type "&"? IDENTIFIER "(" ( param ( "," param )* )? ")" ;
//! param       → type "&"? IDENTIFIER ;
//! block       → "{" statement* "}" ;
//! statement   → declaration | assignment | call ";" | if | while | for | return | block | ";" ;
//! declaration → type "&"? IDENTIFIER ( "=" rvalue )? ";" ;
//! assignment  → IDENTIFIER ( "=" | "+=" | "-=" | "*=" | "/=" ) rvalue ";"
//!             | IDENTIFIER ( "++" | "--" ) ";" | ( "++" | "--" ) IDENTIFIER ";" ;
//! if          → "if" "(" condition ")" block ( "else" ( block | if ) )? ;
//! while       → "while" "(" condition ")" block ;
//! for         → "for" "(" ( declaration | assignment )? ";" condition? ";" assignment? ")" block ;
//! return      → "return" rvalue? ";" ;
//! condition   → sum ( ( "==" | "!=" | ">" | "<" | ">=" | "<=" ) sum )? ;
//! rvalue      → "&" IDENTIFIER | sum ;
//! sum         → product ( ( "+" | "-" ) product )* ;
//! product     → unary ( ( "*" | "/" ) unary )* ;
//! unary       → "-" unary | primary ;
//! primary     → LITERAL | IDENTIFIER | call | "*" IDENTIFIER | "(" sum ")" ;
//! call        → IDENTIFIER "(" ( rvalue ( "," rvalue )* )? ")" ;
//! ```
//!
//! Signatures are collected in a first pass so calls may refer to functions
//! defined further down; bodies are lowered in a second pass.
mod check;
mod expression;
mod statement;

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::{
	ast::AbstractSyntaxTree,
	environment::Frame,
	error::{ParseError, ParseErrorType},
	function::{Function, FunctionSignature},
	instruction::{DataType, Instruction, InstructionType, VariableInfo},
	lexer::{Lexeme, LexicalClass, Token},
	optimizer,
};

/// Lowering switches taken from the configuration.
#[derive(Debug, Clone)]
pub struct ParserOptions {
	pub entry_point:                 String,
	/// Reject every operator whose operand types differ
	pub disable_implicit_conversion: bool,
	/// Drop functions the entry point can never reach
	pub remove_unused_symbols:       bool,
	pub optimize_instructions:       bool,
}

impl Default for ParserOptions {
	fn default() -> Self {
		Self {
			entry_point:                 "main".to_string(),
			disable_implicit_conversion: false,
			remove_unused_symbols:       false,
			optimize_instructions:       false,
		}
	}
}

pub struct Parser {
	tokens:       Vec<Token>,
	options:      ParserOptions,
	signatures:   HashMap<String, FunctionSignature>,
	/// Declared types visible in the function being lowered
	frame:        Frame<DataType>,
	instructions: Vec<Instruction>,
	/// Signature of the function being lowered
	current:      FunctionSignature,
	/// Callees of every lowered function
	calls:        HashMap<String, HashSet<String>>,
	temporaries:  usize,
	/// Line of the statement being lowered
	line:         usize,
}

impl Parser {
	pub fn new(tokens: Vec<Token>, options: ParserOptions) -> Self {
		Self {
			tokens,
			options,
			signatures: HashMap::new(),
			frame: Frame::new(),
			instructions: Vec::new(),
			current: FunctionSignature {
				name:        String::new(),
				parameters:  Vec::new(),
				return_type: DataType::Void,
				is_extern:   false,
			},
			calls: HashMap::new(),
			temporaries: 0,
			line: 0,
		}
	}

	pub fn parse(mut self) -> Result<AbstractSyntaxTree, ParseError> {
		let tokens = std::mem::take(&mut self.tokens);
		check_tokens(&tokens)?;

		let definitions = self.discover(&tokens)?;
		let mut functions = Vec::with_capacity(definitions.len());
		for (signature, body) in definitions {
			functions.push(self.lower_function(signature, &body)?);
		}

		let entry_point = Some(self.options.entry_point.clone()).filter(|name| functions.iter().any(|f| &f.name == name));
		if self.options.remove_unused_symbols {
			let referenced = self.referenced(entry_point.as_deref());
			functions.retain(|function| {
				let keep = referenced.contains(&function.name);
				if !keep {
					debug!(function = %function.name, "removing unused function");
				}
				keep
			});
		}
		Ok(AbstractSyntaxTree { functions, entry_point })
	}

	/// Collect every signature. Returns the script functions with their bodies.
	fn discover(&mut self, tokens: &[Token]) -> Result<Vec<(FunctionSignature, Vec<Token>)>, ParseError> {
		let mut definitions = Vec::new();
		let mut index = 0;
		while let Some(token) = tokens.get(index) {
			match token.lexeme {
				Lexeme::EndLine => {
					index += 1;
					continue;
				}
				// An import the loader left behind: `import "path";`
				Lexeme::Import => {
					index = statement_end(tokens, index)? + 1;
					continue;
				}
				_ => {}
			}

			let is_extern = token.is(Lexeme::Extern);
			let (signature, close) = self.signature(tokens, index + usize::from(is_extern), is_extern)?;
			if self.signatures.contains_key(&signature.name) {
				return Err(ParseError::new(token.line, ParseErrorType::DuplicateFunction(signature.name)));
			}
			self.signatures.insert(signature.name.clone(), signature.clone());

			let next = tokens.get(close + 1);
			if is_extern {
				if !next.is_some_and(|next| next.is(Lexeme::EndLine)) {
					return Err(error_at(tokens, close + 1, ParseErrorType::ExpectedToken(";")));
				}
				index = close + 2;
				continue;
			}
			if !next.is_some_and(|next| next.is(Lexeme::OpenCBracket)) {
				return Err(error_at(tokens, close + 1, ParseErrorType::ExpectedToken("{")));
			}
			let body_close = closing(tokens, close + 1)?;
			definitions.push((signature, tokens[close + 2..body_close].to_vec()));
			index = body_close + 1;
		}
		Ok(definitions)
	}

	/// Parse `type [&] name ( params )` starting at `start`. Returns the
	/// signature and the index of the closing parenthesis.
	fn signature(
		&self,
		tokens: &[Token],
		start: usize,
		is_extern: bool,
	) -> Result<(FunctionSignature, usize), ParseError> {
		let (return_type, name_index) = declared_type(tokens, start)?;
		let name = identifier(tokens, name_index)?;
		match tokens.get(name_index + 1) {
			Some(token) if token.is(Lexeme::OpenParenthesis) => {}
			Some(token) if token.is(Lexeme::Equals) || token.is(Lexeme::EndLine) => {
				return Err(ParseError::new(token.line, ParseErrorType::GlobalVariable(name)));
			}
			_ => return Err(error_at(tokens, name_index + 1, ParseErrorType::ExpectedToken("("))),
		}

		let open = name_index + 1;
		let close = closing(tokens, open)?;
		let mut parameters: Vec<VariableInfo> = Vec::new();
		for parameter in split(&tokens[open + 1..close], Lexeme::Comma) {
			if parameter.is_empty() {
				return Err(error_at(tokens, close, ParseErrorType::ExpectedIdentifier(",".to_string())));
			}
			let (data_type, name_index) = declared_type(parameter, 0)?;
			if data_type == DataType::UserType {
				return Err(ParseError::new(parameter[0].line, ParseErrorType::UserTypeDeclaration));
			}
			let name = identifier(parameter, name_index)?;
			if let Some(extra) = parameter.get(name_index + 1) {
				return Err(ParseError::new(extra.line, ParseErrorType::UnexpectedToken(extra.content.clone())));
			}
			if parameters.iter().any(|existing| existing.name == name) {
				return Err(ParseError::new(parameter[0].line, ParseErrorType::DuplicateParameter(name)));
			}
			parameters.push(VariableInfo::new(name, data_type));
		}
		Ok((FunctionSignature { name, parameters, return_type, is_extern }, close))
	}

	fn lower_function(&mut self, signature: FunctionSignature, body: &[Token]) -> Result<Function, ParseError> {
		self.frame.clear();
		self.instructions.clear();
		self.temporaries = 0;
		for parameter in &signature.parameters {
			self.frame.declare(&parameter.name, parameter.data_type);
		}
		self.calls.entry(signature.name.clone()).or_default();
		self.current = signature.clone();

		self.lower_scope(body)?;
		if self.instructions.last().map(|last| last.r#type) != Some(InstructionType::Return) {
			self.emit(Instruction::new(InstructionType::Return));
		}

		let mut instructions = std::mem::take(&mut self.instructions);
		for instruction in &instructions {
			check::check_instruction(instruction, self.options.disable_implicit_conversion)?;
		}
		if self.options.optimize_instructions {
			instructions = optimizer::optimize(instructions);
		}
		debug!(function = %signature.name, instructions = instructions.len(), "lowered function");
		Ok(Function::script(signature, instructions))
	}

	/// Names that survive dead-function removal: the entry point and every
	/// function named by some call, whether or not its caller survives.
	fn referenced(&self, entry_point: Option<&str>) -> HashSet<String> {
		self.calls.values().flatten().cloned().chain(entry_point.map(str::to_string)).collect()
	}

	/// Append an instruction stamped with the current line. Returns its index.
	fn emit(&mut self, instruction: Instruction) -> usize {
		self.instructions.push(instruction.at_line(self.line));
		self.instructions.len() - 1
	}

	/// Point the jump at `index` to the next instruction to be emitted.
	fn patch_jump(&mut self, index: usize) {
		let offset = (self.instructions.len() - index) as i64;
		self.instructions[index].set_jump_offset(offset);
	}

	fn error(&self, r#type: ParseErrorType) -> ParseError { ParseError::new(self.line, r#type) }
}

/// Reject invalid tokens and unbalanced brackets before any lowering.
fn check_tokens(tokens: &[Token]) -> Result<(), ParseError> {
	let mut open: Vec<&Token> = Vec::new();
	for token in tokens {
		if token.class == LexicalClass::Invalid {
			return Err(ParseError::new(token.line, ParseErrorType::InvalidToken(token.content.clone())));
		}
		if closer(token.lexeme).is_some() {
			open.push(token);
		} else if let Some(expected) = opener(token.lexeme) {
			let found = bracket(token.lexeme);
			match open.pop() {
				Some(last) if last.lexeme == expected => {}
				Some(last) => {
					return Err(ParseError::new(token.line, ParseErrorType::UnbalancedBrackets {
						open:  bracket(last.lexeme),
						close: found,
					}));
				}
				None => {
					return Err(ParseError::new(token.line, ParseErrorType::UnbalancedBrackets {
						open:  bracket(expected),
						close: found,
					}));
				}
			}
		}
	}
	match open.pop() {
		Some(last) => Err(ParseError::new(last.line, ParseErrorType::UnbalancedBrackets {
			open:  bracket(last.lexeme),
			close: closer(last.lexeme).unwrap_or_default(),
		})),
		None => Ok(()),
	}
}

fn bracket(lexeme: Lexeme) -> char {
	match lexeme {
		Lexeme::OpenParenthesis => '(',
		Lexeme::CloseParenthesis => ')',
		Lexeme::OpenCBracket => '{',
		Lexeme::CloseCBracket => '}',
		Lexeme::OpenSBracket => '[',
		Lexeme::CloseSBracket => ']',
		_ => ' ',
	}
}

/// Closing character of an opening bracket.
fn closer(lexeme: Lexeme) -> Option<char> {
	match lexeme {
		Lexeme::OpenParenthesis => Some(')'),
		Lexeme::OpenCBracket => Some('}'),
		Lexeme::OpenSBracket => Some(']'),
		_ => None,
	}
}

/// Opening lexeme of a closing bracket.
fn opener(lexeme: Lexeme) -> Option<Lexeme> {
	match lexeme {
		Lexeme::CloseParenthesis => Some(Lexeme::OpenParenthesis),
		Lexeme::CloseCBracket => Some(Lexeme::OpenCBracket),
		Lexeme::CloseSBracket => Some(Lexeme::OpenSBracket),
		_ => None,
	}
}

fn nesting(lexeme: Lexeme) -> isize {
	if closer(lexeme).is_some() {
		1
	} else if opener(lexeme).is_some() {
		-1
	} else {
		0
	}
}

/// Indices of the tokens outside of any bracket pair. The outermost brackets
/// themselves are included.
fn top_level(tokens: &[Token]) -> impl Iterator<Item = usize> + '_ {
	let mut depth = 0isize;
	tokens.iter().enumerate().filter_map(move |(index, token)| {
		let change = nesting(token.lexeme);
		let outside = depth == 0 || (depth == 1 && change < 0);
		depth += change;
		outside.then_some(index)
	})
}

/// Split on `separator` outside of brackets. An empty input gives no parts.
fn split(tokens: &[Token], separator: Lexeme) -> Vec<&[Token]> {
	if tokens.is_empty() {
		return Vec::new();
	}
	let mut parts = Vec::new();
	let mut start = 0;
	for index in top_level(tokens).filter(|&index| tokens[index].is(separator)) {
		parts.push(&tokens[start..index]);
		start = index + 1;
	}
	parts.push(&tokens[start..]);
	parts
}

/// Index of the bracket closing the one at `open`.
fn closing(tokens: &[Token], open: usize) -> Result<usize, ParseError> {
	let mut depth = 0isize;
	for (index, token) in tokens.iter().enumerate().skip(open) {
		depth += nesting(token.lexeme);
		if depth == 0 {
			return Ok(index);
		}
	}
	let token = &tokens[open];
	Err(ParseError::new(token.line, ParseErrorType::UnbalancedBrackets {
		open:  bracket(token.lexeme),
		close: closer(token.lexeme).unwrap_or_default(),
	}))
}

/// Index of the `;` ending the statement that starts at `start`.
fn statement_end(tokens: &[Token], start: usize) -> Result<usize, ParseError> {
	top_level(&tokens[start..])
		.map(|index| index + start)
		.find(|&index| tokens[index].is(Lexeme::EndLine))
		.ok_or_else(|| error_at(tokens, tokens.len(), ParseErrorType::ExpectedToken(";")))
}

/// Error at the token at `index`, or at the last token when past the end.
fn error_at(tokens: &[Token], index: usize, r#type: ParseErrorType) -> ParseError {
	let line = tokens.get(index).or(tokens.last()).map_or(0, |token| token.line);
	ParseError::new(line, r#type)
}

/// `type [&]` at `start`. Returns the type and the index after it.
fn declared_type(tokens: &[Token], start: usize) -> Result<(DataType, usize), ParseError> {
	let Some(data_type) = tokens.get(start).and_then(|token| token.lexeme.data_type()) else {
		let found = tokens.get(start).map_or("end of input".to_string(), |token| token.content.clone());
		return Err(error_at(tokens, start, ParseErrorType::UnexpectedToken(found)));
	};
	match tokens.get(start + 1) {
		Some(token) if token.is(Lexeme::Ampersand) => Ok((DataType::Pointer, start + 2)),
		_ => Ok((data_type, start + 1)),
	}
}

fn identifier(tokens: &[Token], index: usize) -> Result<String, ParseError> {
	match tokens.get(index) {
		Some(token) if token.is(Lexeme::Identifier) => Ok(token.content.clone()),
		Some(token) => Err(ParseError::new(token.line, ParseErrorType::ExpectedIdentifier(token.content.clone()))),
		None => Err(error_at(tokens, index, ParseErrorType::ExpectedIdentifier("end of input".to_string()))),
	}
}

#[cfg(test)]
mod tests;
