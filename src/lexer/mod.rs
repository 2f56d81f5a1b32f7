//! Turns source text into a flat list of classified tokens.
//!
//! The lexer is a single pass over the characters with a pending buffer.
//! Separator and operator characters are boundaries: hitting one flushes the
//! pending buffer into a token. Inside a string or char literal, or inside a
//! `#` comment, classification is bypassed until the literal closes or the
//! line ends.
//!
//! Operators look one character ahead so that `==`, `!=`, `+=`, `-=`, `*=`,
//! `/=`, `<=`, `>=`, `++` and `--` become a single token. A pair that is not in
//! that table is two tokens, so `x=-5` lexes as `x`, `=`, `-`, `5`.
//!
//! Lexing never fails. Malformed input ends up as `Identifier` or `Invalid`
//! tokens and the parser reports it.
mod token;

use std::{iter::Peekable, str::Chars};

pub use token::*;
use tracing::trace;

const OPERATORS: &[char] = &['-', '+', '/', '*', '=', '%', '!', '&', '[', ']', '<', '>'];
const SEPARATORS: &[char] = &[' ', ';', '.', ',', '\n', '{', '}', '(', ')', '\t', '\r'];
const TWO_CHAR_OPERATORS: &[&str] = &["==", "!=", "+=", "-=", "*=", "/=", "<=", ">=", "++", "--"];

/// Literal the lexer is currently inside of.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Quote {
	String,
	Char,
}

impl Quote {
	fn delimiter(self) -> char {
		match self {
			Quote::String => '"',
			Quote::Char => '\'',
		}
	}
}

pub struct Lexer<'a> {
	source_iter: Peekable<Chars<'a>>,
	/// Characters of the token being built
	pending:     String,
	/// Line the pending token started on
	start_line:  usize,
	line:        usize,
	quote:       Option<Quote>,
	escaped:     bool,
	in_comment:  bool,
	tokens:      Vec<Token>,
}

impl<'a> Lexer<'a> {
	pub fn new(source: &'a str) -> Self {
		Self {
			source_iter: source.chars().peekable(),
			pending:     String::new(),
			start_line:  1,
			line:        1,
			quote:       None,
			escaped:     false,
			in_comment:  false,
			tokens:      Vec::new(),
		}
	}

	/// Lex the whole source.
	pub fn lex(mut self) -> Vec<Token> {
		while let Some(c) = self.source_iter.next() {
			self.lex_char(c);
		}
		self.flush();
		trace!(count = self.tokens.len(), "lexed tokens");
		self.tokens
	}

	fn lex_char(&mut self, c: char) {
		if self.in_comment {
			if c == '\n' {
				self.in_comment = false;
				self.line += 1;
			}
			return;
		}

		if let Some(quote) = self.quote {
			self.pending.push(c);
			if self.escaped {
				self.escaped = false;
			} else if c == '\\' {
				self.escaped = true;
			} else if c == quote.delimiter() {
				self.quote = None;
			}
			if c == '\n' {
				self.line += 1;
			}
			return;
		}

		match c {
			'#' => {
				self.flush();
				self.in_comment = true;
			}
			'"' | '\'' => {
				self.flush();
				self.quote = Some(if c == '"' { Quote::String } else { Quote::Char });
				self.push_pending(c);
			}
			'.' if is_number(&self.pending) && !self.pending.contains('.') => self.pending.push(c),
			c if OPERATORS.contains(&c) => {
				self.flush();
				self.operator(c);
			}
			c if SEPARATORS.contains(&c) => {
				self.flush();
				if c == '\n' {
					self.line += 1;
				} else if !c.is_whitespace() {
					self.emit(&c.to_string(), self.line);
				}
			}
			c => self.push_pending(c),
		}
	}

	/// Emit an operator, combining it with the next character when the pair is
	/// a known two character operator.
	fn operator(&mut self, c: char) {
		if let Some(&next) = self.source_iter.peek() {
			let pair: String = [c, next].iter().collect();
			if TWO_CHAR_OPERATORS.contains(&pair.as_str()) {
				self.source_iter.next();
				self.emit(&pair, self.line);
				return;
			}
		}
		self.emit(&c.to_string(), self.line);
	}

	fn push_pending(&mut self, c: char) {
		if self.pending.is_empty() {
			self.start_line = self.line;
		}
		self.pending.push(c);
	}

	fn flush(&mut self) {
		if self.pending.is_empty() {
			return;
		}
		let content = std::mem::take(&mut self.pending);
		self.escaped = false;
		if self.quote.take().is_some() {
			// Literal still open when the input ended.
			self.tokens.push(Token::new(content, LexicalClass::Invalid, Lexeme::Invalid, self.start_line));
			return;
		}
		self.emit(&content, self.start_line);
	}

	fn emit(&mut self, content: &str, line: usize) { self.tokens.push(create_token(content, line)) }
}

/// Classify a finished piece of text.
fn create_token(content: &str, line: usize) -> Token {
	if is_number(content) {
		let lexeme = if content.contains('.') { Lexeme::LiteralFloat } else { Lexeme::LiteralInt };
		return Token::new(content, LexicalClass::Literal, lexeme, line);
	}
	for (quote, lexeme) in [('"', Lexeme::LiteralString), ('\'', Lexeme::LiteralChar)] {
		if !content.starts_with(quote) {
			continue;
		}
		if content.len() >= 2 && content.ends_with(quote) {
			let inner = &content[1..content.len() - 1];
			return Token::new(unescape(inner), LexicalClass::Literal, lexeme, line);
		}
		return Token::new(content, LexicalClass::Invalid, Lexeme::Invalid, line);
	}
	match token::classify(content) {
		Some((class, lexeme)) => Token::new(content, class, lexeme, line),
		None => Token::new(content, LexicalClass::Identifier, Lexeme::Identifier, line),
	}
}

/// A digit run with at most one `.` and an optional leading `-`.
fn is_number(content: &str) -> bool {
	let digits = content.strip_prefix('-').unwrap_or(content);
	digits.chars().any(|c| c.is_ascii_digit())
		&& digits.chars().all(|c| c.is_ascii_digit() || c == '.')
		&& digits.matches('.').count() <= 1
}

fn unescape(inner: &str) -> String {
	let mut result = String::with_capacity(inner.len());
	let mut chars = inner.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			result.push(c);
			continue;
		}
		match chars.next() {
			Some('n') => result.push('\n'),
			Some('t') => result.push('\t'),
			Some('r') => result.push('\r'),
			Some('0') => result.push('\0'),
			Some(other) => result.push(other),
			None => result.push('\\'),
		}
	}
	result
}

#[cfg(test)]
mod tests {
	use super::*;

	fn lex(input: &str) -> Vec<Token> { Lexer::new(input).lex() }

	fn contents(input: &str) -> Vec<String> { lex(input).into_iter().map(|token| token.content).collect() }

	#[test]
	fn two_char_operators_are_single_tokens() {
		for operator in TWO_CHAR_OPERATORS {
			let tokens = lex(&format!("a {operator} b"));
			assert_eq!(tokens.len(), 3, "{operator}");
			assert_eq!(tokens[1].content, *operator);
			assert_eq!(tokens[1].class, LexicalClass::Operator);
		}
		assert_eq!(contents("x+=1;"), ["x", "+=", "1", ";"]);
		assert_eq!(contents("i++"), ["i", "++"]);
	}

	#[test]
	fn unknown_operator_pairs_split() {
		assert_eq!(contents("x=-5;"), ["x", "=", "-", "5", ";"]);
		assert_eq!(contents("&x"), ["&", "x"]);
	}

	#[test]
	fn string_literal_quotes_are_stripped() {
		let tokens = lex("\"abc\"");
		assert_eq!(tokens.len(), 1);
		assert_eq!(tokens[0].content, "abc");
		assert_eq!(tokens[0].class, LexicalClass::Literal);
		assert_eq!(tokens[0].lexeme, Lexeme::LiteralString);
	}

	#[test]
	fn string_literals_keep_separators_and_escapes() {
		let tokens = lex("s = \"a b; (c)\\n\\\"q\\\"\";");
		assert_eq!(tokens.len(), 4);
		assert_eq!(tokens[2].content, "a b; (c)\n\"q\"");
		assert_eq!(tokens[3].lexeme, Lexeme::EndLine);
	}

	#[test]
	fn char_literals() {
		let tokens = lex("char c = ' ';");
		assert_eq!(tokens[3].lexeme, Lexeme::LiteralChar);
		assert_eq!(tokens[3].content, " ");
	}

	#[test]
	fn numbers_and_dots() {
		let tokens = lex("3.14 42 a.b");
		assert_eq!(tokens[0].lexeme, Lexeme::LiteralFloat);
		assert_eq!(tokens[0].content, "3.14");
		assert_eq!(tokens[1].lexeme, Lexeme::LiteralInt);
		assert_eq!(contents("a.b"), ["a", ".", "b"]);
	}

	#[test]
	fn keywords_and_datatypes() {
		let tokens = lex("extern int while uint64 struct foo");
		assert_eq!(tokens[0].class, LexicalClass::Keyword);
		assert_eq!(tokens[1].lexeme, Lexeme::DatatypeInt);
		assert_eq!(tokens[2].lexeme, Lexeme::While);
		assert_eq!(tokens[3].lexeme, Lexeme::DatatypeUInt64);
		assert_eq!(tokens[4].class, LexicalClass::DataType);
		assert_eq!(tokens[5].class, LexicalClass::Identifier);
	}

	#[test]
	fn comments_are_skipped_and_lines_counted() {
		let tokens = lex("int a; # a comment \"with quotes\"\nint b;\n\nb = \"x#y\";");
		assert_eq!(tokens.iter().filter(|token| token.class == LexicalClass::DataType).count(), 2);
		assert_eq!(tokens[3].line, 2);
		let last = tokens.last().unwrap();
		assert_eq!(last.line, 4);
		assert_eq!(tokens[tokens.len() - 2].content, "x#y");
	}

	#[test]
	fn whitespace_never_becomes_a_token() {
		assert_eq!(contents(" \t\r\n f ( a , b ) { } "), ["f", "(", "a", ",", "b", ")", "{", "}"]);
	}

	#[test]
	fn unterminated_literal_is_invalid() {
		let tokens = lex("\"abc");
		assert_eq!(tokens.len(), 1);
		assert_eq!(tokens[0].class, LexicalClass::Invalid);
	}
}
