use std::fmt::Display;

use crate::instruction::DataType;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
	/// Source text of the token, quotes stripped for string and char literals.
	pub content: String,
	pub class:   LexicalClass,
	pub lexeme:  Lexeme,
	pub line:    usize,
}

impl Token {
	pub fn new(content: impl Into<String>, class: LexicalClass, lexeme: Lexeme, line: usize) -> Self {
		Self { content: content.into(), class, lexeme, line }
	}

	pub fn is(&self, lexeme: Lexeme) -> bool { self.lexeme == lexeme }

	pub fn is_operator(&self) -> bool { self.class == LexicalClass::Operator }
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?} {:?} '{}' (line {})", self.class, self.lexeme, self.content, self.line)
	}
}

/// Coarse token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalClass {
	Identifier,
	Separator,
	Literal,
	Keyword,
	Operator,
	DataType,
	Whitespace,
	Invalid,
}

/// Fine grained token tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lexeme {
	Invalid,
	Identifier,
	/// `int`
	DatatypeInt,
	/// `float`
	DatatypeFloat,
	/// `char`
	DatatypeChar,
	/// `string`
	DatatypeString,
	/// `void`
	DatatypeVoid,
	/// `uint64` or `memory`
	DatatypeUInt64,
	/// `struct`
	Struct,
	Return,
	Extern,
	Import,
	If,
	Else,
	While,
	For,
	LiteralInt,
	LiteralFloat,
	LiteralChar,
	LiteralString,
	/// `;`
	EndLine,
	/// `.`
	Dot,
	/// `,`
	Comma,
	/// `(`
	OpenParenthesis,
	/// `)`
	CloseParenthesis,
	/// `{`
	OpenCBracket,
	/// `}`
	CloseCBracket,
	/// `[`
	OpenSBracket,
	/// `]`
	CloseSBracket,
	/// `=`
	Equals,
	/// `+=`
	PlusEquals,
	/// `-=`
	MinusEquals,
	/// `*=`
	MultiplyEquals,
	/// `/=`
	DivideEquals,
	/// `==`
	Is,
	/// `!=`
	IsNot,
	/// `!`
	Not,
	/// `>`
	Greater,
	/// `>=`
	IsOrGreater,
	/// `<`
	Less,
	/// `<=`
	IsOrLess,
	Plus,
	Minus,
	Multiply,
	Divide,
	/// `%`
	Modulo,
	/// `++`
	PlusPlus,
	/// `--`
	MinusMinus,
	/// `&`
	Ampersand,
}

impl Lexeme {
	/// Declared type named by a datatype token.
	pub fn data_type(self) -> Option<DataType> {
		Some(match self {
			Lexeme::DatatypeInt => DataType::Int,
			Lexeme::DatatypeFloat => DataType::Float,
			Lexeme::DatatypeChar => DataType::Char,
			Lexeme::DatatypeString => DataType::String,
			Lexeme::DatatypeVoid => DataType::Void,
			Lexeme::DatatypeUInt64 => DataType::UInt64,
			Lexeme::Struct => DataType::UserType,
			_ => return None,
		})
	}

	/// Constant type of a literal token.
	pub fn literal_type(self) -> Option<DataType> {
		Some(match self {
			Lexeme::LiteralInt => DataType::IntConst,
			Lexeme::LiteralFloat => DataType::FloatConst,
			Lexeme::LiteralChar => DataType::CharConst,
			Lexeme::LiteralString => DataType::StringConst,
			_ => return None,
		})
	}

	pub fn is_comparison(self) -> bool {
		use Lexeme::*;
		matches!(self, Is | IsNot | Greater | IsOrGreater | Less | IsOrLess)
	}

	pub fn is_assignment(self) -> bool {
		use Lexeme::*;
		matches!(self, Equals | PlusEquals | MinusEquals | MultiplyEquals | DivideEquals)
	}
}

/// Keyword, datatype, operator and separator table.
pub(super) fn classify(content: &str) -> Option<(LexicalClass, Lexeme)> {
	use LexicalClass::{DataType, Keyword, Operator, Separator};
	use Lexeme::*;

	#[rustfmt::skip]
	let entry = match content {
		"return" => (Keyword, Return),
		"extern" => (Keyword, Extern),
		"import" => (Keyword, Import),
		"if" => (Keyword, If),
		"else" => (Keyword, Else),
		"while" => (Keyword, While),
		"for" => (Keyword, For),
		"int" => (DataType, DatatypeInt),
		"float" => (DataType, DatatypeFloat),
		"char" => (DataType, DatatypeChar),
		"string" => (DataType, DatatypeString),
		"void" => (DataType, DatatypeVoid),
		"uint64" | "memory" => (DataType, DatatypeUInt64),
		"struct" => (DataType, Struct),
		";" => (Separator, EndLine),
		"." => (Separator, Dot),
		"," => (Separator, Comma),
		"(" => (Separator, OpenParenthesis),
		")" => (Separator, CloseParenthesis),
		"{" => (Separator, OpenCBracket),
		"}" => (Separator, CloseCBracket),
		"[" => (Operator, OpenSBracket),
		"]" => (Operator, CloseSBracket),
		"=" => (Operator, Equals),
		"+=" => (Operator, PlusEquals),
		"-=" => (Operator, MinusEquals),
		"*=" => (Operator, MultiplyEquals),
		"/=" => (Operator, DivideEquals),
		"==" => (Operator, Is),
		"!=" => (Operator, IsNot),
		"!" => (Operator, Not),
		">" => (Operator, Greater),
		">=" => (Operator, IsOrGreater),
		"<" => (Operator, Less),
		"<=" => (Operator, IsOrLess),
		"+" => (Operator, Plus),
		"-" => (Operator, Minus),
		"*" => (Operator, Multiply),
		"/" => (Operator, Divide),
		"%" => (Operator, Modulo),
		"++" => (Operator, PlusPlus),
		"--" => (Operator, MinusMinus),
		"&" => (Operator, Ampersand),
		_ => return None,
	};
	Some(entry)
}
