use std::{cmp::Ordering, fmt::Display};

use Value::*;

use crate::instruction::{DataType, InstructionType};

/// Where a variable lives: the frame, the scope in that frame and the slot in
/// that scope. `scope_id` is the id the scope had when the location was
/// taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
	pub frame:    usize,
	pub scope:    usize,
	pub scope_id: u64,
	pub slot:     usize,
}

/// Value represents a runtime value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	#[default]
	Void,
	Float(f64),
	Int(i64),
	UInt64(u64),
	Char(char),
	Str(String),
	Pointer(Location),
}

/// Numeric view used for arithmetic and ordering.
#[derive(Debug, Clone, Copy)]
enum Number {
	Int(i64),
	UInt(u64),
	Float(f64),
}

impl Number {
	fn as_f64(self) -> f64 {
		match self {
			Number::Int(n) => n as f64,
			Number::UInt(n) => n as f64,
			Number::Float(n) => n,
		}
	}

	fn as_i128(self) -> Option<i128> {
		match self {
			Number::Int(n) => Some(n as i128),
			Number::UInt(n) => Some(n as i128),
			Number::Float(_) => None,
		}
	}
}

impl Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Void => write!(f, "void"),
			Float(n) => {
				if n.is_finite() && n.fract() == 0.0 {
					write!(f, "{n:.0}")
				} else {
					write!(f, "{n}")
				}
			}
			Int(n) => write!(f, "{n}"),
			UInt64(n) => write!(f, "{n}"),
			Char(c) => write!(f, "{c}"),
			Str(s) => write!(f, "{s}"),
			Pointer(location) => write!(f, "&({}, {}, {})", location.frame, location.scope, location.slot),
		}
	}
}

impl Value {
	/// Zero value a fresh declaration of `data_type` holds.
	pub fn default_for(data_type: DataType) -> Self {
		match data_type.base() {
			DataType::Float => Float(0.0),
			DataType::Int => Int(0),
			DataType::UInt64 => UInt64(0),
			DataType::Char => Char('\0'),
			DataType::String => Str(String::new()),
			_ => Void,
		}
	}

	/// Parse a literal operand according to its declared type.
	pub fn parse_literal(literal: &str, data_type: DataType) -> Option<Self> {
		Some(match data_type.base() {
			DataType::Float => Float(literal.parse().ok()?),
			DataType::Int => Int(literal.parse().ok()?),
			DataType::UInt64 => UInt64(literal.parse().ok()?),
			DataType::Char => Char(literal.chars().next()?),
			DataType::String => Str(literal.to_string()),
			_ => return None,
		})
	}

	pub fn data_type(&self) -> DataType {
		match self {
			Void => DataType::Void,
			Float(_) => DataType::Float,
			Int(_) => DataType::Int,
			UInt64(_) => DataType::UInt64,
			Char(_) => DataType::Char,
			Str(_) => DataType::String,
			Pointer(_) => DataType::Pointer,
		}
	}

	fn number(&self) -> Option<Number> {
		match self {
			Float(n) => Some(Number::Float(*n)),
			Int(n) => Some(Number::Int(*n)),
			UInt64(n) => Some(Number::UInt(*n)),
			Char(c) => Some(Number::Int(*c as i64)),
			_ => None,
		}
	}

	pub fn to_float(&self) -> Option<f64> {
		match self {
			Str(s) => s.trim().parse().ok(),
			other => other.number().map(Number::as_f64),
		}
	}

	pub fn to_int(&self) -> Option<i64> {
		match self {
			// i64::MAX as f64 rounds up to 2^63, which is already out of range.
			Float(n) => (n.is_finite() && *n >= i64::MIN as f64 && *n < i64::MAX as f64).then(|| n.trunc() as i64),
			Int(n) => Some(*n),
			UInt64(n) => i64::try_from(*n).ok(),
			Char(c) => Some(*c as i64),
			Str(s) => s.trim().parse().ok(),
			_ => None,
		}
	}

	pub fn to_uint64(&self) -> Option<u64> {
		match self {
			Float(n) => (n.is_finite() && *n > -1.0 && *n < u64::MAX as f64).then(|| n.trunc() as u64),
			UInt64(n) => Some(*n),
			Str(s) => s.trim().parse().ok(),
			other => u64::try_from(other.to_int()?).ok(),
		}
	}

	pub fn to_char(&self) -> Option<char> {
		match self {
			Char(c) => Some(*c),
			Str(s) => s.chars().next(),
			other => char::from_u32(u32::try_from(other.to_int()?).ok()?),
		}
	}

	/// Convert into a value of `data_type`. Void converts to the zero value.
	pub fn convert(&self, data_type: DataType) -> Option<Value> {
		if *self == Void {
			return Some(Value::default_for(data_type));
		}
		Some(match data_type.base() {
			DataType::Float => Float(self.to_float()?),
			DataType::Int => Int(self.to_int()?),
			DataType::UInt64 => UInt64(self.to_uint64()?),
			DataType::Char => Char(self.to_char()?),
			DataType::String => match self {
				Pointer(_) => return None,
				other => Str(other.to_string()),
			},
			DataType::Pointer => match self {
				Pointer(location) => Pointer(*location),
				_ => return None,
			},
			DataType::Void => self.clone(),
			_ => return None,
		})
	}

	/// Performs a binary operation between two values.
	pub fn binary_op(&self, op: InstructionType, right: &Self) -> Option<Value> {
		match op {
			InstructionType::Add => self.plus(right),
			InstructionType::Subtract => self.minus(right),
			InstructionType::Multiply => self.star(right),
			InstructionType::Divide => self.slash(right),
			_ => None,
		}
	}

	fn arithmetic(
		&self,
		right: &Self,
		int_op: fn(i64, i64) -> Option<i64>,
		uint_op: fn(u64, u64) -> Option<u64>,
		float_op: fn(f64, f64) -> Option<f64>,
	) -> Option<Value> {
		match (self.number()?, right.number()?) {
			(l @ Number::Float(_), r) | (l, r @ Number::Float(_)) => float_op(l.as_f64(), r.as_f64()).map(Float),
			(Number::UInt(l), Number::UInt(r)) => uint_op(l, r).map(UInt64),
			(l, r) => {
				let l = i64::try_from(l.as_i128()?).ok()?;
				let r = i64::try_from(r.as_i128()?).ok()?;
				int_op(l, r).map(Int)
			}
		}
	}

	/// Tries to add two values together.
	pub fn plus(&self, other: &Self) -> Option<Value> {
		match (self, other) {
			(Str(l), Str(r)) => Some(Str(format!("{l}{r}"))),
			(Str(_), _) | (_, Str(_)) => None,
			_ => self.arithmetic(other, i64::checked_add, u64::checked_add, |l, r| Some(l + r)),
		}
	}

	/// Tries to subtract two values.
	pub fn minus(&self, other: &Self) -> Option<Value> {
		self.arithmetic(other, i64::checked_sub, u64::checked_sub, |l, r| Some(l - r))
	}

	/// Tries to multiply two values together.
	pub fn star(&self, other: &Self) -> Option<Value> {
		self.arithmetic(other, i64::checked_mul, u64::checked_mul, |l, r| Some(l * r))
	}

	/// Tries to divide two values.
	pub fn slash(&self, other: &Self) -> Option<Value> {
		self.arithmetic(other, i64::checked_div, u64::checked_div, |l, r| (r != 0.0).then_some(l / r))
	}

	/// Evaluate a comparison opcode, `None` if the values cannot be compared.
	pub fn compare(&self, op: InstructionType, right: &Self) -> Option<bool> {
		let ordering = match (self, right) {
			(Str(l), Str(r)) => l.cmp(r),
			(Pointer(l), Pointer(r)) => {
				return match op {
					InstructionType::Equal => Some(l == r),
					InstructionType::NotEqual => Some(l != r),
					_ => None,
				};
			}
			(Void, Void) => Ordering::Equal,
			_ => {
				let (l, r) = (self.number()?, right.number()?);
				match (l.as_i128(), r.as_i128()) {
					(Some(l), Some(r)) => l.cmp(&r),
					_ => l.as_f64().partial_cmp(&r.as_f64())?,
				}
			}
		};
		Some(match op {
			InstructionType::Equal => ordering == Ordering::Equal,
			InstructionType::NotEqual => ordering != Ordering::Equal,
			InstructionType::Greater => ordering == Ordering::Greater,
			InstructionType::Less => ordering == Ordering::Less,
			InstructionType::EqualOrGreater => ordering != Ordering::Less,
			InstructionType::EqualOrLess => ordering != Ordering::Greater,
			_ => return None,
		})
	}
}

/// A named, typed storage slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
	pub name:      String,
	/// Declared type, `Void` for slots that take whatever they are given.
	pub data_type: DataType,
	pub value:     Value,
	/// Name of the variable this value was passed from, if any.
	pub origin:    Option<String>,
}

impl Variable {
	pub fn new(name: &str, data_type: DataType) -> Self {
		let data_type = data_type.base();
		Self { name: name.to_string(), data_type, value: Value::default_for(data_type), origin: None }
	}

	/// Store `value`, converting it to the declared type.
	pub fn store(&mut self, value: Value) -> Option<()> {
		self.value = match self.data_type {
			DataType::Void => value,
			data_type => value.convert(data_type)?,
		};
		Some(())
	}
}
