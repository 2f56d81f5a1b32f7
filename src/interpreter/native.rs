//! Native function catalogue.
//!
//! Each std module ships its `extern` declarations as an embedded source so
//! `import "io";` works without a file on disk. Natives are installed for every
//! imported module whose file stem names a catalogue module.
use std::path::Path;

use tracing::debug;

use super::{Interpreter, value::Value};
use crate::{
	error::InterpreterError,
	function::Function,
	instruction::{DataType, VariableInfo},
};

const IO_SOURCE: &str = "extern void WriteLine(void text);\nextern string GetLine();\n";
const TYPES_SOURCE: &str =
	"extern string ToString(void value);\nextern float ToFloat(string text);\nextern int ToInt(string text);\n";
const STRING_SOURCE: &str = "extern string IndexString(string input, int index);\n";
const REFLECTION_SOURCE: &str = "extern string nameof(void var);\nextern string typeof(void var);\n";

/// Embedded `extern` declarations of a catalogue module.
pub fn module_source(path: &str) -> Option<&'static str> {
	match module_stem(path)? {
		"io" => Some(IO_SOURCE),
		"types" => Some(TYPES_SOURCE),
		"string" => Some(STRING_SOURCE),
		"reflection" => Some(REFLECTION_SOURCE),
		_ => None,
	}
}

fn module_stem(path: &str) -> Option<&str> { Path::new(path).file_stem()?.to_str() }

/// Install the natives of every imported catalogue module.
pub fn install(interpreter: &mut Interpreter, modules: &[String]) {
	for module in modules {
		let natives = catalogue(module_stem(module).unwrap_or_default());
		debug!(module, count = natives.len(), "installing natives");
		for native in natives {
			interpreter.install_function(native);
		}
	}
}

fn catalogue(module: &str) -> Vec<Function> {
	let parameter = VariableInfo::new;
	match module {
		"io" => vec![
			Function::native("WriteLine", vec![parameter("text", DataType::Void)], DataType::Void, write_line),
			Function::native("GetLine", vec![], DataType::String, get_line),
		],
		"types" => vec![
			Function::native("ToString", vec![parameter("value", DataType::Void)], DataType::String, to_string),
			Function::native("ToFloat", vec![parameter("text", DataType::String)], DataType::Float, to_float),
			Function::native("ToInt", vec![parameter("text", DataType::String)], DataType::Int, to_int),
		],
		"string" => vec![Function::native(
			"IndexString",
			vec![parameter("input", DataType::String), parameter("index", DataType::Int)],
			DataType::String,
			index_string,
		)],
		"reflection" => vec![
			Function::native("nameof", vec![parameter("var", DataType::Void)], DataType::String, name_of),
			Function::native("typeof", vec![parameter("var", DataType::Void)], DataType::String, type_of),
		],
		_ => vec![],
	}
}

fn argument(interpreter: &Interpreter, name: &str) -> Result<Value, InterpreterError> {
	Ok(interpreter.variable(name)?.value.clone())
}

fn write_line(interpreter: &mut Interpreter) -> Result<(), InterpreterError> {
	let text = argument(interpreter, "text")?;
	writeln!(interpreter.output(), "{text}")?;
	Ok(())
}

fn get_line(interpreter: &mut Interpreter) -> Result<(), InterpreterError> {
	let line = interpreter.read_line()?;
	interpreter.return_value(Value::Str(line));
	Ok(())
}

fn to_string(interpreter: &mut Interpreter) -> Result<(), InterpreterError> {
	let value = argument(interpreter, "value")?;
	interpreter.return_value(Value::Str(value.to_string()));
	Ok(())
}

fn to_float(interpreter: &mut Interpreter) -> Result<(), InterpreterError> {
	let text = argument(interpreter, "text")?;
	let value = text.to_float().ok_or(InterpreterError::InvalidConversion { value: text.to_string(), to: DataType::Float })?;
	interpreter.return_value(Value::Float(value));
	Ok(())
}

fn to_int(interpreter: &mut Interpreter) -> Result<(), InterpreterError> {
	let text = argument(interpreter, "text")?;
	let value = text.to_int().ok_or(InterpreterError::InvalidConversion { value: text.to_string(), to: DataType::Int })?;
	interpreter.return_value(Value::Int(value));
	Ok(())
}

fn index_string(interpreter: &mut Interpreter) -> Result<(), InterpreterError> {
	let input = argument(interpreter, "input")?.to_string();
	let index = argument(interpreter, "index")?.to_int().unwrap_or(-1);
	let length = input.chars().count();
	let c = usize::try_from(index)
		.ok()
		.and_then(|index| input.chars().nth(index))
		.ok_or(InterpreterError::IndexOutOfRange { index, length })?;
	interpreter.return_value(Value::Str(c.to_string()));
	Ok(())
}

fn name_of(interpreter: &mut Interpreter) -> Result<(), InterpreterError> {
	let variable = interpreter.variable("var")?;
	let name = variable.origin.clone().unwrap_or_else(|| variable.value.to_string());
	interpreter.return_value(Value::Str(name));
	Ok(())
}

fn type_of(interpreter: &mut Interpreter) -> Result<(), InterpreterError> {
	let value = argument(interpreter, "var")?;
	interpreter.return_value(Value::Str(value.data_type().name().to_string()));
	Ok(())
}
