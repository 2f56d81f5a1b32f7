use std::{
	fs::read_to_string,
	io::{BufRead, BufReader, Write},
	path::Path,
};

use anyhow::Context;
use tracing::{debug, info, trace};

use crate::{
	Config, ScriptError,
	ast::AbstractSyntaxTree,
	debug::{dump_function, dump_tokens},
	interpreter::{Interpreter, native, value::Value},
	lexer::Lexer,
	module::{FileModuleLoader, ModuleLoader, splice_imports},
	parser::Parser,
};

/// A lowered program and the modules it imported.
#[derive(Debug, Clone)]
pub struct Program {
	pub ast:     AbstractSyntaxTree,
	pub modules: Vec<String>,
}

/// Scriptor drives the pipeline: lex, splice imports, lower, run.
pub struct Scriptor {
	config: Config,
	loader: Box<dyn ModuleLoader>,
}

impl Scriptor {
	/// Imports resolve next to the input file.
	pub fn new(config: Config) -> Self {
		let root = config.input.parent().unwrap_or(Path::new(".")).to_path_buf();
		Self { config, loader: Box::new(FileModuleLoader::new(root)) }
	}

	pub fn with_loader(config: Config, loader: impl ModuleLoader + 'static) -> Self {
		Self { config, loader: Box::new(loader) }
	}

	pub fn compile(&self, source: &str) -> Result<Program, ScriptError> {
		let tokens = Lexer::new(source).lex();
		debug!(count = tokens.len(), "lexed source");
		let (tokens, modules) = splice_imports(tokens, self.loader.as_ref())?;
		trace!("spliced tokens:\n{}", dump_tokens(&tokens));
		let ast = Parser::new(tokens, self.config.parser_options()).parse()?;
		debug!(functions = ast.functions.len(), ?modules, "compiled program");
		Ok(Program { ast, modules })
	}

	/// An interpreter with the program and the natives of its modules installed.
	pub fn interpreter(&self, program: Program, input: Box<dyn BufRead>, output: Box<dyn Write>) -> Interpreter {
		let mut interpreter = Interpreter::with_io(self.config.runtime_options(), input, output);
		interpreter.install(program.ast);
		native::install(&mut interpreter, &program.modules);
		interpreter
	}

	/// Compile and run `source`, returning what the entry point returned. With
	/// `dump_instructions` the listing is written to `output` instead.
	pub fn run_source(
		&self,
		source: &str,
		input: Box<dyn BufRead>,
		mut output: Box<dyn Write>,
	) -> Result<Option<Value>, ScriptError> {
		let program = self.compile(source)?;
		if self.config.dump_instructions {
			for function in &program.ast.functions {
				writeln!(output, "{}", dump_function(function)).context("Failed write instruction dump")?;
			}
			return Ok(None);
		}

		let mut interpreter = self.interpreter(program, input, output);
		let result = interpreter.run(&self.config.entry_point)?;
		if self.config.dump_stack_frames {
			let dumps = interpreter.frame_dumps().to_vec();
			for dump in dumps {
				write!(interpreter.output(), "{dump}").context("Failed write frame dump")?;
			}
		}
		interpreter.output().flush().context("Failed flush output")?;
		Ok(result)
	}

	/// Run the configured input file against stdin and stdout.
	pub fn run_file(&self) -> Result<(), ScriptError> {
		let source = read_to_string(&self.config.input)
			.with_context(|| format!("Failed open source file {}", self.config.input.display()))?;
		let input = Box::new(BufReader::new(std::io::stdin()));
		let result = self.run_source(&source, input, Box::new(std::io::stdout()))?;
		if let Some(value) = result {
			info!(%value, "program returned");
		}
		Ok(())
	}
}
