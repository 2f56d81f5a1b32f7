//! `import "path";` handling.
//!
//! Imports are textual: the statement is replaced in place by the tokens of
//! the imported source before parsing starts. The lexer and the parser never
//! see a file system; a [`ModuleLoader`] turns an import path into source.
use std::{
	collections::HashMap,
	fs::read_to_string,
	path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use tracing::debug;

use crate::{
	error::{ParseError, ParseErrorType, ScriptError},
	interpreter::native,
	lexer::{Lexeme, Lexer, Token},
};

pub trait ModuleLoader {
	/// Source text of the module named by an import path.
	fn resolve(&self, path: &str) -> anyhow::Result<String>;
}

/// Resolves imports relative to a root directory, falling back to the
/// embedded sources of the native modules.
#[derive(Debug, Clone)]
pub struct FileModuleLoader {
	root: PathBuf,
}

impl FileModuleLoader {
	pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

	fn candidates(&self, path: &str) -> Vec<PathBuf> {
		let file = self.root.join(path);
		if Path::new(path).extension().is_some() {
			return vec![file];
		}
		vec![file.with_extension("script"), file]
	}
}

impl ModuleLoader for FileModuleLoader {
	fn resolve(&self, path: &str) -> anyhow::Result<String> {
		if let Some(file) = self.candidates(path).into_iter().find(|file| file.is_file()) {
			return read_to_string(&file).with_context(|| format!("Failed read module {}", file.display()));
		}
		native::module_source(path)
			.map(str::to_string)
			.ok_or_else(|| anyhow!("no module found in {}", self.root.display()))
	}
}

/// In-memory modules keyed by import path.
impl ModuleLoader for HashMap<String, String> {
	fn resolve(&self, path: &str) -> anyhow::Result<String> {
		self
			.get(path)
			.cloned()
			.or_else(|| native::module_source(path).map(str::to_string))
			.ok_or_else(|| anyhow!("no module registered"))
	}
}

/// Replace every import statement by the imported tokens, recursively. Each
/// path is spliced once. Returns the tokens and the imported paths in order.
pub fn splice_imports(tokens: Vec<Token>, loader: &dyn ModuleLoader) -> Result<(Vec<Token>, Vec<String>), ScriptError> {
	let mut modules = Vec::new();
	let tokens = splice(tokens, loader, &mut modules)?;
	Ok((tokens, modules))
}

fn splice(tokens: Vec<Token>, loader: &dyn ModuleLoader, modules: &mut Vec<String>) -> Result<Vec<Token>, ScriptError> {
	let mut spliced = Vec::with_capacity(tokens.len());
	let mut tokens = tokens.into_iter().peekable();
	while let Some(token) = tokens.next() {
		if !token.is(Lexeme::Import) {
			spliced.push(token);
			continue;
		}
		let path = match tokens.next() {
			Some(path) if path.is(Lexeme::LiteralString) => path.content,
			_ => return Err(ParseError::new(token.line, ParseErrorType::ExpectedToken("module path")).into()),
		};
		tokens.next_if(|token| token.is(Lexeme::EndLine));
		if modules.contains(&path) {
			continue;
		}
		modules.push(path.clone());

		let source = loader.resolve(&path).map_err(|error| ScriptError::ImportError { path: path.clone(), error })?;
		debug!(path, "splicing import");
		spliced.extend(splice(Lexer::new(&source).lex(), loader, modules)?);
	}
	Ok(spliced)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn contents(tokens: &[Token]) -> Vec<&str> { tokens.iter().map(|token| token.content.as_str()).collect() }

	fn loader(modules: &[(&str, &str)]) -> HashMap<String, String> {
		modules.iter().map(|(path, source)| (path.to_string(), source.to_string())).collect()
	}

	#[test]
	fn imports_are_spliced_in_place() {
		let loader = loader(&[("math", "int one() { return 1; }")]);
		let tokens = Lexer::new("import \"math\";\nint main() { }").lex();
		let (tokens, modules) = splice_imports(tokens, &loader).unwrap();
		assert_eq!(modules, ["math"]);
		assert_eq!(contents(&tokens)[..4], ["int", "one", "(", ")"]);
		assert!(!tokens.iter().any(|token| token.is(Lexeme::Import)));
	}

	#[test]
	fn nested_and_repeated_imports_are_spliced_once() {
		let loader = loader(&[("a", "import \"b\"; int a() { return 1; }"), ("b", "import \"a\"; int b() { return 2; }")]);
		let tokens = Lexer::new("import \"a\"; import \"b\";").lex();
		let (tokens, modules) = splice_imports(tokens, &loader).unwrap();
		assert_eq!(modules, ["a", "b"]);
		assert_eq!(tokens.iter().filter(|token| token.content == "int").count(), 2);
	}

	#[test]
	fn native_modules_resolve_without_files() {
		let (tokens, modules) = splice_imports(Lexer::new("import \"io\";").lex(), &HashMap::<String, String>::new()).unwrap();
		assert_eq!(modules, ["io"]);
		assert!(contents(&tokens).contains(&"WriteLine"));

		let loader = FileModuleLoader::new(env!("CARGO_MANIFEST_DIR"));
		assert!(loader.resolve("types").unwrap().contains("ToString"));
	}

	#[test]
	fn missing_modules_fail() {
		let result = splice_imports(Lexer::new("import \"nowhere\";").lex(), &HashMap::<String, String>::new());
		assert!(matches!(result, Err(ScriptError::ImportError { path, .. }) if path == "nowhere"));
		let result = splice_imports(Lexer::new("import nowhere;").lex(), &HashMap::<String, String>::new());
		assert!(matches!(result, Err(ScriptError::ParseError(_))));
	}
}
