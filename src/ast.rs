use crate::function::Function;

/// The lowered program: a flat registry of functions, not a tree.
#[derive(Debug, Clone, Default)]
pub struct AbstractSyntaxTree {
	pub functions:   Vec<Function>,
	/// Name of the entry point, if the program defines it.
	pub entry_point: Option<String>,
}

impl AbstractSyntaxTree {
	pub fn function(&self, name: &str) -> Option<&Function> {
		self.functions.iter().find(|function| function.name == name)
	}

	pub fn entry_point(&self) -> Option<&Function> { self.function(self.entry_point.as_deref()?) }

	pub fn contains(&self, name: &str) -> bool { self.function(name).is_some() }
}
