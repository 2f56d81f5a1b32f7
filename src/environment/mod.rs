//! Scoped storage shared by the parser's simulated frame and the interpreter.
//!
//! A [`Scope`] is an ordered slot arena keyed by name, a [`Frame`] is a stack
//! of scopes (innermost last) and a [`CallStack`] is a stack of frames, one per
//! active call. Slots never move while their scope is alive, so a
//! `(frame, scope, slot)` triple is a stable location. Indices are reused once
//! a scope is popped; the [`CallStack`] gives every scope it opens a fresh id
//! so a stale location can be told apart from a live one.
use std::collections::HashMap;

/// One lexical block's bindings.
#[derive(Debug, Clone)]
pub struct Scope<T> {
	id:    u64,
	slots: Vec<(String, T)>,
	index: HashMap<String, usize>,
}

impl<T> Default for Scope<T> {
	fn default() -> Self { Self::with_id(0) }
}

impl<T> Scope<T> {
	pub fn new() -> Self { Self::default() }

	pub fn with_id(id: u64) -> Self { Self { id, slots: Vec::new(), index: HashMap::new() } }

	pub fn id(&self) -> u64 { self.id }

	/// Bind `name`, replacing an existing binding in place. Returns the slot.
	pub fn insert(&mut self, name: &str, value: T) -> usize {
		if let Some(&slot) = self.index.get(name) {
			self.slots[slot].1 = value;
			return slot;
		}
		self.slots.push((name.to_string(), value));
		self.index.insert(name.to_string(), self.slots.len() - 1);
		self.slots.len() - 1
	}

	pub fn get(&self, name: &str) -> Option<&T> { self.index.get(name).map(|&slot| &self.slots[slot].1) }

	pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
		self.index.get(name).map(|&slot| &mut self.slots[slot].1)
	}

	pub fn contains(&self, name: &str) -> bool { self.index.contains_key(name) }

	pub fn position(&self, name: &str) -> Option<usize> { self.index.get(name).copied() }

	pub fn slot(&self, slot: usize) -> Option<&T> { self.slots.get(slot).map(|(_, value)| value) }

	pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> { self.slots.iter().map(|(name, value)| (name.as_str(), value)) }

	pub fn len(&self) -> usize { self.slots.len() }

	pub fn is_empty(&self) -> bool { self.slots.is_empty() }
}

/// The nested scopes of one call. Always holds at least the function scope.
#[derive(Debug, Clone)]
pub struct Frame<T> {
	scopes: Vec<Scope<T>>,
}

impl<T> Default for Frame<T> {
	fn default() -> Self { Self { scopes: vec![Scope::new()] } }
}

impl<T> Frame<T> {
	pub fn new() -> Self { Self::default() }

	pub fn push_scope(&mut self) { self.scopes.push(Scope::new()) }

	fn push_scope_with_id(&mut self, id: u64) { self.scopes.push(Scope::with_id(id)) }

	/// Pop the innermost scope. The function scope itself is never popped.
	pub fn pop_scope(&mut self) -> Option<Scope<T>> {
		if self.scopes.len() == 1 {
			return None;
		}
		self.scopes.pop()
	}

	/// Declare in the innermost scope, returning `(scope, slot)`.
	pub fn declare(&mut self, name: &str, value: T) -> (usize, usize) {
		let scope = self.scopes.len() - 1;
		let slot = self.scopes[scope].insert(name, value);
		(scope, slot)
	}

	pub fn get(&self, name: &str) -> Option<&T> { self.scopes.iter().rev().find_map(|scope| scope.get(name)) }

	pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
		self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name))
	}

	pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

	pub fn contains_innermost(&self, name: &str) -> bool { self.scopes.last().is_some_and(|scope| scope.contains(name)) }

	/// `(scope, slot)` of the innermost binding of `name`.
	pub fn locate(&self, name: &str) -> Option<(usize, usize)> {
		self.scopes.iter().enumerate().rev().find_map(|(index, scope)| Some((index, scope.position(name)?)))
	}

	pub fn at(&self, scope: usize, slot: usize) -> Option<&T> { self.scopes.get(scope)?.slot(slot) }

	pub fn scope_id(&self, scope: usize) -> Option<u64> { self.scopes.get(scope).map(Scope::id) }

	pub fn depth(&self) -> usize { self.scopes.len() }

	pub fn scopes(&self) -> &[Scope<T>] { &self.scopes }

	/// Drop every scope and start over with an empty function scope.
	pub fn clear(&mut self) { self.scopes = vec![Scope::new()] }
}

/// One frame per active call on top of a base frame.
#[derive(Debug, Clone)]
pub struct CallStack<T> {
	frames:  Vec<Frame<T>>,
	next_id: u64,
}

impl<T> Default for CallStack<T> {
	fn default() -> Self { Self { frames: vec![Frame::new()], next_id: 1 } }
}

impl<T> CallStack<T> {
	pub fn new() -> Self { Self::default() }

	fn fresh_id(&mut self) -> u64 {
		self.next_id += 1;
		self.next_id - 1
	}

	pub fn push_frame(&mut self) {
		let id = self.fresh_id();
		self.frames.push(Frame { scopes: vec![Scope::with_id(id)] });
	}

	/// Open a scope in the top frame under an id never handed out before.
	pub fn push_scope(&mut self) {
		let id = self.fresh_id();
		self.top_mut().push_scope_with_id(id);
	}

	/// Pop the top frame. The base frame is never popped.
	pub fn pop_frame(&mut self) -> Option<Frame<T>> {
		if self.frames.len() == 1 {
			return None;
		}
		self.frames.pop()
	}

	pub fn top(&self) -> &Frame<T> { &self.frames[self.frames.len() - 1] }

	pub fn top_mut(&mut self) -> &mut Frame<T> {
		let top = self.frames.len() - 1;
		&mut self.frames[top]
	}

	pub fn frame(&self, index: usize) -> Option<&Frame<T>> { self.frames.get(index) }

	/// Index of the top frame.
	pub fn top_index(&self) -> usize { self.frames.len() - 1 }

	pub fn len(&self) -> usize { self.frames.len() }

	pub fn is_empty(&self) -> bool { self.frames.is_empty() }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lookup_walks_innermost_to_outermost() {
		let mut frame = Frame::new();
		frame.declare("x", 1);
		frame.push_scope();
		frame.declare("x", 2);
		frame.declare("y", 3);
		assert_eq!(frame.get("x"), Some(&2));
		assert_eq!(frame.locate("x"), Some((1, 0)));
		assert!(frame.pop_scope().is_some());
		assert_eq!(frame.get("x"), Some(&1));
		assert_eq!(frame.get("y"), None);
	}

	#[test]
	fn function_scope_is_never_popped() {
		let mut frame: Frame<i32> = Frame::new();
		assert!(frame.pop_scope().is_none());
		assert_eq!(frame.depth(), 1);
	}

	#[test]
	fn redeclaring_reuses_the_slot() {
		let mut scope = Scope::new();
		assert_eq!(scope.insert("a", 1), 0);
		assert_eq!(scope.insert("b", 2), 1);
		assert_eq!(scope.insert("a", 5), 0);
		assert_eq!(scope.slot(0), Some(&5));
		assert_eq!(scope.iter().map(|(name, _)| name).collect::<Vec<_>>(), ["a", "b"]);
	}

	#[test]
	fn call_stack_keeps_base_frame() {
		let mut stack: CallStack<i32> = CallStack::new();
		stack.push_frame();
		stack.top_mut().declare("a", 1);
		assert_eq!(stack.top_index(), 1);
		assert!(stack.pop_frame().is_some());
		assert!(stack.pop_frame().is_none());
		assert_eq!(stack.top().get("a"), None);
	}

	#[test]
	fn reopened_scopes_get_new_ids() {
		let mut stack: CallStack<i32> = CallStack::new();
		stack.push_frame();
		stack.push_scope();
		let first = stack.top().scope_id(1);
		assert!(stack.top_mut().pop_scope().is_some());
		stack.push_scope();
		assert_ne!(stack.top().scope_id(1), first);
		assert_eq!(stack.top().scope_id(2), None);

		let root = stack.top().scope_id(0);
		assert!(stack.pop_frame().is_some());
		stack.push_frame();
		assert_ne!(stack.top().scope_id(0), root);
	}
}
