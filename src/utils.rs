use std::{
	cell::{Ref, RefCell, RefMut},
	io::Write,
	rc::Rc,
};

#[derive(Debug, Default)]
pub struct RcCell<T> {
	inner: Rc<RefCell<T>>,
}

impl<T> Clone for RcCell<T> {
	fn clone(&self) -> Self { Self { inner: self.inner.clone() } }
}

impl<T> RcCell<T> {
	pub fn borrow(&self) -> Ref<'_, T> { self.inner.borrow() }

	pub fn borrow_mut(&self) -> RefMut<'_, T> { self.inner.borrow_mut() }
}

/// In-memory output sink whose clones share one buffer, so a program's output
/// can be read back after the interpreter took ownership of the writer.
#[derive(Debug, Default, Clone)]
pub struct SharedBuffer {
	inner: RcCell<Vec<u8>>,
}

impl SharedBuffer {
	pub fn contents(&self) -> String { String::from_utf8_lossy(&self.inner.borrow()).into_owned() }
}

impl Write for SharedBuffer {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		self.inner.borrow_mut().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clones_share_the_buffer() {
		let buffer = SharedBuffer::default();
		let mut writer = buffer.clone();
		write!(writer, "hello {}", 42).unwrap();
		assert_eq!(buffer.contents(), "hello 42");
	}
}
