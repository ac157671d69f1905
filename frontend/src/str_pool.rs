use std::collections::HashMap;
use std::rc::Rc;

use crate::internal::*;

/// Interned lexemes. Identifiers and operator text in the ast are stored as
/// `idx::StrPool` handles into this pool.
#[derive(Debug)]
pub struct StringPool {
  strs: Vec<Rc<str>>,
  lookup: HashMap<Rc<str>, idx::StrPool>,
}

impl StringPool {
  pub fn new() -> Self {
    let mut pool = Self {
      strs: Vec::with_capacity(64),
      lookup: HashMap::with_capacity(64),
    };
    // special case empty string
    pool.insert(Rc::from(""));
    pool
  }

  pub const fn empty(&self) -> idx::StrPool {
    idx::StrPool::new(0)
  }

  pub fn intern(&mut self, s: &str) -> idx::StrPool {
    if let Some(index) = self.lookup.get(s) {
      return *index;
    }
    self.insert(Rc::from(s))
  }

  /// Index of an already interned string, without interning it.
  pub fn find(&self, s: &str) -> Option<idx::StrPool> {
    self.lookup.get(s).copied()
  }

  pub fn get(&self, index: idx::StrPool) -> &str {
    &self.strs[index.usize()]
  }

  pub fn len(&self) -> usize {
    self.strs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.strs.len() == 1
  }

  fn insert(&mut self, s: Rc<str>) -> idx::StrPool {
    assert!(self.strs.len() < u32::MAX as usize);
    let index = idx::StrPool::new(self.strs.len() as u32);
    self.lookup.insert(Rc::clone(&s), index);
    self.strs.push(s);
    index
  }
}

impl Default for StringPool {
  fn default() -> Self {
    Self::new()
  }
}
