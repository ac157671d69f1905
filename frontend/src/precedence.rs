use std::collections::BTreeMap;

pub const NOT_AN_OPERATOR: i32 = -1;

/// Binding power of every binary operator, higher binds tighter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceTable {
  ops: BTreeMap<String, i32>,
}

impl PrecedenceTable {
  pub fn standard() -> Self {
    let entries = [
      ("~", 40),
      (">>", 30),
      ("<<", 30),
      ("*", 20),
      ("/", 20),
      ("+", 10),
      ("-", 10),
      ("<", 1),
      (">", 1),
    ];
    PrecedenceTable {
      ops: entries
        .into_iter()
        .map(|(op, prec)| (op.to_string(), prec))
        .collect(),
    }
  }

  /// A custom table. `None` if any binding power is negative.
  pub fn from_entries<S: Into<String>>(entries: impl IntoIterator<Item = (S, i32)>) -> Option<Self> {
    let mut ops = BTreeMap::new();
    for (op, prec) in entries {
      if prec < 0 {
        return None;
      }
      ops.insert(op.into(), prec);
    }
    Some(PrecedenceTable { ops })
  }

  pub fn get(&self, op: &str) -> i32 {
    self.ops.get(op).copied().unwrap_or(NOT_AN_OPERATOR)
  }

  pub fn is_operator(&self, op: &str) -> bool {
    self.ops.contains_key(op)
  }

  pub fn len(&self) -> usize {
    self.ops.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ops.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
    self.ops.iter().map(|(op, prec)| (op.as_str(), *prec))
  }
}

impl Default for PrecedenceTable {
  fn default() -> Self {
    Self::standard()
  }
}
