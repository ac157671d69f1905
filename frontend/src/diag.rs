use crate::internal::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
  pub line: u32,
  pub col: u32,
  pub width: u32,
  pub msg: String,
}

impl Diagnostic {
  pub fn new(loc: SrcLoc, msg: impl Into<String>) -> Self {
    Diagnostic {
      line: loc.line,
      col: loc.col,
      width: u32::from(loc.len.max(1)),
      msg: msg.into(),
    }
  }
}

impl std::fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}:{}: {}", self.line, self.col, self.msg)
  }
}
