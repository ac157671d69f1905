/// Where a token or node starts in the source, and how many bytes it spans.
/// `line` and `col` are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SrcLoc {
  pub offset: u32,
  pub line: u32,
  pub col: u32,
  pub len: u16,
}

impl SrcLoc {
  pub const fn new(offset: u32, line: u32, col: u32, len: u16) -> Self {
    SrcLoc { offset, line, col, len }
  }

  pub const fn with_len(self, len: u16) -> Self {
    SrcLoc { len, ..self }
  }

  /// Span from the start of `self` to the end of `other`, assuming `other`
  /// does not start before `self`.
  pub fn to(self, other: SrcLoc) -> Self {
    let end = other.offset + other.len as u32;
    let len = end.saturating_sub(self.offset).min(u16::MAX as u32) as u16;
    self.with_len(len)
  }
}
