use crate::internal::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Ident,
  IntLit,
  /// Any single-character operator or punctuation, tagged by the character.
  Punct(u8),
  Shl,
  Shr,
  Eof,
  Error,
}

impl TokenKind {
  pub const fn is_terminal(&self) -> bool {
    matches!(self, TokenKind::Eof | TokenKind::Error)
  }
}

impl std::fmt::Display for TokenKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      TokenKind::Ident => write!(f, "identifier"),
      TokenKind::IntLit => write!(f, "integer literal"),
      TokenKind::Punct(c) => write!(f, "`{}`", *c as char),
      TokenKind::Shl => write!(f, "`<<`"),
      TokenKind::Shr => write!(f, "`>>`"),
      TokenKind::Eof => write!(f, "end of input"),
      TokenKind::Error => write!(f, "invalid token"),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub loc: SrcLoc,
  pub lexeme: idx::StrPool,
}

impl Token {
  pub const fn new(kind: TokenKind, loc: SrcLoc, lexeme: idx::StrPool) -> Self {
    Token { kind, loc, lexeme }
  }

  pub fn lexeme<'a>(&self, strs: &'a StringPool) -> &'a str {
    strs.get(self.lexeme)
  }

  /// How the token reads in an error message.
  pub fn describe(&self, strs: &StringPool) -> String {
    match self.kind {
      TokenKind::Ident | TokenKind::IntLit => format!("`{}`", self.lexeme(strs)),
      kind => kind.to_string(),
    }
  }
}
