use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::internal::{TokenKind as T, *};
use ParseError as E;

mod decl;
mod expr;

pub const DEFAULT_MAX_DEPTH: u16 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
  /// How deep parenthesised groups, call arguments and tighter-binding
  /// operator runs may nest before parsing gives up.
  pub max_depth: u16,
}

impl ParseOptions {
  pub const fn with_max_depth(self, max_depth: u16) -> Self {
    ParseOptions { max_depth, ..self }
  }
}

impl Default for ParseOptions {
  fn default() -> Self {
    ParseOptions { max_depth: DEFAULT_MAX_DEPTH }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
  #[error("expected {expected}, found {found}")]
  ExpectedToken {
    expected: TokenKind,
    found: String,
    loc: SrcLoc,
  },
  #[error("expected expression, found {found}")]
  ExpectedExpression { found: String, loc: SrcLoc },
  #[error("expected type name, found {found}")]
  ExpectedTypeName { found: String, loc: SrcLoc },
  #[error("expected function name, found {found}")]
  ExpectedFunctionName { found: String, loc: SrcLoc },
  #[error("expected parameter name, found {found}")]
  ExpectedParamName { found: String, loc: SrcLoc },
  #[error("integer literal `{lexeme}` is out of range")]
  InvalidIntLit { lexeme: String, loc: SrcLoc },
  #[error("nesting deeper than {max_depth} levels")]
  TooDeep { max_depth: u16, loc: SrcLoc },
  #[error(transparent)]
  Lex(#[from] LexError),
}

impl ParseError {
  pub fn loc(&self) -> SrcLoc {
    match self {
      E::ExpectedToken { loc, .. }
      | E::ExpectedExpression { loc, .. }
      | E::ExpectedTypeName { loc, .. }
      | E::ExpectedFunctionName { loc, .. }
      | E::ExpectedParamName { loc, .. }
      | E::InvalidIntLit { loc, .. }
      | E::TooDeep { loc, .. } => *loc,
      E::Lex(err) => err.loc(),
    }
  }

  pub fn diagnostic(&self) -> Diagnostic {
    Diagnostic::new(self.loc(), self.to_string())
  }
}

/// Recursive descent parser with precedence climbing for binary operators.
/// Pulls tokens from its lexer one at a time and builds nodes into an
/// `AstData` arena. Every public entry point either returns a complete
/// node or an error, never a partial tree.
#[derive(Debug)]
pub struct Parser<'t, R> {
  lexer: Lexer<R>,
  table: &'t PrecedenceTable,
  options: ParseOptions,
  ast: AstData,
  items: Vec<Item>,
  depth: u16,
}

impl<'t> Parser<'t, File> {
  pub fn open(path: impl AsRef<Path>, table: &'t PrecedenceTable) -> Result<Self, ParseError> {
    Ok(Parser::new(Lexer::open(path)?, table))
  }
}

impl<'t, 's> Parser<'t, &'s [u8]> {
  pub fn new_str(src: &'s str, table: &'t PrecedenceTable) -> Self {
    Parser::new(Lexer::new_str(src), table)
  }
}

impl<'t, R: Read> Parser<'t, R> {
  pub fn new(lexer: Lexer<R>, table: &'t PrecedenceTable) -> Self {
    Self::with_options(lexer, table, ParseOptions::default())
  }

  pub fn with_options(lexer: Lexer<R>, table: &'t PrecedenceTable, options: ParseOptions) -> Self {
    Parser {
      lexer,
      table,
      options,
      ast: AstData::with_capacity(32),
      items: Vec::new(),
      depth: 0,
    }
  }

  pub fn expression(&mut self) -> Result<idx::Expr, ParseError> {
    self.attempt(Self::parse_expression)
  }

  pub fn prototype(&mut self) -> Result<idx::Proto, ParseError> {
    self.attempt(Self::parse_prototype)
  }

  pub fn function(&mut self) -> Result<idx::Function, ParseError> {
    self.attempt(Self::parse_function)
  }

  /// A function definition or a `;` terminated declaration, remembered as
  /// one of the items of the resulting `Context`.
  pub fn item(&mut self) -> Result<Item, ParseError> {
    let item = self.attempt(Self::parse_item)?;
    self.items.push(item);
    Ok(item)
  }

  #[instrument(skip_all)]
  pub fn program(mut self) -> Result<Context, ParseError> {
    while !self.is_done() {
      self.item()?;
    }
    trace!(items = self.items.len(), "parsed program");
    Ok(self.finish())
  }

  pub fn finish(self) -> Context {
    let Parser { lexer, ast, items, .. } = self;
    let mut ctx = Context::new(lexer.into_strings(), ast);
    ctx.items = items;
    ctx
  }

  pub fn is_done(&self) -> bool {
    self.cur_token_is(T::Eof)
  }

  pub const fn ast(&self) -> &AstData {
    &self.ast
  }

  pub const fn strings(&self) -> &StringPool {
    self.lexer.strings()
  }

  fn attempt<N>(
    &mut self,
    parse: impl FnOnce(&mut Self) -> Result<N, ParseError>,
  ) -> Result<N, ParseError> {
    let mark = self.ast.mark();
    self.depth = 0;
    let result = parse(self).and_then(|parsed| match self.pending_lex_error() {
      Some(err) => Err(err),
      None => Ok(parsed),
    });
    match result {
      Ok(parsed) => Ok(parsed),
      Err(err) => {
        debug!(diagnostic = %err.diagnostic(), "parse failed");
        self.ast.rollback(mark);
        Err(err)
      }
    }
  }

  fn nested<N>(
    &mut self,
    parse: impl FnOnce(&mut Self) -> Result<N, ParseError>,
  ) -> Result<N, ParseError> {
    if self.depth >= self.options.max_depth {
      return Err(E::TooDeep {
        max_depth: self.options.max_depth,
        loc: self.cur_token().loc,
      });
    }
    self.depth += 1;
    let result = parse(self);
    self.depth -= 1;
    result
  }

  fn cur_token(&self) -> Token {
    *self.lexer.current()
  }

  fn cur_token_is(&self, kind: TokenKind) -> bool {
    self.lexer.current_kind() == kind
  }

  fn cur_precedence(&self) -> i32 {
    let token = self.cur_token();
    match token.kind {
      T::Punct(_) | T::Shl | T::Shr => self.table.get(token.lexeme(self.lexer.strings())),
      T::Ident | T::IntLit | T::Eof | T::Error => NOT_AN_OPERATOR,
    }
  }

  fn advance(&mut self) -> Token {
    let token = self.cur_token();
    self.lexer.advance();
    token
  }

  fn consume_expecting(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
    if self.cur_token_is(kind) {
      Ok(self.advance())
    } else {
      Err(self.unexpected(|found, loc| E::ExpectedToken { expected: kind, found, loc }))
    }
  }

  fn consume_ident(
    &mut self,
    make_err: impl FnOnce(String, SrcLoc) -> ParseError,
  ) -> Result<Token, ParseError> {
    if self.cur_token_is(T::Ident) {
      Ok(self.advance())
    } else {
      Err(self.unexpected(make_err))
    }
  }

  /// A lexical error right behind a complete construct fails the construct,
  /// the caller would otherwise never hear of it.
  fn pending_lex_error(&mut self) -> Option<ParseError> {
    if !self.cur_token_is(T::Error) {
      return None;
    }
    self.lexer.take_error().map(E::Lex)
  }

  /// Error for the current token, unless the lexer already failed there.
  fn unexpected(&mut self, make_err: impl FnOnce(String, SrcLoc) -> ParseError) -> ParseError {
    let token = self.cur_token();
    if token.kind == T::Error {
      if let Some(err) = self.lexer.take_error() {
        return E::Lex(err);
      }
    }
    make_err(token.describe(self.lexer.strings()), token.loc)
  }
}

#[cfg(test)]
static INIT: std::sync::Once = std::sync::Once::new();

#[cfg(test)]
pub(crate) fn configure_test_tracing() {
  use tracing_subscriber::fmt::format::FmtSpan;
  use tracing_subscriber::{EnvFilter, fmt};
  INIT.call_once(|| {
    let subscriber = fmt::Subscriber::builder()
      .with_env_filter(EnvFilter::from_default_env())
      .with_test_writer()
      .with_span_events(FmtSpan::ACTIVE)
      .finish();
    tracing::subscriber::set_global_default(subscriber)
      .expect("setting default tracing subscriber failed");
  });
}
