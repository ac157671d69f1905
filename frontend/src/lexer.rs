use std::fs::File;
use std::io::{self, BufReader, Bytes, Read};
use std::path::{Path, PathBuf};

use crate::internal::{TokenKind as T, *};

#[derive(Debug, thiserror::Error)]
pub enum LexError {
  #[error("cannot open `{}`: {source}", .path.display())]
  Open { path: PathBuf, source: io::Error },
  #[error("failed reading source: {source}")]
  Io { loc: SrcLoc, source: io::Error },
  #[error("unterminated block comment")]
  UnterminatedComment { loc: SrcLoc },
  #[error("unexpected byte 0x{byte:02x}")]
  UnexpectedByte { byte: u8, loc: SrcLoc },
}

impl LexError {
  pub fn loc(&self) -> SrcLoc {
    match self {
      LexError::Open { .. } => SrcLoc::new(0, 1, 1, 0),
      LexError::Io { loc, .. }
      | LexError::UnterminatedComment { loc }
      | LexError::UnexpectedByte { loc, .. } => *loc,
    }
  }

  pub fn diagnostic(&self) -> Diagnostic {
    Diagnostic::new(self.loc(), self.to_string())
  }
}

/// Pulls one token at a time out of a byte stream. Exactly one token is
/// current at any time; the stream is released on end of input, on the
/// first lexical error, on `close()`, or when the lexer is dropped.
pub struct Lexer<R> {
  stream: Option<Stream<R>>,
  strings: StringPool,
  current: Token,
  error: Option<LexError>,
  end: SrcLoc,
}

impl Lexer<File> {
  pub fn open(path: impl AsRef<Path>) -> Result<Self, LexError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LexError::Open {
      path: path.to_path_buf(),
      source,
    })?;
    debug!(path = %path.display(), "opened source file");
    Ok(Lexer::new(file))
  }
}

impl<'a> Lexer<&'a [u8]> {
  pub fn new_str(src: &'a str) -> Self {
    Lexer::new(src.as_bytes())
  }
}

impl<R: Read> Lexer<R> {
  pub fn new(reader: R) -> Self {
    let strings = StringPool::new();
    let start = SrcLoc::new(0, 1, 1, 0);
    let mut lexer = Lexer {
      stream: Some(Stream::new(reader)),
      current: Token::new(T::Eof, start, strings.empty()),
      strings,
      error: None,
      end: start,
    };
    lexer.current = lexer.next_token();
    lexer
  }

  /// Replaces the current token with the next one. Returns `false` when
  /// there is nothing more to read: the stream is closed, or the new token
  /// is `Eof` or `Error`.
  pub fn advance(&mut self) -> bool {
    if self.current.kind == T::Error {
      return false;
    }
    if self.stream.is_none() {
      self.current = Token::new(T::Eof, self.end, self.strings.empty());
      return false;
    }
    self.current = self.next_token();
    !self.current.kind.is_terminal()
  }

  pub const fn current(&self) -> &Token {
    &self.current
  }

  pub const fn current_kind(&self) -> TokenKind {
    self.current.kind
  }

  pub fn lexeme(&self) -> &str {
    self.current.lexeme(&self.strings)
  }

  /// Releases the stream. Only the first call does anything.
  pub fn close(&mut self) -> bool {
    let Some(stream) = self.stream.take() else {
      return false;
    };
    self.end = stream.loc();
    debug!(bytes = self.end.offset, "closed source stream");
    true
  }

  pub const fn is_open(&self) -> bool {
    self.stream.is_some()
  }

  /// The error behind the current `Error` token.
  pub const fn error(&self) -> Option<&LexError> {
    self.error.as_ref()
  }

  /// Hands the error over to the parser that owns this lexer. Kept out of
  /// the public api so `lex()` always sees the error it stopped on.
  pub(crate) fn take_error(&mut self) -> Option<LexError> {
    self.error.take()
  }

  pub const fn strings(&self) -> &StringPool {
    &self.strings
  }

  pub fn into_strings(self) -> StringPool {
    self.strings
  }

  /// Drains the stream, including the trailing `Eof` token. Fails with the
  /// lexical error if the stream stopped on one.
  pub fn lex(mut self) -> Result<(Vec<Token>, StringPool), LexError> {
    let mut tokens = Vec::with_capacity(64);
    while !self.current.kind.is_terminal() {
      tokens.push(self.current);
      self.advance();
    }
    if let Some(err) = self.error.take() {
      return Err(err);
    }
    tokens.push(self.current);
    Ok((tokens, self.strings))
  }

  fn next_token(&mut self) -> Token {
    let Some(stream) = self.stream.as_mut() else {
      return Token::new(T::Eof, self.end, self.strings.empty());
    };
    match stream.scan(&mut self.strings) {
      Ok(token) => {
        trace!(kind = ?token.kind, lexeme = token.lexeme(&self.strings), "token");
        if token.kind == T::Eof {
          self.close();
        }
        token
      }
      Err(err) => {
        debug!(%err, "lexical error");
        let loc = err.loc();
        self.error = Some(err);
        self.close();
        Token::new(T::Error, loc, self.strings.empty())
      }
    }
  }
}

impl<R> std::fmt::Debug for Lexer<R> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Lexer")
      .field("open", &self.stream.is_some())
      .field("current", &self.current)
      .field("error", &self.error)
      .finish()
  }
}

#[derive(Clone, Copy)]
enum CommentState {
  SeekStar,
  SeekSlash,
}

struct Stream<R> {
  bytes: Bytes<BufReader<R>>,
  peeked: Option<u8>,
  offset: u32,
  line: u32,
  col: u32,
}

impl<R: Read> Stream<R> {
  fn new(reader: R) -> Self {
    Stream {
      bytes: BufReader::new(reader).bytes(),
      peeked: None,
      offset: 0,
      line: 1,
      col: 1,
    }
  }

  fn scan(&mut self, strings: &mut StringPool) -> Result<Token, LexError> {
    loop {
      while self.peek()?.is_some_and(|b| b.is_ascii_whitespace()) {
        self.bump()?;
      }
      let start = self.loc();
      let Some(byte) = self.bump()? else {
        return Ok(Token::new(T::Eof, start, strings.empty()));
      };
      let kind = match byte {
        b if b.is_ascii_alphabetic() => {
          return self.word(b, start, T::Ident, u8::is_ascii_alphanumeric, strings);
        }
        b if b.is_ascii_digit() => {
          return self.word(b, start, T::IntLit, u8::is_ascii_digit, strings);
        }
        b'/' if self.peek()? == Some(b'/') => {
          self.skip_line()?;
          continue;
        }
        b'/' if self.peek()? == Some(b'*') => {
          self.bump()?;
          self.skip_block_comment(start)?;
          continue;
        }
        b'<' if self.peek()? == Some(b'<') => {
          self.bump()?;
          T::Shl
        }
        b'>' if self.peek()? == Some(b'>') => {
          self.bump()?;
          T::Shr
        }
        b if b.is_ascii_graphic() => T::Punct(b),
        byte => {
          return Err(LexError::UnexpectedByte { byte, loc: start.with_len(1) });
        }
      };
      let mut buf = [0; 4];
      let text = match kind {
        T::Shl => "<<",
        T::Shr => ">>",
        _ => &*(byte as char).encode_utf8(&mut buf),
      };
      let len = (self.offset - start.offset) as u16;
      return Ok(Token::new(kind, start.with_len(len), strings.intern(text)));
    }
  }

  fn word(
    &mut self,
    first: u8,
    start: SrcLoc,
    kind: TokenKind,
    continues: fn(&u8) -> bool,
    strings: &mut StringPool,
  ) -> Result<Token, LexError> {
    let mut text = String::from(first as char);
    while let Some(byte) = self.peek()?.filter(continues) {
      self.bump()?;
      text.push(byte as char);
    }
    let len = text.len().min(u16::MAX as usize) as u16;
    Ok(Token::new(kind, start.with_len(len), strings.intern(&text)))
  }

  fn skip_line(&mut self) -> Result<(), LexError> {
    while let Some(byte) = self.bump()? {
      if byte == b'\n' {
        break;
      }
    }
    Ok(())
  }

  // `start` points at the opening `/*`, both already consumed
  fn skip_block_comment(&mut self, start: SrcLoc) -> Result<(), LexError> {
    let mut state = CommentState::SeekStar;
    loop {
      let Some(byte) = self.bump()? else {
        return Err(LexError::UnterminatedComment { loc: start.with_len(2) });
      };
      state = match (state, byte) {
        (_, b'*') => CommentState::SeekSlash,
        (CommentState::SeekSlash, b'/') => return Ok(()),
        _ => CommentState::SeekStar,
      };
    }
  }

  fn peek(&mut self) -> Result<Option<u8>, LexError> {
    if self.peeked.is_none() {
      let loc = self.loc();
      self.peeked = self
        .bytes
        .next()
        .transpose()
        .map_err(|source| LexError::Io { loc, source })?;
    }
    Ok(self.peeked)
  }

  fn bump(&mut self) -> Result<Option<u8>, LexError> {
    let byte = self.peek()?;
    if let Some(byte) = byte {
      self.peeked = None;
      self.offset = self.offset.saturating_add(1);
      if byte == b'\n' {
        self.line += 1;
        self.col = 1;
      } else {
        self.col += 1;
      }
    }
    Ok(byte)
  }

  const fn loc(&self) -> SrcLoc {
    SrcLoc::new(self.offset, self.line, self.col, 0)
  }
}
