use std::io::Read;

use super::*;

impl<R: Read> Parser<'_, R> {
  /// `type name ( [type name {, type name}] )`
  #[instrument(skip_all)]
  pub(super) fn parse_prototype(&mut self) -> Result<idx::Proto, ParseError> {
    let ret = self.consume_ident(|found, loc| E::ExpectedTypeName { found, loc })?;
    let name = self.consume_ident(|found, loc| E::ExpectedFunctionName { found, loc })?;
    self.consume_expecting(T::Punct(b'('))?;
    let mut params = Vec::new();
    if !self.cur_token_is(T::Punct(b')')) {
      loop {
        params.push(self.parse_param()?);
        if self.cur_token_is(T::Punct(b')')) {
          break;
        }
        self.consume_expecting(T::Punct(b','))?;
      }
    }
    let close = self.advance(); // `)`
    let proto = Prototype {
      return_type: DataType::from_name(ret.lexeme(self.lexer.strings())),
      name: name.lexeme,
      params,
      loc: ret.loc.to(close.loc),
    };
    trace!(name = name.lexeme(self.lexer.strings()), params = proto.params.len(), "prototype");
    Ok(self.ast.push_proto(proto))
  }

  fn parse_param(&mut self) -> Result<Param, ParseError> {
    let ty = self.consume_ident(|found, loc| E::ExpectedTypeName { found, loc })?;
    let name = self.consume_ident(|found, loc| E::ExpectedParamName { found, loc })?;
    let ty = DataType::from_name(ty.lexeme(self.lexer.strings()));
    Ok(Param::of(ty, name.lexeme))
  }

  /// `{` then expressions, each ended by `;` (optional before `}`), then `}`
  #[instrument(skip_all)]
  pub(super) fn parse_block(&mut self) -> Result<idx::Block, ParseError> {
    let open = self.consume_expecting(T::Punct(b'{'))?;
    let mut exprs = Vec::new();
    while !self.cur_token_is(T::Punct(b'}')) {
      if self.cur_token().kind.is_terminal() {
        return Err(self.unexpected(|found, loc| E::ExpectedToken {
          expected: T::Punct(b'}'),
          found,
          loc,
        }));
      }
      exprs.push(self.parse_expression()?);
      if self.cur_token_is(T::Punct(b';')) {
        self.advance();
      } else if !self.cur_token_is(T::Punct(b'}')) {
        return Err(self.unexpected(|found, loc| E::ExpectedToken {
          expected: T::Punct(b';'),
          found,
          loc,
        }));
      }
    }
    let close = self.advance(); // `}`
    let exprs = self.ast.push_list(&exprs);
    Ok(self.ast.push_block(Block { exprs, loc: open.loc.to(close.loc) }))
  }

  #[instrument(skip_all)]
  pub(super) fn parse_function(&mut self) -> Result<idx::Function, ParseError> {
    let proto = self.parse_prototype()?;
    let body = self.parse_block()?;
    Ok(self.ast.push_function(Function { proto, body }))
  }

  #[instrument(skip_all)]
  pub(super) fn parse_item(&mut self) -> Result<Item, ParseError> {
    let proto = self.parse_prototype()?;
    if self.cur_token_is(T::Punct(b';')) {
      self.advance();
      return Ok(Item::Declaration(proto));
    }
    let body = self.parse_block()?;
    Ok(Item::Function(self.ast.push_function(Function { proto, body })))
  }
}
