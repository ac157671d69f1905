use std::io::Read;

use super::*;

impl<R: Read> Parser<'_, R> {
  #[instrument(skip_all)]
  pub(super) fn parse_expression(&mut self) -> Result<idx::Expr, ParseError> {
    let lhs = self.parse_primary()?;
    self.parse_bin_op_rhs(0, lhs)
  }

  #[instrument(skip_all)]
  fn parse_primary(&mut self) -> Result<idx::Expr, ParseError> {
    match self.cur_token().kind {
      T::IntLit => self.parse_int_lit(),
      T::Ident => self.parse_ident(),
      T::Punct(b'(') => self.nested(Self::parse_paren),
      _ => Err(self.unexpected(|found, loc| E::ExpectedExpression { found, loc })),
    }
  }

  /// Precedence climbing: folds `op primary` pairs into `lhs` for as long
  /// as the operator binds at least as tight as `min_prec`. A tighter
  /// operator after the right operand makes the right operand absorb it.
  #[instrument(skip_all, fields(min_prec = min_prec))]
  fn parse_bin_op_rhs(&mut self, min_prec: i32, mut lhs: idx::Expr) -> Result<idx::Expr, ParseError> {
    loop {
      let prec = self.cur_precedence();
      if prec < min_prec {
        return Ok(lhs);
      }
      let op = self.advance();
      let mut rhs = self.parse_primary()?;
      if self.cur_precedence() > prec {
        rhs = self.nested(|parser| parser.parse_bin_op_rhs(prec + 1, rhs))?;
      }
      let left = self.ast.expr(lhs);
      let (ty, loc) = (left.ty, left.loc.to(self.ast.expr(rhs).loc));
      lhs = self.ast.push_expr(ExprNode::binary(op.lexeme, lhs, rhs, ty, loc));
    }
  }

  #[instrument(skip_all)]
  fn parse_int_lit(&mut self) -> Result<idx::Expr, ParseError> {
    let token = self.advance();
    let lexeme = token.lexeme(self.lexer.strings());
    let Ok(value) = lexeme.parse::<i64>() else {
      return Err(E::InvalidIntLit {
        lexeme: lexeme.to_string(),
        loc: token.loc,
      });
    };
    Ok(self.ast.push_expr(ExprNode::int_lit(value, token.loc)))
  }

  #[instrument(skip_all)]
  fn parse_ident(&mut self) -> Result<idx::Expr, ParseError> {
    let name = self.advance();
    if self.cur_token_is(T::Punct(b'(')) {
      self.nested(|parser| parser.parse_call(name))
    } else {
      Ok(self.ast.push_expr(ExprNode::variable(name.lexeme, name.loc)))
    }
  }

  #[instrument(skip_all)]
  fn parse_call(&mut self, callee: Token) -> Result<idx::Expr, ParseError> {
    self.advance(); // `(`
    let mut args = Vec::new();
    if !self.cur_token_is(T::Punct(b')')) {
      loop {
        args.push(self.parse_expression()?);
        if self.cur_token_is(T::Punct(b')')) {
          break;
        }
        self.consume_expecting(T::Punct(b','))?;
      }
    }
    let close = self.advance(); // `)`
    let args = self.ast.push_list(&args);
    let loc = callee.loc.to(close.loc);
    Ok(self.ast.push_expr(ExprNode::call(callee.lexeme, args, loc)))
  }

  #[instrument(skip_all)]
  fn parse_paren(&mut self) -> Result<idx::Expr, ParseError> {
    self.advance(); // `(`
    let expr = self.parse_expression()?;
    self.consume_expecting(T::Punct(b')'))?;
    Ok(expr)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn sexp(src: &str) -> String {
    configure_test_tracing();
    let table = PrecedenceTable::standard();
    let mut parser = Parser::new_str(src, &table);
    let expr = parser.expression().unwrap();
    assert!(parser.is_done(), "trailing input after `{src}`");
    parser.ast().sexp(expr, parser.strings())
  }

  fn parse_err(src: &str) -> ParseError {
    let table = PrecedenceTable::standard();
    let mut parser = Parser::new_str(src, &table);
    let err = parser.expression().unwrap_err();
    assert_eq!(parser.ast().num_exprs(), 0, "partial tree left behind");
    err
  }

  #[test]
  fn tighter_operator_nests_on_the_right() {
    let table = PrecedenceTable::standard();
    let mut parser = Parser::new_str("a + b * c", &table);
    let root = parser.expression().unwrap();
    let (ast, strs) = (parser.ast(), parser.strings());
    let name = |index: idx::Expr| match ast.expr(index).expr {
      Expr::Variable(name) => strs.get(name).to_string(),
      expr => panic!("expected variable, got {expr:?}"),
    };
    let Expr::Binary { op, lhs, rhs } = ast.expr(root).expr else {
      panic!("expected binary expression");
    };
    assert_eq!(strs.get(op), "+");
    assert_eq!(name(lhs), "a");
    let Expr::Binary { op, lhs, rhs } = ast.expr(rhs).expr else {
      panic!("expected nested binary expression");
    };
    assert_eq!(strs.get(op), "*");
    assert_eq!((name(lhs), name(rhs)), ("b".to_string(), "c".to_string()));
  }

  #[test]
  fn binary_operator_grouping() {
    let cases: &[(&str, &str)] = &[
      ("a + b * c", "(+ a (* b c))"),
      ("a * b + c", "(+ (* a b) c)"),
      ("a - b - c", "(- (- a b) c)"),
      ("a / b / c", "(/ (/ a b) c)"),
      ("(a+b)*c", "(* (+ a b) c)"),
      ("a + b * c - d", "(- (+ a (* b c)) d)"),
      ("a < b << 2 + 1", "(< a (+ (<< b 2) 1))"),
      ("x >> 1 > y", "(> (>> x 1) y)"),
      ("a ~ b * c", "(* (~ a b) c)"),
      ("a * b ~ c", "(* a (~ b c))"),
      ("((a))", "a"),
      ("42", "42"),
    ];
    for (src, expected) in cases {
      assert_eq!(sexp(src), *expected, "parsing `{src}`");
    }
  }

  #[test]
  fn calls_keep_argument_order() {
    assert_eq!(sexp("f(a, b+1)"), "(call f a (+ b 1))");
    assert_eq!(sexp("f()"), "(call f)");
    assert_eq!(sexp("f(g(x), (y), 3) * 2"), "(* (call f (call g x) y 3) 2)");
  }

  #[test]
  fn node_types() {
    let table = PrecedenceTable::standard();
    let mut parser = Parser::new_str("1 + a", &table);
    let root = parser.expression().unwrap();
    let ast = parser.ast();
    let node = ast.expr(root);
    assert_eq!(node.ty, DataType::Int);
    assert_eq!((node.loc.col, node.loc.len), (1, 5));
    let Expr::Binary { lhs, rhs, .. } = node.expr else {
      panic!("expected binary expression");
    };
    assert_eq!(ast.expr(lhs).expr, Expr::IntLit(1));
    assert_eq!(ast.expr(rhs).ty, DataType::Unassigned);

    let mut parser = Parser::new_str("f(1)", &table);
    let call = parser.expression().unwrap();
    assert_eq!(parser.ast().expr(call).ty, DataType::Unassigned);
  }

  #[test]
  fn expression_stops_at_foreign_tokens() {
    let table = PrecedenceTable::standard();
    let mut parser = Parser::new_str("a + b ; c", &table);
    let expr = parser.expression().unwrap();
    assert_eq!(parser.ast().sexp(expr, parser.strings()), "(+ a b)");
    assert!(!parser.is_done());
  }

  #[test]
  fn malformed_expressions() {
    assert!(matches!(
      parse_err("f(a,"),
      ParseError::ExpectedExpression { ref found, .. } if found == "end of input"
    ));
    assert!(matches!(
      parse_err("f(a b)"),
      ParseError::ExpectedToken { expected: T::Punct(b','), .. }
    ));
    assert!(matches!(
      parse_err("(a + b"),
      ParseError::ExpectedToken { expected: T::Punct(b')'), .. }
    ));
    assert!(matches!(parse_err("a +"), ParseError::ExpectedExpression { .. }));
    assert!(matches!(parse_err("~a"), ParseError::ExpectedExpression { .. }));
    assert!(matches!(parse_err(")"), ParseError::ExpectedExpression { .. }));
    assert!(matches!(
      parse_err("99999999999999999999"),
      ParseError::InvalidIntLit { .. }
    ));
  }

  #[test]
  fn lexical_error_after_complete_expression() {
    let table = PrecedenceTable::standard();
    let mut parser = Parser::new_str("a + b /* never closed", &table);
    let err = parser.expression().unwrap_err();
    assert!(matches!(err, ParseError::Lex(LexError::UnterminatedComment { .. })));
    assert_eq!(err.diagnostic().to_string(), "1:7: unterminated block comment");
    assert!(parser.ast().is_empty());

    let err = parse_err("f(x) * 2 \u{e9}");
    assert!(matches!(err, ParseError::Lex(LexError::UnexpectedByte { byte: 0xc3, .. })));
  }

  #[test]
  fn error_positions() {
    let err = parse_err("f(a,\n  b c)");
    assert_eq!(err.diagnostic().to_string(), "2:5: expected `,`, found `c`");
    assert_eq!(err.diagnostic().width, 1);
  }

  #[test]
  fn nesting_is_bounded() {
    let table = PrecedenceTable::standard();
    let options = ParseOptions::default().with_max_depth(4);
    let parse = |src: &str| {
      let mut parser = Parser::with_options(Lexer::new_str(src), &table, options);
      parser.expression().map(|_| ())
    };
    assert!(parse("((((a))))").is_ok());
    assert!(matches!(parse("(((((a)))))"), Err(ParseError::TooDeep { max_depth: 4, .. })));
    assert!(parse("f(g(h(i(x))))").is_ok());
    assert!(matches!(parse("f(g(h(i(j(x)))))"), Err(ParseError::TooDeep { .. })));

    let deep = format!("{}a{}", "(".repeat(1000), ")".repeat(1000));
    let mut parser = Parser::new_str(&deep, &table);
    assert!(matches!(
      parser.expression(),
      Err(ParseError::TooDeep { max_depth: DEFAULT_MAX_DEPTH, .. })
    ));
  }

  #[test]
  fn custom_precedence_table() {
    let table = PrecedenceTable::from_entries([("+", 30), ("*", 10), ("%", 20)]).unwrap();
    let mut parser = Parser::new_str("a + b * c % d", &table);
    let expr = parser.expression().unwrap();
    assert_eq!(parser.ast().sexp(expr, parser.strings()), "(* (+ a b) (% c d))");
  }
}
