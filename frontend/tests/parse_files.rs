use std::path::PathBuf;
use std::sync::Once;

use frontend::internal::*;
use pretty_assertions::assert_eq;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

fn fixture(name: &str) -> PathBuf {
  INIT.call_once(|| {
    tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::from_default_env())
      .with_test_writer()
      .init();
  });
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

#[test]
fn parse_fixture_program() {
  let table = PrecedenceTable::standard();
  let ctx = Parser::open(fixture("arith.c"), &table)
    .unwrap()
    .program()
    .unwrap();
  assert_eq!(
    ctx.dump(),
    [
      "int square(int x);",
      "int scaledsum(int a, int b, int k) { (* (+ a b) k) }",
      "int mix(int a, int b) { \
       (- (- (call square a) (call square b)) 1); \
       (+ (<< a 2) (>> b 1)); \
       (< a (+ (* b 2) (/ 3 k))) }",
    ]
    .join("\n")
  );
  let mix = ctx.function_named("mix").unwrap();
  let body = ctx.ast.block(mix.body);
  assert_eq!(body.exprs.len(), 3);
  assert_eq!((body.loc.line, body.loc.col), (12, 23));
}

#[test]
fn fixture_tokens_match_stripped_source() {
  let (with_comments, strs) = Lexer::open(fixture("arith.c")).unwrap().lex().unwrap();
  let stripped = "int square(int x); \
    int scaledsum(int a, int b, int k) { (a + b) * k } \
    int mix(int a, int b) { square(a) - square(b) - 1; a << 2 + b >> 1; a < b * 2 + 3 / k }";
  let (plain, plain_strs) = Lexer::new_str(stripped).lex().unwrap();
  let texts = |tokens: &[Token], strs: &StringPool| {
    tokens
      .iter()
      .map(|token| (token.kind, token.lexeme(strs).to_string()))
      .collect::<Vec<_>>()
  };
  assert_eq!(texts(&with_comments, &strs), texts(&plain, &plain_strs));
}

#[test]
fn unterminated_comment_in_file() {
  let table = PrecedenceTable::standard();
  let mut parser = Parser::open(fixture("unterminated.c"), &table).unwrap();
  // the comment opens right after the first function, which fails with it
  let err = parser.item().unwrap_err();
  assert!(matches!(err, ParseError::Lex(LexError::UnterminatedComment { .. })));
  assert_eq!(err.diagnostic().to_string(), "5:1: unterminated block comment");
  assert!(parser.ast().is_empty());

  let err = Parser::open(fixture("unterminated.c"), &table)
    .unwrap()
    .program()
    .unwrap_err();
  assert!(matches!(err, ParseError::Lex(LexError::UnterminatedComment { .. })));
}
