pub mod ast;
pub mod context;
pub mod diag;
pub mod idx;
pub mod lexer;
pub mod parser;
pub mod precedence;
pub mod src_loc;
pub mod str_pool;
pub mod token;

pub use ast::{AstData, DataType, Expr, ExprNode, Item};
pub use context::Context;
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, ParseOptions, Parser};
pub use precedence::PrecedenceTable;

pub mod internal {
  pub use crate::ast::*;
  pub use crate::context::*;
  pub use crate::diag::*;
  pub use crate::idx;
  pub use crate::lexer::*;
  pub use crate::parser::*;
  pub use crate::precedence::*;
  pub use crate::src_loc::*;
  pub use crate::str_pool::*;
  pub use crate::token::*;
  pub use bilge::prelude::*;
  pub use tracing::{debug, instrument, trace};
}
