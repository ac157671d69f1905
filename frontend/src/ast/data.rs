use super::*;

/// Arena holding every node of a parse. Children are always pushed before
/// their parents and each child index is owned by exactly one parent, so the
/// tree can be read back but never rewired.
#[derive(Debug, Default)]
pub struct AstData {
  exprs: Vec<ExprNode>,
  lists: Vec<idx::Expr>,
  protos: Vec<Prototype>,
  blocks: Vec<Block>,
  functions: Vec<Function>,
}

/// Arena sizes at some point of the parse, see `AstData::rollback`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
  exprs: usize,
  lists: usize,
  protos: usize,
  blocks: usize,
  functions: usize,
}

impl AstData {
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      exprs: Vec::with_capacity(capacity),
      lists: Vec::with_capacity(capacity),
      protos: Vec::new(),
      blocks: Vec::new(),
      functions: Vec::new(),
    }
  }

  pub(crate) fn push_expr(&mut self, node: ExprNode) -> idx::Expr {
    let index = idx::Expr::new(self.exprs.len() as u32);
    self.exprs.push(node);
    index
  }

  pub(crate) fn push_list(&mut self, items: &[idx::Expr]) -> ExprList {
    let list = ExprList {
      start: self.lists.len() as u32,
      len: items.len() as u32,
    };
    self.lists.extend_from_slice(items);
    list
  }

  pub(crate) fn push_proto(&mut self, proto: Prototype) -> idx::Proto {
    let index = idx::Proto::new(self.protos.len() as u32);
    self.protos.push(proto);
    index
  }

  pub(crate) fn push_block(&mut self, block: Block) -> idx::Block {
    let index = idx::Block::new(self.blocks.len() as u32);
    self.blocks.push(block);
    index
  }

  pub(crate) fn push_function(&mut self, function: Function) -> idx::Function {
    let index = idx::Function::new(self.functions.len() as u32);
    self.functions.push(function);
    index
  }

  pub fn expr(&self, index: idx::Expr) -> &ExprNode {
    &self.exprs[index.usize()]
  }

  pub fn list(&self, list: ExprList) -> &[idx::Expr] {
    let start = list.start as usize;
    &self.lists[start..start + list.len()]
  }

  pub fn proto(&self, index: idx::Proto) -> &Prototype {
    &self.protos[index.usize()]
  }

  pub fn block(&self, index: idx::Block) -> &Block {
    &self.blocks[index.usize()]
  }

  pub fn function(&self, index: idx::Function) -> &Function {
    &self.functions[index.usize()]
  }

  pub fn num_exprs(&self) -> usize {
    self.exprs.len()
  }

  pub fn num_functions(&self) -> usize {
    self.functions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.exprs.is_empty() && self.protos.is_empty()
  }

  pub fn mark(&self) -> Mark {
    Mark {
      exprs: self.exprs.len(),
      lists: self.lists.len(),
      protos: self.protos.len(),
      blocks: self.blocks.len(),
      functions: self.functions.len(),
    }
  }

  /// Drops every node pushed since `mark`.
  pub(crate) fn rollback(&mut self, mark: Mark) {
    self.exprs.truncate(mark.exprs);
    self.lists.truncate(mark.lists);
    self.protos.truncate(mark.protos);
    self.blocks.truncate(mark.blocks);
    self.functions.truncate(mark.functions);
  }

  /// Renders an expression as an s-expression: `(+ a (* b 2))`,
  /// `(call f a b)`.
  pub fn sexp(&self, index: idx::Expr, strs: &StringPool) -> String {
    let mut out = String::new();
    self.write_sexp(index, strs, &mut out);
    out
  }

  // Left-associative chains grow as deep as the source is long, so this
  // walks an explicit stack instead of recursing.
  fn write_sexp(&self, root: idx::Expr, strs: &StringPool, out: &mut String) {
    use std::fmt::Write;
    let mut stack = vec![Sexp::Expr(root)];
    while let Some(frame) = stack.pop() {
      let index = match frame {
        Sexp::Expr(index) => index,
        Sexp::Text(text) => {
          out.push_str(text);
          continue;
        }
      };
      match self.expr(index).expr {
        Expr::IntLit(value) => _ = write!(out, "{value}"),
        Expr::FloatLit(value) => _ = write!(out, "{value:?}"),
        Expr::CharLit(value) => _ = write!(out, "'{}'", value.escape_ascii()),
        Expr::Variable(name) => out.push_str(strs.get(name)),
        Expr::Call { callee, args } => {
          _ = write!(out, "(call {}", strs.get(callee));
          stack.push(Sexp::Text(")"));
          for arg in self.list(args).iter().rev() {
            stack.push(Sexp::Expr(*arg));
            stack.push(Sexp::Text(" "));
          }
        }
        Expr::Binary { op, lhs, rhs } => {
          _ = write!(out, "({} ", strs.get(op));
          stack.extend([Sexp::Text(")"), Sexp::Expr(rhs), Sexp::Text(" "), Sexp::Expr(lhs)]);
        }
      }
    }
  }

  /// `int add(int a, int b)`
  pub fn prototype_sig(&self, index: idx::Proto, strs: &StringPool) -> String {
    let proto = self.proto(index);
    let params = proto
      .params
      .iter()
      .map(|param| format!("{} {}", param.ty().name(), strs.get(param.name_idx())))
      .collect::<Vec<_>>()
      .join(", ");
    format!("{} {}({params})", proto.return_type.name(), strs.get(proto.name))
  }

  /// `{ (+ a b); (call f) }`
  pub fn block_sexp(&self, index: idx::Block, strs: &StringPool) -> String {
    let exprs = self.list(self.block(index).exprs);
    if exprs.is_empty() {
      return "{}".to_string();
    }
    let body = exprs
      .iter()
      .map(|expr| self.sexp(*expr, strs))
      .collect::<Vec<_>>()
      .join("; ");
    format!("{{ {body} }}")
  }

  pub fn function_sexp(&self, index: idx::Function, strs: &StringPool) -> String {
    let function = self.function(index);
    format!(
      "{} {}",
      self.prototype_sig(function.proto, strs),
      self.block_sexp(function.body, strs)
    )
  }
}

enum Sexp {
  Expr(idx::Expr),
  Text(&'static str),
}
