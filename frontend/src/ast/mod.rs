mod data;
pub use data::{AstData, Mark};

use crate::internal::*;

#[bitsize(2)]
#[derive(FromBits, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
  Unassigned,
  Int,
  Float,
  Char,
}

impl DataType {
  /// Unknown type names stay `Unassigned`, resolution happens later.
  pub fn from_name(name: &str) -> Self {
    match name {
      "int" => DataType::Int,
      "float" => DataType::Float,
      "char" => DataType::Char,
      _ => DataType::Unassigned,
    }
  }

  pub const fn name(&self) -> &'static str {
    match self {
      DataType::Unassigned => "?",
      DataType::Int => "int",
      DataType::Float => "float",
      DataType::Char => "char",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr {
  IntLit(i64),
  FloatLit(f64),
  CharLit(u8),
  Variable(idx::StrPool),
  Call { callee: idx::StrPool, args: ExprList },
  Binary { op: idx::StrPool, lhs: idx::Expr, rhs: idx::Expr },
}

/// A window into `AstData`'s child table: call arguments or block bodies,
/// in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExprList {
  pub start: u32,
  pub len: u32,
}

impl ExprList {
  pub const fn len(&self) -> usize {
    self.len as usize
  }

  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprNode {
  pub expr: Expr,
  pub ty: DataType,
  pub loc: SrcLoc,
}

impl ExprNode {
  pub const fn int_lit(value: i64, loc: SrcLoc) -> Self {
    ExprNode { expr: Expr::IntLit(value), ty: DataType::Int, loc }
  }

  pub const fn float_lit(value: f64, loc: SrcLoc) -> Self {
    ExprNode { expr: Expr::FloatLit(value), ty: DataType::Float, loc }
  }

  pub const fn char_lit(value: u8, loc: SrcLoc) -> Self {
    ExprNode { expr: Expr::CharLit(value), ty: DataType::Char, loc }
  }

  pub const fn variable(name: idx::StrPool, loc: SrcLoc) -> Self {
    ExprNode {
      expr: Expr::Variable(name),
      ty: DataType::Unassigned,
      loc,
    }
  }

  pub const fn call(callee: idx::StrPool, args: ExprList, loc: SrcLoc) -> Self {
    ExprNode {
      expr: Expr::Call { callee, args },
      ty: DataType::Unassigned,
      loc,
    }
  }

  /// `ty` is a placeholder taken from the left operand.
  pub const fn binary(op: idx::StrPool, lhs: idx::Expr, rhs: idx::Expr, ty: DataType, loc: SrcLoc) -> Self {
    ExprNode { expr: Expr::Binary { op, lhs, rhs }, ty, loc }
  }
}

#[bitsize(32)]
#[derive(FromBits, DebugBits, Clone, Copy, PartialEq, Eq)]
pub struct Param {
  pub ty: DataType,
  pub name: u30,
}

impl Param {
  pub fn of(ty: DataType, name: idx::StrPool) -> Self {
    assert!(name.u32() < 1 << 30, "string pool index {} does not fit a param", name.u32());
    Param::new(ty, u30::new(name.u32()))
  }

  pub fn name_idx(&self) -> idx::StrPool {
    idx::StrPool::new(self.name().value())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
  pub return_type: DataType,
  pub name: idx::StrPool,
  pub params: Vec<Param>,
  pub loc: SrcLoc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
  pub exprs: ExprList,
  pub loc: SrcLoc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Function {
  pub proto: idx::Proto,
  pub body: idx::Block,
}

/// A top-level unit of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
  Function(idx::Function),
  /// A prototype terminated by `;` instead of a body.
  Declaration(idx::Proto),
}

#[test]
fn sizes() {
  assert!(std::mem::size_of::<Param>() <= 4);
  assert!(std::mem::size_of::<DataType>() <= 1);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn type_names() {
    assert_eq!(DataType::from_name("int"), DataType::Int);
    assert_eq!(DataType::from_name("float"), DataType::Float);
    assert_eq!(DataType::from_name("char"), DataType::Char);
    assert_eq!(DataType::from_name("Int"), DataType::Unassigned);
    assert_eq!(DataType::from_name("void"), DataType::Unassigned);
    assert_eq!(DataType::Char.name(), "char");
  }

  #[test]
  fn packed_params() {
    let param = Param::of(DataType::Float, idx::StrPool::new(12));
    assert_eq!(param.ty(), DataType::Float);
    assert_eq!(param.name_idx(), idx::StrPool::new(12));

    let widest = idx::StrPool::new((1 << 30) - 1);
    assert_eq!(Param::of(DataType::Int, widest).name_idx(), widest);
  }

  #[test]
  #[should_panic(expected = "does not fit a param")]
  fn param_name_index_overflow() {
    Param::of(DataType::Int, idx::StrPool::new(1 << 30));
  }

  #[test]
  fn literal_nodes_are_typed() {
    let loc = SrcLoc::default();
    assert_eq!(ExprNode::int_lit(3, loc).ty, DataType::Int);
    assert_eq!(ExprNode::float_lit(1.5, loc).ty, DataType::Float);
    assert_eq!(ExprNode::char_lit(b'x', loc).ty, DataType::Char);
    assert_eq!(ExprNode::variable(idx::StrPool::new(1), loc).ty, DataType::Unassigned);
  }
}
