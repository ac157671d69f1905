use crate::internal::*;

/// Everything a whole-program parse produces, handed on to later stages.
#[derive(Debug)]
pub struct Context {
  pub strs: StringPool,
  pub ast: AstData,
  pub items: Vec<Item>,
}

impl Context {
  pub fn new(strs: StringPool, ast: AstData) -> Self {
    Context { strs, ast, items: Vec::new() }
  }

  pub fn name(&self, index: idx::StrPool) -> &str {
    self.strs.get(index)
  }

  pub fn functions(&self) -> impl Iterator<Item = &Function> {
    self.items.iter().filter_map(|item| match item {
      Item::Function(index) => Some(self.ast.function(*index)),
      Item::Declaration(_) => None,
    })
  }

  pub fn function_named(&self, name: &str) -> Option<&Function> {
    let name = self.strs.find(name)?;
    self
      .functions()
      .find(|function| self.ast.proto(function.proto).name == name)
  }

  /// Prototypes of every item, declarations and definitions alike, in
  /// source order.
  pub fn prototypes(&self) -> impl Iterator<Item = &Prototype> {
    self.items.iter().map(|item| match item {
      Item::Function(index) => self.ast.proto(self.ast.function(*index).proto),
      Item::Declaration(index) => self.ast.proto(*index),
    })
  }

  /// One line per item, see `AstData::function_sexp`.
  pub fn dump(&self) -> String {
    self
      .items
      .iter()
      .map(|item| match item {
        Item::Function(index) => self.ast.function_sexp(*index, &self.strs),
        Item::Declaration(index) => format!("{};", self.ast.prototype_sig(*index, &self.strs)),
      })
      .collect::<Vec<_>>()
      .join("\n")
  }
}
