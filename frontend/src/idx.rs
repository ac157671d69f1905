macro_rules! index_impl_for {
  ($type:ty) => {
    impl $type {
      pub const fn new(idx: u32) -> Self {
        Self(idx)
      }

      pub const fn u32(&self) -> u32 {
        self.0
      }

      pub const fn usize(&self) -> usize {
        self.0 as usize
      }
    }
    impl std::fmt::Debug for $type {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "idx::{}({})", stringify!($type), self.0)
      }
    }
  };
}

#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct StrPool(u32);
index_impl_for!(StrPool);

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Expr(u32);
index_impl_for!(Expr);

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Proto(u32);
index_impl_for!(Proto);

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Block(u32);
index_impl_for!(Block);

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Function(u32);
index_impl_for!(Function);
