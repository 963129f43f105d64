//! Typed indices into the program's arenas.
//!
//! Every cross-reference in the program model is one of these `u32`
//! newtypes. Index 0 of the symbol-table arena is the reserved sentinel
//! meaning "no further table", see [`SymbolTableId::SENTINEL`].

use std::fmt;

/// A typed index into an [`Arena`](crate::Arena).
pub trait Idx: Copy + Eq + fmt::Debug {
    fn from_raw(raw: u32) -> Self;

    fn raw(self) -> u32;

    #[inline]
    fn index(self) -> usize {
        self.raw() as usize
    }
}

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Idx for $name {
            #[inline]
            fn from_raw(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

define_index!(
    /// Index into the expression arena.
    ExprId,
    "ExprId"
);
define_index!(
    /// Index into the call-argument list. Each slot holds an [`ExprId`].
    ArgId,
    "ArgId"
);
define_index!(
    /// Index into the global statement list.
    StmtId,
    "StmtId"
);
define_index!(FunctionId, "FunctionId");
define_index!(ParamId, "ParamId");
define_index!(VariableId, "VariableId");
define_index!(EnumTypeId, "EnumTypeId");
define_index!(EnumValueId, "EnumValueId");
define_index!(StructTypeId, "StructTypeId");
define_index!(
    /// Index into the symbol-table arena.
    SymbolTableId,
    "SymbolTableId"
);

impl SymbolTableId {
    /// The table every program allocates first; links pointing here end a chain.
    pub const SENTINEL: SymbolTableId = SymbolTableId(0);

    #[inline]
    pub const fn is_sentinel(self) -> bool {
        self.0 == 0
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    crate::static_assert_size!(super::ExprId, 4);
    crate::static_assert_size!(Option<super::ExprId>, 8);
}
