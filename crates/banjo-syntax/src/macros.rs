//! A tiny hand-rolled bitset, matching the teacher's habit of small bitset
//! newtypes over a primitive rather than pulling in the `bitflags` crate
//! (see SPEC_FULL.md §3.1 — no example repo in the pack depends on it).
//! Used for `ast::ty::Qualifiers` and `ast::decl::Specifiers`.

macro_rules! bitflags_like {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $repr:ty {
            $(const $flag:ident = $value:expr;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name($repr);

        impl $name {
            $(pub const $flag: $name = $name($value);)*

            pub const fn empty() -> Self {
                $name(0)
            }

            pub const fn contains(self, other: Self) -> bool {
                (self.0 & other.0) == other.0
            }

            pub const fn union(self, other: Self) -> Self {
                $name(self.0 | other.0)
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                self.union(rhs)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                *self = self.union(rhs);
            }
        }
    };
}

pub(crate) use bitflags_like;
