//! Dependency arrays: the change-detection keys for effects and memos.
//!
//! A [`Dep`] is an opaque comparison key. Primitives compare by value,
//! reference-counted values compare by identity (allocation address) — the
//! same rule React applies to dependency arrays. Two arrays are equal iff
//! they have the same length and every positional pair is equal.

use std::rc::Rc;

// ---------------------------------------------------------------------------
// Dep
// ---------------------------------------------------------------------------

/// A single dependency-array entry.
///
/// Floats are compared by bit pattern so `Dep` can implement `Eq` (NaN keeps
/// an effect stable rather than re-running it every render).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dep {
    Unit,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Bits(u64),
    Char(char),
    Str(String),
    /// Identity of a reference-counted value: its allocation address.
    Id(usize),
}

impl Dep {
    /// Identity key for an `Rc`-backed value.
    ///
    /// Two clones of the same `Rc` produce equal deps; a different allocation
    /// with equal contents produces an unequal dep.
    pub fn identity<T: ?Sized>(value: &Rc<T>) -> Dep {
        Dep::Id(Rc::as_ptr(value).cast::<()>() as usize)
    }
}

impl From<()> for Dep {
    fn from(_: ()) -> Self {
        Dep::Unit
    }
}

impl From<bool> for Dep {
    fn from(v: bool) -> Self {
        Dep::Bool(v)
    }
}

macro_rules! dep_from_int {
    ($($t:ty),+) => {
        $(impl From<$t> for Dep {
            fn from(v: $t) -> Self {
                Dep::Int(v as i64)
            }
        })+
    };
}

macro_rules! dep_from_uint {
    ($($t:ty),+) => {
        $(impl From<$t> for Dep {
            fn from(v: $t) -> Self {
                Dep::Uint(v as u64)
            }
        })+
    };
}

dep_from_int!(i8, i16, i32, i64, isize);
dep_from_uint!(u8, u16, u32, u64, usize);

impl From<f32> for Dep {
    fn from(v: f32) -> Self {
        Dep::Bits((v as f64).to_bits())
    }
}

impl From<f64> for Dep {
    fn from(v: f64) -> Self {
        Dep::Bits(v.to_bits())
    }
}

impl From<char> for Dep {
    fn from(v: char) -> Self {
        Dep::Char(v)
    }
}

impl From<&str> for Dep {
    fn from(v: &str) -> Self {
        Dep::Str(v.to_owned())
    }
}

impl From<String> for Dep {
    fn from(v: String) -> Self {
        Dep::Str(v)
    }
}

// ---------------------------------------------------------------------------
// Array equality
// ---------------------------------------------------------------------------

/// Positional dependency-array equality.
///
/// Same length and every pair equal. A length change, reorder, or any element
/// inequality means "changed" and gates an effect/memo re-run.
pub fn deps_equal(previous: &[Dep], current: &[Dep]) -> bool {
    previous.len() == current.len()
        && previous.iter().zip(current.iter()).all(|(a, b)| a == b)
}

/// Build a `Vec<Dep>` from values convertible into [`Dep`].
///
/// ```ignore
/// use weft_tui::deps;
///
/// let d = deps![count, active, "label"];
/// ```
#[macro_export]
macro_rules! deps {
    () => { ::std::vec::Vec::<$crate::hooks::Dep>::new() };
    ($($d:expr),+ $(,)?) => {
        vec![$($crate::hooks::Dep::from($d)),+]
    };
}

// ===========================================================================
// Tests
// ===========================================================================
