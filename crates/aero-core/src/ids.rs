use core::fmt;
use core::num::NonZeroU64;

macro_rules! sequence_id {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU64);

        impl $name {
            pub const FIRST: Self = Self(NonZeroU64::MIN);

            /// The id issued after `prev`, or [`Self::FIRST`] when nothing was issued yet.
            pub fn after(prev: Option<Self>) -> Self {
                match prev {
                    Some(prev) => prev.next(),
                    None => Self::FIRST,
                }
            }

            /// The id `offset` places after [`Self::FIRST`].
            pub fn nth(offset: u64) -> Self {
                Self(NonZeroU64::MIN.saturating_add(offset))
            }

            pub fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }

            pub fn get(self) -> u64 {
                self.0.get()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "{}"), self.0)
            }
        }
    };
}

sequence_id!(
    /// Monotonically increasing identifier of a simulation attempt.
    ///
    /// Ordering follows issue order, so "a newer run started" is `latest > mine`.
    RunToken,
    "run#"
);

sequence_id!(
    /// Identifier of an ephemeral display handle.
    HandleId,
    "handle#"
);
