use core::fmt;
use core::num::NonZeroU32;

// Each id stores index+1 so `Option<_>` needs no extra space. Ids of
// different kinds are distinct types and cannot be swapped by accident.
macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            pub fn from_index(index: u32) -> Self {
                Self(NonZeroU32::MIN.saturating_add(index))
            }

            pub fn index(self) -> u32 {
                self.0.get() - 1
            }

            /// Position in a dense table keyed by this id.
            #[inline]
            pub fn slot(self) -> usize {
                self.index() as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.index())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.index())
            }
        }
    };
}

define_id!(
    /// A node in the arena.
    NodeId,
    "n"
);
define_id!(
    /// A component registered with a system.
    CompId,
    "c"
);
define_id!(
    /// A recorded trace, handed out in registration order.
    ProbeId,
    "p"
);
