//! Strongly-typed identifiers used across the cursor stack.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! new_id {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
            /// The id following this one.
            pub const fn next(self) -> Self {
                Self(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

new_id!(CursorId);
new_id!(RequestId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_and_advance() {
        let id = RequestId::new(7);
        assert_eq!(id.next().get(), 8);
        assert_eq!(CursorId::new(3).to_string(), "CursorId(3)");
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
