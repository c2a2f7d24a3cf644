//! World session: owns the one tile grid the game is running on.
//!
//! # Invariants
//! - Exactly one path populates a session: generation or ingestion.
//! - Replacing the world drops the old grid; nothing keeps a reference to it.
//! - A failed load or regeneration leaves the current world untouched.

mod session;

pub use session::{WorldError, WorldSession, WorldSource};

pub fn crate_info() -> &'static str {
    "tilescape-world v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("world"));
    }
}
