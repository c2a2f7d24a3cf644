//! Persistence: loading custom world documents from disk, saving generated
//! worlds, and the client settings file.
//!
//! # Invariants
//! - No I/O happens for an identifier that fails the path allow-list.
//! - A loaded document goes through the same checks as any other document.

pub mod path;
pub mod settings;
pub mod store;

pub use path::{PathRejected, validate_world_path, world_path_for};
pub use settings::SettingsFile;
pub use store::{PersistError, WorldStore};

pub fn crate_info() -> &'static str {
    "tilescape-persist v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("persist"));
    }
}
