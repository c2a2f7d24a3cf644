//! Allow-list for world load identifiers.
//!
//! An identifier must match `^(\.\./)?worlds/[a-z0-9-_]+/world\.json$`,
//! ignoring ASCII case. Anything else, including every traversal attempt, is
//! rejected before a path is ever built from it.

const PARENT_PREFIX: &str = "../";
const WORLDS_PREFIX: &str = "worlds/";
const FILE_SUFFIX: &str = "/world.json";

/// The identifier did not match the world path pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("world path {0:?} rejected: expected worlds/<name>/world.json")]
pub struct PathRejected(pub String);

/// Check a world load identifier against the allow-list.
pub fn validate_world_path(id: &str) -> Result<(), PathRejected> {
    let lower = id.to_ascii_lowercase();
    let rest = lower.strip_prefix(PARENT_PREFIX).unwrap_or(&lower);
    let name = rest
        .strip_prefix(WORLDS_PREFIX)
        .and_then(|r| r.strip_suffix(FILE_SUFFIX));
    match name {
        Some(name) if is_world_name(name) => Ok(()),
        _ => {
            tracing::warn!(path = id, "world path rejected");
            Err(PathRejected(id.to_string()))
        }
    }
}

/// Whether `name` is a legal world directory name (`[a-z0-9-_]+`, any case).
pub fn is_world_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Canonical identifier for a world directory name.
pub fn world_path_for(name: &str) -> Result<String, PathRejected> {
    let id = format!("{WORLDS_PREFIX}{name}{FILE_SUFFIX}");
    validate_world_path(&id)?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_world_paths() {
        assert!(validate_world_path("worlds/glade-01/world.json").is_ok());
        assert!(validate_world_path("../worlds/glade_01/world.json").is_ok());
        assert!(validate_world_path("Worlds/Glade/WORLD.JSON").is_ok());
    }

    #[test]
    fn rejects_traversal() {
        for bad in [
            "../../etc/passwd",
            "worlds/../secret/world.json",
            "../../worlds/a/world.json",
            "worlds/a/../../world.json",
            "/worlds/a/world.json",
            "worlds/a/b/world.json",
        ] {
            assert_eq!(
                validate_world_path(bad),
                Err(PathRejected(bad.to_string())),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_wrong_shape() {
        for bad in [
            "",
            "worlds//world.json",
            "worlds/a/world.json.bak",
            "worlds/a b/world.json",
            "worlds/a/map.json",
            "worlds\\a\\world.json",
        ] {
            assert!(validate_world_path(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn world_path_for_builds_valid_ids() {
        assert_eq!(world_path_for("glade").unwrap(), "worlds/glade/world.json");
        assert!(world_path_for("../x").is_err());
    }
}
