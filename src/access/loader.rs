use std::path::Path;

use crate::access::errors::AccessError;
use crate::access::policy::parse_kdl_document;
use crate::access::types::Snapshot;

/// Load a snapshot from a single `.kdl`/`.json` file, or from every such file
/// in a directory (merged in path order).
pub fn load_snapshot(path: &Path) -> Result<Snapshot, AccessError> {
    let files = if path.is_dir() {
        let mut entries: Vec<_> = std::fs::read_dir(path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_snapshot_file(p))
            .collect();
        entries.sort();
        entries
    } else if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        return Err(AccessError::InvalidPolicy(format!(
            "snapshot path `{}` does not exist",
            path.display()
        )));
    };

    let mut snapshot = Snapshot::default();
    for file in &files {
        snapshot.merge(load_file(file)?);
    }

    tracing::info!(
        files = files.len(),
        users = snapshot.users.len(),
        groups = snapshot.groups.len(),
        policies = snapshot.policies.len(),
        statements = snapshot.statement_count(),
        "Loaded authorization snapshot"
    );

    for dangling in snapshot.dangling_references() {
        tracing::warn!("{dangling}");
    }

    Ok(snapshot)
}

fn is_snapshot_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| ext == "kdl" || ext == "json")
            .unwrap_or(false)
}

fn load_file(path: &Path) -> Result<Snapshot, AccessError> {
    let contents =
        std::fs::read_to_string(path).map_err(|source| AccessError::PolicyLoadError {
            path: path.display().to_string(),
            source,
        })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents).map_err(|source| AccessError::Json {
            path: path.display().to_string(),
            source,
        }),
        _ => parse_kdl_document(&contents),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::engine::Authorizer;
    use crate::access::graph::GraphIndex;

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();

        std::fs::write(
            dir.path().join("10_users.kdl"),
            r#"
user "alice" {
    groups {
        - "editors"
    }
}
"#,
        )
        .unwrap();

        std::fs::write(
            dir.path().join("20_policies.json"),
            r#"{
                "groups": [{ "id": "editors", "policyIds": ["edit-docs"] }],
                "policies": [{
                    "id": "edit-docs",
                    "statements": [{ "actions": ["write"], "resources": ["doc:1"] }]
                }]
            }"#,
        )
        .unwrap();

        // ignored
        std::fs::write(dir.path().join("README.md"), "not a snapshot").unwrap();

        let snapshot = load_snapshot(dir.path()).unwrap();
        assert_eq!(snapshot.users.len(), 1);
        assert_eq!(snapshot.groups.len(), 1);
        assert_eq!(snapshot.policies.len(), 1);
        assert!(snapshot.dangling_references().is_empty());

        let graph = GraphIndex::from_snapshot(&snapshot);
        assert!(graph.is_allowed("alice", "doc:1", "write").unwrap());
    }

    #[test]
    fn test_load_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("snapshot.kdl");
        std::fs::write(&file, r#"policy "p1""#).unwrap();

        let snapshot = load_snapshot(&file).unwrap();
        assert_eq!(snapshot.policies.len(), 1);
    }

    #[test]
    fn test_load_shipped_sample() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("policies/documents.kdl");
        let snapshot = load_snapshot(&path).unwrap();

        assert_eq!(snapshot.users.len(), 2);
        assert_eq!(snapshot.groups.len(), 2);
        assert_eq!(snapshot.policies.len(), 2);
        assert!(snapshot.dangling_references().is_empty());

        let graph = GraphIndex::from_snapshot(&snapshot);
        assert!(graph.resolve("alice", "doc:1", "write").allowed);
        assert!(graph.resolve("alice", "doc:2", "read").allowed);
        assert!(graph.resolve("bob", "doc:2", "read").allowed);
        assert!(!graph.resolve("bob", "doc:1", "write").allowed);
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.json");
        std::fs::write(&file, r#"{ "users": [ { "groupIds": [] } ] }"#).unwrap();

        let err = load_snapshot(&file).unwrap_err();
        assert!(matches!(err, AccessError::Json { .. }));
    }

    #[test]
    fn test_load_nonexistent_path() {
        let err = load_snapshot(Path::new("/nonexistent/path")).unwrap_err();
        assert!(matches!(err, AccessError::InvalidPolicy(_)));
    }
}
