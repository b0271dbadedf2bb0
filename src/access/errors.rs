use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AccessError {
    #[error("Invalid input: {0}")]
    #[diagnostic(
        code(warden::access::invalid_input),
        help("Principal, resource and action must be non-empty; users, groups and policies must be present (possibly empty) arrays")
    )]
    InvalidInput(String),

    #[error("Failed to load snapshot file `{path}`")]
    #[diagnostic(
        code(warden::access::snapshot_load),
        help("Check that the file exists and is readable")
    )]
    PolicyLoadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid policy: {0}")]
    #[diagnostic(
        code(warden::access::invalid_policy),
        help("Snapshot files may contain `user`, `group` and `policy` KDL nodes")
    )]
    InvalidPolicy(String),

    #[error("KDL parse error: {0}")]
    #[diagnostic(
        code(warden::access::kdl_parse),
        help("Check your KDL file syntax against https://kdl.dev")
    )]
    KdlParse(String),

    #[error("JSON error in `{path}`: {source}")]
    #[diagnostic(
        code(warden::access::json),
        help("JSON snapshots are objects with `users`, `groups` and `policies` arrays")
    )]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    #[diagnostic(code(warden::access::io))]
    Io(#[from] std::io::Error),
}
