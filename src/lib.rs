//! Warden - group and policy based access control evaluation.
//!
//! A principal is allowed an action on a resource when some statement
//! reachable through its groups and their policies lists both. Decisions can
//! be answered by walking the graph per query ([`access::GraphIndex`]) or from
//! grants precomputed once per snapshot ([`access::PermissionIndex`]).

pub mod access;
pub mod errors;
pub mod settings;
