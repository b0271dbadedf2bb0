pub mod engine;
pub mod errors;
pub mod graph;
pub mod index;
pub mod loader;
pub mod policy;
pub mod store;
pub mod types;

pub use engine::{evaluate, evaluate_request, Authorizer};
pub use errors::AccessError;
pub use graph::GraphIndex;
pub use index::{Grant, PermissionIndex};
pub use store::IndexHandle;
pub use types::{
    DanglingReference, Decision, EvaluateRequest, Group, Policy, Snapshot, Statement,
    StatementRef, User,
};
