#![allow(dead_code)]

pub mod builders;
pub mod reference;

pub use builders::{doc_snapshot, PolicyBuilder, SnapshotBuilder};
pub use reference::brute_force;
