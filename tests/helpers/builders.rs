use warden::access::{Group, Policy, Snapshot, Statement, User};

/// Builder for test snapshots
#[derive(Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, id: &str, group_ids: &[&str]) -> Self {
        self.snapshot
            .users
            .push(User::new(id, group_ids.iter().copied()));
        self
    }

    pub fn group(mut self, id: &str, policy_ids: &[&str]) -> Self {
        self.snapshot
            .groups
            .push(Group::new(id, policy_ids.iter().copied()));
        self
    }

    pub fn policy(mut self, policy: PolicyBuilder) -> Self {
        self.snapshot.policies.push(policy.build());
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}

/// Builder for test policies
pub struct PolicyBuilder {
    id: String,
    statements: Vec<Statement>,
}

impl PolicyBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            statements: Vec::new(),
        }
    }

    pub fn allow(mut self, actions: &[&str], resources: &[&str]) -> Self {
        self.statements.push(Statement::new(
            actions.iter().copied(),
            resources.iter().copied(),
        ));
        self
    }

    pub fn build(self) -> Policy {
        Policy::new(self.id, self.statements)
    }
}

/// The u1 -> g1 -> p1 -> {read, doc:1} graph, plus a groupless u2.
pub fn doc_snapshot() -> Snapshot {
    SnapshotBuilder::new()
        .user("u1", &["g1"])
        .user("u2", &[])
        .group("g1", &["p1"])
        .policy(PolicyBuilder::new("p1").allow(&["read"], &["doc:1"]))
        .build()
}
