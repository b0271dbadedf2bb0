use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::access::errors::AccessError;

// ---------- Authorization graph ----------

/// A principal and the groups it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    /// May reference groups that do not exist; such links grant nothing.
    #[serde(default)]
    pub group_ids: Vec<String>,
}

impl User {
    pub fn new<I, S>(id: impl Into<String>, group_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            group_ids: group_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// A named bundle of policies attached to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    #[serde(default)]
    pub policy_ids: Vec<String>,
}

impl Group {
    pub fn new<I, S>(id: impl Into<String>, policy_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            policy_ids: policy_ids.into_iter().map(Into::into).collect(),
        }
    }
}

/// A named bundle of statements. A policy without statements grants nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl Policy {
    pub fn new(id: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self {
            id: id.into(),
            statements,
        }
    }
}

/// Allows every action in `actions` on every resource in `resources`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub actions: HashSet<String>,
    pub resources: HashSet<String>,
}

impl Statement {
    pub fn new<A, R, S, T>(actions: A, resources: R) -> Self
    where
        A: IntoIterator<Item = S>,
        R: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            actions: actions.into_iter().map(Into::into).collect(),
            resources: resources.into_iter().map(Into::into).collect(),
        }
    }

    pub fn permits(&self, resource: &str, action: &str) -> bool {
        self.actions.contains(action) && self.resources.contains(resource)
    }
}

/// A consistent view of users, groups and policies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub policies: Vec<Policy>,
}

impl Snapshot {
    pub fn new(users: Vec<User>, groups: Vec<Group>, policies: Vec<Policy>) -> Self {
        Self {
            users,
            groups,
            policies,
        }
    }

    /// Append another snapshot's records after this one's.
    pub fn merge(&mut self, other: Snapshot) {
        self.users.extend(other.users);
        self.groups.extend(other.groups);
        self.policies.extend(other.policies);
    }

    pub fn statement_count(&self) -> usize {
        self.policies.iter().map(|p| p.statements.len()).sum()
    }

    /// Every user→group and group→policy link whose target is absent.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let group_ids: HashSet<&str> = self.groups.iter().map(|g| g.id.as_str()).collect();
        let policy_ids: HashSet<&str> = self.policies.iter().map(|p| p.id.as_str()).collect();

        let mut dangling = Vec::new();
        for user in &self.users {
            for group_id in &user.group_ids {
                if !group_ids.contains(group_id.as_str()) {
                    dangling.push(DanglingReference::Group {
                        user_id: user.id.clone(),
                        group_id: group_id.clone(),
                    });
                }
            }
        }
        for group in &self.groups {
            for policy_id in &group.policy_ids {
                if !policy_ids.contains(policy_id.as_str()) {
                    dangling.push(DanglingReference::Policy {
                        group_id: group.id.clone(),
                        policy_id: policy_id.clone(),
                    });
                }
            }
        }
        dangling
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DanglingReference {
    #[serde(rename_all = "camelCase")]
    Group { user_id: String, group_id: String },
    #[serde(rename_all = "camelCase")]
    Policy { group_id: String, policy_id: String },
}

impl std::fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DanglingReference::Group { user_id, group_id } => {
                write!(f, "user `{user_id}` references missing group `{group_id}`")
            }
            DanglingReference::Policy {
                group_id,
                policy_id,
            } => write!(
                f,
                "group `{group_id}` references missing policy `{policy_id}`"
            ),
        }
    }
}

// ---------- Request/decision types ----------

/// Self-contained evaluation request. Every collection is required, nested
/// ones included; an absent or `null` collection is rejected rather than
/// treated as empty.
#[derive(Debug, Clone)]
pub struct EvaluateRequest {
    pub principal_id: String,
    pub resource: String,
    pub action: String,
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub policies: Vec<Policy>,
}

impl EvaluateRequest {
    pub fn from_json(source: &str) -> Result<Self, AccessError> {
        let wire: RequestWire = serde_json::from_str(source)
            .map_err(|e| AccessError::InvalidInput(format!("malformed evaluate request: {e}")))?;
        Ok(wire.into_request())
    }
}

// Request shapes mirror the graph types without `#[serde(default)]`, which
// only snapshot files get.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestWire {
    principal_id: String,
    resource: String,
    action: String,
    users: Vec<RequestUser>,
    groups: Vec<RequestGroup>,
    policies: Vec<RequestPolicy>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestUser {
    id: String,
    group_ids: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestGroup {
    id: String,
    policy_ids: Vec<String>,
}

#[derive(Deserialize)]
struct RequestPolicy {
    id: String,
    statements: Vec<Statement>,
}

impl RequestWire {
    fn into_request(self) -> EvaluateRequest {
        EvaluateRequest {
            principal_id: self.principal_id,
            resource: self.resource,
            action: self.action,
            users: self
                .users
                .into_iter()
                .map(|u| User {
                    id: u.id,
                    group_ids: u.group_ids,
                })
                .collect(),
            groups: self
                .groups
                .into_iter()
                .map(|g| Group {
                    id: g.id,
                    policy_ids: g.policy_ids,
                })
                .collect(),
            policies: self
                .policies
                .into_iter()
                .map(|p| Policy {
                    id: p.id,
                    statements: p.statements,
                })
                .collect(),
        }
    }
}

/// Location of the statement that granted access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRef {
    pub group_id: String,
    pub policy_id: String,
    /// Position within the policy's statement list.
    pub statement_index: usize,
}

impl std::fmt::Display for StatementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}#{}",
            self.group_id, self.policy_id, self.statement_index
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub allowed: bool,
    pub matched: Option<StatementRef>,
    /// Statements tested while deciding. Zero when answered from a
    /// precomputed index.
    pub examined: usize,
}

impl Decision {
    pub fn deny(examined: usize) -> Self {
        Self {
            allowed: false,
            matched: None,
            examined,
        }
    }

    pub fn allow(matched: StatementRef, examined: usize) -> Self {
        Self {
            allowed: true,
            matched: Some(matched),
            examined,
        }
    }
}
