use serde::Serialize;
use std::collections::HashMap;
use std::ops::ControlFlow;

use crate::access::engine::Authorizer;
use crate::access::graph::GraphIndex;
use crate::access::types::{Decision, Snapshot, StatementRef};

/// action -> resource -> first statement granting the pair
type Grants = HashMap<String, HashMap<String, StatementRef>>;

/// Effective permissions of every principal, computed once per snapshot.
/// Immutable after construction; rebuild and republish on policy change.
#[derive(Debug, Clone, Default)]
pub struct PermissionIndex {
    by_principal: HashMap<String, Grants>,
    grant_count: usize,
}

/// One effective permission of a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grant {
    pub action: String,
    pub resource: String,
    pub source: StatementRef,
}

impl PermissionIndex {
    pub fn build(graph: &GraphIndex<'_>) -> Self {
        let mut by_principal = HashMap::new();
        let mut grant_count = 0;

        for principal in graph.principals() {
            let mut grants = Grants::new();
            graph.walk(principal, |group, policy, i, statement| {
                if statement.resources.is_empty() {
                    return ControlFlow::<()>::Continue(());
                }
                for action in &statement.actions {
                    let by_resource = grants.entry(action.clone()).or_default();
                    for resource in &statement.resources {
                        by_resource.entry(resource.clone()).or_insert_with(|| {
                            grant_count += 1;
                            StatementRef {
                                group_id: group.id.clone(),
                                policy_id: policy.id.clone(),
                                statement_index: i,
                            }
                        });
                    }
                }
                ControlFlow::Continue(())
            });
            if !grants.is_empty() {
                by_principal.insert(principal.to_string(), grants);
            }
        }

        tracing::debug!(
            principals = by_principal.len(),
            grants = grant_count,
            "Built permission index"
        );

        Self {
            by_principal,
            grant_count,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::build(&GraphIndex::from_snapshot(snapshot))
    }

    /// Principals holding at least one grant.
    pub fn principal_count(&self) -> usize {
        self.by_principal.len()
    }

    /// Distinct (principal, action, resource) triples.
    pub fn grant_count(&self) -> usize {
        self.grant_count
    }

    /// All grants held by `principal`, sorted by action then resource.
    pub fn effective_permissions(&self, principal: &str) -> Vec<Grant> {
        let Some(grants) = self.by_principal.get(principal) else {
            return Vec::new();
        };
        let mut out: Vec<Grant> = grants
            .iter()
            .flat_map(|(action, by_resource)| {
                by_resource.iter().map(move |(resource, source)| Grant {
                    action: action.clone(),
                    resource: resource.clone(),
                    source: source.clone(),
                })
            })
            .collect();
        out.sort_by(|a, b| (&a.action, &a.resource).cmp(&(&b.action, &b.resource)));
        out
    }

    /// Principals allowed `action` on `resource`, sorted.
    pub fn principals_with(&self, resource: &str, action: &str) -> Vec<String> {
        let mut out: Vec<String> = self
            .by_principal
            .iter()
            .filter(|(_, grants)| lookup(grants, resource, action).is_some())
            .map(|(principal, _)| principal.clone())
            .collect();
        out.sort();
        out
    }
}

fn lookup<'g>(grants: &'g Grants, resource: &str, action: &str) -> Option<&'g StatementRef> {
    grants.get(action)?.get(resource)
}

impl Authorizer for PermissionIndex {
    fn resolve(&self, principal: &str, resource: &str, action: &str) -> Decision {
        match self
            .by_principal
            .get(principal)
            .and_then(|grants| lookup(grants, resource, action))
        {
            Some(source) => Decision::allow(source.clone(), 0),
            None => Decision::deny(0),
        }
    }
}
