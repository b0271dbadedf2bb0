use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;

use crate::access::engine::Authorizer;
use crate::access::types::{Decision, Group, Policy, Snapshot, Statement, StatementRef, User};

/// Id lookup tables over borrowed users, groups and policies.
///
/// Records sharing an id are all kept, in supply order, so a lookup sees
/// exactly what a linear scan over the supplied collections would.
#[derive(Debug, Clone, Default)]
pub struct GraphIndex<'a> {
    users: HashMap<&'a str, Vec<&'a User>>,
    groups: HashMap<&'a str, Vec<&'a Group>>,
    policies: HashMap<&'a str, Vec<&'a Policy>>,
}

impl<'a> GraphIndex<'a> {
    pub fn new(users: &'a [User], groups: &'a [Group], policies: &'a [Policy]) -> Self {
        let mut index = Self::default();
        for user in users {
            index.users.entry(user.id.as_str()).or_default().push(user);
        }
        for group in groups {
            index.groups.entry(group.id.as_str()).or_default().push(group);
        }
        for policy in policies {
            index
                .policies
                .entry(policy.id.as_str())
                .or_default()
                .push(policy);
        }
        index
    }

    pub fn from_snapshot(snapshot: &'a Snapshot) -> Self {
        Self::new(&snapshot.users, &snapshot.groups, &snapshot.policies)
    }

    pub fn contains_principal(&self, principal: &str) -> bool {
        self.users.contains_key(principal)
    }

    /// Distinct principal ids, in no particular order.
    pub fn principals(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.users.keys().copied()
    }

    /// Visit every statement reachable from `principal`, in membership order,
    /// until `visit` breaks. Each policy is visited at most once per walk even
    /// when several of the principal's groups attach it.
    pub(crate) fn walk<B, F>(&self, principal: &str, mut visit: F) -> Option<B>
    where
        F: FnMut(&'a Group, &'a Policy, usize, &'a Statement) -> ControlFlow<B>,
    {
        let users = self.users.get(principal)?;

        let mut seen_groups: HashSet<&str> = HashSet::new();
        let mut seen_policies: HashSet<&str> = HashSet::new();

        for &user in users {
            for group_id in &user.group_ids {
                if !seen_groups.insert(group_id.as_str()) {
                    continue;
                }
                let Some(groups) = self.groups.get(group_id.as_str()) else {
                    continue;
                };
                for &group in groups {
                    for policy_id in &group.policy_ids {
                        if !seen_policies.insert(policy_id.as_str()) {
                            continue;
                        }
                        let Some(policies) = self.policies.get(policy_id.as_str()) else {
                            continue;
                        };
                        for &policy in policies {
                            for (i, statement) in policy.statements.iter().enumerate() {
                                if let ControlFlow::Break(b) = visit(group, policy, i, statement) {
                                    return Some(b);
                                }
                            }
                        }
                    }
                }
            }
        }

        None
    }
}

impl Authorizer for GraphIndex<'_> {
    fn resolve(&self, principal: &str, resource: &str, action: &str) -> Decision {
        let mut examined = 0;
        let matched = self.walk(principal, |group, policy, i, statement| {
            examined += 1;
            if statement.permits(resource, action) {
                ControlFlow::Break(StatementRef {
                    group_id: group.id.clone(),
                    policy_id: policy.id.clone(),
                    statement_index: i,
                })
            } else {
                ControlFlow::Continue(())
            }
        });

        match matched {
            Some(r) => Decision::allow(r, examined),
            None => Decision::deny(examined),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_doc_snapshot() -> Snapshot {
        Snapshot::new(
            vec![
                User::new("u1", ["g1", "g2"]),
                User::new("u2", Vec::<String>::new()),
            ],
            vec![Group::new("g1", ["p1"]), Group::new("g2", ["p1", "p2"])],
            vec![
                Policy::new(
                    "p1",
                    vec![
                        Statement::new(["read"], ["doc:2"]),
                        Statement::new(["read"], ["doc:1"]),
                    ],
                ),
                Policy::new("p2", vec![Statement::new(["write"], ["doc:1"])]),
            ],
        )
    }

    #[test]
    fn test_resolve_reports_first_matching_statement() {
        let snapshot = make_doc_snapshot();
        let graph = GraphIndex::from_snapshot(&snapshot);

        let d = graph.resolve("u1", "doc:1", "read");
        assert!(d.allowed);
        let matched = d.matched.unwrap();
        assert_eq!(matched.group_id, "g1");
        assert_eq!(matched.policy_id, "p1");
        assert_eq!(matched.statement_index, 1);
        assert_eq!(d.examined, 2);
    }

    #[test]
    fn test_shared_policy_walked_once() {
        let snapshot = make_doc_snapshot();
        let graph = GraphIndex::from_snapshot(&snapshot);

        // p1 is attached through g1 and g2 but only tested once
        let d = graph.resolve("u1", "doc:9", "read");
        assert!(!d.allowed);
        assert_eq!(d.examined, 3);

        let d = graph.resolve("u1", "doc:1", "write");
        assert!(d.allowed);
        assert_eq!(d.matched.unwrap().group_id, "g2");
    }

    #[test]
    fn test_unknown_and_groupless_principals() {
        let snapshot = make_doc_snapshot();
        let graph = GraphIndex::from_snapshot(&snapshot);

        assert!(graph.contains_principal("u2"));
        assert_eq!(graph.resolve("u2", "doc:1", "read"), Decision::deny(0));

        assert!(!graph.contains_principal("nobody"));
        assert_eq!(graph.resolve("nobody", "doc:1", "read"), Decision::deny(0));
    }

    #[test]
    fn test_duplicate_ids_are_all_consulted() {
        let users = vec![User::new("u1", ["g1"]), User::new("u1", ["g2"])];
        let groups = vec![Group::new("g1", Vec::<String>::new()), Group::new("g2", ["p1"])];
        let policies = vec![
            Policy::new("p1", vec![]),
            Policy::new("p1", vec![Statement::new(["read"], ["doc:1"])]),
        ];
        let graph = GraphIndex::new(&users, &groups, &policies);

        assert!(graph.resolve("u1", "doc:1", "read").allowed);
        assert_eq!(graph.principals().count(), 1);
    }
}
