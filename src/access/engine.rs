use crate::access::errors::AccessError;
use crate::access::graph::GraphIndex;
use crate::access::types::{Decision, EvaluateRequest, Group, Policy, User};

/// A source of access decisions over one snapshot.
///
/// Implemented by [`GraphIndex`] (walks the graph per query) and
/// [`PermissionIndex`](crate::access::index::PermissionIndex) (precomputed
/// grants). Absence of a matching statement is the only form of denial.
pub trait Authorizer {
    /// Decide without validating arguments. Unknown principals and
    /// dangling links resolve to a denial.
    fn resolve(&self, principal: &str, resource: &str, action: &str) -> Decision;

    fn decide(
        &self,
        principal: &str,
        resource: &str,
        action: &str,
    ) -> Result<Decision, AccessError> {
        validate_query(principal, resource, action)?;
        Ok(self.resolve(principal, resource, action))
    }

    fn is_allowed(
        &self,
        principal: &str,
        resource: &str,
        action: &str,
    ) -> Result<bool, AccessError> {
        Ok(self.decide(principal, resource, action)?.allowed)
    }
}

/// Check whether `principal` may perform `action` on `resource`, given the
/// full authorization graph for this call.
pub fn evaluate(
    principal: &str,
    resource: &str,
    action: &str,
    users: &[User],
    groups: &[Group],
    policies: &[Policy],
) -> Result<bool, AccessError> {
    validate_query(principal, resource, action)?;
    let graph = GraphIndex::new(users, groups, policies);
    Ok(graph.resolve(principal, resource, action).allowed)
}

/// Evaluate a self-contained request, keeping the matched statement for audit.
pub fn evaluate_request(req: &EvaluateRequest) -> Result<Decision, AccessError> {
    let graph = GraphIndex::new(&req.users, &req.groups, &req.policies);
    graph.decide(&req.principal_id, &req.resource, &req.action)
}

pub(crate) fn validate_query(
    principal: &str,
    resource: &str,
    action: &str,
) -> Result<(), AccessError> {
    for (name, value) in [
        ("principal", principal),
        ("resource", resource),
        ("action", action),
    ] {
        if value.is_empty() {
            return Err(AccessError::InvalidInput(format!("{name} must not be empty")));
        }
    }
    Ok(())
}
