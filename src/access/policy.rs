use crate::access::errors::AccessError;
use crate::access::types::*;
use kdl::KdlDocument;

/// Parse a KDL document string into a snapshot fragment.
pub fn parse_kdl_document(source: &str) -> Result<Snapshot, AccessError> {
    let doc: KdlDocument = source
        .parse()
        .map_err(|e: kdl::KdlError| AccessError::KdlParse(e.to_string()))?;

    let mut snapshot = Snapshot::default();

    for node in doc.nodes() {
        match node.name().value() {
            "user" => {
                let id = first_string_arg(node).ok_or_else(|| {
                    AccessError::InvalidPolicy(
                        "user node requires a string argument (e.g. user \"alice\")".into(),
                    )
                })?;

                let mut group_ids = Vec::new();
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        match child.name().value() {
                            "groups" => group_ids.extend(dash_list(child)),
                            other => {
                                return Err(AccessError::InvalidPolicy(format!(
                                    "unexpected child `{other}` in user `{id}` (expected `groups`)"
                                )));
                            }
                        }
                    }
                }

                snapshot.users.push(User { id, group_ids });
            }
            "group" => {
                let id = first_string_arg(node).ok_or_else(|| {
                    AccessError::InvalidPolicy(
                        "group node requires a string argument (e.g. group \"editors\")".into(),
                    )
                })?;

                let mut policy_ids = Vec::new();
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        match child.name().value() {
                            "policies" => policy_ids.extend(dash_list(child)),
                            other => {
                                return Err(AccessError::InvalidPolicy(format!(
                                    "unexpected child `{other}` in group `{id}` (expected `policies`)"
                                )));
                            }
                        }
                    }
                }

                snapshot.groups.push(Group { id, policy_ids });
            }
            "policy" => {
                let id = first_string_arg(node).ok_or_else(|| {
                    AccessError::InvalidPolicy(
                        "policy node requires a string argument (e.g. policy \"read-docs\")"
                            .into(),
                    )
                })?;

                let mut statements = Vec::new();
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        match child.name().value() {
                            "statement" => statements.push(parse_statement(child, &id)?),
                            other => {
                                return Err(AccessError::InvalidPolicy(format!(
                                    "unexpected child `{other}` in policy `{id}` (expected `statement`)"
                                )));
                            }
                        }
                    }
                }

                snapshot.policies.push(Policy { id, statements });
            }
            other => {
                tracing::warn!("ignoring unknown top-level KDL node `{other}`");
            }
        }
    }

    Ok(snapshot)
}

fn parse_statement(node: &kdl::KdlNode, policy_id: &str) -> Result<Statement, AccessError> {
    let mut statement = Statement::default();
    let Some(children) = node.children() else {
        return Ok(statement);
    };
    for child in children.nodes() {
        match child.name().value() {
            "actions" => statement.actions.extend(dash_list(child)),
            "resources" => statement.resources.extend(dash_list(child)),
            other => {
                return Err(AccessError::InvalidPolicy(format!(
                    "unexpected child `{other}` in statement of policy `{policy_id}` (expected `actions` or `resources`)"
                )));
            }
        }
    }
    Ok(statement)
}

/// Extract the first string argument from a KDL node.
fn first_string_arg(node: &kdl::KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

/// Extract dash-list children: nodes named "-" whose first argument is a string.
/// ```kdl
/// actions {
///     - "read"
///     - "write"
/// }
/// ```
fn dash_list(node: &kdl::KdlNode) -> Vec<String> {
    let Some(children) = node.children() else {
        return Vec::new();
    };
    children
        .nodes()
        .iter()
        .filter(|n| n.name().value() == "-")
        .filter_map(first_string_arg)
        .collect()
}
