use warden::access::Snapshot;

/// Unindexed nested scan over every collection, used as the oracle.
pub fn brute_force(snapshot: &Snapshot, principal: &str, resource: &str, action: &str) -> bool {
    for user in &snapshot.users {
        if user.id != principal {
            continue;
        }
        for group in &snapshot.groups {
            for group_id in &user.group_ids {
                if &group.id != group_id {
                    continue;
                }
                for policy_id in &group.policy_ids {
                    for policy in &snapshot.policies {
                        if &policy.id != policy_id {
                            continue;
                        }
                        for statement in &policy.statements {
                            if statement.actions.iter().any(|a| a == action)
                                && statement.resources.iter().any(|r| r == resource)
                            {
                                return true;
                            }
                        }
                    }
                }
            }
        }
    }
    false
}
