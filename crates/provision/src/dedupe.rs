use lz_models::PrincipalId;
use std::collections::HashSet;

/// Collapse repeated principal identifiers to their first occurrence,
/// preserving declaration order so emitted plans are reproducible.
///
/// The remote SSO service rejects a duplicate assignment request against
/// an existing identical assignment as a conflict, not an idempotent
/// upsert, so every (account, principal) pair must be emitted exactly
/// once.
pub fn unique_principals(principal_ids: &[PrincipalId]) -> Vec<PrincipalId> {
    let mut seen = HashSet::new();
    principal_ids
        .iter()
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: &str) -> PrincipalId {
        PrincipalId::new(id)
    }

    #[test]
    fn test_duplicate_principal_collapses_to_first_occurrence() {
        let ids = vec![p("p-1"), p("p-2"), p("p-1"), p("p-3"), p("p-2")];
        assert_eq!(unique_principals(&ids), vec![p("p-1"), p("p-2"), p("p-3")]);
    }

    #[test]
    fn test_empty_member_list_is_valid() {
        assert!(unique_principals(&[]).is_empty());
    }

    #[test]
    fn test_order_is_deterministic() {
        let ids = vec![p("p-3"), p("p-1"), p("p-3"), p("p-2")];
        assert_eq!(unique_principals(&ids), vec![p("p-3"), p("p-1"), p("p-2")]);
    }
}
