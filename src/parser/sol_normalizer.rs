use crate::config::{ParserConfig, SOL_DECIMALS, SOL_MINT, SOL_SCALE};
use crate::types::BalanceChange;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Collapse all SOL-equivalent rows per owner into one synthetic SOL row.
///
/// Wrapped and native SOL rows for the same owner net against each other;
/// the synthetic row takes the canonical SOL mint. Non-equivalent rows pass
/// through unchanged, and the synthetic row is emitted at the position of
/// the owner's first SOL-equivalent row. Owners whose equivalents net to
/// zero get no row at all.
pub fn normalize_sol_balances(
    changes: &[BalanceChange],
    config: &ParserConfig,
) -> Vec<BalanceChange> {
    let mut sol_sums: HashMap<&str, i128> = HashMap::new();
    for change in changes {
        if config.is_sol_equivalent(&change.mint) {
            *sol_sums.entry(change.owner.as_str()).or_insert(0) += change.delta();
        }
    }

    if sol_sums.is_empty() {
        return changes.to_vec();
    }

    let mut emitted: HashSet<&str> = HashSet::new();
    let mut normalized = Vec::with_capacity(changes.len());

    for change in changes {
        if !config.is_sol_equivalent(&change.mint) {
            normalized.push(change.clone());
            continue;
        }

        if !emitted.insert(change.owner.as_str()) {
            continue;
        }

        let summed = sol_sums[change.owner.as_str()];
        if summed == 0 {
            debug!(owner = %change.owner, "SOL-equivalent rows net to zero, suppressed");
            continue;
        }

        normalized.push(BalanceChange {
            mint: SOL_MINT.to_string(),
            owner: change.owner.clone(),
            pre_delta: 0,
            post_delta: summed,
            decimals: SOL_DECIMALS,
            scale: SOL_SCALE,
        });
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NATIVE_SOL_MINT;

    #[test]
    fn test_merges_equivalents_per_owner() {
        let config = ParserConfig::default();
        let changes = vec![
            BalanceChange::new(NATIVE_SOL_MINT, "W", 0, -2_000_000_000, 9),
            BalanceChange::new("TokenMint123", "W", 0, 5_000_000, 6),
            BalanceChange::new(SOL_MINT, "W", 0, 500_000_000, 9),
        ];

        let normalized = normalize_sol_balances(&changes, &config);
        assert_eq!(normalized.len(), 2);
        // Synthetic row lands where the first equivalent row was
        assert_eq!(normalized[0].mint, SOL_MINT);
        assert_eq!(normalized[0].owner, "W");
        assert_eq!(normalized[0].delta(), -1_500_000_000);
        assert_eq!(normalized[0].decimals, 9);
        assert_eq!(normalized[1].mint, "TokenMint123");
    }

    #[test]
    fn test_zero_net_is_suppressed() {
        let config = ParserConfig::default();
        let changes = vec![
            BalanceChange::new(SOL_MINT, "W", 0, 1_000_000_000, 9),
            BalanceChange::new(NATIVE_SOL_MINT, "W", 0, -1_000_000_000, 9),
            BalanceChange::new("TokenMint123", "W", 0, 5_000_000, 6),
        ];

        let normalized = normalize_sol_balances(&changes, &config);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].mint, "TokenMint123");
    }

    #[test]
    fn test_independent_owners() {
        let config = ParserConfig::default();
        let changes = vec![
            BalanceChange::new(SOL_MINT, "A", 0, -300, 9),
            BalanceChange::new(SOL_MINT, "B", 0, 300, 9),
        ];

        let normalized = normalize_sol_balances(&changes, &config);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].owner, "A");
        assert_eq!(normalized[0].delta(), -300);
        assert_eq!(normalized[1].owner, "B");
        assert_eq!(normalized[1].delta(), 300);
    }

    #[test]
    fn test_no_equivalents_passes_through() {
        let config = ParserConfig::default();
        let changes = vec![BalanceChange::new("TokenMint123", "W", 0, 42, 6)];
        assert_eq!(normalize_sol_balances(&changes, &config), changes);
    }
}
