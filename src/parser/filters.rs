use crate::config::{RENT_THRESHOLD, SOL_MINT, dust_threshold};
use crate::types::BalanceChange;
use tracing::debug;

/// Rent-refund filtering outcome.
#[derive(Debug)]
pub struct RentFilterOutcome {
    pub changes: Vec<BalanceChange>,
    pub rent_refunds_filtered: bool,
}

/// Drop small positive SOL credits that are rent refunds, not swap economics.
///
/// A positive SOL delta below [`RENT_THRESHOLD`] is only a refund when the
/// transaction also moves some non-SOL balance; a transaction that moves
/// nothing but SOL keeps every row.
pub fn filter_rent_refunds(changes: Vec<BalanceChange>) -> RentFilterOutcome {
    let has_non_sol_delta = changes
        .iter()
        .any(|change| change.mint != SOL_MINT && change.delta() != 0);

    let mut rent_refunds_filtered = false;
    let kept = changes
        .into_iter()
        .filter(|change| {
            if change.mint != SOL_MINT {
                return true;
            }
            let delta = change.delta();
            if delta > 0 && delta < RENT_THRESHOLD && has_non_sol_delta {
                debug!(owner = %change.owner, delta, "rent refund dropped");
                rent_refunds_filtered = true;
                return false;
            }
            true
        })
        .collect();

    RentFilterOutcome {
        changes: kept,
        rent_refunds_filtered,
    }
}

/// Drop rows whose absolute delta is at or below the dust threshold.
pub fn filter_dust(changes: Vec<BalanceChange>) -> Vec<BalanceChange> {
    changes
        .into_iter()
        .filter(|change| {
            let keep = change.delta().abs() > dust_threshold(change.decimals);
            if !keep {
                debug!(mint = %change.mint, owner = %change.owner, delta = change.delta(), "dust dropped");
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rent_refund_dropped() {
        let changes = vec![
            BalanceChange::new("TokenMint123", "W", 0, -5_000_000, 6),
            BalanceChange::new(SOL_MINT, "W", 0, 2_000_000_000, 9),
            BalanceChange::new(SOL_MINT, "R", 0, 2_000_000, 9),
        ];

        let outcome = filter_rent_refunds(changes);
        assert!(outcome.rent_refunds_filtered);
        assert_eq!(outcome.changes.len(), 2);
        assert!(outcome.changes.iter().all(|c| c.owner != "R"));
    }

    #[test]
    fn test_negative_and_large_sol_kept() {
        let changes = vec![
            BalanceChange::new("TokenMint123", "W", 0, 5_000_000, 6),
            BalanceChange::new(SOL_MINT, "W", 0, -2_000_000, 9),
            BalanceChange::new(SOL_MINT, "X", 0, RENT_THRESHOLD, 9),
        ];

        let outcome = filter_rent_refunds(changes);
        assert!(!outcome.rent_refunds_filtered);
        assert_eq!(outcome.changes.len(), 3);
    }

    #[test]
    fn test_sol_only_transaction_keeps_refund_sized_credit() {
        let changes = vec![
            BalanceChange::new(SOL_MINT, "A", 0, -2_000_000, 9),
            BalanceChange::new(SOL_MINT, "B", 0, 2_000_000, 9),
        ];

        let outcome = filter_rent_refunds(changes);
        assert!(!outcome.rent_refunds_filtered);
        assert_eq!(outcome.changes.len(), 2);
    }

    #[test]
    fn test_dust_threshold_by_decimals() {
        let changes = vec![
            // |delta| 1 at 6 decimals is dust (threshold 1, strict)
            BalanceChange::new("LowDec", "W", 0, 1, 6),
            BalanceChange::new("LowDec", "W", 0, 2, 6),
            // |delta| 10 at 9 decimals is dust (threshold 10)
            BalanceChange::new("HighDec", "W", 0, -10, 9),
            BalanceChange::new("HighDec", "W", 0, -11, 9),
        ];

        let kept = filter_dust(changes);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].delta(), 2);
        assert_eq!(kept[1].delta(), -11);
    }
}
