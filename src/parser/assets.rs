use crate::config::ParserConfig;
use crate::parser::transfer::is_exclusively_transfers;
use crate::types::{AssetDelta, AssetRole, BalanceChange, TransactionMeta};
use std::collections::HashMap;
use tracing::debug;

/// The two assets the swap is made of, roles assigned.
#[derive(Debug, Clone)]
pub struct ActiveAssets {
    pub assets: Vec<AssetDelta>,
    pub intermediate_assets_collapsed: bool,
}

/// Collector rejection: the swapper's rows could not form an asset pair.
#[derive(Debug, Clone, Copy)]
pub struct AssetCountErase {
    pub count: usize,
}

/// Decimals-normalized magnitude comparison: `|a| / a.scale > |c| / c.scale`,
/// computed by cross-multiplication in `u128`. Saturation keeps the
/// comparison total at the extreme end.
fn magnitude_exceeds(candidate: &AssetDelta, current: &AssetDelta) -> bool {
    let lhs = candidate.abs_delta().saturating_mul(current.scale as u128);
    let rhs = current.abs_delta().saturating_mul(candidate.scale as u128);
    lhs > rhs
}

fn assign_roles(mut entry: AssetDelta, mut exit: AssetDelta) -> Vec<AssetDelta> {
    entry.role = AssetRole::Entry;
    exit.role = AssetRole::Exit;
    vec![entry, exit]
}

/// Reduce the swapper's post-filter rows to exactly two assets.
///
/// Two rows map straight to Entry/Exit by sign. More than two collapse to
/// the largest-magnitude negative and positive deltas (decimals-normalized),
/// dropping the intermediates of multi-hop routes. Fewer than two is a
/// rejection the caller may still rescue via hybrid recovery.
pub fn collect_asset_deltas(
    changes: &[BalanceChange],
    swapper: &str,
) -> Result<ActiveAssets, AssetCountErase> {
    let deltas: Vec<AssetDelta> = changes
        .iter()
        .filter(|change| change.owner == swapper)
        .map(AssetDelta::from_change)
        .collect();

    if deltas.len() < 2 {
        debug!(count = deltas.len(), "swapper has too few assets");
        return Err(AssetCountErase {
            count: deltas.len(),
        });
    }

    if deltas.len() == 2 {
        let negatives = deltas.iter().filter(|d| d.is_decrease()).count();
        let positives = deltas.iter().filter(|d| d.is_increase()).count();
        let (entry, exit) = if negatives == 1 && positives == 1 {
            if deltas[0].is_decrease() {
                (deltas[0].clone(), deltas[1].clone())
            } else {
                (deltas[1].clone(), deltas[0].clone())
            }
        } else {
            // Signs are off; keep a deterministic pair and let the sign
            // validator reject it.
            (deltas[0].clone(), deltas[1].clone())
        };
        return Ok(ActiveAssets {
            assets: assign_roles(entry, exit),
            intermediate_assets_collapsed: false,
        });
    }

    let largest_negative = deltas
        .iter()
        .filter(|d| d.is_decrease())
        .fold(None::<&AssetDelta>, |best, candidate| match best {
            Some(current) if !magnitude_exceeds(candidate, current) => Some(current),
            _ => Some(candidate),
        });
    let largest_positive = deltas
        .iter()
        .filter(|d| d.is_increase())
        .fold(None::<&AssetDelta>, |best, candidate| match best {
            Some(current) if !magnitude_exceeds(candidate, current) => Some(current),
            _ => Some(candidate),
        });

    let (entry, exit) = match (largest_negative, largest_positive) {
        (Some(entry), Some(exit)) => (entry.clone(), exit.clone()),
        // Missing a sign entirely; fall back deterministically and let the
        // sign validator reject.
        _ => (deltas[0].clone(), deltas[1].clone()),
    };

    debug!(
        dropped = deltas.len() - 2,
        entry = %entry.mint,
        exit = %exit.mint,
        "intermediate assets collapsed"
    );

    Ok(ActiveAssets {
        assets: assign_roles(entry, exit),
        intermediate_assets_collapsed: true,
    })
}

/// Rescue a transaction whose swapper saw only one side of the swap.
///
/// When the swapper's accounts show a single non-core asset and the rest of
/// the transaction moved a core token, the largest core movement stands in
/// for the missing side, with its sign flipped opposite the swapper's asset.
/// Returns `None` when any gate fails; the caller then surfaces the original
/// asset-count rejection.
pub fn recover_hybrid(
    changes: &[BalanceChange],
    swapper: &str,
    meta: &TransactionMeta,
    config: &ParserConfig,
) -> Option<ActiveAssets> {
    if swapper != meta.fee_payer {
        return None;
    }
    if is_exclusively_transfers(&meta.instructions, config) {
        return None;
    }

    // Aggregate the swapper's rows by mint; exactly one non-zero,
    // non-core asset may remain.
    let mut by_mint: HashMap<&str, AssetDelta> = HashMap::new();
    for change in changes.iter().filter(|c| c.owner == swapper) {
        by_mint
            .entry(change.mint.as_str())
            .and_modify(|asset| asset.delta += change.delta())
            .or_insert_with(|| AssetDelta::from_change(change));
    }
    let mut non_zero: Vec<AssetDelta> = by_mint
        .into_values()
        .filter(|asset| asset.delta != 0)
        .collect();
    if non_zero.len() != 1 {
        return None;
    }
    let mut swapper_asset = non_zero.pop()?;
    if config.is_core_token(&swapper_asset.mint) {
        return None;
    }

    let borrowed = changes
        .iter()
        .filter(|c| config.is_core_token(&c.mint) && c.delta() != 0)
        .max_by_key(|c| c.delta().unsigned_abs())?;

    // The core side takes the opposite sign of the swapper's asset:
    // negative for a BUY, positive for a SELL.
    let magnitude = borrowed.delta().unsigned_abs() as i128;
    let mut core_asset = AssetDelta::from_change(borrowed);
    core_asset.delta = if swapper_asset.is_increase() {
        -magnitude
    } else {
        magnitude
    };

    swapper_asset.role = if swapper_asset.is_increase() {
        AssetRole::Exit
    } else {
        AssetRole::Entry
    };
    core_asset.role = if core_asset.is_increase() {
        AssetRole::Exit
    } else {
        AssetRole::Entry
    };

    debug!(
        swapper_mint = %swapper_asset.mint,
        core_mint = %core_asset.mint,
        core_delta = core_asset.delta,
        "hybrid recovery reconstructed the missing side"
    );

    Some(ActiveAssets {
        assets: vec![swapper_asset, core_asset],
        intermediate_assets_collapsed: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SOL_MINT;
    use crate::types::Instruction;

    #[test]
    fn test_two_assets_roles_by_sign() {
        let changes = vec![
            BalanceChange::new("TokenMint123", "W", 0, 5_000_000, 6),
            BalanceChange::new(SOL_MINT, "W", 0, -1_000_000_000, 9),
        ];

        let active = collect_asset_deltas(&changes, "W").unwrap();
        assert!(!active.intermediate_assets_collapsed);
        assert_eq!(active.assets[0].role, AssetRole::Entry);
        assert_eq!(active.assets[0].mint, SOL_MINT);
        assert_eq!(active.assets[1].role, AssetRole::Exit);
        assert_eq!(active.assets[1].mint, "TokenMint123");
    }

    #[test]
    fn test_single_asset_erases() {
        let changes = vec![BalanceChange::new(SOL_MINT, "W", 0, -1_000, 9)];
        let erase = collect_asset_deltas(&changes, "W").unwrap_err();
        assert_eq!(erase.count, 1);
    }

    #[test]
    fn test_multi_hop_collapses_to_largest_pair() {
        // A out, B a small intermediate hop, C the real exit.
        let changes = vec![
            BalanceChange::new("TokenA", "W", 0, -10_000_000, 6),
            BalanceChange::new("TokenB", "W", 0, 3_000, 6),
            BalanceChange::new("TokenC", "W", 0, 50_000_000, 6),
        ];

        let active = collect_asset_deltas(&changes, "W").unwrap();
        assert!(active.intermediate_assets_collapsed);
        assert_eq!(active.assets[0].mint, "TokenA");
        assert_eq!(active.assets[0].role, AssetRole::Entry);
        assert_eq!(active.assets[1].mint, "TokenC");
        assert_eq!(active.assets[1].role, AssetRole::Exit);
    }

    #[test]
    fn test_collapse_comparison_is_decimals_normalized() {
        // 2.0 units at 9 decimals beats 1.5 units at 6 decimals even though
        // the raw atomic number is smaller on the 6-decimal side.
        let changes = vec![
            BalanceChange::new("TokenA", "W", 0, -1, 0),
            BalanceChange::new("Nine", "W", 0, 2_000_000_000, 9),
            BalanceChange::new("Six", "W", 0, 1_500_000, 6),
        ];

        let active = collect_asset_deltas(&changes, "W").unwrap();
        assert_eq!(active.assets[1].mint, "Nine");
    }

    #[test]
    fn test_hybrid_recovery_borrows_largest_core_movement() {
        let config = ParserConfig::default();
        let changes = vec![
            BalanceChange::new("TokenMint123", "W", 0, 100_000_000, 6),
            BalanceChange::new(SOL_MINT, "Pool", 0, -1_500_000_000, 9),
            BalanceChange::new(SOL_MINT, "Other", 0, 200_000_000, 9),
        ];
        let meta = TransactionMeta {
            signers: vec!["W".to_string()],
            fee_payer: "W".to_string(),
            instructions: vec![Instruction::new("DexProgram111", Some("swap"))],
        };

        let active = recover_hybrid(&changes, "W", &meta, &config).unwrap();
        assert!(!active.intermediate_assets_collapsed);
        assert_eq!(active.assets[0].mint, "TokenMint123");
        assert_eq!(active.assets[0].role, AssetRole::Exit);
        assert_eq!(active.assets[1].mint, SOL_MINT);
        assert_eq!(active.assets[1].delta, -1_500_000_000);
        assert_eq!(active.assets[1].role, AssetRole::Entry);
    }

    #[test]
    fn test_hybrid_recovery_gates() {
        let config = ParserConfig::default();
        let changes = vec![
            BalanceChange::new("TokenMint123", "W", 0, 100_000_000, 6),
            BalanceChange::new(SOL_MINT, "Pool", 0, -1_500_000_000, 9),
        ];
        let dex_meta = |fee_payer: &str| TransactionMeta {
            signers: vec![fee_payer.to_string()],
            fee_payer: fee_payer.to_string(),
            instructions: vec![Instruction::new("DexProgram111", Some("swap"))],
        };

        // Swapper must be the fee payer
        assert!(recover_hybrid(&changes, "W", &dex_meta("Other"), &config).is_none());

        // Transfer-only instruction lists are not rescued
        let transfer_meta = TransactionMeta {
            signers: vec!["W".to_string()],
            fee_payer: "W".to_string(),
            instructions: vec![Instruction::new(
                crate::config::TOKEN_PROGRAM_ID,
                Some("transferChecked"),
            )],
        };
        assert!(recover_hybrid(&changes, "W", &transfer_meta, &config).is_none());

        // The swapper's one asset must not be core
        let core_changes = vec![
            BalanceChange::new(SOL_MINT, "W", 0, 100_000_000, 9),
            BalanceChange::new(SOL_MINT, "Pool", 0, -1_500_000_000, 9),
        ];
        assert!(recover_hybrid(&core_changes, "W", &dex_meta("W"), &config).is_none());

        // Some core token must have moved somewhere in the transaction
        let no_core = vec![BalanceChange::new("TokenMint123", "W", 0, 100_000_000, 6)];
        assert!(recover_hybrid(&no_core, "W", &dex_meta("W"), &config).is_none());
    }
}
