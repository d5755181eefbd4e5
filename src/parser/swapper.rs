use crate::config::ParserConfig;
use crate::types::{BalanceChange, IdentificationMethod, TransactionMeta};
use std::collections::HashMap;
use tracing::debug;

const LARGEST_DELTA_CONFIDENCE: u8 = 70;
const FEE_PAYER_CONFIDENCE: u8 = 90;

/// The owner chosen as the economic actor of the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapperId {
    pub owner: String,
    pub confidence: u8,
    pub method: IdentificationMethod,
}

#[derive(Default)]
struct OwnerActivity {
    sum_abs_delta: u128,
    has_non_core_delta: bool,
}

/// Pick exactly one owner as the swapper, or `None` when no owner moves value.
///
/// Owners are ranked by the sum of absolute deltas across their rows; system
/// accounts and the token program are never eligible. Ties fall through a
/// ladder: a unique non-core mover wins, then the fee payer (if it moved
/// value at all), then nobody.
pub fn identify_swapper(
    changes: &[BalanceChange],
    meta: &TransactionMeta,
    config: &ParserConfig,
) -> Option<SwapperId> {
    let mut per_owner: HashMap<&str, OwnerActivity> = HashMap::new();

    for change in changes {
        let delta = change.delta();
        if delta == 0 {
            continue;
        }
        if config.is_excluded_owner(&change.owner) {
            continue;
        }

        let activity = per_owner.entry(change.owner.as_str()).or_default();
        activity.sum_abs_delta += delta.unsigned_abs();
        if !config.is_core_token(&change.mint) {
            activity.has_non_core_delta = true;
        }
    }

    if per_owner.is_empty() {
        debug!("no eligible owner with a non-zero delta");
        return None;
    }

    let max_sum = per_owner
        .values()
        .map(|activity| activity.sum_abs_delta)
        .max()?;
    let mut tied: Vec<&str> = per_owner
        .iter()
        .filter(|(_, activity)| activity.sum_abs_delta == max_sum)
        .map(|(owner, _)| *owner)
        .collect();
    tied.sort_unstable();

    if tied.len() == 1 {
        return Some(SwapperId {
            owner: tied[0].to_string(),
            confidence: LARGEST_DELTA_CONFIDENCE,
            method: IdentificationMethod::LargestDelta,
        });
    }

    let non_core_movers: Vec<&str> = tied
        .iter()
        .copied()
        .filter(|owner| per_owner[owner].has_non_core_delta)
        .collect();
    if non_core_movers.len() == 1 {
        debug!(owner = non_core_movers[0], "tie broken by unique non-core mover");
        return Some(SwapperId {
            owner: non_core_movers[0].to_string(),
            confidence: LARGEST_DELTA_CONFIDENCE,
            method: IdentificationMethod::LargestDelta,
        });
    }

    let fee_payer_moved = per_owner
        .get(meta.fee_payer.as_str())
        .is_some_and(|activity| activity.sum_abs_delta > 0);
    if fee_payer_moved {
        debug!(owner = %meta.fee_payer, "tie broken by fee payer");
        return Some(SwapperId {
            owner: meta.fee_payer.clone(),
            confidence: FEE_PAYER_CONFIDENCE,
            method: IdentificationMethod::Tier2,
        });
    }

    debug!("swapper tie could not be broken");
    None
}
