use crate::types::{AssetDelta, DebugInfo, EraseReason};
use tracing::debug;

/// Confirm the chosen swapper actually moves value: it must own at least
/// one active asset with a non-zero delta.
pub fn validate_swapper_economic_delta(assets: &[AssetDelta], swapper: &str) -> Result<(), EraseReason> {
    let swapper_moves = assets
        .iter()
        .any(|asset| asset.owner == swapper && asset.delta != 0);
    if swapper_moves {
        Ok(())
    } else {
        debug!(swapper, "swapper owns no active asset with a delta");
        Err(EraseReason::SwapperNoDelta)
    }
}

/// Require at least one negative and one positive delta across the active
/// assets. The rejection carries both counts for triage.
pub fn validate_delta_signs(assets: &[AssetDelta]) -> Result<(), (EraseReason, DebugInfo)> {
    let positives = assets.iter().filter(|a| a.is_increase()).count();
    let negatives = assets.iter().filter(|a| a.is_decrease()).count();

    let debug_info = DebugInfo {
        positive_deltas: Some(positives),
        negative_deltas: Some(negatives),
        active_assets: None,
    };

    if positives == 0 {
        debug!(positives, negatives, "no positive deltas");
        return Err((EraseReason::NoPositiveDeltas, debug_info));
    }
    if negatives == 0 {
        debug!(positives, negatives, "no negative deltas");
        return Err((EraseReason::NoNegativeDeltas, debug_info));
    }
    Ok(())
}
