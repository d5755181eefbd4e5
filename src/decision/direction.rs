use crate::config::ParserConfig;
use crate::error::{FatalError, ParserResult};
use crate::types::{AssetDelta, Direction};
use tracing::debug;

/// Canonical entry/exit assignment for the active pair, plus the split flag.
#[derive(Debug, Clone)]
pub struct SplitCheck {
    pub entry: AssetDelta,
    pub exit: AssetDelta,

    /// Both sides are non-core. Decomposing such a swap into two records is
    /// a reserved extension; for now the flag is only recorded.
    pub split_required: bool,
}

/// Assign `entry` (delta < 0) and `exit` (delta > 0) out of the two active
/// assets. The sign validator has already run, so anything else here is an
/// upstream contract break and fails fatally.
pub fn resolve_entry_exit(assets: &[AssetDelta], config: &ParserConfig) -> ParserResult<SplitCheck> {
    if assets.len() != 2 {
        return Err(FatalError::ActiveAssetCount(assets.len()));
    }

    let (entry, exit) = if assets[0].is_decrease() && assets[1].is_increase() {
        (assets[0].clone(), assets[1].clone())
    } else if assets[1].is_decrease() && assets[0].is_increase() {
        (assets[1].clone(), assets[0].clone())
    } else {
        return Err(FatalError::EntryExitSigns {
            entry: assets[0].delta,
            exit: assets[1].delta,
        });
    };

    let split_required =
        !config.is_core_token(&entry.mint) && !config.is_core_token(&exit.mint);
    if split_required {
        debug!(entry = %entry.mint, exit = %exit.mint, "non-core pair flagged for split");
    }

    Ok(SplitCheck {
        entry,
        exit,
        split_required,
    })
}

/// Decide BUY vs SELL from core membership of the entry/exit pair.
///
/// Spending core for non-core is a BUY, the reverse a SELL, and core↔core
/// defaults to SELL. A non-core pair must have been stopped before this
/// point, so reaching it is a programming defect.
pub fn classify_direction(entry: &AssetDelta, exit: &AssetDelta, config: &ParserConfig) -> ParserResult<Direction> {
    let entry_is_core = config.is_core_token(&entry.mint);
    let exit_is_core = config.is_core_token(&exit.mint);

    match (entry_is_core, exit_is_core) {
        (true, false) => Ok(Direction::Buy),
        (false, true) => Ok(Direction::Sell),
        (true, true) => Ok(Direction::Sell),
        (false, false) => Err(FatalError::NonCorePair {
            entry: entry.mint.clone(),
            exit: exit.mint.clone(),
        }),
    }
}
