use crate::config::ParserConfig;
use crate::types::{AssetDelta, Instruction};
use tracing::debug;

const TRANSFER_NAMES: [&str; 2] = ["transfer", "transferChecked"];

/// Transfer-vs-swap verdict for the active asset pair.
#[derive(Debug, Clone, Copy)]
pub struct TransferCheck {
    pub has_non_core_token: bool,
    pub is_transfer: bool,
}

/// True when every instruction is an SPL `transfer`/`transferChecked`
/// (and there is at least one instruction).
pub fn is_exclusively_transfers(instructions: &[Instruction], config: &ParserConfig) -> bool {
    !instructions.is_empty()
        && instructions.iter().all(|instruction| {
            instruction.program_id == config.token_program()
                && instruction
                    .name
                    .as_deref()
                    .is_some_and(|name| TRANSFER_NAMES.contains(&name))
        })
}

/// Distinguish swaps from pure transfers and core-only moves.
///
/// Any non-core asset in the pair makes this a swap outright; otherwise the
/// instruction list decides whether the core-only movement was a transfer.
pub fn detect_transfer(
    assets: &[AssetDelta],
    instructions: &[Instruction],
    config: &ParserConfig,
) -> TransferCheck {
    let has_non_core_token = assets
        .iter()
        .any(|asset| !config.is_core_token(&asset.mint));

    if has_non_core_token {
        return TransferCheck {
            has_non_core_token: true,
            is_transfer: false,
        };
    }

    let is_transfer = is_exclusively_transfers(instructions, config);
    debug!(is_transfer, "core-only asset pair");
    TransferCheck {
        has_non_core_token: false,
        is_transfer,
    }
}
