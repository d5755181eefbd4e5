//! Balance-delta swap parsing pipeline.
//!
//! The pipeline turns one materialized transaction into a canonical swap
//! description, or a structured rejection explaining why the transaction is
//! not a parseable swap. Stages run in a fixed order; reordering them
//! changes semantics (dust filtering before SOL normalization would break
//! wrapped-SOL netting).

pub mod amounts;
pub mod assets;
pub mod filters;
pub mod output;
pub mod sol_normalizer;
pub mod swapper;
pub mod transfer;
pub mod validators;

use crate::config::ParserConfig;
use crate::decision::direction::{classify_direction, resolve_entry_exit};
use crate::error::ParserResult;
use crate::types::{
    DebugInfo, EraseReason, FullParseResult, ParseError, RawTransaction,
};
use assets::{collect_asset_deltas, recover_hybrid};
use filters::{filter_dust, filter_rent_refunds};
use output::{OutputContext, generate_swaps};
use sol_normalizer::normalize_sol_balances;
use std::sync::Arc;
use swapper::identify_swapper;
use tracing::{debug, info};
use transfer::{detect_transfer, is_exclusively_transfers};
use validators::{validate_delta_signs, validate_swapper_economic_delta};

/// The swap parser: pure, synchronous, one transaction per call.
///
/// Holds only the immutable token/account sets, so one instance can be
/// shared across threads and calls freely.
pub struct SwapParser {
    config: Arc<ParserConfig>,
}

impl SwapParser {
    pub fn new(config: Arc<ParserConfig>) -> Self {
        Self { config }
    }

    /// Parser over the mainnet default sets.
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ParserConfig::default()))
    }

    /// Run the full pipeline on one transaction.
    ///
    /// `Ok(FullParseResult::Erase { .. })` is the expected business
    /// rejection channel; `Err(FatalError)` means an internal invariant
    /// broke and the input should be treated as a defect report.
    pub fn parse(&self, transaction: &RawTransaction) -> ParserResult<FullParseResult> {
        let config = self.config.as_ref();
        debug!(
            signature = %transaction.signature,
            balance_changes = transaction.balance_changes.len(),
            "parsing transaction"
        );

        let normalized = normalize_sol_balances(&transaction.balance_changes, config);

        let Some(swapper) =
            identify_swapper(&normalized, &transaction.transaction_meta, config)
        else {
            return Ok(self.erase(transaction, EraseReason::NoEconomicDelta, DebugInfo::default()));
        };
        debug!(
            swapper = %swapper.owner,
            method = ?swapper.method,
            confidence = swapper.confidence,
            "swapper identified"
        );

        let rent_outcome = filter_rent_refunds(normalized);
        let filtered = filter_dust(rent_outcome.changes);

        let active = match collect_asset_deltas(&filtered, &swapper.owner) {
            Ok(active) => active,
            Err(count_erase) => {
                match recover_hybrid(
                    &filtered,
                    &swapper.owner,
                    &transaction.transaction_meta,
                    config,
                ) {
                    Some(recovered) => recovered,
                    None => {
                        // A core-only transaction moved by nothing but SPL
                        // transfers is a pure transfer even though no asset
                        // pair ever formed.
                        let core_only = !filtered
                            .iter()
                            .any(|change| !config.is_core_token(&change.mint));
                        if core_only
                            && is_exclusively_transfers(
                                &transaction.transaction_meta.instructions,
                                config,
                            )
                        {
                            return Ok(self.erase(
                                transaction,
                                EraseReason::PureTransfer,
                                DebugInfo::default(),
                            ));
                        }
                        return Ok(self.erase(
                            transaction,
                            EraseReason::InvalidAssetCount,
                            DebugInfo {
                                active_assets: Some(count_erase.count),
                                ..DebugInfo::default()
                            },
                        ));
                    }
                }
            }
        };

        if let Err(reason) = validate_swapper_economic_delta(&active.assets, &swapper.owner) {
            return Ok(self.erase(transaction, reason, DebugInfo::default()));
        }

        if let Err((reason, debug_info)) = validate_delta_signs(&active.assets) {
            return Ok(self.erase(transaction, reason, debug_info));
        }

        let check = detect_transfer(
            &active.assets,
            &transaction.transaction_meta.instructions,
            config,
        );
        if !check.has_non_core_token {
            let reason = if check.is_transfer {
                EraseReason::PureTransfer
            } else {
                EraseReason::CoreOnlySwap
            };
            return Ok(self.erase(transaction, reason, DebugInfo::default()));
        }

        let split = resolve_entry_exit(&active.assets, config)?;
        let direction = classify_direction(&split.entry, &split.exit, config)?;

        let context = OutputContext {
            signature: &transaction.signature,
            timestamp: transaction.timestamp,
            protocol: transaction.protocol.as_deref(),
            swapper: &swapper,
            rent_refunds_filtered: rent_outcome.rent_refunds_filtered,
            intermediate_assets_collapsed: active.intermediate_assets_collapsed,
        };
        let swaps = generate_swaps(&split, direction, &context, config);

        info!(
            signature = %transaction.signature,
            direction = %direction,
            base = %swaps[0].base_asset.mint,
            quote = %swaps[0].quote_asset.mint,
            "swap parsed"
        );

        Ok(FullParseResult::Success { swaps })
    }

    fn erase(
        &self,
        transaction: &RawTransaction,
        reason: EraseReason,
        debug_info: DebugInfo,
    ) -> FullParseResult {
        debug!(signature = %transaction.signature, reason = %reason, "transaction erased");
        FullParseResult::Erase {
            error: ParseError {
                signature: transaction.signature.clone(),
                reason,
                debug_info,
            },
        }
    }
}
