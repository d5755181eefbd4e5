use crate::config::ParserConfig;
use crate::decision::direction::SplitCheck;
use crate::parser::amounts::formatted;
use crate::parser::swapper::SwapperId;
use crate::types::{AssetDelta, AssetInfo, Direction, ParsedSwap, SwapAmounts};

const DEFAULT_PROTOCOL: &str = "unknown";

/// Context carried from the earlier stages into the assembled output.
#[derive(Debug)]
pub struct OutputContext<'a> {
    pub signature: &'a str,
    pub timestamp: Option<i64>,
    pub protocol: Option<&'a str>,
    pub swapper: &'a SwapperId,
    pub rent_refunds_filtered: bool,
    pub intermediate_assets_collapsed: bool,
}

fn asset_info(asset: &AssetDelta) -> AssetInfo {
    AssetInfo {
        mint: asset.mint.clone(),
        decimals: asset.decimals,
    }
}

/// Assemble the final swap list from the verified entry/exit pair.
///
/// The base asset is the non-core side; BUY costs are what the wallet paid
/// (the entry), SELL proceeds what it received (the exit). Core↔core pairs
/// orient base = exit, quote = entry. Always one element today; decomposing
/// a `split_required` pair into two records is reserved.
pub fn generate_swaps(
    split: &SplitCheck,
    direction: Direction,
    context: &OutputContext<'_>,
    config: &ParserConfig,
) -> Vec<ParsedSwap> {
    let entry = &split.entry;
    let exit = &split.exit;

    let (base_asset, quote_asset, amounts) = match direction {
        Direction::Buy => (
            asset_info(exit),
            asset_info(entry),
            SwapAmounts::buy(formatted(exit), formatted(entry)),
        ),
        Direction::Sell => {
            let amounts = SwapAmounts::sell(formatted(entry), formatted(exit));
            if config.is_core_token(&entry.mint) && config.is_core_token(&exit.mint) {
                (asset_info(exit), asset_info(entry), amounts)
            } else {
                (asset_info(entry), asset_info(exit), amounts)
            }
        }
    };

    vec![ParsedSwap {
        signature: context.signature.to_string(),
        timestamp: context.timestamp.unwrap_or(0),
        swapper: context.swapper.owner.clone(),
        direction,
        base_asset,
        quote_asset,
        amounts,
        confidence: context.swapper.confidence,
        protocol: context
            .protocol
            .unwrap_or(DEFAULT_PROTOCOL)
            .to_string(),
        swapper_identification_method: context.swapper.method,
        rent_refunds_filtered: context.rent_refunds_filtered,
        intermediate_assets_collapsed: context.intermediate_assets_collapsed,
    }]
}
