use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw balance-change row from upstream.
///
/// Amounts are atomic units (integers). `scale` is always `10^decimals`;
/// upstream guarantees the pairing and the parser trusts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceChange {
    /// The token mint address
    pub mint: String,

    /// The account owner address
    pub owner: String,

    /// Balance snapshot before the transaction, atomic units
    pub pre_delta: i128,

    /// Balance snapshot after the transaction, atomic units
    pub post_delta: i128,

    /// Token decimals
    pub decimals: u8,

    /// `10^decimals`
    pub scale: i128,
}

impl BalanceChange {
    pub fn new(
        mint: impl Into<String>,
        owner: impl Into<String>,
        pre_delta: i128,
        post_delta: i128,
        decimals: u8,
    ) -> Self {
        Self {
            mint: mint.into(),
            owner: owner.into(),
            pre_delta,
            post_delta,
            decimals,
            scale: 10i128.pow(decimals as u32),
        }
    }

    /// Net change for this row
    pub fn delta(&self) -> i128 {
        self.post_delta - self.pre_delta
    }
}

/// Role of an asset inside a swap, from the swapper's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetRole {
    /// The asset the swapper pays (delta < 0)
    Entry,

    /// The asset the swapper receives (delta > 0)
    Exit,

    /// A pass-through hop that gets collapsed away
    Intermediate,
}

/// An owner's net change in one mint, annotated with its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDelta {
    pub mint: String,
    pub owner: String,
    pub delta: i128,
    pub decimals: u8,
    pub scale: i128,
    pub role: AssetRole,
}

impl AssetDelta {
    /// Build an intermediate-role delta from a raw row
    pub fn from_change(change: &BalanceChange) -> Self {
        Self {
            mint: change.mint.clone(),
            owner: change.owner.clone(),
            delta: change.delta(),
            decimals: change.decimals,
            scale: change.scale,
            role: AssetRole::Intermediate,
        }
    }

    pub fn abs_delta(&self) -> u128 {
        self.delta.unsigned_abs()
    }

    /// Check if the swapper pays this asset away
    pub fn is_decrease(&self) -> bool {
        self.delta < 0
    }

    /// Check if the swapper receives this asset
    pub fn is_increase(&self) -> bool {
        self.delta > 0
    }
}

/// A single instruction reference from the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Program the instruction targets
    pub program_id: String,

    /// Decoded instruction name, when upstream knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Instruction {
    pub fn new(program_id: impl Into<String>, name: Option<&str>) -> Self {
        Self {
            program_id: program_id.into(),
            name: name.map(str::to_string),
        }
    }
}

/// Signer and instruction context for one transaction.
///
/// `fee_payer` is always one of `signers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMeta {
    pub signers: Vec<String>,
    pub fee_payer: String,
    pub instructions: Vec<Instruction>,
}

/// Fully materialized transaction handed in by upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Transaction signature, unique per transaction
    pub signature: String,

    /// Block timestamp, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Protocol label from upstream (e.g. an aggregator name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    pub balance_changes: Vec<BalanceChange>,
    pub transaction_meta: TransactionMeta,
}

/// BUY or SELL, from the swapper's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// How the swapper was identified.
///
/// `Tier1` is reserved for future upstream hints; the pipeline currently
/// produces only `Tier2` and `LargestDelta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentificationMethod {
    Tier1,
    Tier2,
    LargestDelta,
}

/// Mint plus decimals, as carried on the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    pub mint: String,
    pub decimals: u8,
}

/// Formatted amounts for one swap. Exactly one of `total_wallet_cost`
/// (BUY) and `net_wallet_received` (SELL) is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAmounts {
    /// Amount of the base asset, minimal decimal string
    pub base_amount: String,

    /// What the wallet paid, absolute value (BUY only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_wallet_cost: Option<String>,

    /// What the wallet received, absolute value (SELL only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_wallet_received: Option<String>,
}

impl SwapAmounts {
    pub fn buy(base_amount: String, total_wallet_cost: String) -> Self {
        Self {
            base_amount,
            total_wallet_cost: Some(total_wallet_cost),
            net_wallet_received: None,
        }
    }

    pub fn sell(base_amount: String, net_wallet_received: String) -> Self {
        Self {
            base_amount,
            total_wallet_cost: None,
            net_wallet_received: Some(net_wallet_received),
        }
    }
}

/// Canonical description of one parsed swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSwap {
    pub signature: String,
    pub timestamp: i64,
    pub swapper: String,
    pub direction: Direction,
    pub base_asset: AssetInfo,
    pub quote_asset: AssetInfo,
    pub amounts: SwapAmounts,

    /// Identification confidence, 0..=100
    pub confidence: u8,

    pub protocol: String,
    pub swapper_identification_method: IdentificationMethod,
    pub rent_refunds_filtered: bool,
    pub intermediate_assets_collapsed: bool,
}

/// Why a transaction was rejected as a swap. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraseReason {
    NoEconomicDelta,
    InvalidAssetCount,
    NoPositiveDeltas,
    NoNegativeDeltas,
    CoreOnlySwap,
    PureTransfer,
    SwapperNoDelta,
}

impl fmt::Display for EraseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            EraseReason::NoEconomicDelta => "no_economic_delta",
            EraseReason::InvalidAssetCount => "invalid_asset_count",
            EraseReason::NoPositiveDeltas => "no_positive_deltas",
            EraseReason::NoNegativeDeltas => "no_negative_deltas",
            EraseReason::CoreOnlySwap => "core_only_swap",
            EraseReason::PureTransfer => "pure_transfer",
            EraseReason::SwapperNoDelta => "swapper_no_delta",
        };
        write!(f, "{tag}")
    }
}

/// Optional counters attached to a rejection for triage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_deltas: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_deltas: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_assets: Option<usize>,
}

/// Structured rejection of one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub signature: String,
    pub reason: EraseReason,
    pub debug_info: DebugInfo,
}

/// Final outcome of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FullParseResult {
    Success { swaps: Vec<ParsedSwap> },
    Erase { error: ParseError },
}

impl FullParseResult {
    pub fn is_success(&self) -> bool {
        matches!(self, FullParseResult::Success { .. })
    }

    pub fn swaps(&self) -> &[ParsedSwap] {
        match self {
            FullParseResult::Success { swaps } => swaps,
            FullParseResult::Erase { .. } => &[],
        }
    }
}
