use config::{Config, File};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Canonical SOL mint every SOL-equivalent row normalizes to (wrapped SOL).
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Marker mint some upstreams use for native (unwrapped) SOL rows.
pub const NATIVE_SOL_MINT: &str = "So11111111111111111111111111111111111111111";

pub const SOL_DECIMALS: u8 = 9;
pub const SOL_SCALE: i128 = 1_000_000_000;

/// SPL token program
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Positive SOL credits below this are rent refunds, not swap economics (0.01 SOL).
pub const RENT_THRESHOLD: i128 = 10_000_000;

// Major quote-side stablecoins
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";
pub const USD1_MINT: &str = "USD1ttGY1N17NEEHLmELoaybftRBUSErhqYiQzvEmuB";

const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";
const ATA_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
const COMPUTE_BUDGET_ID: &str = "ComputeBudget111111111111111111111111111111";
const RENT_SYSVAR_ID: &str = "SysvarRent111111111111111111111111111111111";

/// Deltas at or below this threshold are dust.
pub fn dust_threshold(decimals: u8) -> i128 {
    if decimals <= 6 { 1 } else { 10 }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid {field} address: {address}")]
    InvalidAddress { field: &'static str, address: String },
}

/// Immutable token/account sets the pipeline reads.
///
/// Built once at startup (defaults or a TOML file) and shared by reference;
/// nothing in the pipeline mutates it.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    core_tokens: HashSet<String>,
    sol_equivalents: HashSet<String>,
    system_accounts: HashSet<String>,
    token_program: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let core_tokens = [SOL_MINT, USDC_MINT, USDT_MINT, USD1_MINT]
            .into_iter()
            .map(str::to_string)
            .collect();
        let sol_equivalents = [SOL_MINT, NATIVE_SOL_MINT]
            .into_iter()
            .map(str::to_string)
            .collect();
        let system_accounts = [
            SYSTEM_PROGRAM_ID,
            TOKEN_PROGRAM_ID,
            ATA_PROGRAM_ID,
            COMPUTE_BUDGET_ID,
            RENT_SYSVAR_ID,
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        Self {
            core_tokens,
            sol_equivalents,
            system_accounts,
            token_program: TOKEN_PROGRAM_ID.to_string(),
        }
    }
}

impl ParserConfig {
    /// Quote-side mint (SOL + major stablecoins)?
    pub fn is_core_token(&self, mint: &str) -> bool {
        self.core_tokens.contains(mint)
    }

    /// Mint that nets against native SOL?
    pub fn is_sol_equivalent(&self, mint: &str) -> bool {
        self.sol_equivalents.contains(mint)
    }

    /// Owner that can never be the swapper?
    pub fn is_excluded_owner(&self, owner: &str) -> bool {
        self.system_accounts.contains(owner) || owner == self.token_program
    }

    pub fn token_program(&self) -> &str {
        &self.token_program
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    tokens: Option<RawTokens>,
    accounts: Option<RawAccounts>,
}

#[derive(Debug, Deserialize)]
struct RawTokens {
    core: Option<Vec<String>>,
    sol_equivalents: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawAccounts {
    system: Option<Vec<String>>,
    token_program: Option<String>,
}

fn validate_addresses(
    field: &'static str,
    addresses: &[String],
) -> Result<HashSet<String>, ConfigError> {
    let mut set = HashSet::with_capacity(addresses.len());
    for address in addresses {
        Pubkey::from_str(address).map_err(|_| ConfigError::InvalidAddress {
            field,
            address: address.clone(),
        })?;
        set.insert(address.clone());
    }
    Ok(set)
}

impl ParserConfig {
    /// Load the token/account sets from a TOML file.
    ///
    /// Missing sections fall back to the mainnet defaults. Every listed
    /// address must be a valid base58 pubkey.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        info!("Loading parser config from {:?}", path.as_ref());

        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let raw: RawConfig = config
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        let defaults = Self::default();
        let tokens = raw.tokens.unwrap_or(RawTokens {
            core: None,
            sol_equivalents: None,
        });
        let accounts = raw.accounts.unwrap_or(RawAccounts {
            system: None,
            token_program: None,
        });

        let core_tokens = match tokens.core {
            Some(list) => validate_addresses("core token", &list)?,
            None => defaults.core_tokens,
        };
        let sol_equivalents = match tokens.sol_equivalents {
            Some(list) => validate_addresses("sol equivalent", &list)?,
            None => defaults.sol_equivalents,
        };
        let system_accounts = match accounts.system {
            Some(list) => validate_addresses("system account", &list)?,
            None => defaults.system_accounts,
        };
        let token_program = match accounts.token_program {
            Some(address) => {
                Pubkey::from_str(&address).map_err(|_| ConfigError::InvalidAddress {
                    field: "token program",
                    address: address.clone(),
                })?;
                address
            }
            None => defaults.token_program,
        };

        info!(
            "Parser config loaded: {} core tokens, {} sol equivalents, {} system accounts",
            core_tokens.len(),
            sol_equivalents.len(),
            system_accounts.len()
        );

        Ok(Self {
            core_tokens,
            sol_equivalents,
            system_accounts,
            token_program,
        })
    }
}
