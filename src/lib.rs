pub mod config;
pub mod decision;
pub mod error;
pub mod parser;
pub mod types;

pub use config::{ConfigError, ParserConfig};
pub use error::{FatalError, ParserResult};
pub use parser::SwapParser;
pub use types::{
    BalanceChange, Direction, EraseReason, FullParseResult, ParseError, ParsedSwap,
    RawTransaction, TransactionMeta,
};
