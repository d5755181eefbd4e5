use thiserror::Error;

/// Invariant violations inside the pipeline.
///
/// These mean an earlier stage broke its contract. They are a separate
/// channel from [`crate::types::ParseError`] business rejections and are
/// never downgraded into an erase.
#[derive(Error, Debug)]
pub enum FatalError {
    #[error("expected exactly 2 active assets, got {0}")]
    ActiveAssetCount(usize),

    #[error("entry/exit sign invariant broken (entry delta {entry}, exit delta {exit})")]
    EntryExitSigns { entry: i128, exit: i128 },

    #[error("direction classifier reached a non-core entry/exit pair ({entry}, {exit})")]
    NonCorePair { entry: String, exit: String },
}

/// Result type for pipeline operations that can only fail fatally.
pub type ParserResult<T> = Result<T, FatalError>;
