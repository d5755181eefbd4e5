//! Direction and split classification for a verified entry/exit pair.

pub mod direction;

pub use direction::{SplitCheck, classify_direction, resolve_entry_exit};
