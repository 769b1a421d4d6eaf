//! Application constants.

/// Number of rows to move when pressing Page Up/Down.
pub const PAGE_SIZE: usize = 10;

/// Channel buffer size for preview scan messages.
pub const PREVIEW_CHANNEL_SIZE: usize = 100;

/// Event loop tick interval in milliseconds.
pub const TICK_INTERVAL_MS: u64 = 50;

/// Lines kept in the message list.
pub const MAX_LOG_LINES: usize = 5000;
