//! Window and threshold configuration for a [`CompressorState`](crate::state::CompressorState).
//!
//! Both values are fixed for the lifetime of an instance. A restored
//! snapshot carries its own values, which take precedence over whatever the
//! caller asked for (the snapshot describes the instance being resumed).
//!
//! ```
//! use scrollback::config::CompressorConfig;
//!
//! let config = CompressorConfig::default()
//!     .with_window_size(3)
//!     .with_summary_threshold(5);
//! assert_eq!(config.window_size, 3);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default number of messages kept in the live window.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Default window length at which a summary is created.
pub const DEFAULT_SUMMARY_THRESHOLD: usize = 20;

/// Sizing for the live window and the summary trigger.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressorConfig {
    /// Messages retained after trimming. Default: `10`.
    pub window_size: usize,
    /// Window length that triggers a summary. Default: `20`.
    ///
    /// Expected to be `>= window_size`; smaller values still work but make
    /// summaries fire before ordinary trimming would.
    pub summary_threshold: usize,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            summary_threshold: DEFAULT_SUMMARY_THRESHOLD,
        }
    }
}

impl CompressorConfig {
    pub fn new(window_size: usize, summary_threshold: usize) -> Self {
        Self {
            window_size,
            summary_threshold,
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_summary_threshold(mut self, summary_threshold: usize) -> Self {
        self.summary_threshold = summary_threshold;
        self
    }

    /// Upper bound on the window length between calls.
    pub fn max_window_len(&self) -> usize {
        self.window_size.max(self.summary_threshold)
    }

    /// Log a warning for configurations that work but behave unusually.
    pub(crate) fn warn_if_unusual(&self) {
        if self.summary_threshold < self.window_size {
            warn!(
                window_size = self.window_size,
                summary_threshold = self.summary_threshold,
                "summary threshold is below the window size; summaries will fire before trimming"
            );
        }
        if self.window_size == 0 {
            warn!("window size is 0; every message is dropped right after ingestion");
        }
    }
}
