//! Pipeline configuration.

use std::path::Path;

use candela_aggregate::{DuplicatePolicy, OrderPolicy};
use candela_types::{Granularity, Period, Result};
use serde::{Deserialize, Serialize};

/// Length of the ATR smoothing window.
///
/// Serialized as `{"days": 14}` or `{"bars": 14}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtrWindow {
    /// Calendar days, converted with the granularity of the bars being smoothed.
    Days(usize),
    /// A raw bar count.
    Bars(usize),
}

impl AtrWindow {
    /// Resolves the window to a bar count for `granularity` bars.
    ///
    /// # Errors
    ///
    /// Returns [`CandelaError::InvalidPeriod`] if the window is zero.
    ///
    /// [`CandelaError::InvalidPeriod`]: candela_types::CandelaError::InvalidPeriod
    pub fn period(&self, granularity: Granularity) -> Result<Period> {
        match *self {
            Self::Days(days) => Period::from_days(days, granularity),
            Self::Bars(bars) => Period::new(bars),
        }
    }
}

impl std::fmt::Display for AtrWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Days(days) => write!(f, "{days} days"),
            Self::Bars(bars) => write!(f, "{bars} bars"),
        }
    }
}

/// Configuration for a [`Pipeline`](crate::Pipeline) run.
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "target": "daily", "atr": { "days": 14 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Granularity of the input bars.
    pub source: Granularity,
    /// Granularity of the output bars.
    pub target: Granularity,
    /// ATR window; no ATR is computed when unset.
    pub atr: Option<AtrWindow>,
    /// Handling of bars that share a timestamp.
    pub duplicates: DuplicatePolicy,
    /// Handling of out-of-order bars.
    pub order: OrderPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: Granularity::Minute,
            target: Granularity::Hourly,
            atr: None,
            duplicates: DuplicatePolicy::KeepAll,
            order: OrderPolicy::Strict,
        }
    }
}

impl PipelineConfig {
    /// Creates a configuration with defaults: minute to hourly, no ATR.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CandelaError::Json`](candela_types::CandelaError::Json) on
    /// malformed JSON or unknown keys.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, otherwise the errors
    /// of [`PipelineConfig::from_json`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loaded pipeline config");
        Self::from_json(&json)
    }

    /// Sets the input granularity.
    #[must_use]
    pub const fn with_source(mut self, source: Granularity) -> Self {
        self.source = source;
        self
    }

    /// Sets the output granularity.
    #[must_use]
    pub const fn with_target(mut self, target: Granularity) -> Self {
        self.target = target;
        self
    }

    /// Enables ATR over the given window.
    #[must_use]
    pub const fn with_atr(mut self, window: AtrWindow) -> Self {
        self.atr = Some(window);
        self
    }

    /// Disables ATR.
    #[must_use]
    pub const fn without_atr(mut self) -> Self {
        self.atr = None;
        self
    }

    /// Sets the duplicate policy.
    #[must_use]
    pub const fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Sets the order policy.
    #[must_use]
    pub const fn with_order(mut self, policy: OrderPolicy) -> Self {
        self.order = policy;
        self
    }

    /// Resolves the ATR window against the output granularity.
    ///
    /// # Errors
    ///
    /// Returns [`CandelaError::InvalidPeriod`](candela_types::CandelaError::InvalidPeriod)
    /// if the window is zero.
    pub fn period(&self) -> Result<Option<Period>> {
        self.atr.map(|window| window.period(self.target)).transpose()
    }
}
