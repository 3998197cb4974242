//! Configuration for coherent-noise removal.
//!
//! [`Config`] is a flat struct; fields are grouped by comments into the
//! baseline, selection and grouping stages of the pipeline.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::morphology::MorphOperator;

/// How the morphological baseline is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMode {
    /// Each channel filtered on its own (1D pipeline).
    PerChannel {
        /// Structuring-element extent along ticks.
        structuring_element: usize,
    },
    /// Joint channel x tick neighbourhood (2D pipeline).
    /// Neighbouring channels contribute to each other's baseline.
    Neighborhood {
        /// Structuring-element extent along channels.
        channels: usize,
        /// Structuring-element extent along ticks.
        ticks: usize,
    },
}

impl BaselineMode {
    /// Operator used when none is configured or the selector is unknown.
    pub fn default_operator(&self) -> MorphOperator {
        match self {
            BaselineMode::PerChannel { .. } => MorphOperator::Dilation,
            BaselineMode::Neighborhood { .. } => MorphOperator::Gradient,
        }
    }
}

impl Default for BaselineMode {
    fn default() -> Self {
        BaselineMode::PerChannel {
            structuring_element: 5,
        }
    }
}

/// Coherent-noise removal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // -- Baseline --------------------------------------------------------
    pub baseline: BaselineMode,
    /// `None` selects the baseline mode's default operator.
    pub operator: Option<MorphOperator>,

    // -- Selection -------------------------------------------------------
    /// Half-width of the ROI window around each selected tick.
    pub window: usize,
    /// Multiplier applied to the per-channel baseline RMS.
    pub threshold_factor: f32,

    // -- Grouping --------------------------------------------------------
    /// Channels per coherent-noise group. Trailing channels that do not
    /// fill a whole group are left out of the grouped outputs.
    pub grouping: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baseline: BaselineMode::default(),
            operator: None,
            window: 10,
            threshold_factor: 2.5,
            grouping: 32,
        }
    }
}

impl Config {
    /// Per-channel (1D) baseline with the given structuring element.
    pub fn per_channel(structuring_element: usize) -> Self {
        Self {
            baseline: BaselineMode::PerChannel {
                structuring_element,
            },
            ..Self::default()
        }
    }

    /// Channel x tick neighbourhood (2D) baseline.
    pub fn neighborhood(channels: usize, ticks: usize) -> Self {
        Self {
            baseline: BaselineMode::Neighborhood { channels, ticks },
            ..Self::default()
        }
    }

    pub fn with_operator(mut self, operator: MorphOperator) -> Self {
        self.operator = Some(operator);
        self
    }

    /// Set the operator from a single-letter selector.
    ///
    /// Unknown letters clear the operator so the baseline default applies.
    pub fn with_operator_code(mut self, code: char) -> Self {
        self.operator = MorphOperator::from_code(code);
        self
    }

    pub fn with_grouping(mut self, grouping: usize) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_threshold_factor(mut self, threshold_factor: f32) -> Self {
        self.threshold_factor = threshold_factor;
        self
    }

    /// The operator that will actually run.
    pub fn resolved_operator(&self) -> MorphOperator {
        self.operator
            .unwrap_or_else(|| self.baseline.default_operator())
    }

    /// Check the grouping against a grid with `channels` rows.
    pub fn validate(&self, channels: usize) -> Result<(), ConfigError> {
        validate_grouping(self.grouping, channels)
    }
}

pub(crate) fn validate_grouping(grouping: usize, channels: usize) -> Result<(), ConfigError> {
    if grouping == 0 {
        return Err(ConfigError::ZeroGrouping);
    }
    if grouping > channels {
        return Err(ConfigError::GroupingExceedsChannels { grouping, channels });
    }
    Ok(())
}
