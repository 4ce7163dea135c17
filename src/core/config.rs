//! Rules configuration.
//!
//! Variants of the game tune the engine through `RulesConfig` rather than
//! by editing executors. The config travels inside `MatchState`, so every
//! executor sees the same rules the match was created with.

use serde::{Deserialize, Serialize};

/// Number of lanes each player contributes to.
pub const DEFAULT_LANE_COUNT: usize = 3;

/// Value a face-down card counts as.
pub const DEFAULT_FACE_DOWN_VALUE: i32 = 2;

/// Engine rules and liveness limits.
///
/// ## Example
///
/// ```
/// use compile_ccg::core::RulesConfig;
///
/// let config = RulesConfig::new()
///     .with_face_down_value(3)
///     .without_reshuffle();
///
/// assert_eq!(config.face_down_value, 3);
/// assert!(!config.reshuffle_discard);
/// assert_eq!(config.lane_count, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Lanes per player.
    pub lane_count: usize,

    /// Effective value of a face-down card, both for target filtering and
    /// for lane totals (lane modifiers may override the latter).
    pub face_down_value: i32,

    /// Shuffle the discard pile back into an empty deck when drawing.
    pub reshuffle_discard: bool,

    /// Deepest interrupt nesting allowed before reactive triggers are dropped.
    pub max_interrupt_depth: usize,

    /// Maximum entries a single scheduler run may execute.
    pub max_chain_steps: usize,
}

impl RulesConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the face-down card value.
    #[must_use]
    pub fn with_face_down_value(mut self, value: i32) -> Self {
        self.face_down_value = value;
        self
    }

    /// Disable discard reshuffling (draws from an empty deck draw nothing).
    #[must_use]
    pub fn without_reshuffle(mut self) -> Self {
        self.reshuffle_discard = false;
        self
    }

    /// Set the interrupt depth limit.
    #[must_use]
    pub fn with_max_interrupt_depth(mut self, depth: usize) -> Self {
        self.max_interrupt_depth = depth;
        self
    }

    /// Set the per-run step limit.
    #[must_use]
    pub fn with_max_chain_steps(mut self, steps: usize) -> Self {
        self.max_chain_steps = steps;
        self
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            face_down_value: DEFAULT_FACE_DOWN_VALUE,
            reshuffle_discard: true,
            max_interrupt_depth: 16,
            max_chain_steps: 1024,
        }
    }
}
