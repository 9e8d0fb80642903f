//! Scroll controller configuration
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```toml
//! enable_overshoot = true
//! max_overshoot_distance = 80.0
//!
//! [physics.spring]
//! stiffness = 15.0
//!
//! [scrollbar]
//! thickness = 8.0
//! ```

use std::fs;
use std::path::Path;

use rebound_animation::SpringConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ============================================================================
// Scroll Configuration
// ============================================================================

/// Configuration for one scroll controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Drag-to-scroll with momentum (default: true)
    #[serde(default = "default_true")]
    pub kinetic_scrolling_enabled: bool,
    /// Hold the initiating press and replay it if no drag follows (default: true)
    #[serde(default = "default_true")]
    pub capture_button_press: bool,
    /// Allow rubber-banding past the content edges (default: true)
    #[serde(default = "default_true")]
    pub enable_overshoot: bool,
    /// How far past an edge the position may travel, in axis units
    #[serde(default = "default_max_overshoot")]
    pub max_overshoot_distance: f64,
    /// Idle time before overlay scrollbars fade out
    #[serde(default = "default_fade_out_delay")]
    pub fade_out_delay_ms: f64,
    /// Scrollbars are drawn over content and fade when idle (default: true)
    #[serde(default = "default_true")]
    pub overlay_scrollbars: bool,
    /// Primary press on a scrollbar track jumps the slider there instead of paging
    #[serde(default)]
    pub primary_button_warps_slider: bool,
    /// Snap to the crossed border when a drag re-enters bounds (default: false)
    #[serde(default)]
    pub snap_to_border_on_drag: bool,
    /// Snap to the crossed border when deceleration re-enters bounds (default: true)
    #[serde(default = "default_true")]
    pub snap_to_border_on_kinetic: bool,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub scrollbar: ScrollbarConfig,
}

fn default_true() -> bool {
    true
}

fn default_max_overshoot() -> f64 {
    50.0
}

fn default_fade_out_delay() -> f64 {
    1000.0
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            kinetic_scrolling_enabled: true,
            capture_button_press: true,
            enable_overshoot: true,
            max_overshoot_distance: default_max_overshoot(),
            fade_out_delay_ms: default_fade_out_delay(),
            overlay_scrollbars: true,
            primary_button_warps_slider: false,
            snap_to_border_on_drag: false,
            snap_to_border_on_kinetic: true,
            physics: PhysicsConfig::default(),
            gesture: GestureConfig::default(),
            scrollbar: ScrollbarConfig::default(),
        }
    }
}

impl ScrollConfig {
    /// Create config with rubber-banding disabled
    pub fn no_overshoot() -> Self {
        Self {
            enable_overshoot: false,
            ..Default::default()
        }
    }

    /// Create config with a quicker snap-back
    pub fn snappy() -> Self {
        let mut config = Self::default();
        config.physics.spring = SpringConfig::SNAPPY;
        config
    }

    /// Create config with a slower, softer snap-back
    pub fn gentle() -> Self {
        let mut config = Self::default();
        config.physics.spring = SpringConfig::GENTLE;
        config
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: ScrollConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded scroll config from {}", path.display());
        Self::from_toml_str(&source)
    }

    /// Check every numeric constant
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("max_overshoot_distance", self.max_overshoot_distance)?;
        non_negative("fade_out_delay_ms", self.fade_out_delay_ms)?;
        self.physics.validate()?;
        self.gesture.validate()?;
        self.scrollbar.validate()
    }

    /// Overshoot allowance actually applied to the store
    pub(crate) fn overshoot_allowance(&self) -> f64 {
        if self.enable_overshoot {
            self.max_overshoot_distance
        } else {
            0.0
        }
    }
}

// ============================================================================
// Physics
// ============================================================================

/// Kinetic deceleration and snap-back constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Tick interval of the kinetic timer
    pub frame_interval_ms: f64,
    /// Friction applied to a free-flying axis, in units/ms²
    pub friction_deceleration: f64,
    /// Pull back toward the border while overshot, in units/ms²
    pub overshoot_inverse_acceleration: f64,
    /// Snap-back offsets below this land exactly on the border
    pub rest_threshold: f64,
    pub spring: SpringConfig,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 1000.0 / 60.0,
            friction_deceleration: 0.003,
            overshoot_inverse_acceleration: 0.003,
            rest_threshold: 1.0,
            spring: SpringConfig::DEFAULT,
        }
    }
}

impl PhysicsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("physics.frame_interval_ms", self.frame_interval_ms)?;
        non_negative("physics.friction_deceleration", self.friction_deceleration)?;
        non_negative(
            "physics.overshoot_inverse_acceleration",
            self.overshoot_inverse_acceleration,
        )?;
        positive("physics.rest_threshold", self.rest_threshold)?;
        positive("physics.spring.stiffness", self.spring.stiffness)?;
        positive("physics.spring.period", self.spring.period)?;
        non_negative("physics.spring.amplitude", self.spring.amplitude)
    }
}

// ============================================================================
// Gesture
// ============================================================================

/// Press/drag classification constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Per-axis distance from the press point that starts a drag
    pub drag_threshold: f64,
    /// A press this close to the last resting release passes straight through
    pub bypass_radius: f64,
    /// A captured press not turned into a drag is replayed after this long
    pub release_timeout_ms: f64,
    /// A stationary sample older than this still refreshes the velocity
    pub still_threshold_ms: f64,
    /// Samples closer together than this keep the previous velocity
    pub min_sample_interval_ms: f64,
    /// A trackpad gesture left overshot snaps back after this long without events
    pub scroll_end_timeout_ms: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 8.0,
            bypass_radius: 30.0,
            release_timeout_ms: 1000.0,
            still_threshold_ms: 40.0,
            min_sample_interval_ms: 1.0,
            scroll_end_timeout_ms: 150.0,
        }
    }
}

impl GestureConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("gesture.drag_threshold", self.drag_threshold)?;
        non_negative("gesture.bypass_radius", self.bypass_radius)?;
        non_negative("gesture.release_timeout_ms", self.release_timeout_ms)?;
        non_negative("gesture.still_threshold_ms", self.still_threshold_ms)?;
        positive("gesture.min_sample_interval_ms", self.min_sample_interval_ms)?;
        positive("gesture.scroll_end_timeout_ms", self.scroll_end_timeout_ms)
    }
}

// ============================================================================
// Scrollbar
// ============================================================================

/// Overlay scrollbar geometry and fade timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarConfig {
    /// Opacity of a fully shown scrollbar
    pub max_opacity: f64,
    pub fade_in_ms: f64,
    pub fade_out_ms: f64,
    /// Shortest slider, in axis units
    pub min_thumb_length: f64,
    /// Gap between the slider and the bar edges
    pub padding: f64,
    /// Slider thickness
    pub thickness: f64,
    /// Delay before a held track press starts repeating
    pub page_repeat_initial_ms: f64,
    /// Interval of repeated track paging
    pub page_repeat_ms: f64,
}

impl Default for ScrollbarConfig {
    fn default() -> Self {
        Self {
            max_opacity: 0.5,
            fade_in_ms: 100.0,
            fade_out_ms: 300.0,
            min_thumb_length: 20.0,
            padding: 2.0,
            thickness: 6.0,
            page_repeat_initial_ms: 300.0,
            page_repeat_ms: 100.0,
        }
    }
}

impl ScrollbarConfig {
    /// Width of the vertical bar (height of the horizontal one)
    pub fn bar_extent(&self) -> f64 {
        self.thickness + 2.0 * self.padding
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_opacity > 0.0 && self.max_opacity <= 1.0) {
            return Err(ConfigError::Opacity(self.max_opacity));
        }
        non_negative("scrollbar.fade_in_ms", self.fade_in_ms)?;
        non_negative("scrollbar.fade_out_ms", self.fade_out_ms)?;
        non_negative("scrollbar.min_thumb_length", self.min_thumb_length)?;
        non_negative("scrollbar.padding", self.padding)?;
        non_negative("scrollbar.thickness", self.thickness)?;
        positive("scrollbar.page_repeat_initial_ms", self.page_repeat_initial_ms)?;
        positive("scrollbar.page_repeat_ms", self.page_repeat_ms)
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    non_negative(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}
