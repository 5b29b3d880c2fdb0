//! Interaction tuning (plume.toml `[interaction]` table or standalone file)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tolerances and step sizes used by handlers and tools
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct InteractionConfig {
    /// Pick tolerance in pixels for object selection
    #[serde(default = "default_selection_distance")]
    pub selection_distance: f32,
    /// Lower clamp for a single pinch update
    #[serde(default = "default_pinch_scale_min")]
    pub pinch_scale_min: f32,
    /// Upper clamp for a single pinch update
    #[serde(default = "default_pinch_scale_max")]
    pub pinch_scale_max: f32,
    #[serde(default = "default_true")]
    pub lock_aspect_ratio_on_pinch: bool,
    /// Zoom fraction per wheel notch (120 units)
    #[serde(default = "default_wheel_zoom_step")]
    pub wheel_zoom_step: f32,
    /// Arrow-key translation in pixels
    #[serde(default = "default_arrow_step")]
    pub arrow_step: f32,
    /// Arrow-key translation with Ctrl held
    #[serde(default = "default_arrow_fine_step")]
    pub arrow_fine_step: f32,
    /// Shift+arrow rotation in degrees
    #[serde(default = "default_arrow_rotation_deg")]
    pub arrow_rotation_deg: f32,
    /// Ctrl+Shift+arrow rotation in degrees
    #[serde(default = "default_arrow_fine_rotation_deg")]
    pub arrow_fine_rotation_deg: f32,
    /// Maximum retained undo entries per handler (0 = unbounded)
    #[serde(default)]
    pub undo_depth: usize,
}

fn default_selection_distance() -> f32 {
    6.0
}

fn default_pinch_scale_min() -> f32 {
    0.90
}

fn default_pinch_scale_max() -> f32 {
    1.10
}

fn default_true() -> bool {
    true
}

fn default_wheel_zoom_step() -> f32 {
    0.08
}

fn default_arrow_step() -> f32 {
    10.0
}

fn default_arrow_fine_step() -> f32 {
    1.0
}

fn default_arrow_rotation_deg() -> f32 {
    0.5
}

fn default_arrow_fine_rotation_deg() -> f32 {
    0.05
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            selection_distance: default_selection_distance(),
            pinch_scale_min: default_pinch_scale_min(),
            pinch_scale_max: default_pinch_scale_max(),
            lock_aspect_ratio_on_pinch: true,
            wheel_zoom_step: default_wheel_zoom_step(),
            arrow_step: default_arrow_step(),
            arrow_fine_step: default_arrow_fine_step(),
            arrow_rotation_deg: default_arrow_rotation_deg(),
            arrow_fine_rotation_deg: default_arrow_fine_rotation_deg(),
            undo_depth: 0,
        }
    }
}

impl InteractionConfig {
    /// Parse from TOML text; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: InteractionConfig =
            toml::from_str(content).context("Failed to parse interaction config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    fn validate(&self) -> Result<()> {
        if !self.selection_distance.is_finite() || self.selection_distance <= 0.0 {
            anyhow::bail!("selection_distance must be positive");
        }
        if self.pinch_scale_min <= 0.0 || self.pinch_scale_min > self.pinch_scale_max {
            anyhow::bail!(
                "pinch scale clamp {}..{} is not a positive range",
                self.pinch_scale_min,
                self.pinch_scale_max
            );
        }
        Ok(())
    }
}
