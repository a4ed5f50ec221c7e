//! Aggregated pipeline tuning.

use std::path::Path;

use serde::{Deserialize, Serialize};

use lorbital_common::config::ViewerDefaults;
use lorbital_common::error::{LorbitalError, LorbitalResult};
use lorbital_gesture_engine::{ClassifierConfig, GestureConfig};
use lorbital_gesture_model::geometry::InteractionBounds;
use lorbital_render_engine::{PointerConfig, RenderConfig};

/// Every numeric knob of one viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerTuning {
    pub classifier: ClassifierConfig,
    pub gesture: GestureConfig,
    pub render: RenderConfig,
    pub pointer: PointerConfig,
    pub viewport: InteractionBounds,
}

impl ViewerTuning {
    /// Default tuning with the user's preferences applied.
    pub fn from_defaults(prefs: &ViewerDefaults) -> Self {
        let mut tuning = Self::default();
        tuning.apply_preferences(prefs);
        tuning
    }

    /// Read tuning from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> LorbitalResult<Self> {
        if !path.exists() {
            return Err(LorbitalError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let tuning: Self = serde_json::from_str(&content)
            .map_err(|e| LorbitalError::config(format!("invalid tuning {}: {e}", path.display())))?;
        Ok(tuning.harmonized())
    }

    pub fn apply_preferences(&mut self, prefs: &ViewerDefaults) {
        self.render.auto_rotate = prefs.auto_rotate;
        self.render.auto_rotate_speed = prefs.auto_rotate_speed;
        self.gesture.invert_rotation_y = prefs.invert_rotation_y;
        self.pointer.invert_rotation_y = prefs.invert_rotation_y;
        self.viewport = InteractionBounds::new(prefs.viewport_width, prefs.viewport_height);
        *self = self.harmonized();
    }

    /// Make every input path clamp to the render controller's scale bounds.
    pub fn harmonized(mut self) -> Self {
        if self.render.min_scale > self.render.max_scale {
            tracing::warn!(
                min = self.render.min_scale,
                max = self.render.max_scale,
                "Scale bounds inverted; swapping"
            );
            std::mem::swap(&mut self.render.min_scale, &mut self.render.max_scale);
        }
        self.gesture.min_scale = self.render.min_scale;
        self.gesture.max_scale = self.render.max_scale;
        self.pointer.min_scale = self.render.min_scale;
        self.pointer.max_scale = self.render.max_scale;
        self.viewport = InteractionBounds::new(self.viewport.width, self.viewport.height);
        self
    }
}
