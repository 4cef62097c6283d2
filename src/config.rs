use serde::Deserialize;

use crate::error::{MenuTreeError, Result};
#[cfg(feature = "keymap")]
use crate::keymap::KeymapProfile;

/// Editor settings that are not purely visual.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MenuTreeConfig {
    /// Horizontal distance (in terminal columns) that represents one nesting level.
    pub indent_width: f32,
    /// Draws connector lines from nested rows to their parent.
    pub draw_lines: bool,
    #[cfg(feature = "keymap")]
    pub keymap_profile: KeymapProfile,
}

impl Default for MenuTreeConfig {
    fn default() -> Self {
        Self {
            indent_width: 4.0,
            draw_lines: true,
            #[cfg(feature = "keymap")]
            keymap_profile: KeymapProfile::Default,
        }
    }
}

impl MenuTreeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(MenuTreeError::Config)
    }

    /// Indent width in whole columns, at least one.
    pub fn indent_columns(&self) -> u16 {
        if self.indent_width.is_finite() && self.indent_width >= 1.0 {
            // `as` saturates at u16::MAX.
            self.indent_width.round() as u16
        } else {
            1
        }
    }
}
