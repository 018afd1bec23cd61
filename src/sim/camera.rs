//! Vertical scroll policy
//!
//! The view follows the character upward and keeps its last offset while the
//! character is below the follow anchor. Nothing here draws.

use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_ANCHOR, VIEW_HEIGHT};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World y of the top edge of the view (0 at the start, negative above)
    pub offset_y: f32,
}

impl Camera {
    pub fn follow(&mut self, character_y: f32) {
        if character_y < CAMERA_ANCHOR {
            self.offset_y = character_y - CAMERA_ANCHOR;
        }
    }

    /// World y of the bottom edge of the view
    pub fn visible_bottom(&self) -> f32 {
        self.offset_y + VIEW_HEIGHT
    }
}
