//! Effect tuning, resolved once and passed into the scene constructor.
//!
//! Every knob that used to be a scattered magic number lives here with its
//! original value as the default. Pages override a subset through a JSON
//! object (camelCase keys), everything else keeps the default.

use serde::{Deserialize, Serialize};

/// Distance from the camera to the z = 0 image plane, in world units.
pub const CAMERA_DISTANCE: f32 = 10.0;

/// Near / far clip planes bracketing the image plane.
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

/// Hard cap on the device pixel ratio applied to the canvas backing store.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EffectConfig {
    /// CSS selector of the element that hosts the canvas.
    pub container_selector: String,
    /// Camera distance to the image plane.
    pub camera_distance: f32,
    /// Per-frame interpolation factor applied to the scroll offset.
    /// 1.0 passes the native offset through unsmoothed.
    pub scroll_lerp: f32,
    /// Per-frame interpolation factor for the followed pointer position.
    pub follow_lerp: f32,
    /// Per-frame interpolation factor pulling the target speed toward the
    /// instantaneous pointer speed.
    pub speed_lerp: f32,
    /// Multiplicative decay applied to the target speed after each frame.
    pub velocity_decay: f32,
    /// Ceiling for the velocity uniform handed to the distortion shader.
    pub max_velocity: f32,
    /// Fixed time-uniform increment per frame (frame-coupled, not wall-clock).
    pub time_step: f32,
    /// Re-read every image's bounding box each frame so the planes survive
    /// layout reflow. Resize always re-reads regardless of this flag.
    pub track_layout_every_frame: bool,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            container_selector: ".webgl".to_owned(),
            camera_distance: CAMERA_DISTANCE,
            scroll_lerp: 0.15,
            follow_lerp: 0.1,
            speed_lerp: 0.01,
            velocity_decay: 0.999,
            max_velocity: 0.05,
            time_step: 0.05,
            track_layout_every_frame: true,
        }
    }
}

impl EffectConfig {
    /// Decode a JSON options object; absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
