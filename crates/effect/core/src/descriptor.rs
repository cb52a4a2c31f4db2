//! Render descriptor handed to the renderer.

use crate::geometry::Point;

/// Concrete placement and timing for one play of an effect.
///
/// Produced by the transform pipeline, consumed unchanged by the renderer.
/// A negative scale component encodes mirroring on that axis.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderDescriptor {
    /// Literal asset path after variant choice, templating and base folder.
    pub path: String,
    pub position: Point,
    /// Pivot in sprite space, `[0, 1]` on each axis.
    pub anchor: Point,
    pub scale: Point,
    /// Radians.
    pub rotation: f64,
    /// Pixels between origin and target, zero without a target.
    pub distance: f64,
    pub playback_rate: f64,
    /// Milliseconds.
    pub fade_in: u64,
    /// Milliseconds.
    pub fade_out: u64,
    /// Explicit playback length in milliseconds, `None` plays the asset once.
    pub duration: Option<u64>,
}

impl RenderDescriptor {
    /// Identity placement with the given timing.
    pub fn identity(playback_rate: f64, fade_in: u64, fade_out: u64) -> Self {
        Self {
            path: String::new(),
            position: Point::ORIGIN,
            anchor: Point::ORIGIN,
            scale: Point::splat(1.0),
            rotation: 0.0,
            distance: 0.0,
            playback_rate,
            fade_in,
            fade_out,
            duration: None,
        }
    }

    pub fn is_mirrored_x(&self) -> bool {
        self.scale.x.is_sign_negative()
    }

    pub fn is_mirrored_y(&self) -> bool {
        self.scale.y.is_sign_negative()
    }
}

impl Default for RenderDescriptor {
    fn default() -> Self {
        Self::identity(1.0, 0, 0)
    }
}
