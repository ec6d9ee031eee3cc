//! Startup parameters for the room.

use crate::registry::TiltFamily;

/// Interior size of the room, in world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomSize {
    pub height: f32,
    pub depth: f32,
    pub width: f32,
}

impl Default for RoomSize {
    fn default() -> Self {
        Self {
            height: 5.0,
            depth: 10.0,
            width: 12.0,
        }
    }
}

/// Scene parameters fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomConfig {
    pub room: RoomSize,
    /// Degrees per rotate or tilt key press
    pub angle_step: f32,
    /// Water meshes precomputed for the fish tank
    pub tilts: TiltFamily,
    /// Animation progress per key press, in `(0, 1)`
    pub anim_step: f32,
}

impl RoomConfig {
    /// Keep the tilt family on the same grid as key presses.
    pub fn with_max_tilt(mut self, max_degrees: i32) -> Self {
        self.tilts = TiltFamily::new(max_degrees, self.angle_step.round() as i32);
        self
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            room: RoomSize::default(),
            angle_step: 3.0,
            tilts: TiltFamily::new(45, 3),
            anim_step: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RoomConfig::default();
        assert_eq!(config.room.width, 12.0);
        assert_eq!(config.tilts.steps().count(), 31);
    }

    #[test]
    fn test_max_tilt_follows_angle_step() {
        let config = RoomConfig::default().with_max_tilt(30);
        assert_eq!(config.tilts, TiltFamily::new(30, 3));
        assert_eq!(config.tilts.steps().count(), 21);
    }
}
