//! Interactive state that changes between frames.

use crate::config::RoomConfig;
use crate::draw::TextureFlags;
use crate::transform::ViewAngles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    fn sign(self) -> f32 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

/// A user action that may require a redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Turn the whole room around a world axis
    Rotate(Axis, Direction),
    /// Tilt the fish tank one step
    Tilt(Direction),
    /// Move the seats one step along their loop
    Animate,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneState {
    pub angles: ViewAngles,
    /// Current tank tilt in degrees, always a step of the configured family
    pub tank_tilt: i32,
    /// Seat animation progress in `[0, 1)`
    pub anim: f32,
    pub textures: TextureFlags,
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `command`; returns whether anything changed.
    pub fn apply(&mut self, command: Command, config: &RoomConfig) -> bool {
        let before = *self;
        match command {
            Command::Rotate(axis, dir) => {
                let delta = dir.sign() * config.angle_step;
                match axis {
                    Axis::X => self.angles.rotate(delta, 0.0, 0.0),
                    Axis::Y => self.angles.rotate(0.0, delta, 0.0),
                    Axis::Z => self.angles.rotate(0.0, 0.0, delta),
                }
            }
            Command::Tilt(dir) => {
                let wanted = self.tank_tilt as f32 + dir.sign() * config.angle_step;
                self.tank_tilt = config.tilts.quantize(wanted);
            }
            Command::Animate => {
                self.anim = (self.anim + config.anim_step) % 1.0;
            }
        }
        *self != before
    }
}
