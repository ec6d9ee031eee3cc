//! Furniture built from nested push/transform/draw/pop blocks.
//!
//! Every drawer leaves the transform stack at the depth it found it; the
//! working matrix on entry is the object's placement in the room.

use tracing::trace;

use crate::config::RoomSize;
use crate::draw::{DrawContext, DrawTarget, Surface, TextureSlot};
use crate::error::Result;
use crate::registry::TiltFamily;
use crate::stack::TransformStack;
use crate::transform::Mat4;

/// Per-axis scale applied to a whole composite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Dimensions {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn uniform(s: f32) -> Self {
        Self::new(s, s, s)
    }
}

pub const FURNITURE: &str = "furniture";
pub const WALL: &str = "wall";
pub const FISH: &str = "fish";
pub const GLASS: &str = "glass";
pub const TV: &str = "tv";
pub const SCREEN: &str = "screen";
pub const MIRROR: &str = "mirror";

/// Names every drawer in this module may look up
pub const COMPOSITE_SHAPES: [&str; 7] = [FURNITURE, WALL, FISH, GLASS, TV, SCREEN, MIRROR];

const SEAT_THICKNESS: f32 = 0.75;
const ARM_HEIGHT: f32 = 4.0;
const BACK_HEIGHT: f32 = 4.0;
const SEAT_CUSHION_HEIGHT: f32 = 1.0;
const BACK_CUSHION_HEIGHT: f32 = 4.0;

/// Seat pad, both arms, back, seat cushion and back cushion, relative to a
/// seat standing on its origin. Built once and shared by every seat.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatComponents {
    parts: Vec<Mat4>,
}

impl SeatComponents {
    pub fn new() -> Result<Self> {
        let mut stack = TransformStack::new();
        let mut parts = Vec::with_capacity(6);

        let mut part = |translate: [f32; 3], scale: [f32; 3]| -> Result<()> {
            stack.nested(|s| {
                s.translate(translate[0], translate[1], translate[2])
                    .scale(scale[0], scale[1], scale[2]);
                parts.push(*s.current());
                Ok(())
            })
        };

        part([0.0, SEAT_THICKNESS / 2.0, 0.0], [4.0, SEAT_THICKNESS, 5.0])?;
        part([2.5, ARM_HEIGHT / 2.0, 0.0], [1.0, ARM_HEIGHT, 5.0])?;
        part([-2.5, ARM_HEIGHT / 2.0, 0.0], [1.0, ARM_HEIGHT, 5.0])?;
        part([0.0, BACK_HEIGHT / 2.0, -2.25], [4.0, BACK_HEIGHT, 0.5])?;
        part(
            [0.0, SEAT_THICKNESS + SEAT_CUSHION_HEIGHT / 2.0, 0.1],
            [4.0, SEAT_CUSHION_HEIGHT, 5.2],
        )?;
        part(
            [0.0, SEAT_THICKNESS + BACK_CUSHION_HEIGHT / 2.0, -1.75],
            [4.0, BACK_CUSHION_HEIGHT, 0.5],
        )?;

        stack.ensure_empty()?;
        Ok(Self { parts })
    }

    pub fn parts(&self) -> &[Mat4] {
        &self.parts
    }
}

/// Draw one seat scaled by `dims` at the working matrix.
pub fn draw_seat<T: DrawTarget + ?Sized>(
    ctx: &mut DrawContext<'_, T>,
    seat: &SeatComponents,
    dims: Dimensions,
) -> Result<()> {
    ctx.nested(|ctx| {
        ctx.scale(dims.x, dims.y, dims.z);
        for part in seat.parts() {
            ctx.nested(|ctx| {
                ctx.concat(part);
                ctx.draw_shape(FURNITURE, Surface::Flat)
            })?;
        }
        Ok(())
    })
}

const TABLE_BASE_HEIGHT: f32 = 1.0;
const TABLE_THICKNESS: f32 = 0.5;

/// Draw a table standing on the working origin and return its height, for
/// stacking things on top.
pub fn draw_table<T: DrawTarget + ?Sized>(
    ctx: &mut DrawContext<'_, T>,
    dims: Dimensions,
) -> Result<f32> {
    ctx.nested(|ctx| {
        ctx.scale(dims.x, dims.y, dims.z);

        ctx.nested(|ctx| {
            ctx.translate(0.0, TABLE_BASE_HEIGHT / 2.0, 0.0);
            ctx.draw_shape(FURNITURE, Surface::Flat)
        })?;

        ctx.nested(|ctx| {
            ctx.translate(0.0, TABLE_BASE_HEIGHT + TABLE_THICKNESS / 2.0, 0.0)
                .scale(2.0, TABLE_THICKNESS, 2.0);
            ctx.draw_shape(FURNITURE, Surface::Flat)
        })?;

        Ok(dims.y * (TABLE_BASE_HEIGHT + TABLE_THICKNESS))
    })
}

/// Glass wall thickness of the tank, in tank units
pub const GLASS_THICKNESS: f32 = 0.1;
/// Fill level of the tank, in tank units
pub const WATER_DEPTH: f32 = 0.6;

fn water_height(dims: Dimensions) -> f32 {
    -(1.0 - WATER_DEPTH - GLASS_THICKNESS / 2.0) / 2.0 + dims.y / 2.0
}

/// Draw the fish tank standing on the working origin, rolled by `tilt`
/// degrees around its lower edge. `tilt` must be one of the precomputed
/// water steps (see [`TiltFamily`]).
pub fn draw_fish_tank<T: DrawTarget + ?Sized>(
    ctx: &mut DrawContext<'_, T>,
    dims: Dimensions,
    tilt: i32,
) -> Result<()> {
    let water = TiltFamily::shape_name(tilt);
    trace!(tilt, shape = %water, "drawing fish tank");

    ctx.nested(|ctx| {
        // roll around whichever bottom edge stays on the table
        let pivot = match tilt.signum() {
            1 => -dims.x / 2.0,
            -1 => dims.x / 2.0,
            _ => 0.0,
        };
        ctx.translate(pivot, 0.0, 0.0)
            .rotate(tilt as f32, 0.0, 0.0, 1.0)
            .translate(-pivot, 0.0, 0.0)
            .scale(dims.x, dims.y, dims.z);

        ctx.nested(|ctx| {
            ctx.translate(0.0, water_height(dims), 0.0).scale(
                1.0 - GLASS_THICKNESS,
                WATER_DEPTH - GLASS_THICKNESS,
                1.0 - GLASS_THICKNESS,
            );
            ctx.draw_shape(&water, Surface::Flat)
        })?;

        ctx.nested(|ctx| {
            ctx.translate(0.0, dims.y / 2.0, 0.0);
            ctx.draw_shape(GLASS, Surface::Flat)
        })
    })?;

    // the fish quad is seen from both sides
    let surface = ctx.textures().surface(TextureSlot::Fish);
    let mut open = ctx.without_culling();
    open.nested(|ctx| {
        ctx.translate(0.0, water_height(dims), 0.0)
            .rotate(-90.0, 1.0, 0.0, 0.0);
        ctx.draw_shape(FISH, surface)
    })?;
    Ok(())
}

const TV_BASE_HEIGHT: f32 = 0.1;
const TV_STAND_HEIGHT: f32 = 0.3;
const TV_BOX_HEIGHT: f32 = 0.6;
const TV_BOX_DEPTH: f32 = 0.15;
/// Distance the screen sits in front of the box face
pub const SCREEN_GAP: f32 = 0.01;

/// Draw a TV standing on the working origin, screen facing +Z.
pub fn draw_tv<T: DrawTarget + ?Sized>(ctx: &mut DrawContext<'_, T>, dims: Dimensions) -> Result<()> {
    let box_centre = TV_BASE_HEIGHT + TV_STAND_HEIGHT + TV_BOX_HEIGHT / 2.0;

    ctx.nested(|ctx| {
        ctx.scale(dims.x, dims.y, dims.z);

        ctx.nested(|ctx| {
            ctx.translate(0.0, TV_BASE_HEIGHT / 2.0, 0.0)
                .scale(0.6, TV_BASE_HEIGHT, 0.4);
            ctx.draw_shape(TV, Surface::Flat)
        })?;

        ctx.nested(|ctx| {
            ctx.translate(0.0, TV_BASE_HEIGHT + TV_STAND_HEIGHT / 2.0, 0.0)
                .scale(0.1, TV_STAND_HEIGHT, 0.1);
            ctx.draw_shape(TV, Surface::Flat)
        })?;

        ctx.nested(|ctx| {
            ctx.translate(0.0, box_centre, 0.0)
                .scale(1.0, TV_BOX_HEIGHT, TV_BOX_DEPTH);
            ctx.draw_shape(TV, Surface::Flat)
        })?;

        ctx.nested(|ctx| {
            ctx.translate(0.0, box_centre, TV_BOX_DEPTH / 2.0 + SCREEN_GAP)
                .rotate(90.0, 1.0, 0.0, 0.0)
                .scale(0.9, 1.0, TV_BOX_HEIGHT - 0.1);
            ctx.draw_shape(SCREEN, Surface::Flat)
        })
    })
}

const MIRROR_FRAME_DEPTH: f32 = 0.05;
const MIRROR_BORDER: f32 = 0.1;

/// Draw a framed mirror centred on the working origin, glass facing +Z.
pub fn draw_mirror<T: DrawTarget + ?Sized>(
    ctx: &mut DrawContext<'_, T>,
    dims: Dimensions,
) -> Result<()> {
    ctx.nested(|ctx| {
        ctx.scale(dims.x, dims.y, dims.z);

        ctx.nested(|ctx| {
            ctx.scale(1.0, 1.0, MIRROR_FRAME_DEPTH);
            ctx.draw_shape(FURNITURE, Surface::Flat)
        })?;

        ctx.nested(|ctx| {
            ctx.translate(0.0, 0.0, MIRROR_FRAME_DEPTH / 2.0 + SCREEN_GAP)
                .rotate(90.0, 1.0, 0.0, 0.0)
                .scale(1.0 - MIRROR_BORDER, 1.0, 1.0 - MIRROR_BORDER);
            ctx.draw_shape(MIRROR, Surface::Flat)
        })
    })
}

/// Draw the floor and the four walls of a room centred on the working origin.
pub fn draw_room<T: DrawTarget + ?Sized>(ctx: &mut DrawContext<'_, T>, room: &RoomSize) -> Result<()> {
    let (h, d, w) = (room.height, room.depth, room.width);
    let floor = ctx.textures().surface(TextureSlot::Floor);
    let wall = ctx.textures().surface(TextureSlot::Wall);

    ctx.nested(|ctx| {
        ctx.translate(0.0, -h / 2.0, 0.0).scale(w, 1.0, d);
        ctx.draw_shape(WALL, floor)
    })?;

    // (rotation angle, rotation axis, distance from centre, scale)
    let walls = [
        (90.0, [1.0, 0.0, 0.0], d / 2.0, [w, 1.0, h]),
        (-90.0, [1.0, 0.0, 0.0], d / 2.0, [w, 1.0, h]),
        (-90.0, [0.0, 0.0, 1.0], w / 2.0, [h, 1.0, d]),
        (90.0, [0.0, 0.0, 1.0], w / 2.0, [h, 1.0, d]),
    ];
    for (angle, axis, distance, scale) in walls {
        ctx.nested(|ctx| {
            ctx.rotate(angle, axis[0], axis[1], axis[2])
                .translate(0.0, -distance, 0.0)
                .scale(scale[0], scale[1], scale[2]);
            ctx.draw_shape(WALL, wall)
        })?;
    }
    Ok(())
}
