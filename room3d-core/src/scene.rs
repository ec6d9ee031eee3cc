//! The furnished room: startup registration and per-frame traversal.

use tracing::{debug, info, trace};

use crate::composite::{
    draw_fish_tank, draw_mirror, draw_room, draw_seat, draw_table, draw_tv, Dimensions,
    SeatComponents, COMPOSITE_SHAPES,
};
use crate::config::RoomConfig;
use crate::draw::{DrawContext, DrawTarget, Light};
use crate::error::Result;
use crate::registry::{register_shapes, RegisteredGeometry, ShapeCatalog, TiltFamily};
use crate::state::SceneState;
use crate::transform::{normalize, rotation, transform_vector, Vec3};

/// Floor of the diffuse term used by the room's shading
pub const AMBIENT: f32 = 0.4;

const SEAT_SIZE: Dimensions = Dimensions::uniform(0.3);
const TABLE_SIZE: Dimensions = Dimensions::new(2.0, 1.0, 1.0);
const TANK_HEIGHT: f32 = 1.0;
const TV_SIZE: Dimensions = Dimensions::new(1.5, 1.2, 1.0);
const MIRROR_SIZE: Dimensions = Dimensions::new(1.5, 2.0, 1.0);

/// Seat placements around the room as fractions of the half extents,
/// plus the seat's heading in degrees. Seats travel from one slot to the next.
const SEAT_SLOTS: [[f32; 4]; 4] = [
    [-0.8, -1.0, -0.6, 80.0],
    [-0.8, -1.0, 0.1, 100.0],
    [-0.3, -1.0, 0.6, 165.0],
    [0.2, -1.0, 0.7, 190.0],
];

/// Summary of one traversal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub table_height: f32,
}

/// Registered geometry plus everything precomputed at startup.
#[derive(Debug, Clone)]
pub struct Scene {
    config: RoomConfig,
    geometry: RegisteredGeometry,
    seat: SeatComponents,
}

impl Scene {
    /// Build the stock room catalog and check that every shape the drawers
    /// use is present.
    pub fn new(config: RoomConfig) -> Result<Self> {
        let catalog = ShapeCatalog::room(&config.tilts);
        Self::with_catalog(config, &catalog)
    }

    pub fn with_catalog(config: RoomConfig, catalog: &ShapeCatalog) -> Result<Self> {
        let geometry = register_shapes(catalog)?;

        geometry.directory.require(COMPOSITE_SHAPES)?;
        geometry
            .directory
            .require(config.tilts.steps().map(TiltFamily::shape_name))?;

        let seat = SeatComponents::new()?;
        debug!(parts = seat.parts().len(), "seat components ready");
        info!(shapes = geometry.directory.len(), "scene ready");

        Ok(Self {
            config,
            geometry,
            seat,
        })
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn geometry(&self) -> &RegisteredGeometry {
        &self.geometry
    }

    /// Light for the given view: `(2, 3, 4)` turned with the room's x and y rotation.
    pub fn light(&self, state: &SceneState) -> Light {
        let turn = rotation(state.angles.x, 1.0, 0.0, 0.0) * rotation(state.angles.y, 0.0, 1.0, 0.0);
        let direction = transform_vector(&turn, &Vec3::new(2.0, 3.0, 4.0));
        Light {
            direction: normalize(&direction).unwrap_or_else(Vec3::y),
            color: [1.0, 1.0, 1.0],
            ambient: AMBIENT,
        }
    }

    /// Traverse the whole room once, issuing every draw to `target`.
    ///
    /// Culling is enabled at the start of the frame; the transform stack
    /// starts empty and must be empty again at the end.
    pub fn draw_frame<T: DrawTarget + ?Sized>(
        &self,
        state: &SceneState,
        target: &mut T,
    ) -> Result<FrameStats> {
        target.set_culling(true);
        target.set_light(&self.light(state));

        let room = self.config.room;
        let (h, d, w) = (room.height, room.depth, room.width);
        let tilt = self.config.tilts.quantize(state.tank_tilt as f32);

        let mut ctx = DrawContext::new(&self.geometry.directory, target, state.textures);
        ctx.stack_mut().set(state.angles.matrix());

        draw_room(&mut ctx, &room)?;

        let anim = state.anim;
        let hop = 6.0 * (anim * (1.0 - anim)) - 1.0;
        for (i, from) in SEAT_SLOTS.iter().enumerate() {
            let next = (i + 1) % SEAT_SLOTS.len();
            let to = &SEAT_SLOTS[next];
            let lerp = |k: usize| (1.0 - anim) * from[k] + anim * to[k];
            // the seat wrapping round to the first slot jumps over the others
            let y = if next == 0 { hop } else { lerp(1) };

            ctx.nested(|ctx| {
                ctx.translate(lerp(0) * w / 2.0, y * h / 2.0, lerp(2) * d / 2.0)
                    .rotate(lerp(3), 0.0, 1.0, 0.0);
                draw_seat(ctx, &self.seat, SEAT_SIZE)
            })?;
        }

        let table_height = ctx.nested(|ctx| {
            ctx.translate(0.0, -h / 2.0, 0.0);
            draw_table(ctx, TABLE_SIZE)
        })?;

        let tank = Dimensions::new(TABLE_SIZE.x, TANK_HEIGHT, TABLE_SIZE.z);
        ctx.nested(|ctx| {
            ctx.translate(0.0, table_height - h / 2.0, 0.0);
            draw_fish_tank(ctx, tank, tilt)
        })?;

        ctx.nested(|ctx| {
            ctx.translate(0.0, -h / 2.0, -d / 2.0 + 1.0);
            draw_tv(ctx, TV_SIZE)
        })?;

        ctx.nested(|ctx| {
            ctx.translate(w / 2.0 - 0.05, 0.0, 0.0)
                .rotate(-90.0, 0.0, 1.0, 0.0);
            draw_mirror(ctx, MIRROR_SIZE)
        })?;

        let draw_calls = ctx.draw_count();
        ctx.finish()?;
        trace!(draw_calls, tilt, anim, "frame drawn");

        Ok(FrameStats {
            draw_calls,
            table_height,
        })
    }
}
