//! The seam between the scene traversal and whatever rasterizes it.
//!
//! A [`DrawTarget`] receives `(model matrix, index range, surface)` triples
//! drawn from the merged buffers uploaded once at startup. [`DrawContext`]
//! bundles a target with the shape directory and the per-frame transform
//! stack so composite drawers only have to say *what* to draw.

use std::ops::{Deref, DerefMut};

use crate::error::Result;
use crate::registry::{DrawRange, ShapeDirectory};
use crate::stack::TransformStack;
use crate::transform::{normal_matrix, Mat4, Vec3};

/// Texture units the room uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Floor,
    Wall,
    Fish,
}

/// How a shape is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Per-vertex colors from the buffers
    Flat,
    /// Sample the texture bound to the slot
    Textured(TextureSlot),
}

/// Which textures finished loading. A texture that is not ready is not an
/// error; shapes that want it fall back to [`Surface::Flat`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureFlags {
    pub floor: bool,
    pub wall: bool,
    pub fish: bool,
}

impl TextureFlags {
    pub fn all_ready() -> Self {
        Self {
            floor: true,
            wall: true,
            fish: true,
        }
    }

    pub fn is_ready(&self, slot: TextureSlot) -> bool {
        match slot {
            TextureSlot::Floor => self.floor,
            TextureSlot::Wall => self.wall,
            TextureSlot::Fish => self.fish,
        }
    }

    pub fn set(&mut self, slot: TextureSlot, ready: bool) {
        match slot {
            TextureSlot::Floor => self.floor = ready,
            TextureSlot::Wall => self.wall = ready,
            TextureSlot::Fish => self.fish = ready,
        }
    }

    /// Textured when ready, flat otherwise
    pub fn surface(&self, slot: TextureSlot) -> Surface {
        if self.is_ready(slot) {
            Surface::Textured(slot)
        } else {
            Surface::Flat
        }
    }
}

/// Directional light for the frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Unit vector towards the light, world space
    pub direction: Vec3,
    pub color: [f32; 3],
    /// Lower bound on the diffuse term
    pub ambient: f32,
}

/// One indexed draw from the merged buffers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub model: Mat4,
    /// Transpose of the inverse of `model`
    pub normal: Mat4,
    pub range: DrawRange,
    pub surface: Surface,
}

/// Consumer of the traversal's draw calls
pub trait DrawTarget {
    fn draw(&mut self, call: &DrawCall);

    /// Enable or disable back-face culling for subsequent draws
    fn set_culling(&mut self, enabled: bool);

    fn culling(&self) -> bool;

    fn set_light(&mut self, _light: &Light) {}
}

/// A draw call together with the culling state it was issued under
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedDraw {
    pub call: DrawCall,
    pub culling: bool,
}

/// [`DrawTarget`] that keeps every call in memory
#[derive(Debug, Clone, Default)]
pub struct DrawRecorder {
    pub draws: Vec<RecordedDraw>,
    pub light: Option<Light>,
    culling: bool,
}

impl DrawRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.draws.clear();
        self.light = None;
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

impl DrawTarget for DrawRecorder {
    fn draw(&mut self, call: &DrawCall) {
        self.draws.push(RecordedDraw {
            call: *call,
            culling: self.culling,
        });
    }

    fn set_culling(&mut self, enabled: bool) {
        self.culling = enabled;
    }

    fn culling(&self) -> bool {
        self.culling
    }

    fn set_light(&mut self, light: &Light) {
        self.light = Some(*light);
    }
}

/// Everything a composite drawer needs: where shapes live, the working
/// transform, the target, and which textures are ready.
pub struct DrawContext<'a, T: DrawTarget + ?Sized> {
    directory: &'a ShapeDirectory,
    stack: TransformStack,
    target: &'a mut T,
    textures: TextureFlags,
    draws: usize,
}

impl<'a, T: DrawTarget + ?Sized> DrawContext<'a, T> {
    pub fn new(directory: &'a ShapeDirectory, target: &'a mut T, textures: TextureFlags) -> Self {
        Self {
            directory,
            stack: TransformStack::new(),
            target,
            textures,
            draws: 0,
        }
    }

    pub fn stack(&self) -> &TransformStack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut TransformStack {
        &mut self.stack
    }

    pub fn textures(&self) -> TextureFlags {
        self.textures
    }

    /// Draw calls issued through this context so far
    pub fn draw_count(&self) -> usize {
        self.draws
    }

    pub fn target(&self) -> &T {
        &*self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut *self.target
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.stack.translate(x, y, z);
        self
    }

    pub fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) -> &mut Self {
        self.stack.rotate(degrees, x, y, z);
        self
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.stack.scale(x, y, z);
        self
    }

    pub fn concat(&mut self, m: &Mat4) -> &mut Self {
        self.stack.concat(m);
        self
    }

    /// Run `f` inside its own push/pop block; the pop happens even when `f` fails.
    pub fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.stack.push();
        let result = f(self);
        self.stack.pop()?;
        result
    }

    /// Draw the named shape with the working matrix
    pub fn draw_shape(&mut self, name: &str, surface: Surface) -> Result<()> {
        let range = self.directory.get(name)?;
        let model = *self.stack.current();
        let normal = normal_matrix(&model).unwrap_or(model);
        self.target.draw(&DrawCall {
            model,
            normal,
            range,
            surface,
        });
        self.draws += 1;
        Ok(())
    }

    /// Disable back-face culling until the returned guard is dropped, then
    /// restore whatever state was in effect before.
    pub fn without_culling(&mut self) -> CullingDisabled<'_, 'a, T> {
        let previous = self.target.culling();
        self.target.set_culling(false);
        CullingDisabled {
            ctx: self,
            previous,
        }
    }

    /// Hand the stack back, checking every push was matched
    pub fn finish(self) -> Result<TransformStack> {
        self.stack.ensure_empty()?;
        Ok(self.stack)
    }
}

/// Scope in which back-face culling is off. Derefs to the [`DrawContext`].
pub struct CullingDisabled<'c, 'a, T: DrawTarget + ?Sized> {
    ctx: &'c mut DrawContext<'a, T>,
    previous: bool,
}

impl<'a, T: DrawTarget + ?Sized> Deref for CullingDisabled<'_, 'a, T> {
    type Target = DrawContext<'a, T>;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl<T: DrawTarget + ?Sized> DerefMut for CullingDisabled<'_, '_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl<T: DrawTarget + ?Sized> Drop for CullingDisabled<'_, '_, T> {
    fn drop(&mut self) {
        self.ctx.target.set_culling(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::geometry::Color;
    use crate::registry::{register_shapes, ShapeCatalog, ShapeKind};

    fn directory() -> ShapeDirectory {
        let catalog = ShapeCatalog::new().with("furniture", Color::opaque(1.0, 0.0, 0.0), ShapeKind::Cube);
        register_shapes(&catalog).unwrap().directory
    }

    #[test]
    fn test_draw_shape_records_current_matrix() {
        let dir = directory();
        let mut recorder = DrawRecorder::new();
        let mut ctx = DrawContext::new(&dir, &mut recorder, TextureFlags::default());
        ctx.translate(1.0, 0.0, 0.0);
        ctx.draw_shape("furniture", Surface::Flat).unwrap();
        assert!(ctx.draw_shape("sofa", Surface::Flat).is_err());
        ctx.finish().unwrap();

        assert_eq!(recorder.len(), 1);
        let call = recorder.draws[0].call;
        assert_eq!(call.range, DrawRange { offset: 0, count: 36 });
        assert_eq!(call.model[(0, 3)], 1.0);
    }

    #[test]
    fn test_culling_guard_restores() {
        let dir = directory();
        let mut recorder = DrawRecorder::new();
        recorder.set_culling(true);
        let mut ctx = DrawContext::new(&dir, &mut recorder, TextureFlags::default());
        {
            let mut open = ctx.without_culling();
            assert!(!open.target().culling());
            open.draw_shape("furniture", Surface::Flat).unwrap();
        }
        assert!(ctx.target().culling());
        ctx.draw_shape("furniture", Surface::Flat).unwrap();

        assert!(!recorder.draws[0].culling);
        assert!(recorder.draws[1].culling);
    }

    #[test]
    fn test_culling_guard_restores_on_error() {
        let dir = directory();
        let mut recorder = DrawRecorder::new();
        recorder.set_culling(true);
        let mut ctx = DrawContext::new(&dir, &mut recorder, TextureFlags::default());

        let result = ctx.nested(|ctx| {
            let mut open = ctx.without_culling();
            open.draw_shape("missing", Surface::Flat)
        });
        assert_eq!(result.unwrap_err(), SceneError::MissingShape("missing".into()));
        assert!(ctx.target().culling());
        assert_eq!(ctx.stack().depth(), 0);
    }

    #[test]
    fn test_texture_fallback() {
        let mut flags = TextureFlags::default();
        assert_eq!(flags.surface(TextureSlot::Fish), Surface::Flat);
        flags.set(TextureSlot::Fish, true);
        assert_eq!(flags.surface(TextureSlot::Fish), Surface::Textured(TextureSlot::Fish));
    }
}
