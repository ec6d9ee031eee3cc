//! room3d Web - WASM bindings for a WebGL front end
//!
//! The page uploads the merged buffers once, forwards key presses and
//! texture load notifications, and replays the packed draw list returned
//! by `frame()` with its own shader program.

use room3d_core::{
    Axis, Camera, Color, Command, Direction, DrawCall, DrawTarget, Light, RoomConfig, Scene,
    SceneError, SceneState, ShapeCatalog, ShapeKind, Surface, TextureSlot, TiltFamily,
};
use wasm_bindgen::prelude::*;

/// Floats per packed draw: model (16), normal matrix (16), offset, count,
/// surface code, culling flag
pub const DRAW_STRIDE: usize = 36;

fn to_js(err: SceneError) -> JsValue {
    let message = err.to_string();
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// Map a DOM `keyCode` to a scene command
pub fn command_for_key_code(code: u32) -> Option<Command> {
    use Direction::{Negative, Positive};

    let command = match code {
        40 => Command::Rotate(Axis::X, Positive),
        38 => Command::Rotate(Axis::X, Negative),
        39 => Command::Rotate(Axis::Y, Positive),
        37 => Command::Rotate(Axis::Y, Negative),
        69 => Command::Rotate(Axis::Z, Negative),
        81 => Command::Rotate(Axis::Z, Positive),
        68 => Command::Tilt(Negative),
        65 => Command::Tilt(Positive),
        32 => Command::Animate,
        _ => return None,
    };
    Some(command)
}

/// Texture units in the order the page binds them
pub fn texture_slot(unit: u32) -> Option<TextureSlot> {
    match unit {
        0 => Some(TextureSlot::Floor),
        1 => Some(TextureSlot::Wall),
        2 => Some(TextureSlot::Fish),
        _ => None,
    }
}

/// 0 for vertex colors, otherwise the texture unit plus one
pub fn surface_code(surface: Surface) -> f32 {
    match surface {
        Surface::Flat => 0.0,
        Surface::Textured(TextureSlot::Floor) => 1.0,
        Surface::Textured(TextureSlot::Wall) => 2.0,
        Surface::Textured(TextureSlot::Fish) => 3.0,
    }
}

/// Draw target that flattens each call into `DRAW_STRIDE` floats
#[derive(Debug, Default)]
pub struct PackedDraws {
    pub data: Vec<f32>,
    pub light: Option<Light>,
    culling: bool,
}

impl DrawTarget for PackedDraws {
    fn draw(&mut self, call: &DrawCall) {
        self.data.extend_from_slice(call.model.as_slice());
        self.data.extend_from_slice(call.normal.as_slice());
        self.data.push(call.range.offset as f32);
        self.data.push(call.range.count as f32);
        self.data.push(surface_code(call.surface));
        self.data.push(if self.culling { 1.0 } else { 0.0 });
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

/// Collects extra shapes before the scene is built
#[wasm_bindgen]
pub struct WebSceneBuilder {
    config: RoomConfig,
    catalog: ShapeCatalog,
}

#[wasm_bindgen]
impl WebSceneBuilder {
    #[wasm_bindgen(constructor)]
    pub fn new(max_tilt: i32) -> WebSceneBuilder {
        let config = RoomConfig::default().with_max_tilt(max_tilt);
        let catalog = ShapeCatalog::room(&config.tilts);
        WebSceneBuilder { config, catalog }
    }

    /// Register another shape; `kind` is "square", "cube" or "tiltedcube"
    #[wasm_bindgen(js_name = addShape)]
    #[allow(clippy::too_many_arguments)]
    pub fn add_shape(
        &mut self,
        name: &str,
        kind: &str,
        param: f32,
        r: f32,
        g: f32,
        b: f32,
        alpha: f32,
    ) -> Result<(), JsValue> {
        let kind = ShapeKind::from_name(kind, param).map_err(to_js)?;
        self.catalog.push(name, Color::new(r, g, b, alpha), kind);
        Ok(())
    }

    pub fn build(self, width: u32, height: u32) -> Result<WebScene, JsValue> {
        let scene = Scene::with_catalog(self.config, &self.catalog).map_err(to_js)?;
        Ok(WebScene::from_scene(scene, width, height))
    }
}

#[wasm_bindgen]
pub struct WebScene {
    scene: Scene,
    state: SceneState,
    camera: Camera,
    last_frame: PackedDraws,
}

impl WebScene {
    fn from_scene(scene: Scene, width: u32, height: u32) -> Self {
        Self {
            scene,
            state: SceneState::new(),
            camera: Camera::new(width, height),
            last_frame: PackedDraws::default(),
        }
    }

    fn pack_frame(&mut self) -> Result<Vec<f32>, SceneError> {
        let mut packed = PackedDraws::default();
        self.scene.draw_frame(&self.state, &mut packed)?;
        let data = packed.data.clone();
        self.last_frame = packed;
        Ok(data)
    }
}

#[wasm_bindgen]
impl WebScene {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Result<WebScene, JsValue> {
        let scene = Scene::new(RoomConfig::default()).map_err(to_js)?;
        Ok(WebScene::from_scene(scene, width, height))
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    pub fn vertices(&self) -> Vec<f32> {
        self.scene.geometry().buffers.vertices.clone()
    }

    pub fn colors(&self) -> Vec<f32> {
        self.scene.geometry().buffers.colors.clone()
    }

    pub fn normals(&self) -> Vec<f32> {
        self.scene.geometry().buffers.normals.clone()
    }

    #[wasm_bindgen(js_name = texCoords)]
    pub fn tex_coords(&self) -> Vec<f32> {
        self.scene.geometry().buffers.tex_coords.clone()
    }

    /// Index buffer narrowed for `UNSIGNED_SHORT` draws
    pub fn indices(&self) -> Result<Vec<u16>, JsValue> {
        self.scene.geometry().indices_u16().map_err(to_js)
    }

    /// Handle a key press; returns whether the page should redraw
    pub fn key(&mut self, code: u32) -> bool {
        match command_for_key_code(code) {
            Some(command) => self.state.apply(command, self.scene.config()),
            None => false,
        }
    }

    #[wasm_bindgen(js_name = setTextureLoaded)]
    pub fn set_texture_loaded(&mut self, unit: u32, loaded: bool) -> bool {
        match texture_slot(unit) {
            Some(slot) => {
                self.state.textures.set(slot, loaded);
                true
            }
            None => false,
        }
    }

    /// Traverse the room and return `DRAW_STRIDE` floats per draw
    pub fn frame(&mut self) -> Result<Vec<f32>, JsValue> {
        self.pack_frame().map_err(to_js)
    }

    #[wasm_bindgen(js_name = viewMatrix)]
    pub fn view_matrix(&self) -> Vec<f32> {
        self.camera.view_matrix().as_slice().to_vec()
    }

    #[wasm_bindgen(js_name = projectionMatrix)]
    pub fn projection_matrix(&self) -> Vec<f32> {
        self.camera.projection_matrix().as_slice().to_vec()
    }

    /// Light direction (3), color (3) and ambient of the last frame
    pub fn light(&self) -> Vec<f32> {
        let light = self
            .last_frame
            .light
            .unwrap_or_else(|| self.scene.light(&self.state));
        let mut out = light.direction.as_slice().to_vec();
        out.extend_from_slice(&light.color);
        out.push(light.ambient);
        out
    }

    #[wasm_bindgen(js_name = waterSteps)]
    pub fn water_steps(&self) -> Vec<i32> {
        self.scene.config().tilts.steps().collect()
    }

    #[wasm_bindgen(js_name = waterShape)]
    pub fn water_shape(tilt: i32) -> String {
        TiltFamily::shape_name(tilt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(
            command_for_key_code(37),
            Some(Command::Rotate(Axis::Y, Direction::Negative))
        );
        assert_eq!(command_for_key_code(65), Some(Command::Tilt(Direction::Positive)));
        assert_eq!(command_for_key_code(32), Some(Command::Animate));
        assert_eq!(command_for_key_code(13), None);
    }

    #[test]
    fn test_frame_packing() {
        let scene = Scene::new(RoomConfig::default()).unwrap();
        let mut web = WebScene::from_scene(scene, 800, 600);
        let data = web.pack_frame().unwrap();

        assert_eq!(data.len() % DRAW_STRIDE, 0);
        let draws = data.len() / DRAW_STRIDE;
        assert_eq!(draws, 40);

        // exactly one draw goes out with culling off
        let open = data
            .chunks(DRAW_STRIDE)
            .filter(|d| d[DRAW_STRIDE - 1] == 0.0)
            .count();
        assert_eq!(open, 1);
        assert_eq!(web.light().len(), 7);
    }

    #[test]
    fn test_texture_units_change_surfaces() {
        let scene = Scene::new(RoomConfig::default()).unwrap();
        let mut web = WebScene::from_scene(scene, 800, 600);
        for unit in 0..3 {
            assert!(web.set_texture_loaded(unit, true));
        }
        assert!(!web.set_texture_loaded(3, true));

        let data = web.pack_frame().unwrap();
        let textured = data
            .chunks(DRAW_STRIDE)
            .filter(|d| d[DRAW_STRIDE - 2] > 0.0)
            .count();
        assert_eq!(textured, 6);
    }

    #[test]
    fn test_builder_bounds_max_tilt() {
        let builder = WebSceneBuilder::new(i32::MIN);
        assert_eq!(builder.config.tilts.max_degrees, room3d_core::registry::MAX_TILT_DEGREES);

        let builder = WebSceneBuilder::new(1000);
        assert!(builder.config.tilts.steps().all(|t| t.abs() <= 80));
        let registered = room3d_core::register_shapes(&builder.catalog).unwrap();
        assert!(registered.indices_u16().is_ok());
    }

    #[test]
    fn test_keys_change_state() {
        let scene = Scene::new(RoomConfig::default()).unwrap();
        let mut web = WebScene::from_scene(scene, 800, 600);
        assert!(web.key(68));
        assert_eq!(web.state.tank_tilt, -3);
        assert!(!web.key(13));
    }
}
