//! ASCII rasterizer for terminal rendering

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Vector3;
use room3d_core::transform::{mvp_matrix, normalize, transform_vector};
use room3d_core::{
    Camera, DrawCall, DrawTarget, GeometryRecord, Light, Mat4, Surface, TextureSlot, Vec3,
};
use std::io::Write;

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Fragments whose alpha falls below this are discarded
const ALPHA_CUTOFF: f32 = 0.5;

/// Glyph and base color standing in for each texture
fn texture_look(slot: TextureSlot) -> (char, [f32; 3]) {
    match slot {
        TextureSlot::Floor => ('=', [0.55, 0.35, 0.2]),
        TextureSlot::Wall => ('#', [0.3, 0.45, 0.9]),
        TextureSlot::Fish => ('@', [1.0, 0.55, 0.1]),
    }
}

/// ASCII renderer that rasterizes index ranges of the uploaded buffers
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    buffers: GeometryRecord,
    camera: Camera,
    view: Mat4,
    projection: Mat4,
    light: Option<Light>,
    culling: bool,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        // terminal cells are about twice as tall as wide
        let camera = Camera::new(width as u32, 2 * height as u32);
        let (view, projection) = (camera.view_matrix(), camera.projection_matrix());
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
            buffers: GeometryRecord::new(),
            camera,
            view,
            projection,
            light: None,
            culling: false,
        }
    }

    /// Keep a copy of the merged buffers; draws refer to them by index range
    pub fn upload(&mut self, buffers: &GeometryRecord) {
        self.buffers = buffers.clone();
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self {
            buffers: std::mem::take(&mut self.buffers),
            light: self.light,
            culling: self.culling,
            ..Self::new(width, height)
        };
    }

    pub fn clear(&mut self) {
        for i in 0..self.depth_buffer.len() {
            self.depth_buffer[i] = f32::INFINITY;
            self.char_buffer[i] = ' ';
            self.color_buffer[i] = Color::Reset;
        }
    }

    /// Character at a cell, for inspection
    pub fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    fn shade(&self, call: &DrawCall, first_vertex: usize) -> Option<(char, Color)> {
        let vertex_color = self.buffers.color(first_vertex);
        let (glyph, base, alpha) = match call.surface {
            Surface::Flat => (
                None,
                [vertex_color.r, vertex_color.g, vertex_color.b],
                vertex_color.alpha,
            ),
            Surface::Textured(slot) => {
                let (glyph, base) = texture_look(slot);
                (Some(glyph), base, 1.0)
            }
        };
        if alpha < ALPHA_CUTOFF {
            return None;
        }

        let [nx, ny, nz] = self.buffers.normal(first_vertex);
        let normal = normalize(&transform_vector(&call.normal, &Vector3::new(nx, ny, nz)))
            .unwrap_or_else(Vec3::y);
        let brightness = match &self.light {
            Some(light) => normal.dot(&light.direction).max(light.ambient),
            None => 1.0,
        }
        .min(1.0);

        let character = glyph.unwrap_or_else(|| {
            let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
            LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)]
        });
        let channel = |c: f32| (c * brightness * 255.0).clamp(0.0, 255.0) as u8;
        let color = Color::Rgb {
            r: channel(base[0]),
            g: channel(base[1]),
            b: channel(base[2]),
        };
        Some((character, color))
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Color) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                            self.color_buffer[idx] = color;
                        }
                    }
                }
            }
        }
    }

    /// Write the frame to the terminal
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DrawTarget for AsciiRenderer {
    fn draw(&mut self, call: &DrawCall) {
        let mvp = mvp_matrix(&call.model, &self.view, &self.projection);
        let end = call.range.end().min(self.buffers.indices.len());
        let start = call.range.offset.min(end);

        for t in (start..end).step_by(3) {
            if t + 3 > end {
                break;
            }
            let ids = [
                self.buffers.indices[t] as usize,
                self.buffers.indices[t + 1] as usize,
                self.buffers.indices[t + 2] as usize,
            ];

            let mut coords = [(0.0, 0.0, 0.0); 3];
            let mut visible = true;
            for (slot, &id) in coords.iter_mut().zip(&ids) {
                let [x, y, z] = self.buffers.position(id);
                match self.camera.project_to_screen(
                    &Vec3::new(x, y, z),
                    &mvp,
                    self.width as u32,
                    self.height as u32,
                ) {
                    Some(p) => *slot = p,
                    None => visible = false,
                }
            }
            if !visible {
                continue;
            }

            // counter-clockwise on screen (y down) means a negative area
            let (a, b, c) = (coords[0], coords[1], coords[2]);
            let area = (b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1);
            if self.culling && area >= 0.0 {
                continue;
            }

            if let Some((character, color)) = self.shade(call, ids[0]) {
                self.rasterize_triangle(&coords, character, color);
            }
        }
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

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
