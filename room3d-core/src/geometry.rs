//! Procedural mesh builder for the room primitives.
//!
//! Every builder is a pure function of its arguments and returns flat
//! attribute arrays ready to be appended to one shared buffer set. Indices
//! come back already shifted by the caller's `index_offset`, so the caller
//! keeps a running offset of `1 + max(index emitted so far)`.

/// Texture repeat count along each edge of a tiled square
pub const REPEAT_TILES: f32 = 10.0;

/// RGBA color with components in `[0, 1]`.
///
/// An alpha of zero marks a shape that stays invisible until its texture is ready.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
}

impl Color {
    pub const fn new(r: f32, g: f32, b: f32, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.alpha]
    }
}

/// Texture-coordinate span of a square
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TexTiling {
    /// One copy of the texture, uv in `[0, 1]`
    Single,
    /// Texture repeated [`REPEAT_TILES`] times per edge (floor boards)
    Repeat,
}

impl TexTiling {
    fn span(self) -> f32 {
        match self {
            TexTiling::Single => 1.0,
            TexTiling::Repeat => REPEAT_TILES,
        }
    }
}

/// Flat per-vertex attribute arrays plus a triangle index list
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryRecord {
    /// 3 floats per vertex
    pub vertices: Vec<f32>,
    /// 4 floats per vertex
    pub colors: Vec<f32>,
    /// 3 floats per vertex
    pub normals: Vec<f32>,
    /// 2 floats per vertex
    pub tex_coords: Vec<f32>,
    /// Triangle list referencing vertices of the merged buffer
    pub indices: Vec<u32>,
}

impl GeometryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn max_index(&self) -> Option<u32> {
        self.indices.iter().copied().max()
    }

    /// Concatenate `other` onto this record. Indices are copied as-is.
    pub fn append(&mut self, other: &GeometryRecord) {
        self.vertices.extend_from_slice(&other.vertices);
        self.colors.extend_from_slice(&other.colors);
        self.normals.extend_from_slice(&other.normals);
        self.tex_coords.extend_from_slice(&other.tex_coords);
        self.indices.extend_from_slice(&other.indices);
    }

    /// Position of vertex `i`
    pub fn position(&self, i: usize) -> [f32; 3] {
        [self.vertices[3 * i], self.vertices[3 * i + 1], self.vertices[3 * i + 2]]
    }

    /// Normal of vertex `i`
    pub fn normal(&self, i: usize) -> [f32; 3] {
        [self.normals[3 * i], self.normals[3 * i + 1], self.normals[3 * i + 2]]
    }

    /// Color of vertex `i`
    pub fn color(&self, i: usize) -> Color {
        Color::new(
            self.colors[4 * i],
            self.colors[4 * i + 1],
            self.colors[4 * i + 2],
            self.colors[4 * i + 3],
        )
    }

    fn push_vertex(&mut self, position: [f32; 3], color: Color, normal: [f32; 3], uv: [f32; 2]) {
        self.vertices.extend_from_slice(&position);
        self.colors.extend_from_slice(&color.to_array());
        self.normals.extend_from_slice(&normal);
        self.tex_coords.extend_from_slice(&uv);
    }

    /// Two triangles over the four most recently pushed vertices
    fn push_quad_indices(&mut self, first: u32) {
        self.indices
            .extend_from_slice(&[first, first + 1, first + 2, first, first + 2, first + 3]);
    }
}

/// Build a unit square in the XZ plane facing +Y.
///
/// ```text
///   v1------v0
///   /       /
/// v2------v3
/// ```
pub fn build_square(index_offset: u32, color: Color, tiling: TexTiling) -> GeometryRecord {
    let span = tiling.span();
    let corners = [
        ([0.5, 0.0, -0.5], [span, 0.0]),
        ([-0.5, 0.0, -0.5], [0.0, 0.0]),
        ([-0.5, 0.0, 0.5], [0.0, span]),
        ([0.5, 0.0, 0.5], [span, span]),
    ];

    let mut record = GeometryRecord::new();
    for (position, uv) in corners {
        record.push_vertex(position, color, [0.0, 1.0, 0.0], uv);
    }
    record.push_quad_indices(index_offset);
    record
}

/// Build a unit cube centred on the origin whose top face is tilted by
/// `top_tilt_degrees` around the Z axis.
///
/// ```text
///    v6----- v5
///   /|      /|
///  v1------v0|
///  | |     | |
///  | |v7---|-|v4
///  |/      |/
///  v2------v3
/// ```
///
/// The top edge at x = -0.5 rises by `0.5 * tan(tilt)` and the edge at
/// x = +0.5 drops by the same amount, so the top face stays level when the
/// cube itself is rolled by the same angle. A tilt of zero gives the plain
/// axis-aligned cube.
pub fn build_cube(index_offset: u32, color: Color, top_tilt_degrees: f32) -> GeometryRecord {
    let rad = top_tilt_degrees.to_radians();
    let (s, c) = rad.sin_cos();
    let t = rad.tan();

    // top corners on the +x / -x edges
    let hi_pos = 0.5 - 0.5 * t;
    let hi_neg = 0.5 + 0.5 * t;

    let v0 = [0.5, hi_pos, 0.5];
    let v1 = [-0.5, hi_neg, 0.5];
    let v2 = [-0.5, -0.5, 0.5];
    let v3 = [0.5, -0.5, 0.5];
    let v4 = [0.5, -0.5, -0.5];
    let v5 = [0.5, hi_pos, -0.5];
    let v6 = [-0.5, hi_neg, -0.5];
    let v7 = [-0.5, -0.5, -0.5];

    // (corners, normal, uv per corner); each face maps the whole texture
    let faces: [([[f32; 3]; 4], [f32; 3], [[f32; 2]; 4]); 6] = [
        ([v0, v1, v2, v3], [0.0, 0.0, 1.0], [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]]),
        ([v0, v3, v4, v5], [1.0, 0.0, 0.0], [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]),
        ([v0, v5, v6, v1], [s, c, 0.0], [[1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]),
        ([v1, v6, v7, v2], [-1.0, 0.0, 0.0], [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]]),
        ([v7, v4, v3, v2], [0.0, -1.0, 0.0], [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
        ([v4, v7, v6, v5], [0.0, 0.0, -1.0], [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
    ];

    let mut record = GeometryRecord::new();
    for (face, (corners, normal, uvs)) in faces.iter().enumerate() {
        for (corner, uv) in corners.iter().zip(uvs) {
            record.push_vertex(*corner, color, *normal, *uv);
        }
        record.push_quad_indices(index_offset + 4 * face as u32);
    }
    record
}
