//! Shape catalog, buffer merging and the name -> index range directory.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::error::{Result, SceneError};
use crate::geometry::{build_cube, build_square, Color, GeometryRecord, TexTiling};

/// The primitive a catalog entry is built from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Square { tiling: TexTiling },
    Cube,
    TiltedCube { tilt_degrees: f32 },
}

impl ShapeKind {
    /// Resolve a kind named by a host (e.g. a script or a web page).
    ///
    /// `param` is the tiling factor for squares (`> 1` means repeated) and the
    /// tilt in degrees for tilted cubes; plain cubes ignore it.
    pub fn from_name(kind: &str, param: f32) -> Result<Self> {
        match kind {
            "square" => Ok(ShapeKind::Square {
                tiling: if param > 1.0 {
                    TexTiling::Repeat
                } else {
                    TexTiling::Single
                },
            }),
            "cube" => Ok(ShapeKind::Cube),
            "tiltedcube" | "tilted-cube" => Ok(ShapeKind::TiltedCube { tilt_degrees: param }),
            other => Err(SceneError::UnknownShapeKind(other.to_string())),
        }
    }

    fn build(self, index_offset: u32, color: Color) -> GeometryRecord {
        match self {
            ShapeKind::Square { tiling } => build_square(index_offset, color, tiling),
            ShapeKind::Cube => build_cube(index_offset, color, 0.0),
            ShapeKind::TiltedCube { tilt_degrees } => build_cube(index_offset, color, tilt_degrees),
        }
    }
}

/// One named entry of the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSpec {
    pub name: String,
    pub color: Color,
    pub kind: ShapeKind,
}

/// Steepest tilt a water mesh may take; `tan` diverges at 90 degrees
pub const MAX_TILT_DEGREES: i32 = 80;

/// Discrete tilt steps the fish tank can take, one water mesh per step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiltFamily {
    pub max_degrees: i32,
    pub step_degrees: i32,
}

impl TiltFamily {
    /// Both bounds are taken by magnitude; the maximum is capped at
    /// [`MAX_TILT_DEGREES`] and the step kept in `1..=MAX_TILT_DEGREES`.
    pub fn new(max_degrees: i32, step_degrees: i32) -> Self {
        let cap = MAX_TILT_DEGREES.unsigned_abs();
        Self {
            max_degrees: max_degrees.unsigned_abs().min(cap) as i32,
            step_degrees: step_degrees.unsigned_abs().clamp(1, cap) as i32,
        }
    }

    /// Every supported tilt, from `-max` to `+max`
    pub fn steps(&self) -> impl Iterator<Item = i32> {
        let step = self.step_degrees;
        let count = self.max_degrees / step;
        (-count..=count).map(move |i| i * step)
    }

    /// Snap an arbitrary angle to the nearest supported step. NaN maps to 0.
    pub fn quantize(&self, degrees: f32) -> i32 {
        let count = (self.max_degrees / self.step_degrees) as f32;
        let index = (degrees / self.step_degrees as f32).round().clamp(-count, count);
        index as i32 * self.step_degrees
    }

    /// Catalog name of the water mesh for `tilt` degrees
    pub fn shape_name(tilt: i32) -> String {
        format!("water{tilt}")
    }
}

impl Default for TiltFamily {
    fn default() -> Self {
        Self::new(45, 3)
    }
}

pub const WATER_COLOR: Color = Color::new(0.0, 0.5, 1.0, 0.5);

/// Ordered list of shapes; order decides where each lands in the merged buffers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeCatalog {
    specs: Vec<ShapeSpec>,
}

impl ShapeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, color: Color, kind: ShapeKind) -> Self {
        self.push(name, color, kind);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, color: Color, kind: ShapeKind) {
        self.specs.push(ShapeSpec {
            name: name.into(),
            color,
            kind,
        });
    }

    pub fn specs(&self) -> &[ShapeSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Every shape the furnished room draws
    pub fn room(tilts: &TiltFamily) -> Self {
        let mut catalog = Self::new()
            .with(
                "wall",
                Color::opaque(1.0, 1.0, 1.0),
                ShapeKind::Square {
                    tiling: TexTiling::Repeat,
                },
            )
            .with(
                "fish",
                Color::new(0.0, 0.0, 0.0, 0.0),
                ShapeKind::Square {
                    tiling: TexTiling::Single,
                },
            )
            .with("furniture", Color::opaque(1.0, 0.0, 0.0), ShapeKind::Cube)
            .with("glass", Color::new(0.2, 1.0, 0.2, 0.1), ShapeKind::Cube)
            .with("tv", Color::opaque(0.15, 0.15, 0.15), ShapeKind::Cube)
            .with(
                "screen",
                Color::opaque(0.05, 0.05, 0.1),
                ShapeKind::Square {
                    tiling: TexTiling::Single,
                },
            )
            .with(
                "mirror",
                Color::opaque(0.8, 0.85, 0.9),
                ShapeKind::Square {
                    tiling: TexTiling::Single,
                },
            );

        for tilt in tilts.steps() {
            catalog.push(
                TiltFamily::shape_name(tilt),
                WATER_COLOR,
                ShapeKind::TiltedCube {
                    tilt_degrees: tilt as f32,
                },
            );
        }
        catalog
    }
}

/// Sub-range of the merged index buffer, in indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRange {
    pub offset: usize,
    pub count: usize,
}

impl DrawRange {
    pub fn end(&self) -> usize {
        self.offset + self.count
    }

    /// Byte offset for hosts that draw from a 16-bit index buffer
    pub fn byte_offset_u16(&self) -> usize {
        self.offset * std::mem::size_of::<u16>()
    }
}

/// Name -> draw range lookup, iterable in catalog order
#[derive(Debug, Clone, Default)]
pub struct ShapeDirectory {
    entries: Vec<(String, DrawRange)>,
    by_name: HashMap<String, usize>,
}

impl ShapeDirectory {
    fn insert(&mut self, name: &str, range: DrawRange) -> Result<()> {
        if self.by_name.contains_key(name) {
            return Err(SceneError::DuplicateShape(name.to_string()));
        }
        self.by_name.insert(name.to_string(), self.entries.len());
        self.entries.push((name.to_string(), range));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<DrawRange> {
        self.by_name
            .get(name)
            .map(|&i| self.entries[i].1)
            .ok_or_else(|| SceneError::MissingShape(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Fail on the first name that is not registered
    pub fn require<S: AsRef<str>>(&self, names: impl IntoIterator<Item = S>) -> Result<()> {
        for name in names {
            self.get(name.as_ref())?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DrawRange)> {
        self.entries.iter().map(|(name, range)| (name.as_str(), *range))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merged buffers for the whole catalog plus where each shape lives in them
#[derive(Debug, Clone, Default)]
pub struct RegisteredGeometry {
    pub buffers: GeometryRecord,
    pub directory: ShapeDirectory,
}

impl RegisteredGeometry {
    /// Index buffer narrowed to 16 bits, for WebGL1-style hosts
    pub fn indices_u16(&self) -> Result<Vec<u16>> {
        self.buffers
            .indices
            .iter()
            .map(|&index| u16::try_from(index).map_err(|_| SceneError::IndexOverflow { index }))
            .collect()
    }
}

/// Build every catalog entry and concatenate them into one buffer set.
pub fn register_shapes(catalog: &ShapeCatalog) -> Result<RegisteredGeometry> {
    let mut registered = RegisteredGeometry::default();
    let mut vertex_offset: u32 = 0;

    for spec in catalog.specs() {
        if let ShapeKind::TiltedCube { tilt_degrees } = spec.kind {
            if !tilt_degrees.is_finite() || tilt_degrees.abs() > MAX_TILT_DEGREES as f32 {
                return Err(SceneError::InvalidTilt {
                    name: spec.name.clone(),
                    tilt: tilt_degrees,
                });
            }
        }

        let shape = spec.kind.build(vertex_offset, spec.color);
        let range = DrawRange {
            offset: registered.buffers.indices.len(),
            count: shape.indices.len(),
        };
        registered.directory.insert(&spec.name, range)?;
        registered.buffers.append(&shape);

        if let Some(max) = shape.max_index() {
            vertex_offset = vertex_offset.max(max + 1);
        }
        debug!(shape = %spec.name, offset = range.offset, count = range.count, "registered shape");
    }

    info!(
        shapes = registered.directory.len(),
        vertices = registered.buffers.vertex_count(),
        indices = registered.buffers.indices.len(),
        "merged shape buffers"
    );
    Ok(registered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_shape_catalog() -> ShapeCatalog {
        ShapeCatalog::new()
            .with(
                "wall",
                Color::opaque(1.0, 1.0, 1.0),
                ShapeKind::Square {
                    tiling: TexTiling::Repeat,
                },
            )
            .with("furniture", Color::opaque(1.0, 0.0, 0.0), ShapeKind::Cube)
    }

    #[test]
    fn test_offsets_follow_catalog_order() {
        let registered = register_shapes(&two_shape_catalog()).unwrap();
        let dir = &registered.directory;
        assert_eq!(dir.get("wall").unwrap(), DrawRange { offset: 0, count: 6 });
        assert_eq!(dir.get("furniture").unwrap(), DrawRange { offset: 6, count: 36 });
        assert_eq!(registered.buffers.indices.len(), 42);
        // the cube's indices start after the square's four vertices
        assert_eq!(registered.buffers.indices[6], 4);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let catalog = two_shape_catalog().with("wall", Color::opaque(0.0, 0.0, 0.0), ShapeKind::Cube);
        assert_eq!(
            register_shapes(&catalog).unwrap_err(),
            SceneError::DuplicateShape("wall".into())
        );
    }

    #[test]
    fn test_non_finite_tilt_rejected() {
        let catalog = ShapeCatalog::new().with(
            "water",
            WATER_COLOR,
            ShapeKind::TiltedCube {
                tilt_degrees: f32::NAN,
            },
        );
        assert!(matches!(
            register_shapes(&catalog),
            Err(SceneError::InvalidTilt { .. })
        ));
    }

    #[test]
    fn test_missing_shape_lookup() {
        let registered = register_shapes(&two_shape_catalog()).unwrap();
        assert_eq!(
            registered.directory.get("sofa").unwrap_err(),
            SceneError::MissingShape("sofa".into())
        );
        assert!(registered.directory.require(["wall", "furniture"]).is_ok());
        assert!(registered.directory.require(["wall", "tv"]).is_err());
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(ShapeKind::from_name("cube", 0.0).unwrap(), ShapeKind::Cube);
        assert_eq!(
            ShapeKind::from_name("square", 10.0).unwrap(),
            ShapeKind::Square {
                tiling: TexTiling::Repeat
            }
        );
        assert_eq!(
            ShapeKind::from_name("tiltedcube", -9.0).unwrap(),
            ShapeKind::TiltedCube { tilt_degrees: -9.0 }
        );
        assert_eq!(
            ShapeKind::from_name("sphere", 0.0).unwrap_err(),
            SceneError::UnknownShapeKind("sphere".into())
        );
    }

    #[test]
    fn test_tilt_family() {
        let tilts = TiltFamily::default();
        let steps: Vec<i32> = tilts.steps().collect();
        assert_eq!(steps.len(), 31);
        assert_eq!(steps.first(), Some(&-45));
        assert_eq!(steps.last(), Some(&45));

        assert_eq!(tilts.quantize(4.0), 3);
        assert_eq!(tilts.quantize(-4.6), -6);
        assert_eq!(tilts.quantize(80.0), 45);
        assert_eq!(tilts.quantize(-80.0), -45);
        assert_eq!(TiltFamily::shape_name(-3), "water-3");
    }

    #[test]
    fn test_quantize_extreme_angles() {
        let tilts = TiltFamily::default();
        assert_eq!(tilts.quantize(1.0e12), 45);
        assert_eq!(tilts.quantize(-1.0e12), -45);
        assert_eq!(tilts.quantize(f32::INFINITY), 45);
        assert_eq!(tilts.quantize(f32::NAN), 0);
    }

    #[test]
    fn test_tilt_family_bounded() {
        let steep = TiltFamily::new(200, 3);
        assert_eq!(steep.max_degrees, MAX_TILT_DEGREES);
        assert!(steep.steps().all(|t| t.abs() <= MAX_TILT_DEGREES));

        let extreme = TiltFamily::new(i32::MIN, i32::MIN);
        assert_eq!(extreme.max_degrees, MAX_TILT_DEGREES);
        assert_eq!(extreme.step_degrees, MAX_TILT_DEGREES);
        assert_eq!(TiltFamily::new(45, 0).step_degrees, 1);

        // the steepest family still registers finite, bounded water meshes
        let registered = register_shapes(&ShapeCatalog::room(&steep)).unwrap();
        let tallest = registered
            .buffers
            .vertices
            .chunks(3)
            .map(|v| v[1].abs())
            .fold(0.0f32, f32::max);
        assert!(tallest < 4.0);
        assert!(registered.indices_u16().is_ok());
    }

    #[test]
    fn test_vertical_tilt_rejected() {
        let catalog = ShapeCatalog::new().with(
            "wall",
            Color::opaque(1.0, 1.0, 1.0),
            ShapeKind::TiltedCube { tilt_degrees: 90.0 },
        );
        assert!(matches!(
            register_shapes(&catalog),
            Err(SceneError::InvalidTilt { .. })
        ));
    }

    #[test]
    fn test_room_catalog_registers() {
        let registered = register_shapes(&ShapeCatalog::room(&TiltFamily::default())).unwrap();
        assert_eq!(registered.directory.len(), 7 + 31);
        assert!(registered.directory.contains("water0"));
        let indices = registered.indices_u16().unwrap();
        assert_eq!(indices.len(), registered.buffers.indices.len());
    }

    #[test]
    fn test_index_overflow_detected() {
        let mut registered = register_shapes(&two_shape_catalog()).unwrap();
        registered.buffers.indices.push(70_000);
        assert_eq!(
            registered.indices_u16().unwrap_err(),
            SceneError::IndexOverflow { index: 70_000 }
        );
    }
}
