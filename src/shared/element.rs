/**
 * Drawable Element Types
 *
 * This module defines the Element struct and its shape variants. An element
 * is one drawable object in a document: a freehand path, a rectangle, or a
 * circle. Elements are serialized to/from JSON for both the wire protocol
 * and the persisted snapshot, using the wire shape
 * `{"id": "...", "type": "path", "properties": {...}}`.
 *
 * The shape union is closed: an unknown `type` value fails deserialization
 * at the boundary instead of flowing into mutation logic as an open record.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A 4x4 transform matrix, 16 floats in row-major order.
pub type Matrix4 = [f64; 16];

/// The identity transform.
pub const IDENTITY_MATRIX: Matrix4 = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Geometry carried by every element variant
///
/// Field names follow the wire protocol (camelCase). `stretchable` marks an
/// element whose geometry may be resized non-uniformly; it defaults to false
/// for elements created before the flag existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub focal_x: f64,
    pub focal_y: f64,
    pub width: f64,
    pub height: f64,
    pub matrix: Matrix4,
    #[serde(default)]
    pub stretchable: bool,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            focal_x: 0.0,
            focal_y: 0.0,
            width: 0.0,
            height: 0.0,
            matrix: IDENTITY_MATRIX,
            stretchable: false,
        }
    }
}

/// Variant-specific element properties, tagged by the element `type`
///
/// Serialized adjacently tagged, producing the wire shape
/// `{"type": "path", "properties": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "properties", rename_all = "lowercase")]
pub enum ElementShape {
    Path(PathProperties),
    Rect(RectProperties),
    Circle(CircleProperties),
}

impl ElementShape {
    /// The wire name of this variant, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Path(_) => "path",
            Self::Rect(_) => "rect",
            Self::Circle(_) => "circle",
        }
    }

    pub fn geometry(&self) -> &Geometry {
        match self {
            Self::Path(props) => &props.geometry,
            Self::Rect(props) => &props.geometry,
            Self::Circle(props) => &props.geometry,
        }
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        match self {
            Self::Path(props) => &mut props.geometry,
            Self::Rect(props) => &mut props.geometry,
            Self::Circle(props) => &mut props.geometry,
        }
    }
}

/// Properties of a freehand path element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathProperties {
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Serialized path descriptor (SVG path syntax).
    pub path: String,
}

/// Properties of a rectangle element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectProperties {
    #[serde(flatten)]
    pub geometry: Geometry,
}

/// Properties of a circle element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleProperties {
    #[serde(flatten)]
    pub geometry: Geometry,
    pub radius: f64,
}

/// One drawable object in a document
///
/// The `id` is unique within a document and immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: Uuid,
    #[serde(flatten)]
    pub shape: ElementShape,
}

impl Element {
    /// Merge a partial properties update into this element
    ///
    /// Only the fields present in the patch are assigned; everything else is
    /// preserved. Descriptor fields that do not apply to this element's
    /// variant (e.g. `radius` on a path) are ignored.
    pub fn apply_patch(&mut self, patch: &PropertiesPatch) {
        let geometry = self.shape.geometry_mut();
        if let Some(x) = patch.x {
            geometry.x = x;
        }
        if let Some(y) = patch.y {
            geometry.y = y;
        }
        if let Some(focal_x) = patch.focal_x {
            geometry.focal_x = focal_x;
        }
        if let Some(focal_y) = patch.focal_y {
            geometry.focal_y = focal_y;
        }
        if let Some(width) = patch.width {
            geometry.width = width;
        }
        if let Some(height) = patch.height {
            geometry.height = height;
        }
        if let Some(matrix) = patch.matrix {
            geometry.matrix = matrix;
        }
        if let Some(stretchable) = patch.stretchable {
            geometry.stretchable = stretchable;
        }

        match &mut self.shape {
            ElementShape::Path(props) => {
                if let Some(path) = &patch.path {
                    props.path = path.clone();
                }
            }
            ElementShape::Circle(props) => {
                if let Some(radius) = patch.radius {
                    props.radius = radius;
                }
            }
            ElementShape::Rect(_) => {}
        }
    }
}

/// Typed partial update for an element's properties
///
/// Carried by STATE/UPDATE messages. Every field is optional; absent fields
/// leave the existing value untouched (shallow merge at the properties
/// level).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertiesPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub focal_x: Option<f64>,
    pub focal_y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub matrix: Option<Matrix4>,
    pub stretchable: Option<bool>,
    pub path: Option<String>,
    pub radius: Option<f64>,
}
