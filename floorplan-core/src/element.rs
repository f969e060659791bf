//! Plan elements - walls, wall openings, and free-standing products.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A structural wall segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    /// Start endpoint.
    pub start: Point,
    /// End endpoint.
    pub end: Point,
    /// Height from floor to top, in plan units.
    pub height: f32,
    /// Thickness, in plan units.
    pub thickness: f32,
}

impl Wall {
    /// Create a wall between two endpoints with default height (8.0) and
    /// thickness (0.5).
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            height: 8.0,
            thickness: 0.5,
        }
    }

    /// Set the height.
    #[must_use]
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set the thickness.
    #[must_use]
    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Length of the wall on the horizontal plane.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.start.horizontal_distance(&self.end)
    }
}

/// The kind of a wall opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    /// A door.
    Door,
    /// A window.
    Window,
}

/// A door or window mounted on a wall.
///
/// Placement is wall-relative: `distance_from_start` measures along the
/// owning wall's directed length. Offsets are clamped during drags but are
/// not re-validated when the owning wall is resized independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    /// Door or window.
    pub kind: OpeningKind,
    /// Id of the wall this opening is mounted on.
    pub wall_id: ElementId,
    /// Offset along the wall from its start endpoint, in plan units.
    pub distance_from_start: f32,
    /// Width, in plan units.
    pub width: f32,
    /// Height, in plan units.
    pub height: f32,
    /// Vertical offset of the sill from the floor, in plan units.
    pub elevation: f32,
    /// Whether the opening faces the opposite side of the wall.
    pub is_flipped: bool,
}

impl Opening {
    /// Create a door on the given wall (3.0 x 6.8 at floor level).
    #[must_use]
    pub fn door(wall_id: ElementId) -> Self {
        Self {
            kind: OpeningKind::Door,
            wall_id,
            distance_from_start: 0.0,
            width: 3.0,
            height: 6.8,
            elevation: 0.0,
            is_flipped: false,
        }
    }

    /// Create a window on the given wall (3.0 x 4.0 with a 3.0 sill).
    #[must_use]
    pub fn window(wall_id: ElementId) -> Self {
        Self {
            kind: OpeningKind::Window,
            wall_id,
            distance_from_start: 0.0,
            width: 3.0,
            height: 4.0,
            elevation: 3.0,
            is_flipped: false,
        }
    }

    /// Set the offset along the owning wall.
    #[must_use]
    pub fn with_distance(mut self, distance_from_start: f32) -> Self {
        self.distance_from_start = distance_from_start;
        self
    }

    /// Set the width.
    #[must_use]
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Set the height.
    #[must_use]
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set the sill elevation.
    #[must_use]
    pub fn with_elevation(mut self, elevation: f32) -> Self {
        self.elevation = elevation;
        self
    }

    /// Set the flipped orientation.
    #[must_use]
    pub fn with_flipped(mut self, is_flipped: bool) -> Self {
        self.is_flipped = is_flipped;
        self
    }
}

/// Fixed category set for free-standing products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    /// Chairs, sofas, stools.
    Seating,
    /// Dining and work tables.
    Table,
    /// Kitchen islands.
    Island,
    /// Wall and base cabinets.
    Cabinet,
    /// Ovens, fridges, dishwashers.
    Appliance,
}

impl ProductCategory {
    /// Default (width, height, depth) for the category, in plan units.
    #[must_use]
    pub fn default_dimensions(self) -> (f32, f32, f32) {
        match self {
            Self::Seating => (2.0, 3.0, 2.0),
            Self::Table => (4.0, 2.5, 4.0),
            Self::Island => (6.0, 3.0, 3.0),
            Self::Cabinet => (3.0, 2.9, 2.0),
            Self::Appliance => (2.5, 3.0, 2.5),
        }
    }
}

/// A free-standing furnishing placed on the floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product category.
    pub category: ProductCategory,
    /// Center position on the floor.
    pub position: Point,
    /// Rotation about the vertical axis, in radians.
    pub rotation: f32,
    /// Width, in plan units.
    pub width: f32,
    /// Height, in plan units.
    pub height: f32,
    /// Depth, in plan units.
    pub depth: f32,
}

impl Product {
    /// Create a product of the given category at the origin with the
    /// category's default dimensions.
    #[must_use]
    pub fn new(category: ProductCategory) -> Self {
        let (width, height, depth) = category.default_dimensions();
        Self {
            category,
            position: Point::zero(),
            rotation: 0.0,
            width,
            height,
            depth,
        }
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Set the rotation, in radians.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the dimensions.
    #[must_use]
    pub fn with_dimensions(mut self, width: f32, height: f32, depth: f32) -> Self {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self
    }
}

/// The content of a plan element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// A structural wall.
    Wall(Wall),
    /// A door or window mounted on a wall.
    Opening(Opening),
    /// A free-standing product.
    Product(Product),
}

impl ElementKind {
    /// Short name of the kind, for logs and error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Wall(_) => "wall",
            Self::Opening(_) => "opening",
            Self::Product(_) => "product",
        }
    }
}

/// A plan element with its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content.
    pub kind: ElementKind,
}

impl Element {
    /// Create a new element with a fresh id.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
        }
    }

    /// The wall content, if this element is a wall.
    #[must_use]
    pub fn as_wall(&self) -> Option<&Wall> {
        match &self.kind {
            ElementKind::Wall(wall) => Some(wall),
            _ => None,
        }
    }

    /// Mutable wall content, if this element is a wall.
    pub fn as_wall_mut(&mut self) -> Option<&mut Wall> {
        match &mut self.kind {
            ElementKind::Wall(wall) => Some(wall),
            _ => None,
        }
    }

    /// The opening content, if this element is an opening.
    #[must_use]
    pub fn as_opening(&self) -> Option<&Opening> {
        match &self.kind {
            ElementKind::Opening(opening) => Some(opening),
            _ => None,
        }
    }

    /// Mutable opening content, if this element is an opening.
    pub fn as_opening_mut(&mut self) -> Option<&mut Opening> {
        match &mut self.kind {
            ElementKind::Opening(opening) => Some(opening),
            _ => None,
        }
    }

    /// The product content, if this element is a product.
    #[must_use]
    pub fn as_product(&self) -> Option<&Product> {
        match &self.kind {
            ElementKind::Product(product) => Some(product),
            _ => None,
        }
    }

    /// Mutable product content, if this element is a product.
    pub fn as_product_mut(&mut self) -> Option<&mut Product> {
        match &mut self.kind {
            ElementKind::Product(product) => Some(product),
            _ => None,
        }
    }
}
