//! Persisted payload records for plans.
//!
//! A payload is an ordered JSON array of tagged records, one per element,
//! in canonical collection order. Dimensional fields are optional on input
//! and fall back to the same defaults the element constructors use, so
//! older or hand-authored payloads load. There is no schema-version field.

use serde::{Deserialize, Serialize};

use crate::element::{
    Element, ElementId, ElementKind, Opening, OpeningKind, Product, ProductCategory, Wall,
};
use crate::geometry::Point;

/// Persisted form of a wall.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallRecord {
    /// Element identifier.
    pub id: ElementId,
    /// Start endpoint.
    pub start: Point,
    /// End endpoint.
    pub end: Point,
    /// Height; defaults when absent.
    #[serde(default)]
    pub height: Option<f32>,
    /// Thickness; defaults when absent.
    #[serde(default)]
    pub thickness: Option<f32>,
}

/// Persisted form of a wall opening.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningRecord {
    /// Element identifier.
    pub id: ElementId,
    /// Door or window.
    pub kind: OpeningKind,
    /// Id of the owning wall.
    pub wall_id: ElementId,
    /// Offset along the owning wall.
    #[serde(default)]
    pub distance_from_start: f32,
    /// Width; defaults per kind when absent.
    #[serde(default)]
    pub width: Option<f32>,
    /// Height; defaults per kind when absent.
    #[serde(default)]
    pub height: Option<f32>,
    /// Sill elevation; defaults per kind when absent.
    #[serde(default)]
    pub elevation: Option<f32>,
    /// Flipped orientation.
    #[serde(default)]
    pub is_flipped: bool,
}

/// Persisted form of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Element identifier.
    pub id: ElementId,
    /// Product category.
    pub category: ProductCategory,
    /// Floor position.
    #[serde(default)]
    pub position: Point,
    /// Rotation in radians.
    #[serde(default)]
    pub rotation: f32,
    /// Width; defaults per category when absent.
    #[serde(default)]
    pub width: Option<f32>,
    /// Height; defaults per category when absent.
    #[serde(default)]
    pub height: Option<f32>,
    /// Depth; defaults per category when absent.
    #[serde(default)]
    pub depth: Option<f32>,
}

/// One tagged element record in a plan payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementRecord {
    /// A wall record.
    Wall(WallRecord),
    /// An opening record.
    Opening(OpeningRecord),
    /// A product record.
    Product(ProductRecord),
}

impl ElementRecord {
    /// The recorded element id.
    #[must_use]
    pub fn id(&self) -> ElementId {
        match self {
            Self::Wall(record) => record.id,
            Self::Opening(record) => record.id,
            Self::Product(record) => record.id,
        }
    }

    /// Materialize the record as a runtime element, filling absent
    /// dimensional fields with constructor defaults.
    #[must_use]
    pub fn into_element(self) -> Element {
        match self {
            Self::Wall(record) => {
                let base = Wall::new(record.start, record.end);
                Element {
                    id: record.id,
                    kind: ElementKind::Wall(Wall {
                        height: record.height.unwrap_or(base.height),
                        thickness: record.thickness.unwrap_or(base.thickness),
                        ..base
                    }),
                }
            }
            Self::Opening(record) => {
                let base = match record.kind {
                    OpeningKind::Door => Opening::door(record.wall_id),
                    OpeningKind::Window => Opening::window(record.wall_id),
                };
                Element {
                    id: record.id,
                    kind: ElementKind::Opening(Opening {
                        distance_from_start: record.distance_from_start,
                        width: record.width.unwrap_or(base.width),
                        height: record.height.unwrap_or(base.height),
                        elevation: record.elevation.unwrap_or(base.elevation),
                        is_flipped: record.is_flipped,
                        ..base
                    }),
                }
            }
            Self::Product(record) => {
                let base = Product::new(record.category);
                Element {
                    id: record.id,
                    kind: ElementKind::Product(Product {
                        position: record.position,
                        rotation: record.rotation,
                        width: record.width.unwrap_or(base.width),
                        height: record.height.unwrap_or(base.height),
                        depth: record.depth.unwrap_or(base.depth),
                        ..base
                    }),
                }
            }
        }
    }
}

impl From<&Element> for ElementRecord {
    fn from(element: &Element) -> Self {
        match &element.kind {
            ElementKind::Wall(wall) => Self::Wall(WallRecord {
                id: element.id,
                start: wall.start,
                end: wall.end,
                height: Some(wall.height),
                thickness: Some(wall.thickness),
            }),
            ElementKind::Opening(opening) => Self::Opening(OpeningRecord {
                id: element.id,
                kind: opening.kind,
                wall_id: opening.wall_id,
                distance_from_start: opening.distance_from_start,
                width: Some(opening.width),
                height: Some(opening.height),
                elevation: Some(opening.elevation),
                is_flipped: opening.is_flipped,
            }),
            ElementKind::Product(product) => Self::Product(ProductRecord {
                id: element.id,
                category: product.category,
                position: product.position,
                rotation: product.rotation,
                width: Some(product.width),
                height: Some(product.height),
                depth: Some(product.depth),
            }),
        }
    }
}
