//! Plan store - the mutation surface over a plan and its undo history.
//!
//! Every collection mutation that will actually apply records the
//! pre-mutation snapshot first, so one store call is one undo step. Silent
//! no-ops (unknown ids, type mismatches) record nothing. Selection and
//! settings changes bypass history entirely.

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementKind, Opening, Product, Wall};
use crate::error::{PlanError, PlanResult};
use crate::geometry::{self, Point};
use crate::history::History;
use crate::scene::{Plan, Tool};
use crate::schema::ElementRecord;

/// Sparse update for a wall. Only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WallPatch {
    /// New start endpoint, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,
    /// New end endpoint, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,
    /// New height, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// New thickness, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f32>,
}

/// Sparse update for an opening. Only present fields are applied.
///
/// The owning wall and the door/window kind are fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpeningPatch {
    /// New offset along the owning wall, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_from_start: Option<f32>,
    /// New width, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// New height, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// New sill elevation, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f32>,
    /// New flipped orientation, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_flipped: Option<bool>,
}

/// Sparse update for a product. Only present fields are applied.
///
/// The category is fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    /// New position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    /// New rotation in radians, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    /// New width, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// New height, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// New depth, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f32>,
}

/// Owns the canonical plan and its bounded undo history.
///
/// All canonical mutation goes through this type. Read access goes through
/// [`PlanStore::plan`].
#[derive(Debug, Default)]
pub struct PlanStore {
    plan: Plan,
    history: History,
}

impl PlanStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plan: Plan::new(),
            history: History::new(),
        }
    }

    /// Read access to the plan.
    #[must_use]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Read access to the history stacks.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Add a wall to the plan.
    pub fn add_wall(&mut self, wall: Wall) -> ElementId {
        self.history.record(self.plan.snapshot());
        let id = self.plan.add(Element::new(ElementKind::Wall(wall)));
        tracing::debug!("Added wall {id}");
        id
    }

    /// Add an opening mounted on an existing wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the owning wall id is unknown or refers to a
    /// non-wall element.
    pub fn add_opening(&mut self, opening: Opening) -> PlanResult<ElementId> {
        match self.plan.get(opening.wall_id) {
            None => return Err(PlanError::ElementNotFound(opening.wall_id.to_string())),
            Some(element) if element.as_wall().is_none() => {
                return Err(PlanError::InvalidOperation(format!(
                    "{} is a {}, not a wall",
                    opening.wall_id,
                    element.kind.name()
                )));
            }
            Some(_) => {}
        }

        self.history.record(self.plan.snapshot());
        let id = self.plan.add(Element::new(ElementKind::Opening(opening)));
        tracing::debug!("Added opening {id}");
        Ok(id)
    }

    /// Add a free-standing product to the plan.
    pub fn add_product(&mut self, product: Product) -> ElementId {
        self.history.record(self.plan.snapshot());
        let id = self.plan.add(Element::new(ElementKind::Product(product)));
        tracing::debug!("Added product {id}");
        id
    }

    /// Apply a sparse update to a wall. Unknown ids and non-wall targets
    /// are ignored.
    pub fn update_wall(&mut self, id: ElementId, patch: &WallPatch) {
        if self.plan.get(id).and_then(Element::as_wall).is_none() {
            tracing::debug!("Ignored wall update for {id}");
            return;
        }
        self.history.record(self.plan.snapshot());

        if let Some(wall) = self.plan.get_mut(id).and_then(Element::as_wall_mut) {
            if let Some(start) = patch.start {
                wall.start = start;
            }
            if let Some(end) = patch.end {
                wall.end = end;
            }
            if let Some(height) = patch.height {
                wall.height = height;
            }
            if let Some(thickness) = patch.thickness {
                wall.thickness = thickness;
            }
        }
    }

    /// Apply a sparse update to an opening. Unknown ids and non-opening
    /// targets are ignored.
    pub fn update_opening(&mut self, id: ElementId, patch: &OpeningPatch) {
        if self.plan.get(id).and_then(Element::as_opening).is_none() {
            tracing::debug!("Ignored opening update for {id}");
            return;
        }
        self.history.record(self.plan.snapshot());

        if let Some(opening) = self.plan.get_mut(id).and_then(Element::as_opening_mut) {
            if let Some(distance) = patch.distance_from_start {
                opening.distance_from_start = distance;
            }
            if let Some(width) = patch.width {
                opening.width = width;
            }
            if let Some(height) = patch.height {
                opening.height = height;
            }
            if let Some(elevation) = patch.elevation {
                opening.elevation = elevation;
            }
            if let Some(is_flipped) = patch.is_flipped {
                opening.is_flipped = is_flipped;
            }
        }
    }

    /// Apply a sparse update to a product. Unknown ids and non-product
    /// targets are ignored.
    pub fn update_product(&mut self, id: ElementId, patch: &ProductPatch) {
        if self.plan.get(id).and_then(Element::as_product).is_none() {
            tracing::debug!("Ignored product update for {id}");
            return;
        }
        self.history.record(self.plan.snapshot());

        if let Some(product) = self.plan.get_mut(id).and_then(Element::as_product_mut) {
            if let Some(position) = patch.position {
                product.position = position;
            }
            if let Some(rotation) = patch.rotation {
                product.rotation = rotation;
            }
            if let Some(width) = patch.width {
                product.width = width;
            }
            if let Some(height) = patch.height {
                product.height = height;
            }
            if let Some(depth) = patch.depth {
                product.depth = depth;
            }
        }
    }

    /// Rotate a product to the next quarter-turn multiple. Unknown ids and
    /// non-product targets are ignored.
    pub fn rotate_product(&mut self, id: ElementId) {
        if self.plan.get(id).and_then(Element::as_product).is_none() {
            tracing::debug!("Ignored rotate for {id}");
            return;
        }
        self.history.record(self.plan.snapshot());

        if let Some(product) = self.plan.get_mut(id).and_then(Element::as_product_mut) {
            product.rotation = geometry::quarter_turn(product.rotation);
        }
    }

    /// Remove an element, cascading from a wall to the openings mounted on
    /// it. Unknown ids are ignored. Clears the selection if any removed
    /// element was selected. Returns the ids of every removed element.
    pub fn remove(&mut self, id: ElementId) -> Vec<ElementId> {
        if self.plan.get(id).is_none() {
            tracing::debug!("Ignored removal of {id}");
            return Vec::new();
        }
        self.history.record(self.plan.snapshot());

        let removed = self.plan.remove(id);
        tracing::debug!("Removed {} element(s) starting from {id}", removed.len());
        removed.into_iter().map(|element| element.id).collect()
    }

    /// Remove every element from the plan. No-op if already empty.
    pub fn clear(&mut self) {
        if self.plan.is_empty() {
            return;
        }
        self.history.record(self.plan.snapshot());
        self.plan.clear();
        tracing::info!("Cleared plan");
    }

    /// Select an element, or pass `None` to clear the selection. Not a
    /// history entry.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.plan.select(id);
    }

    /// Step the plan back one recorded state. Clears the selection. Returns
    /// whether a step occurred.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(self.plan.snapshot()) {
            Some(snapshot) => {
                self.plan.restore(snapshot);
                tracing::debug!("Undo applied");
                true
            }
            None => false,
        }
    }

    /// Step the plan forward one undone state. Clears the selection.
    /// Returns whether a step occurred.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(self.plan.snapshot()) {
            Some(snapshot) => {
                self.plan.restore(snapshot);
                tracing::debug!("Redo applied");
                true
            }
            None => false,
        }
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Enable or disable snapping for drags. Not a history entry.
    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.plan.snap_enabled = enabled;
    }

    /// Show or hide the floor surface. Not a history entry.
    pub fn set_floor_visible(&mut self, visible: bool) {
        self.plan.floor_visible = visible;
    }

    /// Switch the active editing tool. Not a history entry.
    pub fn set_tool(&mut self, tool: Tool) {
        self.plan.tool = tool;
    }

    /// Export the collection as ordered tagged records.
    #[must_use]
    pub fn export(&self) -> Vec<ElementRecord> {
        self.plan.elements().map(ElementRecord::from).collect()
    }

    /// Export the collection as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_json(&self) -> PlanResult<String> {
        serde_json::to_string(&self.export()).map_err(PlanError::Serialization)
    }

    /// Replace the collection from ordered records. Clears the history and
    /// the selection.
    pub fn load(&mut self, records: Vec<ElementRecord>) {
        let elements: Vec<Element> = records.into_iter().map(ElementRecord::into_element).collect();
        let count = elements.len();
        self.plan.restore(elements);
        self.history.clear();
        tracing::info!("Loaded plan with {count} element(s)");
    }

    /// Replace the collection from a JSON array of records. Clears the
    /// history and the selection.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails; the plan is left
    /// untouched in that case.
    pub fn load_json(&mut self, json: &str) -> PlanResult<()> {
        let records: Vec<ElementRecord> = serde_json::from_str(json)?;
        self.load(records);
        Ok(())
    }
}
