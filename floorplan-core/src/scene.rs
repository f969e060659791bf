//! The plan - canonical collection of floor-plan elements.

use std::collections::HashMap;

use crate::element::{Element, ElementId, ElementKind};
use crate::geometry::Point;

/// The active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select and drag existing elements.
    #[default]
    Select,
    /// Draw new walls.
    Wall,
    /// Place doors on walls.
    Door,
    /// Place windows on walls.
    Window,
    /// Place free-standing products.
    Product,
}

/// A floor plan: the canonical element collection plus editing state.
///
/// The plan is the sole owner of canonical element state. Iteration order is
/// insertion order, which also defines snap-candidate order and export order.
/// Selection holds at most one element and is cleared automatically when the
/// selected element is removed.
#[derive(Debug, Clone)]
pub struct Plan {
    /// All elements, indexed by ID.
    elements: HashMap<ElementId, Element>,
    /// Element IDs in insertion order.
    order: Vec<ElementId>,
    /// Currently selected element, if any.
    selected: Option<ElementId>,
    /// Whether drag points snap to endpoints and the grid.
    pub snap_enabled: bool,
    /// Whether the floor surface is rendered.
    pub floor_visible: bool,
    /// Active editing tool.
    pub tool: Tool,
}

impl Plan {
    /// Create a new empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            order: Vec::new(),
            selected: None,
            snap_enabled: true,
            floor_visible: true,
            tool: Tool::Select,
        }
    }

    /// Add an element to the plan.
    pub fn add(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.order.push(id);
        self.elements.insert(id, element);
        id
    }

    /// Remove an element, cascading from a wall to the openings mounted on
    /// it. Returns the removed elements in canonical order; unknown ids
    /// remove nothing.
    ///
    /// Clears the selection if any removed element was selected.
    pub fn remove(&mut self, id: ElementId) -> Vec<Element> {
        if !self.elements.contains_key(&id) {
            return Vec::new();
        }

        let mut doomed = vec![id];
        if matches!(
            self.elements.get(&id).map(|e| &e.kind),
            Some(ElementKind::Wall(_))
        ) {
            doomed.extend(self.order.iter().copied().filter(|eid| {
                self.elements
                    .get(eid)
                    .and_then(Element::as_opening)
                    .is_some_and(|opening| opening.wall_id == id)
            }));
        }

        self.order.retain(|eid| !doomed.contains(eid));
        if self.selected.is_some_and(|sel| doomed.contains(&sel)) {
            self.selected = None;
        }

        let mut removed = Vec::with_capacity(doomed.len());
        for eid in doomed {
            if let Some(element) = self.elements.remove(&eid) {
                removed.push(element);
            }
        }
        removed
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    /// All elements in canonical (insertion) order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Clone the collection as an ordered snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements().cloned().collect()
    }

    /// Replace the collection with an ordered snapshot and clear the
    /// selection.
    pub fn restore(&mut self, snapshot: Vec<Element>) {
        self.elements.clear();
        self.order.clear();
        self.selected = None;
        for element in snapshot {
            self.add(element);
        }
    }

    /// Remove every element and clear the selection.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.order.clear();
        self.selected = None;
    }

    /// Select an element, or pass `None` to clear the selection. Selecting
    /// an unknown id leaves the selection unchanged.
    pub fn select(&mut self, id: Option<ElementId>) {
        match id {
            Some(id) if !self.elements.contains_key(&id) => {}
            other => self.selected = other,
        }
    }

    /// The currently selected element id, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// The currently selected element, if any.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.elements.get(&id))
    }

    /// Wall endpoints in canonical order (start then end per wall), skipping
    /// the excluded element. This is the snap-candidate sequence for
    /// [`crate::geometry::resolve_point`].
    pub fn endpoints_excluding(
        &self,
        exclude: Option<ElementId>,
    ) -> impl Iterator<Item = Point> + '_ {
        self.elements()
            .filter(move |element| exclude != Some(element.id))
            .filter_map(Element::as_wall)
            .flat_map(|wall| [wall.start, wall.end])
    }

    /// Get the number of elements in the plan.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the plan is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}
