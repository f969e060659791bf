//! Drag transaction coordinator - continuous pointer input, discrete commits.
//!
//! A drag gesture never touches the store while the pointer moves. Working
//! geometry lives in the coordinator and is broadcast as preview frames;
//! the store sees exactly one update when the gesture ends. This bounds
//! history growth to one entry per gesture instead of one per pointer-move.
//!
//! ```text
//!   pointer-down ──► begin: snapshot geometry into working memory
//!   pointer-move ──► update: recompute working, publish preview   (0 store writes)
//!   pointer-up   ──► commit: one store update, one history entry
//!   leave surface ─► pointer_left: commits (there is no discard path)
//! ```

use tokio::sync::broadcast;

use crate::element::{Element, ElementId, ElementKind};
use crate::error::{PlanError, PlanResult};
use crate::geometry::{self, Point};
use crate::preview::{ElementPreview, PreviewBus};
use crate::store::{OpeningPatch, PlanStore, ProductPatch, WallPatch};

/// A named drag target on a selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    /// A wall's start endpoint.
    WallStart,
    /// A wall's end endpoint.
    WallEnd,
    /// A wall's body; translates both endpoints together.
    WallCenter,
    /// An opening's body; slides along its owning wall.
    OpeningCenter,
    /// A product's body; moves its floor position.
    ProductCenter,
    /// A product's rotate handle; spins it about the vertical axis.
    ProductRotate,
}

/// Gesture state of the coordinator.
#[derive(Debug, Clone)]
pub enum DragState {
    /// No gesture in progress; waiting for the next pointer-down.
    Idle,
    /// A gesture is in progress. Geometry here is working memory, not
    /// canonical state.
    Dragging {
        /// Id of the element being dragged.
        id: ElementId,
        /// Which handle the gesture grabbed.
        handle: Handle,
        /// Pointer position at pointer-down, for delta-based handles.
        anchor: Point,
        /// Element geometry at pointer-down.
        origin: ElementKind,
        /// Live geometry, rebuilt on every pointer-move.
        working: ElementKind,
    },
}

/// Mediates pointer gestures into single store commits.
///
/// Owns the preview bus: pointer-moves publish working geometry per element
/// so a renderer tracks the drag without store churn.
#[derive(Debug)]
pub struct DragController {
    state: DragState,
    preview: PreviewBus,
}

impl DragController {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            preview: PreviewBus::new(),
        }
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Id of the element being dragged, if any.
    #[must_use]
    pub fn dragging_id(&self) -> Option<ElementId> {
        match &self.state {
            DragState::Dragging { id, .. } => Some(*id),
            DragState::Idle => None,
        }
    }

    /// Subscribe to preview frames for an element.
    pub fn subscribe_preview(&mut self, id: ElementId) -> broadcast::Receiver<ElementPreview> {
        self.preview.subscribe(id)
    }

    /// Drop an element's preview channel once it leaves the plan.
    pub fn release_preview(&mut self, id: ElementId) {
        self.preview.release(id);
    }

    /// Start a gesture: snapshot the element's geometry into working memory.
    ///
    /// Beginning while another gesture is active replaces it without
    /// committing.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is unknown or the handle does not fit
    /// its kind.
    pub fn begin(
        &mut self,
        store: &PlanStore,
        id: ElementId,
        handle: Handle,
        pointer: Point,
    ) -> PlanResult<()> {
        let element = store
            .plan()
            .get(id)
            .ok_or_else(|| PlanError::ElementNotFound(id.to_string()))?;
        if !handle_fits(handle, &element.kind) {
            return Err(PlanError::InvalidOperation(format!(
                "{} {id} has no {handle:?} handle",
                element.kind.name()
            )));
        }

        if let DragState::Dragging { id: active, .. } = &self.state {
            tracing::warn!("Replacing active drag of {active} without committing it");
        }

        self.state = DragState::Dragging {
            id,
            handle,
            anchor: pointer,
            origin: element.kind.clone(),
            working: element.kind.clone(),
        };
        tracing::debug!("Begin {handle:?} drag on {id}");
        Ok(())
    }

    /// Advance the gesture to a new pointer position: recompute working
    /// geometry and publish a preview frame. Ignored while idle. Writes
    /// nothing to the store.
    pub fn update(&mut self, store: &PlanStore, pointer: Point) {
        let DragState::Dragging {
            id,
            handle,
            anchor,
            origin,
            working,
        } = &mut self.state
        else {
            return;
        };
        let plan = store.plan();

        match handle {
            Handle::WallStart | Handle::WallEnd => {
                let resolved = geometry::resolve_point(
                    pointer,
                    plan.endpoints_excluding(Some(*id)),
                    plan.snap_enabled,
                );
                if let ElementKind::Wall(wall) = working {
                    if matches!(handle, Handle::WallStart) {
                        wall.start = resolved;
                    } else {
                        wall.end = resolved;
                    }
                }
            }
            Handle::WallCenter => {
                // Exact translation from the gesture anchor; no snapping.
                if let (ElementKind::Wall(origin_wall), ElementKind::Wall(wall)) =
                    (&*origin, &mut *working)
                {
                    let dx = pointer.x - anchor.x;
                    let dz = pointer.z - anchor.z;
                    wall.start = origin_wall.start.translated(dx, dz);
                    wall.end = origin_wall.end.translated(dx, dz);
                }
            }
            Handle::OpeningCenter => {
                if let ElementKind::Opening(opening) = working {
                    if let Some(wall) = plan.get(opening.wall_id).and_then(Element::as_wall) {
                        opening.distance_from_start =
                            geometry::project_offset(wall.start, wall.end, pointer);
                    }
                }
            }
            Handle::ProductCenter => {
                let resolved = geometry::resolve_point(
                    pointer,
                    plan.endpoints_excluding(Some(*id)),
                    plan.snap_enabled,
                );
                if let ElementKind::Product(product) = working {
                    product.position = resolved;
                }
            }
            Handle::ProductRotate => {
                if let (ElementKind::Product(origin_product), ElementKind::Product(product)) =
                    (&*origin, &mut *working)
                {
                    product.rotation = geometry::heading(origin_product.position, pointer);
                }
            }
        }

        self.preview.publish(ElementPreview {
            id: *id,
            kind: working.clone(),
        });
    }

    /// End the gesture: issue exactly one store update with the final
    /// working geometry, then return to idle. No-op while idle.
    ///
    /// There is no dirty-check; a gesture that moved nothing still commits.
    pub fn commit(&mut self, store: &mut PlanStore) {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        let DragState::Dragging {
            id,
            handle,
            working,
            ..
        } = state
        else {
            return;
        };

        match working {
            ElementKind::Wall(wall) => store.update_wall(
                id,
                &WallPatch {
                    start: Some(wall.start),
                    end: Some(wall.end),
                    ..WallPatch::default()
                },
            ),
            ElementKind::Opening(opening) => store.update_opening(
                id,
                &OpeningPatch {
                    distance_from_start: Some(opening.distance_from_start),
                    ..OpeningPatch::default()
                },
            ),
            ElementKind::Product(product) => store.update_product(
                id,
                &ProductPatch {
                    position: Some(product.position),
                    rotation: Some(product.rotation),
                    ..ProductPatch::default()
                },
            ),
        }
        tracing::debug!("Committed {handle:?} drag on {id}");
    }

    /// The pointer left the interactive surface: the gesture commits.
    pub fn pointer_left(&mut self, store: &mut PlanStore) {
        if self.is_dragging() {
            tracing::debug!("Pointer left surface; committing active drag");
        }
        self.commit(store);
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a handle applies to an element kind.
fn handle_fits(handle: Handle, kind: &ElementKind) -> bool {
    matches!(
        (handle, kind),
        (
            Handle::WallStart | Handle::WallEnd | Handle::WallCenter,
            ElementKind::Wall(_)
        ) | (Handle::OpeningCenter, ElementKind::Opening(_))
            | (
                Handle::ProductCenter | Handle::ProductRotate,
                ElementKind::Product(_)
            )
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Opening, Product, ProductCategory, Wall};
    use tokio::sync::broadcast::error::TryRecvError;

    fn store_with_wall() -> (PlanStore, ElementId) {
        let mut store = PlanStore::new();
        let id = store.add_wall(Wall::new(Point::zero(), Point::new(10.0, 0.0, 0.0)));
        (store, id)
    }

    #[test]
    fn begin_rejects_unknown_element() {
        let (store, _) = store_with_wall();
        let mut drag = DragController::new();

        let result = drag.begin(&store, ElementId::new(), Handle::WallStart, Point::zero());
        assert!(matches!(result, Err(PlanError::ElementNotFound(_))));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn begin_rejects_mismatched_handle() {
        let (store, wall) = store_with_wall();
        let mut drag = DragController::new();

        let result = drag.begin(&store, wall, Handle::ProductRotate, Point::zero());
        assert!(matches!(result, Err(PlanError::InvalidOperation(_))));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn moves_publish_previews_without_store_writes() {
        let (mut store, wall) = store_with_wall();
        let mut drag = DragController::new();
        let mut rx = drag.subscribe_preview(wall);

        drag.begin(&store, wall, Handle::WallEnd, Point::new(10.0, 0.0, 0.0))
            .expect("begin");
        drag.update(&store, Point::new(8.0, 0.0, 3.0));
        drag.update(&store, Point::new(6.0, 0.0, 4.0));

        // Two frames, zero history entries so far.
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_ok());
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(store.history().past_len(), 1); // the add_wall only
        let untouched = store.plan().get(wall).and_then(Element::as_wall).expect("wall");
        assert_eq!(untouched.end, Point::new(10.0, 0.0, 0.0));

        drag.commit(&mut store);
        assert_eq!(store.history().past_len(), 2);
    }

    #[test]
    fn endpoint_drag_snaps_to_other_walls() {
        let (mut store, dragged) = store_with_wall();
        let target_start = Point::new(20.0, 0.0, 5.0);
        store.add_wall(Wall::new(target_start, Point::new(30.0, 0.0, 5.0)));
        let mut drag = DragController::new();

        drag.begin(&store, dragged, Handle::WallEnd, Point::new(10.0, 0.0, 0.0))
            .expect("begin");
        drag.update(&store, Point::new(20.3, 0.0, 4.8));
        drag.commit(&mut store);

        let wall = store
            .plan()
            .get(dragged)
            .and_then(Element::as_wall)
            .expect("wall");
        assert_eq!(wall.end, target_start);
    }

    #[test]
    fn endpoint_drag_ignores_own_endpoints() {
        let (mut store, wall) = store_with_wall();
        let mut drag = DragController::new();

        drag.begin(&store, wall, Handle::WallStart, Point::zero())
            .expect("begin");
        // Near the dragged wall's own end; must grid-snap instead of
        // snapping to itself.
        drag.update(&store, Point::new(9.8, 0.0, 0.2));
        drag.commit(&mut store);

        let updated = store.plan().get(wall).and_then(Element::as_wall).expect("wall");
        assert_eq!(updated.start, Point::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn center_drag_translates_exactly_without_snap() {
        let (mut store, wall) = store_with_wall();
        let mut drag = DragController::new();

        drag.begin(&store, wall, Handle::WallCenter, Point::new(5.0, 0.0, 0.0))
            .expect("begin");
        drag.update(&store, Point::new(5.7, 0.0, 1.1));
        drag.update(&store, Point::new(7.13, 0.0, 3.21));
        drag.commit(&mut store);

        let moved = store.plan().get(wall).and_then(Element::as_wall).expect("wall");
        assert!((moved.start.x - 2.13).abs() < 1e-5);
        assert!((moved.start.z - 3.21).abs() < 1e-5);
        assert!((moved.end.x - 12.13).abs() < 1e-5);
        assert!((moved.end.z - 3.21).abs() < 1e-5);
    }

    #[test]
    fn opening_drag_clamps_to_owning_wall() {
        let (mut store, wall) = store_with_wall();
        let door = store
            .add_opening(Opening::door(wall).with_distance(5.0))
            .expect("wall exists");
        let mut drag = DragController::new();

        drag.begin(&store, door, Handle::OpeningCenter, Point::new(5.0, 0.0, 0.0))
            .expect("begin");
        drag.update(&store, Point::new(14.0, 0.0, 2.0));
        drag.commit(&mut store);

        let opening = store
            .plan()
            .get(door)
            .and_then(Element::as_opening)
            .expect("opening");
        assert!((opening.distance_from_start - 10.0).abs() < 1e-5);
    }

    #[test]
    fn rotate_drag_sets_heading_toward_pointer() {
        let mut store = PlanStore::new();
        let id = store.add_product(
            Product::new(ProductCategory::Seating).with_position(Point::new(2.0, 0.0, 2.0)),
        );
        let mut drag = DragController::new();

        drag.begin(&store, id, Handle::ProductRotate, Point::new(2.0, 0.0, 2.0))
            .expect("begin");
        drag.update(&store, Point::new(5.0, 0.0, 2.0));
        drag.commit(&mut store);

        let product = store
            .plan()
            .get(id)
            .and_then(Element::as_product)
            .expect("product");
        assert!((product.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(product.position, Point::new(2.0, 0.0, 2.0));
    }

    #[test]
    fn product_center_drag_snaps_to_grid() {
        let mut store = PlanStore::new();
        let id = store.add_product(Product::new(ProductCategory::Table));
        let mut drag = DragController::new();

        drag.begin(&store, id, Handle::ProductCenter, Point::zero())
            .expect("begin");
        drag.update(&store, Point::new(3.3, 0.0, -1.2));
        drag.commit(&mut store);

        let product = store
            .plan()
            .get(id)
            .and_then(Element::as_product)
            .expect("product");
        assert_eq!(product.position, Point::new(3.5, 0.0, -1.0));
    }

    #[test]
    fn update_while_idle_is_ignored() {
        let (store, wall) = store_with_wall();
        let mut drag = DragController::new();
        let mut rx = drag.subscribe_preview(wall);

        drag.update(&store, Point::new(1.0, 0.0, 1.0));

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn commit_while_idle_is_noop() {
        let (mut store, _) = store_with_wall();
        let mut drag = DragController::new();
        let before = store.history().past_len();

        drag.commit(&mut store);
        drag.pointer_left(&mut store);

        assert_eq!(store.history().past_len(), before);
    }

    #[test]
    fn begin_over_active_drag_discards_the_first_gesture() {
        let (mut store, wall) = store_with_wall();
        let product = store.add_product(Product::new(ProductCategory::Island));
        let mut drag = DragController::new();

        drag.begin(&store, wall, Handle::WallEnd, Point::new(10.0, 0.0, 0.0))
            .expect("begin");
        drag.update(&store, Point::new(4.0, 0.0, 4.0));

        drag.begin(&store, product, Handle::ProductCenter, Point::zero())
            .expect("second begin replaces");
        drag.commit(&mut store);

        // The first gesture never committed: the wall keeps its geometry.
        let wall_state = store.plan().get(wall).and_then(Element::as_wall).expect("wall");
        assert_eq!(wall_state.end, Point::new(10.0, 0.0, 0.0));
        assert_eq!(drag.dragging_id(), None);
    }

    #[test]
    fn pointer_left_commits_the_gesture() {
        let (mut store, wall) = store_with_wall();
        let mut drag = DragController::new();
        let history_before = store.history().past_len();

        drag.begin(&store, wall, Handle::WallCenter, Point::new(5.0, 0.0, 0.0))
            .expect("begin");
        drag.update(&store, Point::new(6.0, 0.0, 0.0));
        drag.pointer_left(&mut store);

        assert!(!drag.is_dragging());
        assert_eq!(store.history().past_len(), history_before + 1);
        let moved = store.plan().get(wall).and_then(Element::as_wall).expect("wall");
        assert!((moved.start.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn gesture_without_movement_still_commits_once() {
        let (mut store, wall) = store_with_wall();
        let mut drag = DragController::new();
        let before = store.history().past_len();

        drag.begin(&store, wall, Handle::WallStart, Point::zero())
            .expect("begin");
        drag.commit(&mut store);

        assert_eq!(store.history().past_len(), before + 1);
    }
}
