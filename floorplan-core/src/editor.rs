//! Top-level editing session.
//!
//! [`Editor`] owns the plan store and the drag controller and wires the
//! pointer protocol between them. A host embeds one `Editor`, forwards
//! pointer events to it, and reads committed state back out of the store:
//!
//! ```text
//!   pointer down  -> begin_drag(id, handle, point)
//!   pointer move  -> drag_to(point)        (preview frames, store untouched)
//!   pointer up    -> end_drag(point)       (single store commit)
//!   pointer exit  -> pointer_left()        (commits, never discards)
//! ```
//!
//! Non-gesture mutations (toolbar buttons, property panels, persistence) go
//! straight to the store via [`Editor::store_mut`] and produce the same
//! history entries a gesture would.

use tokio::sync::broadcast;

use crate::drag::{DragController, Handle};
use crate::element::ElementId;
use crate::error::PlanResult;
use crate::geometry::Point;
use crate::preview::ElementPreview;
use crate::scene::Plan;
use crate::store::PlanStore;

/// An editing session over one floor plan.
#[derive(Debug, Default)]
pub struct Editor {
    store: PlanStore,
    drag: DragController,
}

impl Editor {
    /// Create an editor over an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed plan state.
    #[must_use]
    pub fn plan(&self) -> &Plan {
        self.store.plan()
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    /// Mutable access to the store for non-gesture mutations. Removing
    /// elements this way skips preview-channel cleanup; prefer
    /// [`Editor::remove`].
    pub fn store_mut(&mut self) -> &mut PlanStore {
        &mut self.store
    }

    /// Whether a drag gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Subscribe to live preview frames for one element.
    pub fn subscribe_preview(&mut self, id: ElementId) -> broadcast::Receiver<ElementPreview> {
        self.drag.subscribe_preview(id)
    }

    /// Start a drag gesture on an element handle and select the element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is unknown or the handle does not fit
    /// its kind.
    pub fn begin_drag(&mut self, id: ElementId, handle: Handle, pointer: Point) -> PlanResult<()> {
        self.drag.begin(&self.store, id, handle, pointer)?;
        self.store.select(Some(id));
        Ok(())
    }

    /// Advance the active gesture. Broadcasts a preview frame; the store is
    /// untouched.
    pub fn drag_to(&mut self, pointer: Point) {
        self.drag.update(&self.store, pointer);
    }

    /// Finish the active gesture at a final pointer position and commit the
    /// working geometry to the store as one history entry.
    pub fn end_drag(&mut self, pointer: Point) {
        self.drag.update(&self.store, pointer);
        self.drag.commit(&mut self.store);
    }

    /// The pointer left the editing surface: commit whatever the gesture
    /// holds. There is no discard path.
    pub fn pointer_left(&mut self) {
        self.drag.pointer_left(&mut self.store);
    }

    /// Remove an element and release the preview channels of everything the
    /// removal cascaded to.
    pub fn remove(&mut self, id: ElementId) {
        for removed in self.store.remove(id) {
            self.drag.release_preview(removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, Opening, Wall};

    fn wall_span(editor: &mut Editor, x0: f32, x1: f32) -> ElementId {
        editor
            .store_mut()
            .add_wall(Wall::new(Point::new(x0, 0.0, 0.0), Point::new(x1, 0.0, 0.0)))
    }

    #[test]
    fn test_begin_drag_selects_element() {
        let mut editor = Editor::new();
        let wall = wall_span(&mut editor, 0.0, 10.0);

        editor
            .begin_drag(wall, Handle::WallEnd, Point::new(10.0, 0.0, 0.0))
            .expect("begin drag");

        assert!(editor.is_dragging());
        assert_eq!(editor.plan().selected(), Some(wall));
    }

    #[test]
    fn test_begin_drag_on_unknown_element_fails() {
        let mut editor = Editor::new();
        let result = editor.begin_drag(ElementId::new(), Handle::WallEnd, Point::zero());
        assert!(result.is_err());
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_gesture_commits_exactly_once() {
        let mut editor = Editor::new();
        let wall = wall_span(&mut editor, 0.0, 10.0);
        let before = editor.store().history().past_len();

        editor
            .begin_drag(wall, Handle::WallEnd, Point::new(10.0, 0.0, 0.0))
            .expect("begin drag");
        editor.drag_to(Point::new(11.2, 0.0, 0.4));
        editor.drag_to(Point::new(12.3, 0.0, 0.6));
        editor.end_drag(Point::new(12.3, 0.0, 0.6));

        assert_eq!(editor.store().history().past_len(), before + 1);
        let end = editor
            .plan()
            .get(wall)
            .and_then(Element::as_wall)
            .expect("wall")
            .end;
        assert_eq!(end, Point::new(12.5, 0.0, 0.5));
    }

    #[test]
    fn test_previews_flow_while_store_is_untouched() {
        let mut editor = Editor::new();
        let wall = wall_span(&mut editor, 0.0, 10.0);
        let mut frames = editor.subscribe_preview(wall);

        editor
            .begin_drag(wall, Handle::WallEnd, Point::new(10.0, 0.0, 0.0))
            .expect("begin drag");
        editor.drag_to(Point::new(14.0, 0.0, 2.0));

        let frame = frames.try_recv().expect("preview frame");
        assert_eq!(frame.id, wall);
        let committed = editor
            .plan()
            .get(wall)
            .and_then(Element::as_wall)
            .expect("wall");
        assert_eq!(committed.end, Point::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_pointer_left_commits_active_gesture() {
        let mut editor = Editor::new();
        let wall = wall_span(&mut editor, 0.0, 10.0);

        editor
            .begin_drag(wall, Handle::WallEnd, Point::new(10.0, 0.0, 0.0))
            .expect("begin drag");
        editor.drag_to(Point::new(16.0, 0.0, 0.0));
        editor.pointer_left();

        assert!(!editor.is_dragging());
        let end = editor
            .plan()
            .get(wall)
            .and_then(Element::as_wall)
            .expect("wall")
            .end;
        assert_eq!(end, Point::new(16.0, 0.0, 0.0));
    }

    #[test]
    fn test_remove_releases_cascaded_preview_channels() {
        let mut editor = Editor::new();
        let wall = wall_span(&mut editor, 0.0, 10.0);
        let door = editor
            .store_mut()
            .add_opening(Opening::door(wall).with_distance(4.0))
            .expect("add opening");

        let mut wall_frames = editor.subscribe_preview(wall);
        let mut door_frames = editor.subscribe_preview(door);

        editor.remove(wall);

        assert!(editor.plan().is_empty());
        assert!(matches!(
            wall_frames.try_recv(),
            Err(broadcast::error::TryRecvError::Closed)
        ));
        assert!(matches!(
            door_frames.try_recv(),
            Err(broadcast::error::TryRecvError::Closed)
        ));
    }

    #[test]
    fn test_remove_unknown_element_is_ignored() {
        let mut editor = Editor::new();
        wall_span(&mut editor, 0.0, 10.0);
        let before = editor.store().history().past_len();

        editor.remove(ElementId::new());

        assert_eq!(editor.plan().element_count(), 1);
        assert_eq!(editor.store().history().past_len(), before);
    }
}
