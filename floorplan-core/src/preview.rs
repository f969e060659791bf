//! Per-element broadcast channels for live drag preview.
//!
//! During a drag the coordinator publishes working geometry here instead of
//! writing to the plan, so a renderer tracks the pointer at input frequency
//! with zero store churn. Frames are transient: only the newest matters, and
//! a subscriber that falls behind skips ahead.

use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::broadcast;

use crate::element::{ElementId, ElementKind};

/// Ring capacity of each element's preview channel. Laggards drop old
/// frames and resume at the newest.
pub const PREVIEW_CAPACITY: usize = 16;

/// One frame of working geometry for an element mid-drag. Never canonical.
#[derive(Debug, Clone, Serialize)]
pub struct ElementPreview {
    /// The element being dragged.
    pub id: ElementId,
    /// Full working geometry for the frame.
    pub kind: ElementKind,
}

/// Registry of per-element preview channels.
///
/// Channels are created lazily on first subscribe and dropped on
/// [`PreviewBus::release`] when the element leaves the plan. Publishing to an
/// element nobody subscribed to is a no-op.
#[derive(Debug, Default)]
pub struct PreviewBus {
    channels: HashMap<ElementId, broadcast::Sender<ElementPreview>>,
}

impl PreviewBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
        }
    }

    /// Subscribe to preview frames for an element, creating its channel on
    /// first use.
    pub fn subscribe(&mut self, id: ElementId) -> broadcast::Receiver<ElementPreview> {
        self.channels
            .entry(id)
            .or_insert_with(|| {
                let (tx, _) = broadcast::channel(PREVIEW_CAPACITY);
                tx
            })
            .subscribe()
    }

    /// Publish a preview frame on the element's channel.
    pub fn publish(&self, preview: ElementPreview) {
        if let Some(tx) = self.channels.get(&preview.id) {
            // Ignore send errors (no receivers is okay)
            let _ = tx.send(preview);
        }
    }

    /// Drop an element's channel, closing its receivers.
    pub fn release(&mut self, id: ElementId) {
        self.channels.remove(&id);
    }

    /// Number of live subscribers on an element's channel.
    #[must_use]
    pub fn subscriber_count(&self, id: ElementId) -> usize {
        self.channels
            .get(&id)
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Element, Product, ProductCategory};
    use tokio::sync::broadcast::error::TryRecvError;

    fn product_element() -> Element {
        Element::new(ElementKind::Product(Product::new(ProductCategory::Table)))
    }

    fn frame_for(element: &Element) -> ElementPreview {
        ElementPreview {
            id: element.id,
            kind: element.kind.clone(),
        }
    }

    #[test]
    fn subscriber_receives_published_frame() {
        let mut bus = PreviewBus::new();
        let element = product_element();
        let mut rx = bus.subscribe(element.id);

        bus.publish(frame_for(&element));

        let frame = rx.try_recv().expect("frame should be delivered");
        assert_eq!(frame.id, element.id);
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let bus = PreviewBus::new();
        bus.publish(frame_for(&product_element()));
    }

    #[test]
    fn channels_are_isolated_per_element() {
        let mut bus = PreviewBus::new();
        let dragged = product_element();
        let other = product_element();
        let mut other_rx = bus.subscribe(other.id);
        let _dragged_rx = bus.subscribe(dragged.id);

        bus.publish(frame_for(&dragged));

        assert!(matches!(other_rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn release_closes_receivers() {
        let mut bus = PreviewBus::new();
        let element = product_element();
        let mut rx = bus.subscribe(element.id);

        bus.release(element.id);

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Closed)));
        assert_eq!(bus.subscriber_count(element.id), 0);
    }

    #[test]
    fn lagged_subscriber_skips_to_newer_frames() {
        let mut bus = PreviewBus::new();
        let element = product_element();
        let mut rx = bus.subscribe(element.id);

        for _ in 0..(PREVIEW_CAPACITY + 4) {
            bus.publish(frame_for(&element));
        }

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Lagged(_))));
        assert!(rx.try_recv().is_ok());
    }
}
