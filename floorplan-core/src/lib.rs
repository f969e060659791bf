//! # Floorplan Core
//!
//! Spatial engine for interactive floor-plan editing: a scene of walls,
//! wall openings, and free-standing products, with snapping, drag
//! transactions, bounded undo, and JSON persistence.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                floorplan-core               │
//! ├─────────────────────────────────────────────┤
//! │  Plan Store      │  Drag Coordinator        │
//! │  - Elements      │  - Working geometry      │
//! │  - Selection     │  - Preview broadcast     │
//! │  - Undo history  │  - One commit per drag   │
//! ├─────────────────────────────────────────────┤
//! │  Snap Resolver   │  Persistence             │
//! │  - Endpoints     │  - Tagged records        │
//! │  - Grid          │  - Atomic load           │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Everything is synchronous and single-threaded; the engine is driven one
//! pointer event at a time by a host UI.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod drag;
pub mod editor;
pub mod element;
pub mod error;
pub mod geometry;
pub mod history;
pub mod preview;
pub mod scene;
pub mod schema;
pub mod store;

pub use drag::{DragController, DragState, Handle};
pub use editor::Editor;
pub use element::{
    Element, ElementId, ElementKind, Opening, OpeningKind, Product, ProductCategory, Wall,
};
pub use error::{PlanError, PlanResult};
pub use geometry::{Point, ENDPOINT_SNAP_RADIUS, GRID_STEP};
pub use history::{History, HISTORY_LIMIT};
pub use preview::{ElementPreview, PreviewBus};
pub use scene::{Plan, Tool};
pub use schema::ElementRecord;
pub use store::{OpeningPatch, PlanStore, ProductPatch, WallPatch};

/// Floorplan core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
