//! # Node Canvas
//!
//! An embeddable node-graph canvas engine: typed boxes ("nodes") expose
//! directional anchor points ("slots"), and directed curved edges
//! ("connections") are created, rendered and hit-tested between slots
//! through pointer manipulation. The engine is domain-agnostic — it knows
//! nothing about what a node computes.
//!
//! ## Features
//!
//! - **Incremental Layout** - Slot positions and node minimum sizes are
//!   recomputed on every mutation; resize requests clamp, never fail
//! - **Precise Edge Hit-Testing** - Connections are S-shaped quadratic
//!   bezier pairs with an iterative closest-point search for stroke tests
//! - **Pointer Drag Protocol** - Press an output, drag a floating curve,
//!   release over an input; invalid releases discard cleanly
//! - **Reactive Teardown** - Removing a node or slot removes its incident
//!   connections first, in dependency order, with notifications
//! - **Opaque Styling** - Background brushes and palette colors pass
//!   through to the renderer untouched
//!
//! ## Quick Start
//!
//! ```
//! use node_canvas::{Canvas, SlotKind};
//!
//! let mut canvas = Canvas::new();
//! let source = canvas.add_node_at("producer", 0.0, 0.0);
//! let sink = canvas.add_node_at("consumer", 300.0, 80.0);
//! let out = canvas.add_slot(source, SlotKind::Output, "value").unwrap();
//! let inp = canvas.add_slot(sink, SlotKind::Input, "value").unwrap();
//!
//! // Drag from the output's anchor and release on the input's anchor.
//! let (x, y) = canvas.slot_scene_position(out).unwrap();
//! canvas.pointer_pressed(x, y);
//! let (tx, ty) = canvas.slot_scene_position(inp).unwrap();
//! canvas.pointer_moved(tx, ty);
//! canvas.pointer_released(tx, ty);
//!
//! assert_eq!(canvas.connection_count(), 1);
//! ```
//!
//! ## Core Components
//!
//! - [`Canvas`] - Object store, layout driver and interaction protocol
//! - [`Node`] - Resizable container owning slots and optional content
//! - [`Slot`] - Typed (input/output) anchor point on a node
//! - [`Connection`] - Directed curved edge between slots
//! - [`QuadBezier`] - Curve primitive with closest-point search
//! - [`Metrics`] / [`Theme`] - Geometry constants and render palette
//!
//! Rendering and windowing stay outside: the engine exposes geometry
//! (bounding rectangles, SVG-style path commands, label anchors) and a
//! notification queue ([`CanvasEvent`]) for the embedding shell to drive
//! its renderer from.

pub mod bezier;
pub mod canvas;
pub mod connection;
pub mod events;
pub mod node;
pub mod selection;
pub mod slot;
pub mod theme;
pub mod validate;

pub use bezier::{squared_distance, QuadBezier};
pub use canvas::{Canvas, CanvasError, ConnectionId, NodeId, SlotId};
pub use connection::{Connection, ConnectionTarget};
pub use events::CanvasEvent;
pub use node::{ContentPane, Node, DEFAULT_NODE_SIZE};
pub use selection::SelectionManager;
pub use slot::{Slot, SlotKind};
pub use theme::{Metrics, Theme};
pub use validate::{validate_connection, ConnectError, ValidationResult};
