//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use node_canvas::{Canvas, ContentPane, NodeId, SlotId, SlotKind};

/// Initialize logging once per test binary so `RUST_LOG=debug cargo test`
/// shows engine diagnostics.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Ids of the standard two-node fixture.
pub struct TwoNodes {
    pub a: NodeId,
    pub b: NodeId,
    pub out: SlotId,
    pub inp: SlotId,
}

/// Node A at the origin with one output "out"; node B at (300, 40) with one
/// input "in". Events queued during setup are drained.
pub fn two_node_canvas() -> (Canvas, TwoNodes) {
    init_logging();

    let mut canvas = Canvas::new();
    let a = canvas.add_node_at("a", 0.0, 0.0);
    let b = canvas.add_node_at("b", 300.0, 40.0);
    let out = canvas.add_slot(a, SlotKind::Output, "out").unwrap();
    let inp = canvas.add_slot(b, SlotKind::Input, "in").unwrap();
    canvas.take_events();

    (canvas, TwoNodes { a, b, out, inp })
}

/// Run a full press / move / release gesture from one scene point to
/// another.
pub fn drag(canvas: &mut Canvas, from: (f32, f32), to: (f32, f32)) {
    canvas.pointer_pressed(from.0, from.1);
    canvas.pointer_moved((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
    canvas.pointer_moved(to.0, to.1);
    canvas.pointer_released(to.0, to.1);
}

/// Drag from one slot's anchor to another's.
pub fn drag_between_slots(canvas: &mut Canvas, from: SlotId, to: SlotId) {
    let start = canvas.slot_scene_position(from).unwrap();
    let end = canvas.slot_scene_position(to).unwrap();
    drag(canvas, start, end);
}

/// Content pane that records the geometry it was assigned, for asserting
/// layout decisions from outside the canvas.
#[derive(Clone)]
pub struct RecordingPane {
    min: (f32, f32),
    pub assigned: Rc<RefCell<(f32, f32, f32, f32)>>,
}

impl RecordingPane {
    pub fn new(min_w: f32, min_h: f32) -> Self {
        Self {
            min: (min_w, min_h),
            assigned: Rc::new(RefCell::new((0.0, 0.0, 0.0, 0.0))),
        }
    }

    pub fn geometry(&self) -> (f32, f32, f32, f32) {
        *self.assigned.borrow()
    }
}

impl ContentPane for RecordingPane {
    fn min_size(&self) -> (f32, f32) {
        self.min
    }

    fn set_geometry(&mut self, x: f32, y: f32, width: f32, height: f32) {
        *self.assigned.borrow_mut() = (x, y, width, height);
    }
}
