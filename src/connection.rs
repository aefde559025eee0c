//! Connections: directed curved edges between slots.
//!
//! A connection starts at a source slot and ends either at a bound target
//! slot or, while a drag gesture is in flight, at a floating scene
//! coordinate that follows the pointer. The rendered edge is an S-shaped
//! path made of two chained quadratic bezier segments, expressed in a local
//! coordinate space anchored at the source slot's scene position.
//!
//! The curve is rebuilt synchronously whenever an endpoint moves, so
//! geometry queries never observe a stale shape. The canvas removes a
//! connection outright when its source — or, once bound, its target — slot
//! goes away.

use crate::bezier::{squared_distance, QuadBezier};
use crate::canvas::{ConnectionId, SlotId};
use crate::theme::Metrics;

/// Where a connection currently ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnectionTarget {
    /// Following an arbitrary scene coordinate (drag in flight).
    Floating { x: f32, y: f32 },
    /// Attached to a target slot. Immutable once set.
    Bound(SlotId),
}

/// A directed curved edge from a source slot to a target.
#[derive(Debug, Clone)]
pub struct Connection {
    id: ConnectionId,
    source: SlotId,
    target: ConnectionTarget,
    /// Scene position of the source slot; the curve lives in coordinates
    /// relative to this point.
    origin: (f32, f32),
    /// Two chained segments forming the S-curve, in local space.
    segments: [QuadBezier; 2],
}

impl Connection {
    pub(crate) fn new(
        id: ConnectionId,
        source: SlotId,
        origin: (f32, f32),
        pointer: (f32, f32),
    ) -> Self {
        let mut conn = Self {
            id,
            source,
            target: ConnectionTarget::Floating {
                x: pointer.0,
                y: pointer.1,
            },
            origin,
            segments: [QuadBezier::default(); 2],
        };
        conn.refresh(origin, pointer);
        conn
    }

    /// This connection's id.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The source slot the edge originates from. Fixed at construction.
    pub fn source_slot(&self) -> SlotId {
        self.source
    }

    /// The current target state.
    pub fn target(&self) -> ConnectionTarget {
        self.target
    }

    /// The bound target slot, once the connection has one.
    pub fn target_slot(&self) -> Option<SlotId> {
        match self.target {
            ConnectionTarget::Bound(slot) => Some(slot),
            ConnectionTarget::Floating { .. } => None,
        }
    }

    /// Whether the connection has been bound to a target slot.
    pub fn is_bound(&self) -> bool {
        matches!(self.target, ConnectionTarget::Bound(_))
    }

    /// Scene position of the source end of the curve.
    pub fn source_pos(&self) -> (f32, f32) {
        self.origin
    }

    /// Scene position of the target end of the curve.
    pub fn target_pos(&self) -> (f32, f32) {
        let (tx, ty) = self.segments[1].end_point();
        (self.origin.0 + tx, self.origin.1 + ty)
    }

    /// Move the floating target. Ignored once the target is bound.
    pub(crate) fn set_target_pos(&mut self, x: f32, y: f32) {
        if let ConnectionTarget::Floating { .. } = self.target {
            self.target = ConnectionTarget::Floating { x, y };
            self.refresh(self.origin, (x, y));
        }
    }

    /// Bind the floating target to `slot`. Returns whether the transition
    /// happened; a second call is a no-op.
    pub(crate) fn bind(&mut self, slot: SlotId) -> bool {
        if self.is_bound() {
            return false;
        }
        self.target = ConnectionTarget::Bound(slot);
        true
    }

    /// Rebuild both segments from the current endpoint scene positions.
    ///
    /// The first segment runs from the origin to the curve midpoint via a
    /// control point at a quarter of the target's x offset; the second from
    /// the midpoint to the target via a control point at three quarters of
    /// the x offset and the full y offset. The resulting S shape stays
    /// smooth when the endpoints are vertically offset.
    pub(crate) fn refresh(&mut self, origin: (f32, f32), target: (f32, f32)) {
        self.origin = origin;
        let tx = target.0 - origin.0;
        let ty = target.1 - origin.1;
        let mid = (tx / 2.0, ty / 2.0);

        self.segments[0].set((0.0, 0.0), (tx * 0.25, 0.0), mid);
        self.segments[1].set(mid, (tx * 0.75, ty), (tx, ty));
    }

    /// The two curve segments, in local (source-anchored) coordinates.
    pub fn segments(&self) -> &[QuadBezier; 2] {
        &self.segments
    }

    /// Precise stroke hit-test: whether the scene point lies within one
    /// curve width of either segment.
    pub fn contains(&self, x: f32, y: f32, metrics: &Metrics) -> bool {
        let local = (x - self.origin.0, y - self.origin.1);
        let threshold = metrics.curve_width * metrics.curve_width;

        self.segments.iter().any(|segment| {
            let closest = segment.closest_point_to(local);
            squared_distance(local, closest) <= threshold
        })
    }

    /// Axis-aligned scene rectangle covering the curve plus a stroke-width
    /// margin. Used to cull before the precise [`contains`](Self::contains)
    /// test.
    pub fn bounding_rect(&self, metrics: &Metrics) -> (f32, f32, f32, f32) {
        let (tx, ty) = self.segments[1].end_point();
        let min_x = tx.min(0.0);
        let min_y = ty.min(0.0);
        let max_x = tx.max(0.0);
        let max_y = ty.max(0.0);
        let m = metrics.curve_width;

        (
            self.origin.0 + min_x - m,
            self.origin.1 + min_y - m,
            (max_x - min_x) + 2.0 * m,
            (max_y - min_y) + 2.0 * m,
        )
    }

    /// SVG-style path commands for the full curve in scene coordinates,
    /// ready for a `Path` element: `M x y Q cx cy x y Q cx cy x y`.
    pub fn path_commands(&self) -> String {
        let (ox, oy) = self.origin;
        let c0 = self.segments[0].point(1);
        let m0 = self.segments[0].point(2);
        let c1 = self.segments[1].point(1);
        let e1 = self.segments[1].point(2);

        format!(
            "M {} {} Q {} {} {} {} Q {} {} {} {}",
            ox,
            oy,
            ox + c0.0,
            oy + c0.1,
            ox + m0.0,
            oy + m0.1,
            ox + c1.0,
            oy + c1.1,
            ox + e1.0,
            oy + e1.1,
        )
    }

    /// Scene position of the endpoint handle drawn at the target end when
    /// the connection is selected.
    pub fn endpoint_handle(&self) -> (f32, f32) {
        self.target_pos()
    }
}
