//! Nodes: movable, resizable containers owning slots and optional content.
//!
//! A node owns an ordered list of slots (inputs stacked on the left edge,
//! outputs on the right) and, optionally, a content pane filling the area
//! below the slots. The node's effective size never drops below the minimum
//! required by its slot rows and the content's minimum extent; resize
//! requests are clamped, not rejected.
//!
//! Rendering contract: a rounded rectangle
//! ([`Metrics::corner_radius`](crate::theme::Metrics::corner_radius)) at
//! the node's scene position, stroked with the normal or selected border
//! color, filled with the node's background brush (falling back to
//! [`Theme::node_background`](crate::theme::Theme::node_background)), with
//! the label drawn near the top-left corner inset by the corner radius.

use slint::Brush;

use crate::canvas::{NodeId, SlotId};
use crate::theme::Metrics;

/// Default extent of a freshly created node, before any clamping.
pub const DEFAULT_NODE_SIZE: (f32, f32) = (100.0, 100.0);

/// Content embedded in a node's central area.
///
/// The engine treats content as opaque: it only asks for the minimum extent
/// and pushes back the node-local rectangle left over once slots are
/// placed. An all-zero rectangle means the node cannot currently show the
/// content.
pub trait ContentPane {
    /// Minimum (width, height) the content needs. Feeds the owning node's
    /// minimum size.
    fn min_size(&self) -> (f32, f32);

    /// Receive the node-local rectangle assigned by layout.
    fn set_geometry(&mut self, x: f32, y: f32, width: f32, height: f32);
}

/// A positioned, resizable container owning typed slots and optional
/// embedded content.
pub struct Node {
    id: NodeId,
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) width: f32,
    pub(crate) height: f32,
    label: String,
    background: Option<Brush>,
    pub(crate) content: Option<Box<dyn ContentPane>>,
    /// Owned slots in insertion order; inputs and outputs interleave here
    /// and are stacked per kind by layout.
    pub(crate) slots: Vec<SlotId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            width: DEFAULT_NODE_SIZE.0,
            height: DEFAULT_NODE_SIZE.1,
            label: label.into(),
            background: None,
            content: None,
            slots: Vec::new(),
        }
    }

    /// This node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn set_label(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.label == label {
            return false;
        }
        self.label = label;
        true
    }

    /// Scene position of the node's top-left corner.
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Effective (clamped) size.
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// The background brush override, if one is set.
    pub fn background(&self) -> Option<&Brush> {
        self.background.as_ref()
    }

    pub(crate) fn set_background(&mut self, brush: Option<Brush>) {
        self.background = brush;
    }

    /// Owned slot ids in insertion order.
    pub fn slots(&self) -> &[SlotId] {
        &self.slots
    }

    /// The embedded content pane, if any.
    pub fn content(&self) -> Option<&dyn ContentPane> {
        self.content.as_deref()
    }

    /// Mutable access to the embedded content pane.
    pub fn content_mut(&mut self) -> Option<&mut (dyn ContentPane + 'static)> {
        self.content.as_deref_mut()
    }

    /// Minimum size required by `n_inputs`/`n_outputs` slot rows plus the
    /// content's minimum extent, including the slot-radius margins on the
    /// left, right and bottom edges.
    pub(crate) fn min_size(&self, n_inputs: usize, n_outputs: usize, metrics: &Metrics) -> (f32, f32) {
        let n_slots = n_inputs.max(n_outputs);
        let (content_w, content_h) = self
            .content
            .as_ref()
            .map(|c| c.min_size())
            .unwrap_or((0.0, 0.0));

        let min_w = content_w + 2.0 * metrics.slot_radius;
        let min_h =
            metrics.slot_y(n_slots) + 2.0 * metrics.slot_radius + content_h + metrics.slot_radius;

        (min_w, min_h)
    }

    /// Whether the scene point lies within the node's body rectangle.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Scene rectangle covering the body plus the border stroke and the
    /// slot circles that overhang the left and right edges.
    pub fn bounding_rect(&self, metrics: &Metrics) -> (f32, f32, f32, f32) {
        let m = metrics.border_width;
        let overhang = m + metrics.slot_radius;

        (
            self.x - overhang,
            self.y - m,
            self.width + 2.0 * overhang,
            self.height + 2.0 * m,
        )
    }

    /// Node-local position where a renderer draws the label.
    pub fn label_position(&self, metrics: &Metrics) -> (f32, f32) {
        (
            metrics.corner_radius + metrics.border_width,
            metrics.corner_radius + metrics.border_width * 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPane {
        min: (f32, f32),
        assigned: (f32, f32, f32, f32),
    }

    impl FixedPane {
        fn new(w: f32, h: f32) -> Self {
            Self {
                min: (w, h),
                assigned: (0.0, 0.0, 0.0, 0.0),
            }
        }
    }

    impl ContentPane for FixedPane {
        fn min_size(&self) -> (f32, f32) {
            self.min
        }
        fn set_geometry(&mut self, x: f32, y: f32, width: f32, height: f32) {
            self.assigned = (x, y, width, height);
        }
    }

    #[test]
    fn test_new_node_defaults() {
        let node = Node::new(1, "sum");
        assert_eq!(node.id(), 1);
        assert_eq!(node.label(), "sum");
        assert_eq!(node.position(), (0.0, 0.0));
        assert_eq!(node.size(), DEFAULT_NODE_SIZE);
        assert!(node.slots().is_empty());
        assert!(node.background().is_none());
        assert!(node.content().is_none());
    }

    // ========================================================================
    // min_size()
    // ========================================================================

    #[test]
    fn test_min_size_without_slots_or_content() {
        let node = Node::new(1, "");
        let m = Metrics::default();
        // slot_y(0) + 2r + r = 30 + 12 + 6; width is just the margins.
        assert_eq!(node.min_size(0, 0, &m), (12.0, 48.0));
    }

    #[test]
    fn test_min_size_uses_larger_slot_group() {
        let node = Node::new(1, "");
        let m = Metrics::default();
        // Three rows: slot_y(3) + 2r + r = 84 + 12 + 6.
        assert_eq!(node.min_size(3, 1, &m), (12.0, 102.0));
        assert_eq!(node.min_size(1, 3, &m), (12.0, 102.0));
    }

    #[test]
    fn test_min_size_includes_content() {
        let mut node = Node::new(1, "");
        node.content = Some(Box::new(FixedPane::new(80.0, 40.0)));
        let m = Metrics::default();
        // Width: 80 + 12. Height: slot_y(1) + 12 + 40 + 6 = 48 + 58.
        assert_eq!(node.min_size(1, 1, &m), (92.0, 106.0));
    }

    // ========================================================================
    // Geometry queries
    // ========================================================================

    #[test]
    fn test_contains_body_rect() {
        let mut node = Node::new(1, "");
        node.x = 10.0;
        node.y = 20.0;
        assert!(node.contains(10.0, 20.0));
        assert!(node.contains(60.0, 70.0));
        assert!(node.contains(110.0, 120.0));
        assert!(!node.contains(111.0, 70.0));
        assert!(!node.contains(9.0, 70.0));
    }

    #[test]
    fn test_bounding_rect_includes_slot_overhang() {
        let node = Node::new(1, "");
        let m = Metrics::default();
        let (x, y, w, h) = node.bounding_rect(&m);
        // 1.5 border + 6 slot radius on each side horizontally.
        assert_eq!(x, -7.5);
        assert_eq!(y, -1.5);
        assert_eq!(w, 115.0);
        assert_eq!(h, 103.0);
    }

    #[test]
    fn test_label_position_inset_by_corner_radius() {
        let node = Node::new(1, "");
        let m = Metrics::default();
        assert_eq!(node.label_position(&m), (11.5, 13.0));
    }

    #[test]
    fn test_set_label_reports_change() {
        let mut node = Node::new(1, "a");
        assert!(node.set_label("b"));
        assert!(!node.set_label("b"));
    }
}
