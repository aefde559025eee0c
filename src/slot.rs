//! Slots: typed anchor points on a node where connections attach.
//!
//! A slot is owned by exactly one node for its whole life. Inputs sit on
//! the node's left edge and accept incoming connections; outputs sit on the
//! right edge and originate them. Positions are node-local and assigned by
//! the owning node's layout; the scene position is the node position plus
//! this offset.
//!
//! Rendering contract: a slot is drawn as a circle of
//! [`Metrics::slot_radius`](crate::theme::Metrics::slot_radius) at its
//! scene position, with the label beside it — to the right of the circle
//! for inputs, right-aligned against the circle for outputs. The label is
//! purely visual; changing it never re-layouts the node.

use crate::canvas::{ConnectionId, NodeId, SlotId};

/// Direction of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Accepts at most one incoming connection; placed on the left edge.
    Input,
    /// Originates connection drags; fans out freely; placed on the right
    /// edge.
    Output,
}

/// A typed anchor point owned by exactly one node.
#[derive(Debug, Clone)]
pub struct Slot {
    id: SlotId,
    node: NodeId,
    kind: SlotKind,
    label: String,
    /// Position relative to the owning node's top-left corner.
    pub(crate) rel_x: f32,
    pub(crate) rel_y: f32,
    /// Connection currently being dragged out of this slot, if any. This is
    /// transient gesture state, not a graph edge.
    pub(crate) drag: Option<ConnectionId>,
}

impl Slot {
    pub(crate) fn new(id: SlotId, node: NodeId, kind: SlotKind, label: impl Into<String>) -> Self {
        Self {
            id,
            node,
            kind,
            label: label.into(),
            rel_x: 0.0,
            rel_y: 0.0,
            drag: None,
        }
    }

    /// This slot's id.
    pub fn id(&self) -> SlotId {
        self.id
    }

    /// The owning node. Fixed for the slot's life.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Input or Output. Fixed for the slot's life.
    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// The display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Position relative to the owning node's top-left corner.
    pub fn position(&self) -> (f32, f32) {
        (self.rel_x, self.rel_y)
    }

    /// The in-progress drag connection, while a gesture originates here.
    pub fn dragged_connection(&self) -> Option<ConnectionId> {
        self.drag
    }

    /// Update the label. Returns whether the text actually changed.
    pub(crate) fn set_label(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.label == label {
            return false;
        }
        self.label = label;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_slot_defaults() {
        let slot = Slot::new(7, 1, SlotKind::Input, "value");
        assert_eq!(slot.id(), 7);
        assert_eq!(slot.node(), 1);
        assert_eq!(slot.kind(), SlotKind::Input);
        assert_eq!(slot.label(), "value");
        assert_eq!(slot.position(), (0.0, 0.0));
        assert!(slot.dragged_connection().is_none());
    }

    #[test]
    fn test_set_label_reports_change() {
        let mut slot = Slot::new(7, 1, SlotKind::Output, "a");
        assert!(slot.set_label("b"));
        assert_eq!(slot.label(), "b");
    }

    #[test]
    fn test_set_label_same_text_is_not_a_change() {
        let mut slot = Slot::new(7, 1, SlotKind::Output, "a");
        assert!(!slot.set_label("a"));
    }
}
