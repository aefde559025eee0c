//! Connection acceptance rules.
//!
//! A connection drag may complete on a candidate slot only if every rule
//! holds: the candidate exists and is an input, it lives on a different
//! node than the source, the same source→target edge does not already
//! exist, and the input is not already fed by another connection.
//! Rejections name the violated rule so shells can surface a reason.

use std::collections::HashMap;

use thiserror::Error;

use crate::canvas::{ConnectionId, SlotId};
use crate::connection::Connection;
use crate::slot::{Slot, SlotKind};

/// Result of checking whether a candidate target accepts a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The connection is allowed.
    Valid,
    /// The connection is refused for the given reason.
    Invalid(ConnectError),
}

impl ValidationResult {
    /// Whether the connection is allowed.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The rejection reason, if any.
    pub fn err(&self) -> Option<&ConnectError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(err) => Some(err),
        }
    }
}

/// Reasons a connection is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// One of the two slots does not exist.
    #[error("slot {0} not found")]
    SlotNotFound(SlotId),
    /// Connections end at input slots only.
    #[error("connections must end at an input slot")]
    NotAnInput,
    /// Connections originate from output slots only.
    #[error("connections must start at an output slot")]
    NotAnOutput,
    /// Both slots belong to the same node.
    #[error("cannot connect two slots of the same node")]
    SameNode,
    /// This exact source→target edge already exists.
    #[error("a connection between these slots already exists")]
    Duplicate,
    /// The input already has an incoming connection from elsewhere.
    #[error("input slot already has an incoming connection")]
    InputOccupied,
}

/// Check every acceptance rule for a `source` → `target` connection.
///
/// Only bound connections count for the duplicate and occupancy rules; a
/// drag still in flight has a floating target and never blocks its own
/// completion.
pub fn validate_connection(
    slots: &HashMap<SlotId, Slot>,
    connections: &HashMap<ConnectionId, Connection>,
    source: SlotId,
    target: SlotId,
) -> ValidationResult {
    let source_slot = match slots.get(&source) {
        Some(slot) => slot,
        None => return ValidationResult::Invalid(ConnectError::SlotNotFound(source)),
    };
    let target_slot = match slots.get(&target) {
        Some(slot) => slot,
        None => return ValidationResult::Invalid(ConnectError::SlotNotFound(target)),
    };

    if target_slot.kind() != SlotKind::Input {
        return ValidationResult::Invalid(ConnectError::NotAnInput);
    }

    if source_slot.kind() != SlotKind::Output {
        return ValidationResult::Invalid(ConnectError::NotAnOutput);
    }

    if source_slot.node() == target_slot.node() {
        return ValidationResult::Invalid(ConnectError::SameNode);
    }

    for conn in connections.values() {
        if conn.target_slot() != Some(target) {
            continue;
        }
        if conn.source_slot() == source {
            return ValidationResult::Invalid(ConnectError::Duplicate);
        }
        return ValidationResult::Invalid(ConnectError::InputOccupied);
    }

    ValidationResult::Valid
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two nodes: node 1 with output 11, node 2 with inputs 21 and 22 and
    /// output 23.
    fn setup_slots() -> HashMap<SlotId, Slot> {
        let mut slots = HashMap::new();
        slots.insert(11, Slot::new(11, 1, SlotKind::Output, "out"));
        slots.insert(21, Slot::new(21, 2, SlotKind::Input, "a"));
        slots.insert(22, Slot::new(22, 2, SlotKind::Input, "b"));
        slots.insert(23, Slot::new(23, 2, SlotKind::Output, "out"));
        slots
    }

    fn bound(id: ConnectionId, source: SlotId, target: SlotId) -> Connection {
        let mut conn = Connection::new(id, source, (0.0, 0.0), (10.0, 10.0));
        conn.bind(target);
        conn
    }

    #[test]
    fn test_accepts_valid_connection() {
        let slots = setup_slots();
        let connections = HashMap::new();
        assert!(validate_connection(&slots, &connections, 11, 21).is_valid());
    }

    #[test]
    fn test_rejects_missing_target() {
        let slots = setup_slots();
        let connections = HashMap::new();
        assert_eq!(
            validate_connection(&slots, &connections, 11, 999),
            ValidationResult::Invalid(ConnectError::SlotNotFound(999))
        );
    }

    #[test]
    fn test_rejects_missing_source() {
        let slots = setup_slots();
        let connections = HashMap::new();
        assert_eq!(
            validate_connection(&slots, &connections, 999, 21),
            ValidationResult::Invalid(ConnectError::SlotNotFound(999))
        );
    }

    #[test]
    fn test_rejects_output_as_target() {
        let slots = setup_slots();
        let connections = HashMap::new();
        assert_eq!(
            validate_connection(&slots, &connections, 11, 23),
            ValidationResult::Invalid(ConnectError::NotAnInput)
        );
    }

    #[test]
    fn test_rejects_input_as_source() {
        let mut slots = setup_slots();
        slots.insert(41, Slot::new(41, 4, SlotKind::Input, "x"));
        let connections = HashMap::new();
        // Input 41 (node 4) dragged onto input 21 (node 2).
        assert_eq!(
            validate_connection(&slots, &connections, 41, 21),
            ValidationResult::Invalid(ConnectError::NotAnOutput)
        );
    }

    #[test]
    fn test_rejects_same_node() {
        let slots = setup_slots();
        let connections = HashMap::new();
        // Output 23 and input 21 both live on node 2.
        assert_eq!(
            validate_connection(&slots, &connections, 23, 21),
            ValidationResult::Invalid(ConnectError::SameNode)
        );
    }

    #[test]
    fn test_rejects_duplicate_edge() {
        let slots = setup_slots();
        let mut connections = HashMap::new();
        connections.insert(100, bound(100, 11, 21));
        assert_eq!(
            validate_connection(&slots, &connections, 11, 21),
            ValidationResult::Invalid(ConnectError::Duplicate)
        );
    }

    #[test]
    fn test_rejects_occupied_input() {
        let mut slots = setup_slots();
        // A third node with its own output.
        slots.insert(31, Slot::new(31, 3, SlotKind::Output, "out"));

        let mut connections = HashMap::new();
        connections.insert(100, bound(100, 11, 21));

        assert_eq!(
            validate_connection(&slots, &connections, 31, 21),
            ValidationResult::Invalid(ConnectError::InputOccupied)
        );
    }

    #[test]
    fn test_floating_drag_does_not_block_itself() {
        let slots = setup_slots();
        let mut connections = HashMap::new();
        // The in-flight drag from 11: floating target, no bound slot.
        connections.insert(100, Connection::new(100, 11, (0.0, 0.0), (5.0, 5.0)));

        assert!(validate_connection(&slots, &connections, 11, 21).is_valid());
    }

    #[test]
    fn test_other_input_stays_available() {
        let slots = setup_slots();
        let mut connections = HashMap::new();
        connections.insert(100, bound(100, 11, 21));

        // Fan-out to a different input of the same node is fine.
        assert!(validate_connection(&slots, &connections, 11, 22).is_valid());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ConnectError::SlotNotFound(42).to_string(),
            "slot 42 not found"
        );
        assert_eq!(
            ConnectError::NotAnInput.to_string(),
            "connections must end at an input slot"
        );
        assert_eq!(
            ConnectError::NotAnOutput.to_string(),
            "connections must start at an output slot"
        );
        assert_eq!(
            ConnectError::SameNode.to_string(),
            "cannot connect two slots of the same node"
        );
        assert_eq!(
            ConnectError::Duplicate.to_string(),
            "a connection between these slots already exists"
        );
        assert_eq!(
            ConnectError::InputOccupied.to_string(),
            "input slot already has an incoming connection"
        );
    }
}
