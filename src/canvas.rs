//! The canvas: object store, layout driver and pointer interaction
//! protocol.
//!
//! [`Canvas`] owns every node, slot and connection in id-keyed maps. All
//! cross-references between objects are ids, so nothing dangles: removing
//! an object walks its dependents first and removes them in dependency
//! order, publishing the matching [`CanvasEvent`]s before the referenced
//! object disappears.
//!
//! Everything is single-threaded and synchronous. Layout, curve refresh and
//! hit-testing all complete inside the mutating call, so geometry queries
//! never observe a stale state.

use std::collections::HashMap;

use log::{debug, trace};
use slint::Brush;
use thiserror::Error;

use crate::connection::{Connection, ConnectionTarget};
use crate::events::CanvasEvent;
use crate::node::{ContentPane, Node};
use crate::selection::SelectionManager;
use crate::slot::{Slot, SlotKind};
use crate::theme::Metrics;
use crate::validate::{validate_connection, ConnectError, ValidationResult};

/// Identifies a node. Ids are unique across all object kinds.
pub type NodeId = i32;
/// Identifies a slot.
pub type SlotId = i32;
/// Identifies a connection.
pub type ConnectionId = i32;

/// A mutating operation referenced an object that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),
    #[error("slot {0} not found")]
    SlotNotFound(SlotId),
    #[error("connection {0} not found")]
    ConnectionNotFound(ConnectionId),
}

/// A connection drag in flight.
struct DragState {
    connection: ConnectionId,
    source: SlotId,
}

/// The node-graph canvas engine.
#[derive(Default)]
pub struct Canvas {
    nodes: HashMap<NodeId, Node>,
    slots: HashMap<SlotId, Slot>,
    connections: HashMap<ConnectionId, Connection>,
    next_id: i32,
    metrics: Metrics,
    selection: SelectionManager,
    drag: Option<DragState>,
    events: Vec<CanvasEvent>,
}

impl Canvas {
    /// Create an empty canvas with default metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty canvas with custom metrics.
    pub fn with_metrics(metrics: Metrics) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    /// The geometry constants in effect.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn alloc_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    // === Events ===

    /// Drain the queued notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<CanvasEvent> {
        std::mem::take(&mut self.events)
    }

    // === Selection ===

    /// Selection state, affecting rendering only.
    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Mutable selection state.
    pub fn selection_mut(&mut self) -> &mut SelectionManager {
        &mut self.selection
    }

    /// Remove every selected connection and node (with its cascade), then
    /// clear the selection.
    pub fn delete_selected(&mut self) {
        let selected: Vec<i32> = self.selection.iter().copied().collect();

        for id in &selected {
            if self.connections.contains_key(id) {
                let _ = self.remove_connection(*id);
            }
        }
        for id in &selected {
            if self.nodes.contains_key(id) {
                let _ = self.remove_node(*id);
            }
        }

        self.selection.clear();
    }

    // === Nodes ===

    /// Create a node with the given label at the scene origin, with the
    /// default size and no slots.
    pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
        self.add_node_at(label, 0.0, 0.0)
    }

    /// Create a node at the given scene position.
    pub fn add_node_at(&mut self, label: impl Into<String>, x: f32, y: f32) -> NodeId {
        let id = self.alloc_id();
        let mut node = Node::new(id, label);
        node.x = x;
        node.y = y;
        self.nodes.insert(id, node);
        self.relayout_node(id);
        id
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Iterator over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Remove a node, cascading removal of its slots and their incident
    /// connections. Dependent removals are published before the node's own
    /// removal event.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), CanvasError> {
        if !self.nodes.contains_key(&id) {
            return Err(CanvasError::NodeNotFound(id));
        }

        let slot_ids = self.nodes[&id].slots.clone();
        for slot_id in slot_ids {
            self.remove_connections_touching(slot_id);
            self.slots.remove(&slot_id);
        }

        self.nodes.remove(&id);
        self.selection.remove(id);
        self.events.push(CanvasEvent::NodeRemoved { node: id });
        debug!("removed node {id} and its slots");
        Ok(())
    }

    /// Change a node's label. Repaint-only; no notification, no layout.
    pub fn set_node_label(
        &mut self,
        id: NodeId,
        label: impl Into<String>,
    ) -> Result<(), CanvasError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(CanvasError::NodeNotFound(id))?;
        node.set_label(label);
        Ok(())
    }

    /// Move a node to a new scene position. Incident connection curves are
    /// recomputed before this returns.
    pub fn set_node_position(&mut self, id: NodeId, x: f32, y: f32) -> Result<(), CanvasError> {
        {
            let node = self
                .nodes
                .get_mut(&id)
                .ok_or(CanvasError::NodeNotFound(id))?;
            node.x = x;
            node.y = y;
        }
        self.refresh_node_connections(id);
        Ok(())
    }

    /// Request a new node size. The effective size is clamped component-wise
    /// to the computed minimum; a [`CanvasEvent::NodeResized`] is published
    /// only if the effective size actually changed.
    pub fn resize_node(&mut self, id: NodeId, width: f32, height: f32) -> Result<(), CanvasError> {
        let prior = {
            let node = self
                .nodes
                .get_mut(&id)
                .ok_or(CanvasError::NodeNotFound(id))?;
            let prior = node.size();
            node.width = width;
            node.height = height;
            prior
        };
        self.relayout_node_from(id, prior);
        Ok(())
    }

    /// Set or clear a node's background brush. Repaint-only.
    pub fn set_node_background(
        &mut self,
        id: NodeId,
        brush: Option<Brush>,
    ) -> Result<(), CanvasError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(CanvasError::NodeNotFound(id))?;
        node.set_background(brush);
        Ok(())
    }

    /// Attach or replace a node's content pane. The node takes ownership
    /// and assigns the pane's geometry during the re-layout this triggers.
    pub fn set_content(
        &mut self,
        id: NodeId,
        content: Box<dyn ContentPane>,
    ) -> Result<(), CanvasError> {
        {
            let node = self
                .nodes
                .get_mut(&id)
                .ok_or(CanvasError::NodeNotFound(id))?;
            node.content = Some(content);
        }
        self.relayout_node(id);
        Ok(())
    }

    /// Detach and return a node's content pane, if any.
    pub fn take_content(
        &mut self,
        id: NodeId,
    ) -> Result<Option<Box<dyn ContentPane>>, CanvasError> {
        let content = {
            let node = self
                .nodes
                .get_mut(&id)
                .ok_or(CanvasError::NodeNotFound(id))?;
            node.content.take()
        };
        self.relayout_node(id);
        Ok(content)
    }

    /// The minimum size the node's slots and content currently require.
    pub fn node_min_size(&self, id: NodeId) -> Option<(f32, f32)> {
        let node = self.nodes.get(&id)?;
        let (n_in, n_out) = self.slot_counts(node);
        Some(node.min_size(n_in, n_out, &self.metrics))
    }

    /// Forward a context-menu request (e.g. a right click on the node) to
    /// the shell, which is expected to pop its menu at the given screen
    /// position.
    pub fn request_context_menu(&mut self, id: NodeId, x: f32, y: f32) -> Result<(), CanvasError> {
        if !self.nodes.contains_key(&id) {
            return Err(CanvasError::NodeNotFound(id));
        }
        self.events
            .push(CanvasEvent::ContextMenuRequested { node: id, x, y });
        Ok(())
    }

    // === Slots ===

    /// Append a slot of the given kind to a node. The slot is positioned
    /// immediately by the re-layout this triggers.
    pub fn add_slot(
        &mut self,
        node: NodeId,
        kind: SlotKind,
        label: impl Into<String>,
    ) -> Result<SlotId, CanvasError> {
        if !self.nodes.contains_key(&node) {
            return Err(CanvasError::NodeNotFound(node));
        }

        let id = self.alloc_id();
        self.slots.insert(id, Slot::new(id, node, kind, label));
        if let Some(node) = self.nodes.get_mut(&node) {
            node.slots.push(id);
        }
        self.relayout_node(node);
        Ok(id)
    }

    /// Remove a single slot, cascading removal of its incident connections
    /// and re-positioning its siblings.
    pub fn remove_slot(&mut self, id: SlotId) -> Result<(), CanvasError> {
        let node_id = match self.slots.get(&id) {
            Some(slot) => slot.node(),
            None => return Err(CanvasError::SlotNotFound(id)),
        };

        self.remove_connections_touching(id);
        self.slots.remove(&id);
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.slots.retain(|&slot| slot != id);
        }
        self.relayout_node(node_id);
        debug!("removed slot {id} from node {node_id}");
        Ok(())
    }

    /// Look up a slot.
    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(&id)
    }

    /// The node's slot at `index` in overall insertion order.
    pub fn slot_by_index(&self, node: NodeId, index: usize) -> Option<SlotId> {
        self.nodes.get(&node)?.slots.get(index).copied()
    }

    /// The node's input slot at `index` within the input group.
    pub fn input_slot(&self, node: NodeId, index: usize) -> Option<SlotId> {
        self.slot_of_kind(node, SlotKind::Input, index)
    }

    /// The node's output slot at `index` within the output group.
    pub fn output_slot(&self, node: NodeId, index: usize) -> Option<SlotId> {
        self.slot_of_kind(node, SlotKind::Output, index)
    }

    fn slot_of_kind(&self, node: NodeId, kind: SlotKind, index: usize) -> Option<SlotId> {
        self.nodes
            .get(&node)?
            .slots
            .iter()
            .copied()
            .filter(|id| self.slots.get(id).map(|s| s.kind()) == Some(kind))
            .nth(index)
    }

    /// The node-local anchor position for a slot of `kind` at `index`,
    /// derived from the layout formula. Valid for any index, whether or not
    /// a slot occupies it yet.
    pub fn slot_position(&self, node: NodeId, kind: SlotKind, index: usize) -> Option<(f32, f32)> {
        let node = self.nodes.get(&node)?;
        let x = match kind {
            SlotKind::Input => 0.0,
            SlotKind::Output => node.width,
        };
        Some((x, self.metrics.slot_y(index)))
    }

    /// A slot's current scene position.
    pub fn slot_scene_position(&self, id: SlotId) -> Option<(f32, f32)> {
        let slot = self.slots.get(&id)?;
        let node = self.nodes.get(&slot.node())?;
        Some((node.x + slot.rel_x, node.y + slot.rel_y))
    }

    /// Change a slot's display label. Publishes
    /// [`CanvasEvent::SlotLabelChanged`] when the text actually changed;
    /// never triggers layout.
    pub fn set_slot_label(
        &mut self,
        id: SlotId,
        label: impl Into<String>,
    ) -> Result<(), CanvasError> {
        let slot = self
            .slots
            .get_mut(&id)
            .ok_or(CanvasError::SlotNotFound(id))?;
        if slot.set_label(label) {
            self.events.push(CanvasEvent::SlotLabelChanged { slot: id });
        }
        Ok(())
    }

    // === Connections ===

    /// Look up a connection.
    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// Iterator over all connections, bound and in-flight alike.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Number of connections currently alive.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Check whether `target` would accept a connection from `source`,
    /// without creating anything.
    pub fn accepts(&self, target: SlotId, source: SlotId) -> ValidationResult {
        validate_connection(&self.slots, &self.connections, source, target)
    }

    /// Create a bound connection programmatically, subject to the same
    /// acceptance rules as a completed drag.
    pub fn connect(&mut self, source: SlotId, target: SlotId) -> Result<ConnectionId, ConnectError> {
        match validate_connection(&self.slots, &self.connections, source, target) {
            ValidationResult::Valid => {}
            ValidationResult::Invalid(err) => return Err(err),
        }

        // Both positions exist: validation checked both slots.
        let origin = self.slot_scene_position(source).unwrap_or((0.0, 0.0));
        let target_pos = self.slot_scene_position(target).unwrap_or((0.0, 0.0));

        let id = self.alloc_id();
        let mut conn = Connection::new(id, source, origin, target_pos);
        conn.bind(target);
        self.connections.insert(id, conn);

        self.events.push(CanvasEvent::ConnectionAdded {
            connection: id,
            source,
            target,
        });
        debug!("connected slot {source} -> slot {target} as connection {id}");
        Ok(id)
    }

    /// Remove a connection explicitly (e.g. from a delete command).
    pub fn remove_connection(&mut self, id: ConnectionId) -> Result<(), CanvasError> {
        let conn = self
            .connections
            .remove(&id)
            .ok_or(CanvasError::ConnectionNotFound(id))?;

        if let Some(slot) = self.slots.get_mut(&conn.source_slot()) {
            if slot.drag == Some(id) {
                slot.drag = None;
            }
        }
        if let Some(drag) = &self.drag {
            if drag.connection == id {
                self.drag = None;
            }
        }

        self.selection.remove(id);
        self.events
            .push(CanvasEvent::ConnectionRemoved { connection: id });
        Ok(())
    }

    // === Hit tests ===

    /// The first slot whose anchor circle contains the scene point.
    /// Enumeration order under overlap is unspecified.
    pub fn slot_at(&self, x: f32, y: f32) -> Option<SlotId> {
        self.slots_at(x, y).into_iter().next()
    }

    /// All slots whose anchor circles contain the scene point.
    fn slots_at(&self, x: f32, y: f32) -> Vec<SlotId> {
        let hit_radius = self.metrics.slot_hit_radius();
        let hit_radius_sq = hit_radius * hit_radius;

        let mut hits = Vec::new();
        for node in self.nodes.values() {
            for &slot_id in &node.slots {
                if let Some(slot) = self.slots.get(&slot_id) {
                    let dx = x - (node.x + slot.rel_x);
                    let dy = y - (node.y + slot.rel_y);
                    if dx * dx + dy * dy <= hit_radius_sq {
                        hits.push(slot_id);
                    }
                }
            }
        }
        hits
    }

    /// The first node whose body rectangle contains the scene point.
    pub fn node_at(&self, x: f32, y: f32) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| node.contains(x, y))
            .map(|node| node.id())
    }

    /// The first connection whose stroke contains the scene point. Culls by
    /// bounding rectangle before running the precise curve test.
    pub fn connection_at(&self, x: f32, y: f32) -> Option<ConnectionId> {
        self.connections
            .values()
            .find(|conn| {
                let (bx, by, bw, bh) = conn.bounding_rect(&self.metrics);
                x >= bx
                    && x <= bx + bw
                    && y >= by
                    && y <= by + bh
                    && conn.contains(x, y, &self.metrics)
            })
            .map(|conn| conn.id())
    }

    // === Pointer protocol ===

    /// Pointer-down. Pressing an output slot's anchor starts a connection
    /// drag with a floating target at the pointer; anything else is a
    /// no-op for connection creation.
    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        if self.drag.is_some() {
            return;
        }

        let slot_id = match self.slot_at(x, y) {
            Some(id) => id,
            None => return,
        };
        if self.slots[&slot_id].kind() != SlotKind::Output {
            return;
        }

        let origin = match self.slot_scene_position(slot_id) {
            Some(pos) => pos,
            None => return,
        };

        let id = self.alloc_id();
        self.connections
            .insert(id, Connection::new(id, slot_id, origin, (x, y)));
        if let Some(slot) = self.slots.get_mut(&slot_id) {
            slot.drag = Some(id);
        }
        self.drag = Some(DragState {
            connection: id,
            source: slot_id,
        });
        debug!("drag started from slot {slot_id} as connection {id}");
    }

    /// Pointer-move. Updates the floating target of the active drag, which
    /// recomputes the curve.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let id = match &self.drag {
            Some(drag) => drag.connection,
            None => return,
        };
        if let Some(conn) = self.connections.get_mut(&id) {
            conn.set_target_pos(x, y);
        }
    }

    /// Pointer-up. Binds the in-flight connection to the first slot under
    /// the release point that accepts it, or discards the connection
    /// entirely. No floating connection survives a completed gesture.
    pub fn pointer_released(&mut self, x: f32, y: f32) {
        let drag = match self.drag.take() {
            Some(drag) => drag,
            None => return,
        };

        if let Some(slot) = self.slots.get_mut(&drag.source) {
            slot.drag = None;
        }

        let target = self
            .slots_at(x, y)
            .into_iter()
            .find(|&candidate| self.accepts(candidate, drag.source).is_valid());

        match target {
            Some(target) => {
                let target_pos = self.slot_scene_position(target).unwrap_or((x, y));
                if let Some(conn) = self.connections.get_mut(&drag.connection) {
                    conn.bind(target);
                    let origin = conn.source_pos();
                    conn.refresh(origin, target_pos);
                }
                self.events.push(CanvasEvent::ConnectionAdded {
                    connection: drag.connection,
                    source: drag.source,
                    target,
                });
                debug!(
                    "drag from slot {} bound to slot {target} as connection {}",
                    drag.source, drag.connection
                );
            }
            None => {
                self.connections.remove(&drag.connection);
                self.events.push(CanvasEvent::ConnectionRemoved {
                    connection: drag.connection,
                });
                debug!("drag from slot {} discarded", drag.source);
            }
        }
    }

    /// Whether a connection drag is currently in flight.
    pub fn drag_in_flight(&self) -> bool {
        self.drag.is_some()
    }

    // === Internals ===

    fn slot_counts(&self, node: &Node) -> (usize, usize) {
        let mut n_in = 0;
        let mut n_out = 0;
        for slot_id in &node.slots {
            match self.slots.get(slot_id).map(|s| s.kind()) {
                Some(SlotKind::Input) => n_in += 1,
                Some(SlotKind::Output) => n_out += 1,
                None => {}
            }
        }
        (n_in, n_out)
    }

    /// Recompute a node's effective size, slot positions and content
    /// geometry from its current state, then refresh incident connection
    /// curves. Publishes [`CanvasEvent::NodeResized`] if the effective size
    /// changed.
    fn relayout_node(&mut self, id: NodeId) {
        let prior = match self.nodes.get(&id) {
            Some(node) => node.size(),
            None => return,
        };
        self.relayout_node_from(id, prior);
    }

    /// Re-layout comparing against an explicitly captured prior effective
    /// size (the current size may already hold an unclamped resize
    /// request).
    fn relayout_node_from(&mut self, id: NodeId, prior: (f32, f32)) {
        let (slot_ids, n_in, n_out) = match self.nodes.get(&id) {
            Some(node) => {
                let (n_in, n_out) = self.slot_counts(node);
                (node.slots.clone(), n_in, n_out)
            }
            None => return,
        };
        let metrics = self.metrics;

        // 1) Clamp the requested size up to the minimum.
        let (width, height) = {
            let node = match self.nodes.get_mut(&id) {
                Some(node) => node,
                None => return,
            };
            let (min_w, min_h) = node.min_size(n_in, n_out, &metrics);
            node.width = node.width.max(min_w);
            node.height = node.height.max(min_h);
            (node.width, node.height)
        };

        // 2) Stack inputs on the left edge, outputs on the right.
        let mut in_idx = 0;
        let mut out_idx = 0;
        for slot_id in slot_ids {
            if let Some(slot) = self.slots.get_mut(&slot_id) {
                match slot.kind() {
                    SlotKind::Input => {
                        slot.rel_x = 0.0;
                        slot.rel_y = metrics.slot_y(in_idx);
                        in_idx += 1;
                    }
                    SlotKind::Output => {
                        slot.rel_x = width;
                        slot.rel_y = metrics.slot_y(out_idx);
                        out_idx += 1;
                    }
                }
            }
        }

        // 3) Hand the leftover rectangle to the content pane. Collapses to
        //    an empty rect if the node cannot fit it, which the minimum-size
        //    clamp prevents in practice.
        if let Some(node) = self.nodes.get_mut(&id) {
            if let Some(content) = node.content.as_deref_mut() {
                let top = metrics.slot_y(in_idx.max(out_idx));
                let bottom = height - metrics.slot_radius;
                let left = metrics.slot_radius;
                let right = width - metrics.slot_radius;

                if top < bottom && left < right {
                    content.set_geometry(left, top, right - left, bottom - top);
                } else {
                    content.set_geometry(0.0, 0.0, 0.0, 0.0);
                }
            }
        }

        trace!("relayout node {id}: {width}x{height}, {n_in} in / {n_out} out");

        if (width, height) != prior {
            self.events.push(CanvasEvent::NodeResized {
                node: id,
                width,
                height,
            });
        }

        self.refresh_node_connections(id);
    }

    /// Recompute the curve of one connection from the current scene
    /// positions of its endpoints.
    fn refresh_connection(&mut self, id: ConnectionId) {
        let (origin, target) = match self.connections.get(&id) {
            Some(conn) => {
                let origin = match self.slot_scene_position(conn.source_slot()) {
                    Some(pos) => pos,
                    None => return,
                };
                let target = match conn.target() {
                    ConnectionTarget::Bound(slot) => match self.slot_scene_position(slot) {
                        Some(pos) => pos,
                        None => return,
                    },
                    ConnectionTarget::Floating { x, y } => (x, y),
                };
                (origin, target)
            }
            None => return,
        };

        if let Some(conn) = self.connections.get_mut(&id) {
            conn.refresh(origin, target);
        }
    }

    /// Refresh every connection with an endpoint on one of `node`'s slots.
    fn refresh_node_connections(&mut self, node: NodeId) {
        let touched: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|conn| {
                let source_node = self.slots.get(&conn.source_slot()).map(|s| s.node());
                let target_node = conn
                    .target_slot()
                    .and_then(|slot| self.slots.get(&slot))
                    .map(|s| s.node());
                source_node == Some(node) || target_node == Some(node)
            })
            .map(|conn| conn.id())
            .collect();

        for id in touched {
            self.refresh_connection(id);
        }
    }

    /// Remove every connection whose source or bound target is `slot`,
    /// publishing their removal events. A drag in flight from the slot is
    /// torn down as well.
    fn remove_connections_touching(&mut self, slot: SlotId) {
        let touched: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|conn| conn.source_slot() == slot || conn.target_slot() == Some(slot))
            .map(|conn| conn.id())
            .collect();

        for id in touched {
            debug!("connection {id} torn down with slot {slot}");
            let _ = self.remove_connection(id);
        }
    }
}
