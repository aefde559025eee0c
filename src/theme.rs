//! Geometry metrics and render palette.
//!
//! [`Metrics`] holds the constants that drive layout and hit-testing.
//! [`Theme`] holds the opaque color/brush values a renderer applies
//! verbatim; the engine itself never inspects them.

use slint::{Brush, Color};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry constants for node layout, slot placement and hit-testing.
///
/// All distances are in scene units (logical pixels at zoom 1). The
/// defaults reproduce the classic look: 6px slot anchors on a node with a
/// 10px corner radius, slots stacked 18px apart below a 30px header band.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metrics {
    /// Radius of a slot's anchor circle.
    pub slot_radius: f32,
    /// Corner radius of the node's rounded border.
    pub corner_radius: f32,
    /// Stroke width of the node border.
    pub border_width: f32,
    /// Stroke width of connection curves; doubles as the hit radius around
    /// the stroke.
    pub curve_width: f32,
    /// Vertical distance between consecutive slots of the same kind.
    pub slot_pitch: f32,
    /// Distance from the node's top edge to the first slot row; leaves room
    /// for the node label.
    pub slot_top_margin: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            slot_radius: 6.0,
            corner_radius: 10.0,
            border_width: 1.5,
            curve_width: 2.0,
            slot_pitch: 18.0,
            slot_top_margin: 30.0,
        }
    }
}

impl Metrics {
    /// Node-local y offset of the slot at `index` within its kind group.
    pub fn slot_y(&self, index: usize) -> f32 {
        self.slot_top_margin + self.slot_pitch * index as f32
    }

    /// Radius of the circular area around a slot's anchor that accepts
    /// pointer input. Slightly larger than the drawn circle.
    pub fn slot_hit_radius(&self) -> f32 {
        self.slot_radius + 1.0
    }

    /// Radius of the endpoint handle drawn at a connection's target end.
    pub fn handle_radius(&self) -> f32 {
        self.slot_radius * 0.5
    }
}

/// Render palette for a compliant repaint.
///
/// These are pass-through values: the engine stores them and hands them to
/// the renderer unchanged. A node's own background brush, when set,
/// overrides [`Theme::node_background`].
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Node border stroke when not selected.
    pub node_border: Color,
    /// Node border stroke when selected.
    pub node_border_selected: Color,
    /// Default node fill, used when the node has no background brush.
    pub node_background: Brush,
    /// Node label text color.
    pub node_label: Color,
    /// Slot anchor outline.
    pub slot_outline: Color,
    /// Slot anchor fill.
    pub slot_fill: Color,
    /// Connection stroke when not selected.
    pub connection_stroke: Color,
    /// Connection stroke when selected.
    pub connection_stroke_selected: Color,
    /// Wide halo stroke drawn behind a selected connection.
    pub connection_halo: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            node_border: Color::from_rgb_u8(220, 220, 220),
            node_border_selected: Color::from_rgb_u8(84, 144, 230),
            node_background: Brush::from(Color::from_rgb_u8(45, 45, 48)),
            node_label: Color::from_rgb_u8(220, 220, 220),
            slot_outline: Color::from_rgb_u8(220, 220, 220),
            slot_fill: Color::from_rgb_u8(30, 30, 30),
            connection_stroke: Color::from_rgb_u8(220, 220, 220),
            connection_stroke_selected: Color::from_rgb_u8(255, 255, 255),
            connection_halo: Color::from_rgb_u8(84, 144, 230),
        }
    }
}
