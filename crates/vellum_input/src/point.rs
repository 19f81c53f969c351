//! Pointer model
//!
//! One `InteractionPoint` per physical pointer. The mouse point lives for
//! the manager's lifetime; touch points are created on first contact and
//! discarded on up/cancel.

use vellum_scene::NodeKey;

/// Stable identifier for one physical pointer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerId {
    Mouse,
    /// Native touch identifier
    Touch(u64),
}

/// One tracked pointer and its resolved interaction targets
#[derive(Clone, Copy, Debug)]
pub struct InteractionPoint {
    pub id: PointerId,
    /// Position in the drawing surface's coordinate space
    pub x: f32,
    pub y: f32,
    /// Position in the hovered node's local coordinate space
    pub tx: f32,
    pub ty: f32,
    /// True from pointer-down until the matching up/cancel
    pub down: bool,
    /// True only within the dispatch cycle where `down` went false to true
    pub first_down: bool,
    /// Set when the last release produced a click
    pub clicked: bool,
    pub captured: bool,
    /// Node currently under this pointer
    pub hover: Option<NodeKey>,
    /// Node captured at press time; the interaction target until release
    pub active: Option<NodeKey>,
}

impl InteractionPoint {
    pub fn new(id: PointerId) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            tx: 0.0,
            ty: 0.0,
            down: false,
            first_down: false,
            clicked: false,
            captured: false,
            hover: None,
            active: None,
        }
    }
}
