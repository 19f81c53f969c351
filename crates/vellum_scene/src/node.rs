//! Scene nodes
//!
//! A node is one transform-hierarchy element: an affine transform driven by a
//! keyframe timeline, a width/height hitbox, interaction flags, and a kind
//! payload. Nodes live in the scene arena and refer to each other by key.

use slotmap::new_key_type;
use vellum_core::{Affine2D, Easing, Point, Rect};

use crate::error::Result;
use crate::timeline::Timeline;
use crate::widgets::{SliderState, TextInputState};

new_key_type! {
    /// Arena key identifying a node in a [`crate::Scene`]
    pub struct NodeKey;
}

/// What a node is, and the state that comes with it
#[derive(Debug)]
pub enum NodeKind {
    /// Plain leaf; hit target and flags only
    Label,
    /// Plain pressable leaf
    Button,
    /// Container owning an ordered set of children
    Panel { children: Vec<NodeKey> },
    Slider(SliderState),
    TextInput(TextInputState),
}

/// A scene graph element
#[derive(Debug)]
pub struct Node {
    /// Debug name
    pub id: String,
    pub kind: NodeKind,
    pub width: f32,
    pub height: f32,
    /// Sibling ordering key; higher paints later and is hit-tested first
    pub z: i32,

    /// Base transform set directly by owners
    pub local: Affine2D,
    /// Transform used for rendering and hit-testing at the current timestamp
    pub interpolated: Affine2D,
    /// Cached inverse of `interpolated`, used by hit-test descent
    pub inverse: Affine2D,
    pub timeline: Timeline,

    pub hover: bool,
    pub active: bool,
    pub down: bool,
    pub focused: bool,
    pub captured: bool,

    /// Non-owning back-reference to the containing panel
    pub parent: Option<NodeKey>,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            kind,
            width,
            height,
            z: 0,
            local: Affine2D::IDENTITY,
            interpolated: Affine2D::IDENTITY,
            inverse: Affine2D::IDENTITY,
            timeline: Timeline::new(0.0),
            hover: false,
            active: false,
            down: false,
            focused: false,
            captured: false,
            parent: None,
        }
    }

    pub fn label(id: impl Into<String>, width: f32, height: f32) -> Self {
        Self::new(id, NodeKind::Label, width, height)
    }

    pub fn button(id: impl Into<String>, width: f32, height: f32) -> Self {
        Self::new(id, NodeKind::Button, width, height)
    }

    pub fn panel(id: impl Into<String>, width: f32, height: f32) -> Self {
        Self::new(
            id,
            NodeKind::Panel {
                children: Vec::new(),
            },
            width,
            height,
        )
    }

    pub fn slider(id: impl Into<String>, width: f32, height: f32, state: SliderState) -> Self {
        Self::new(id, NodeKind::Slider(state), width, height)
    }

    pub fn text_input(id: impl Into<String>, width: f32, height: f32) -> Self {
        Self::new(id, NodeKind::TextInput(TextInputState::default()), width, height)
    }

    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    pub fn with_transform(mut self, transform: Affine2D) -> Self {
        self.set_transform(transform);
        self
    }

    pub fn is_panel(&self) -> bool {
        matches!(self.kind, NodeKind::Panel { .. })
    }

    /// Child keys, empty for leaves
    pub fn children(&self) -> &[NodeKey] {
        match &self.kind {
            NodeKind::Panel { children } => children,
            _ => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeKey>> {
        match &mut self.kind {
            NodeKind::Panel { children } => Some(children),
            _ => None,
        }
    }

    /// Set the base transform, committing it as the current visible transform
    pub fn set_transform(&mut self, transform: Affine2D) {
        self.local = transform;
        self.interpolated = transform;
        if let Some(inverse) = transform.invert() {
            self.inverse = inverse;
        }
    }

    /// Append a hold of `duration` ms to the timeline
    pub fn wait(&mut self, duration: f64) -> &mut Self {
        self.timeline.wait(duration);
        self
    }

    /// Append a move toward `to`, zero-length until extended with `over`
    pub fn move_to(&mut self, to: Affine2D) -> &mut Self {
        self.timeline.move_to(to, self.interpolated);
        self
    }

    /// Append a move to position (x, y) at uniform scale `s`
    pub fn move_position(&mut self, x: f32, y: f32, s: f32) -> &mut Self {
        self.move_to(Affine2D::translate_scale(x, y, s))
    }

    /// Loop the timeline from its first entry
    pub fn repeat(&mut self) -> &mut Self {
        self.timeline.repeat();
        self
    }

    /// Give the last appended entry a duration
    pub fn over(&mut self, duration: f64) -> Result<&mut Self> {
        self.timeline.over(duration)?;
        Ok(self)
    }

    /// Give the last appended entry an easing function
    pub fn with_ease(&mut self, ease: Easing) -> Result<&mut Self> {
        self.timeline.with_ease(ease)?;
        Ok(self)
    }

    /// Advance the visible transform to `now`, refreshing the inverse cache
    pub fn interpolate(&mut self, now: f64) {
        self.timeline.interpolate(now, &mut self.interpolated);
        if let Some(inverse) = self.interpolated.invert() {
            self.inverse = inverse;
        }
    }

    pub fn skip_animation(&self, now: f64) -> bool {
        self.timeline.skip_animation(now)
    }

    pub fn clear_animation(&mut self, now: f64) {
        self.timeline.clear_animation(now);
    }

    /// Broad-phase admissibility: a node mid-interaction always passes;
    /// otherwise the pointer's local coordinates must fall inside the hitbox.
    pub fn broad_phase(&self, tx: f32, ty: f32) -> bool {
        if self.active {
            return true;
        }
        self.bounds().contains(Point::new(tx, ty))
    }

    /// Local-space hitbox
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}
