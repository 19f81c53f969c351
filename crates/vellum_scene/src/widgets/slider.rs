//! Slider widget state
//!
//! A slider node is a horizontal track with a draggable pill. Hit-testing
//! narrows to the pill unless the slider is already being dragged (or the
//! pointer just went down), in which case the whole track is claimed so the
//! value can jump to the press position.

/// Value range and pill geometry of a slider node
#[derive(Clone, Copy, Debug)]
pub struct SliderState {
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub pill_width: f32,
    pub pill_height: f32,
}

impl SliderState {
    pub fn new(min: f32, max: f32, value: f32) -> Self {
        Self {
            value: value.clamp(min, max),
            min,
            max,
            pill_width: 20.0,
            pill_height: 20.0,
        }
    }

    pub fn with_pill(mut self, width: f32, height: f32) -> Self {
        self.pill_width = width;
        self.pill_height = height;
        self
    }

    /// Left edge of the pill along a track of `track_width`
    pub fn pill_x(&self, track_width: f32) -> f32 {
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        (track_width - self.pill_width) * (self.value - self.min) / range
    }

    /// Whether node-local coordinates fall inside the pill
    pub fn pill_hit(&self, track_width: f32, track_height: f32, tx: f32, ty: f32) -> bool {
        let px = self.pill_x(track_width);
        let py = (track_height - self.pill_height) * 0.5;
        tx >= px && tx <= px + self.pill_width && ty >= py && ty <= py + self.pill_height
    }

    /// Recompute the value from the pointer's local x along a track of
    /// `track_width`. The pill center follows the pointer, clamped to the
    /// track. Returns `(previous, new)` when the value changed.
    pub fn drag_to(&mut self, tx: f32, track_width: f32) -> Option<(f32, f32)> {
        let distance = track_width - self.pill_width;
        if distance <= 0.0 {
            return None;
        }
        let clamped = (tx - self.pill_width * 0.5).clamp(0.0, distance);
        let value = self.min + (self.max - self.min) * clamped / distance;
        if value == self.value {
            return None;
        }
        let previous = self.value;
        self.value = value;
        Some((previous, value))
    }
}
