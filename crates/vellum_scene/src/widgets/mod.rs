//! Widget-specific node state
//!
//! Painting is the embedder's concern; these carry only the state and hit
//! refinement the interaction pipeline needs.

mod slider;
mod text_input;

pub use slider::SliderState;
pub use text_input::TextInputState;
