//! Render contract
//!
//! The scene walks the tree once per frame and issues paint calls through
//! this trait; concrete painting (canvas, GPU, test recorder) lives with the
//! embedder. Transforms compose multiplicatively down the tree via
//! save/apply/restore, and panels clip their children.

use vellum_core::Affine2D;

use crate::node::Node;

/// Paint sink driven by [`crate::Scene::render`]
pub trait RenderSurface {
    /// Push the current transform/clip state
    fn save(&mut self);
    /// Pop to the most recent `save`
    fn restore(&mut self);
    /// Compose `transform` onto the current transform
    fn apply_transform(&mut self, transform: Affine2D);
    /// Clip subsequent drawing to the local rect (0, 0, width, height)
    fn clip_rect(&mut self, width: f32, height: f32);
    /// Paint one node under the current transform
    fn draw_node(&mut self, node: &Node);
}
