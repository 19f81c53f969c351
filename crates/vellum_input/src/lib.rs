//! Vellum Input
//!
//! Pointer model and interaction state machine. The [`InteractionManager`]
//! owns the scene, tracks one mouse pointer plus any number of touch
//! contacts, and turns raw down/move/up/cancel input into per-node
//! hover/active/focus/click state via the scene's hit-testing contract.

pub mod manager;
pub mod point;

pub use manager::InteractionManager;
pub use point::{InteractionPoint, PointerId};
