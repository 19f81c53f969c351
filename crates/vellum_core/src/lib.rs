//! Vellum Core Primitives
//!
//! This crate provides the foundational primitives for the Vellum scene graph:
//!
//! - **Geometry**: points, rects, and 2D affine transforms with composition,
//!   inversion, and component-wise interpolation
//! - **Easing**: progress-mapping functions for keyframe animation
//! - **Event Dispatch**: synchronous publish/subscribe keyed by node
//! - **Clock**: millisecond time source, manual-steppable in tests
//!
//! # Example
//!
//! ```rust
//! use vellum_core::{Affine2D, Easing, Point};
//!
//! let from = Affine2D::translation(0.0, 0.0);
//! let to = Affine2D::translation(100.0, 0.0);
//! let eased = Easing::EaseInOutQuad.apply(0.5);
//! let mid = from.lerp(&to, eased);
//! assert_eq!(mid.transform_point(Point::ZERO), Point::new(50.0, 0.0));
//! ```

pub mod easing;
pub mod events;
pub mod geometry;
pub mod time;

pub use easing::Easing;
pub use events::{Event, EventData, EventDispatcher, EventType, Key};
pub use geometry::{Affine2D, Point, Rect, Size};
pub use time::Clock;
