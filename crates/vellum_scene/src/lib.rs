//! Vellum Scene Graph
//!
//! Retained-mode 2D scene graph for on-canvas widgets. Nodes live in an
//! arena owned by [`Scene`]; each node carries one affine transform driven by
//! a keyframe [`Timeline`], a width/height hitbox, and interaction flags.
//! Panels compose children with manual z-ordering, and the two-phase
//! hit-test pipeline resolves the topmost node under a pointer.
//!
//! # Example
//!
//! ```rust
//! use vellum_core::{Clock, Easing};
//! use vellum_scene::{Node, PointerProbe, Scene};
//!
//! let mut scene = Scene::with_clock(800.0, 600.0, Clock::manual(0.0));
//! let root = scene.root();
//! let button = scene.add_to(root, Node::button("ok", 100.0, 40.0));
//!
//! // slide the button 200px right over half a second
//! scene
//!     .get_mut(button)
//!     .unwrap()
//!     .move_position(200.0, 0.0, 1.0)
//!     .over(500.0)
//!     .unwrap()
//!     .with_ease(Easing::EaseInOutSine)
//!     .unwrap();
//!
//! let mut probe = PointerProbe::new(250.0, 20.0);
//! assert_eq!(scene.hit_test(&mut probe, 500.0), Some(button));
//! ```

pub mod error;
pub mod node;
pub mod render;
pub mod scene;
pub mod timeline;
pub mod widgets;

pub use error::{Result, SceneError};
pub use node::{Node, NodeKey, NodeKind};
pub use render::RenderSurface;
pub use scene::{PointerProbe, Scene};
pub use timeline::{KeyFrame, KeyFrameKind, Timeline};
pub use widgets::{SliderState, TextInputState};
