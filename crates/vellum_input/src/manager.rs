//! Interaction manager
//!
//! Runs the pointer state machine against the scene's hit-testing contract.
//! Every input event re-resolves position first (the move pass), so hover
//! state is always current when down/up decisions are made. All dispatch is
//! synchronous on the calling thread.

use rustc_hash::FxHashMap;
use vellum_core::events::event_types;
use vellum_core::{EventData, Key, Rect};
use vellum_scene::{PointerProbe, Scene};

use crate::point::{InteractionPoint, PointerId};

/// Owns the scene and the set of live pointers, translating raw input into
/// hover/active/focus/click state
pub struct InteractionManager {
    scene: Scene,
    /// On-screen bounds of the drawing surface; client coordinates are made
    /// surface-local by subtracting its origin
    surface: Rect,
    mouse: InteractionPoint,
    touches: FxHashMap<u64, InteractionPoint>,
    detached: bool,
}

impl InteractionManager {
    pub fn new(scene: Scene, surface: Rect) -> Self {
        Self {
            scene,
            surface,
            mouse: InteractionPoint::new(PointerId::Mouse),
            touches: FxHashMap::default(),
            detached: false,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Rebind after the surface moved or resized on screen
    pub fn set_surface(&mut self, surface: Rect) {
        self.surface = surface;
    }

    pub fn mouse(&self) -> &InteractionPoint {
        &self.mouse
    }

    pub fn touch(&self, id: u64) -> Option<&InteractionPoint> {
        self.touches.get(&id)
    }

    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    // ---- mouse ----

    pub fn mouse_move(&mut self, client_x: f32, client_y: f32) {
        if self.detached {
            return;
        }
        Self::point_move(&mut self.scene, self.surface, &mut self.mouse, client_x, client_y);
    }

    pub fn mouse_down(&mut self, client_x: f32, client_y: f32) {
        if self.detached {
            return;
        }
        Self::point_down(&mut self.scene, self.surface, &mut self.mouse, client_x, client_y);
    }

    pub fn mouse_up(&mut self, client_x: f32, client_y: f32) {
        if self.detached {
            return;
        }
        Self::point_up(&mut self.scene, self.surface, &mut self.mouse, client_x, client_y);
    }

    pub fn mouse_cancel(&mut self) {
        if self.detached {
            return;
        }
        Self::point_cancel(&mut self.scene, &mut self.mouse);
    }

    // ---- touch ----

    /// Track a new contact and run the down transition for it
    pub fn touch_start(&mut self, id: u64, client_x: f32, client_y: f32) {
        if self.detached {
            return;
        }
        let mut point = InteractionPoint::new(PointerId::Touch(id));
        Self::point_down(&mut self.scene, self.surface, &mut point, client_x, client_y);
        tracing::debug!(id, "touch tracked");
        self.touches.insert(id, point);
    }

    pub fn touch_move(&mut self, id: u64, client_x: f32, client_y: f32) {
        if self.detached {
            return;
        }
        let Some(mut point) = self.touches.remove(&id) else {
            tracing::debug!(id, "move for untracked touch ignored");
            return;
        };
        Self::point_move(&mut self.scene, self.surface, &mut point, client_x, client_y);
        self.touches.insert(id, point);
    }

    /// Terminal transition; the point is discarded afterwards. An untracked
    /// identifier is ignored.
    pub fn touch_end(&mut self, id: u64, client_x: f32, client_y: f32) {
        if self.detached {
            return;
        }
        let Some(mut point) = self.touches.remove(&id) else {
            tracing::debug!(id, "end for untracked touch ignored");
            return;
        };
        Self::point_up(&mut self.scene, self.surface, &mut point, client_x, client_y);
    }

    pub fn touch_cancel(&mut self, id: u64) {
        if self.detached {
            return;
        }
        let Some(mut point) = self.touches.remove(&id) else {
            tracing::debug!(id, "cancel for untracked touch ignored");
            return;
        };
        Self::point_cancel(&mut self.scene, &mut point);
    }

    // ---- keyboard ----

    /// Route a key press to the focused node
    pub fn key_down(&mut self, key: Key) {
        if self.detached {
            return;
        }
        self.scene.key_input(key);
    }

    /// Re-resolve hover for pointers that have not moved, e.g. after scene
    /// content animated under a stationary cursor
    pub fn hover_check(&mut self, now: f64) {
        if self.detached {
            return;
        }
        Self::rescan(&mut self.scene, &mut self.mouse, now);
        let ids: Vec<u64> = self.touches.keys().copied().collect();
        for id in ids {
            if let Some(mut point) = self.touches.remove(&id) {
                Self::rescan(&mut self.scene, &mut point, now);
                self.touches.insert(id, point);
            }
        }
    }

    /// Teardown. Idempotent; all further input is ignored.
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        Self::point_cancel(&mut self.scene, &mut self.mouse);
        let ids: Vec<u64> = self.touches.keys().copied().collect();
        for id in ids {
            if let Some(mut point) = self.touches.remove(&id) {
                Self::point_cancel(&mut self.scene, &mut point);
            }
        }
        self.detached = true;
        tracing::debug!("interaction manager detached");
    }

    // ---- state machine ----

    /// The move pass: update position, re-resolve hover, notify the single
    /// winning node. Runs first on every input event.
    fn point_move(
        scene: &mut Scene,
        surface: Rect,
        point: &mut InteractionPoint,
        client_x: f32,
        client_y: f32,
    ) {
        point.x = client_x - surface.x();
        point.y = client_y - surface.y();

        if let Some(prev) = point.hover.take() {
            if let Some(node) = scene.get_mut(prev) {
                node.hover = false;
            }
        }

        let now = scene.now_ms();
        let mut probe = PointerProbe::new(point.x, point.y);
        probe.first_down = point.first_down;
        let winner = scene.hit_test(&mut probe, now);
        point.tx = probe.tx;
        point.ty = probe.ty;

        if let Some(target) = winner {
            if let Some(node) = scene.get_mut(target) {
                node.hover = true;
            }
            point.hover = Some(target);
            scene.notify_collision(target, &probe);
            scene.emit(
                event_types::POINTER_MOVE,
                target,
                EventData::Pointer {
                    x: point.x,
                    y: point.y,
                    local_x: point.tx,
                    local_y: point.ty,
                },
            );
        }
    }

    fn point_down(
        scene: &mut Scene,
        surface: Rect,
        point: &mut InteractionPoint,
        client_x: f32,
        client_y: f32,
    ) {
        if point.down {
            // stale double-down: refresh position only
            Self::point_move(scene, surface, point, client_x, client_y);
            return;
        }
        point.down = true;
        point.first_down = true;
        point.clicked = false;
        Self::point_move(scene, surface, point, client_x, client_y);

        if let Some(target) = point.hover {
            point.active = Some(target);
            if let Some(node) = scene.get_mut(target) {
                node.down = true;
                node.active = true;
            }
            scene.focus(target);
            scene.emit(
                event_types::POINTER_DOWN,
                target,
                EventData::Pointer {
                    x: point.x,
                    y: point.y,
                    local_x: point.tx,
                    local_y: point.ty,
                },
            );
        }
        // one-shot signal, valid only within this dispatch
        point.first_down = false;
    }

    fn point_up(
        scene: &mut Scene,
        surface: Rect,
        point: &mut InteractionPoint,
        client_x: f32,
        client_y: f32,
    ) {
        // hover must reflect the release position
        Self::point_move(scene, surface, point, client_x, client_y);
        if !point.down {
            return;
        }
        point.down = false;

        if let Some(active) = point.active.take() {
            if let Some(node) = scene.get_mut(active) {
                node.down = false;
                node.active = false;
            }
            let data = EventData::Pointer {
                x: point.x,
                y: point.y,
                local_x: point.tx,
                local_y: point.ty,
            };
            scene.emit(event_types::POINTER_UP, active, data.clone());
            if point.hover == Some(active) {
                point.clicked = true;
                scene.emit(event_types::CLICK, active, data);
            }
        }
    }

    /// Interrupted input: clear targets without move or click semantics
    fn point_cancel(scene: &mut Scene, point: &mut InteractionPoint) {
        if let Some(active) = point.active.take() {
            if let Some(node) = scene.get_mut(active) {
                node.down = false;
                node.active = false;
            }
        }
        if let Some(hover) = point.hover.take() {
            if let Some(node) = scene.get_mut(hover) {
                node.hover = false;
            }
        }
        point.down = false;
        point.first_down = false;
    }

    fn rescan(scene: &mut Scene, point: &mut InteractionPoint, now: f64) {
        if let Some(prev) = point.hover.take() {
            if let Some(node) = scene.get_mut(prev) {
                node.hover = false;
            }
        }
        let mut probe = PointerProbe::new(point.x, point.y);
        probe.first_down = point.first_down;
        if let Some(target) = scene.hit_test(&mut probe, now) {
            if let Some(node) = scene.get_mut(target) {
                node.hover = true;
            }
            point.hover = Some(target);
            point.tx = probe.tx;
            point.ty = probe.ty;
            // a drag target whose geometry moved under a stationary pointer
            // still needs to recompute from the fresh local coordinates
            scene.notify_collision(target, &probe);
        }
    }
}
