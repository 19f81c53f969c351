//! Scene graph arena and hit-testing pipeline
//!
//! The scene owns every node exclusively in a slotmap arena; parent/child
//! links, hover/active targets, and event subscriptions all refer to nodes by
//! key. Hit-testing is two-phase per node: a cheap broad-phase admissibility
//! check, then a narrow phase that descends panels topmost-first and lets
//! widgets refine their own hitbox.

use slotmap::SlotMap;
use smallvec::SmallVec;
use vellum_core::events::event_types;
use vellum_core::{Clock, Event, EventData, EventDispatcher, EventType, Key, Point};

use crate::node::{Node, NodeKey, NodeKind};
use crate::render::RenderSurface;

/// Pointer position fed through the hit-test pipeline.
///
/// `x`/`y` are surface-local; `tx`/`ty` are rewritten to the winning node's
/// local space as the test descends, so after a pass they hold the hit
/// target's local coordinates.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerProbe {
    pub x: f32,
    pub y: f32,
    pub tx: f32,
    pub ty: f32,
    /// True only during the dispatch cycle in which the pointer went down
    pub first_down: bool,
}

impl PointerProbe {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            tx: x,
            ty: y,
            first_down: false,
        }
    }
}

/// Arena-owned node tree with a root panel
pub struct Scene {
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
    dispatcher: EventDispatcher<NodeKey>,
    clock: Clock,
}

impl Scene {
    /// A scene whose root panel spans `width` x `height`, timed by the
    /// process clock
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_clock(width, height, Clock::default())
    }

    /// A scene timed by an explicit clock; tests inject [`Clock::manual`]
    pub fn with_clock(width: f32, height: f32, clock: Clock) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root_node = Node::panel("root", width, height);
        root_node.timeline.set_last_interpolated(clock.now_ms());
        let root = nodes.insert(root_node);
        Self {
            nodes,
            root,
            dispatcher: EventDispatcher::new(),
            clock,
        }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Insert a detached node, anchoring an empty timeline at the scene clock
    pub fn add(&mut self, mut node: Node) -> NodeKey {
        if node.timeline.frames().is_empty() {
            node.timeline.set_last_interpolated(self.clock.now_ms());
        }
        self.nodes.insert(node)
    }

    /// Insert a node and attach it under `parent`
    pub fn add_to(&mut self, parent: NodeKey, node: Node) -> NodeKey {
        let key = self.add(node);
        self.attach(parent, key);
        key
    }

    /// Attach `child` under `parent`, detaching it from any current parent
    /// first. A node belongs to at most one panel at a time.
    pub fn attach(&mut self, parent: NodeKey, child: NodeKey) {
        if !self.nodes.get(parent).is_some_and(Node::is_panel) || !self.nodes.contains_key(child) {
            tracing::warn!("attach ignored: parent is not a panel or key is stale");
            return;
        }
        self.detach(child);
        if let Some(children) = self.nodes[parent].children_mut() {
            children.push(child);
        }
        self.nodes[child].parent = Some(parent);
    }

    /// Remove `child` from its parent's child list without destroying it
    pub fn detach(&mut self, child: NodeKey) {
        let Some(parent) = self.nodes.get(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(children) = self.nodes.get_mut(parent).and_then(Node::children_mut) {
            children.retain(|&k| k != child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
    }

    /// Destroy `key` and its whole subtree, dropping event subscriptions
    pub fn remove(&mut self, key: NodeKey) {
        self.detach(key);
        let mut pending: SmallVec<[NodeKey; 8]> = SmallVec::new();
        pending.push(key);
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(next) {
                pending.extend(node.children().iter().copied());
                self.dispatcher.unregister_target(next);
            }
        }
    }

    /// Register an event handler on a node
    pub fn on<F>(&mut self, target: NodeKey, event_type: EventType, handler: F)
    where
        F: Fn(&Event<NodeKey>) + 'static,
    {
        self.dispatcher.register(target, event_type, handler);
    }

    /// Dispatch an event timestamped at the scene clock
    pub fn emit(&mut self, event_type: EventType, target: NodeKey, data: EventData) {
        let mut event = Event::new(event_type, target, data, self.clock.now_ms());
        self.dispatcher.dispatch(&mut event);
    }

    // ---- animation ----

    /// Advance every attached node's transform to `now`
    pub fn interpolate(&mut self, now: f64) {
        self.interpolate_subtree(self.root, now);
    }

    fn interpolate_subtree(&mut self, key: NodeKey, now: f64) {
        let children: SmallVec<[NodeKey; 8]> = {
            let Some(node) = self.nodes.get_mut(key) else {
                return;
            };
            // a panel already consumed to `now` covers its whole subtree
            if node.is_panel() && now <= node.timeline.last_interpolated() {
                return;
            }
            node.interpolate(now);
            node.children().iter().copied().collect()
        };
        for child in children {
            self.interpolate_subtree(child, now);
        }
    }

    /// Whether any attached node still has bounded timeline work after `now`
    pub fn skip_animation(&self, now: f64) -> bool {
        self.skip_subtree(self.root, now)
    }

    fn skip_subtree(&self, key: NodeKey, now: f64) -> bool {
        let Some(node) = self.nodes.get(key) else {
            return false;
        };
        node.skip_animation(now)
            || node
                .children()
                .iter()
                .any(|&child| self.skip_subtree(child, now))
    }

    /// Drop every node's queued animation, fast-forwarding to `now`
    pub fn clear_animation(&mut self, now: f64) {
        for node in self.nodes.values_mut() {
            node.clear_animation(now);
        }
    }

    // ---- hover/focus bookkeeping ----

    /// Post-order state propagation: panel hover is recomputed from scratch
    /// each pass, so it is exactly "some child is hovered"
    pub fn update(&mut self) {
        self.update_subtree(self.root);
    }

    fn update_subtree(&mut self, key: NodeKey) -> bool {
        let children: SmallVec<[NodeKey; 8]> = match self.nodes.get(key) {
            Some(node) => node.children().iter().copied().collect(),
            None => return false,
        };
        let mut child_hover = false;
        for child in children {
            child_hover |= self.update_subtree(child);
        }
        let Some(node) = self.nodes.get_mut(key) else {
            return false;
        };
        if node.is_panel() {
            node.hover = child_hover;
        }
        node.hover
    }

    /// Move keyboard focus to `target`, emitting BLUR/FOCUS
    pub fn focus(&mut self, target: NodeKey) {
        let previous = self.focused_node();
        if previous == Some(target) {
            return;
        }
        if let Some(prev) = previous {
            if let Some(node) = self.nodes.get_mut(prev) {
                node.focused = false;
            }
            self.emit(event_types::BLUR, prev, EventData::None);
        }
        if let Some(node) = self.nodes.get_mut(target) {
            node.focused = true;
            tracing::debug!(node = %node.id, "focus moved");
            self.emit(event_types::FOCUS, target, EventData::None);
        }
    }

    pub fn focused_node(&self) -> Option<NodeKey> {
        self.nodes.iter().find(|(_, n)| n.focused).map(|(k, _)| k)
    }

    /// Route a key press to the focused node. Text inputs edit their buffer;
    /// every focused node gets a KEY_DOWN event. Returns the target.
    pub fn key_input(&mut self, key: Key) -> Option<NodeKey> {
        let target = self.focused_node()?;
        if let Some(node) = self.nodes.get_mut(target) {
            if let NodeKind::TextInput(state) = &mut node.kind {
                state.key_down(key);
            }
        }
        self.emit(event_types::KEY_DOWN, target, EventData::Key { key });
        Some(target)
    }

    // ---- hit testing ----

    /// Resolve the topmost node under the probe, or `None` when the pointer
    /// is over no widget. Interpolates the tree to `now` first so bounds
    /// reflect in-flight animation.
    pub fn hit_test(&mut self, probe: &mut PointerProbe, now: f64) -> Option<NodeKey> {
        let winner = self.is_hovering(self.root, probe, now)?;
        // the root panel itself is not a hit target
        (winner != self.root).then_some(winner)
    }

    /// The original sprite contract: interpolate, then broad and narrow
    /// phase from `key` down. Returns the deep winner within that subtree.
    pub fn is_hovering(
        &mut self,
        key: NodeKey,
        probe: &mut PointerProbe,
        now: f64,
    ) -> Option<NodeKey> {
        self.interpolate_subtree(key, now);
        let local = self
            .nodes
            .get(key)?
            .inverse
            .transform_point(Point::new(probe.x, probe.y));
        if !self.broad_phase(key, local.x, local.y) {
            return None;
        }
        self.narrow_phase(key, probe, local.x, local.y)
    }

    /// Broad phase: panels sort children by ascending z and reset the
    /// transient flags of children not mid-interaction, then the node's own
    /// admissibility check runs on the local coordinates.
    fn broad_phase(&mut self, key: NodeKey, tx: f32, ty: f32) -> bool {
        if self.nodes.get(key).is_some_and(Node::is_panel) {
            self.prepare_children(key);
        }
        self.nodes
            .get(key)
            .is_some_and(|node| node.broad_phase(tx, ty))
    }

    fn prepare_children(&mut self, key: NodeKey) {
        let mut children = {
            let Some(node) = self.nodes.get_mut(key) else {
                return;
            };
            match node.children_mut() {
                Some(children) => std::mem::take(children),
                None => return,
            }
        };
        // stable sort: later-added siblings with equal z end up on top
        children.sort_by_key(|&k| self.nodes.get(k).map_or(0, |n| n.z));
        for &child in &children {
            if let Some(node) = self.nodes.get_mut(child) {
                if !node.active {
                    node.hover = false;
                    node.down = false;
                }
            }
        }
        if let Some(children_slot) = self.nodes.get_mut(key).and_then(Node::children_mut) {
            *children_slot = children;
        }
    }

    /// Narrow phase at a node that already passed broad phase, with the
    /// probe expressed in that node's local space. First match wins.
    fn narrow_phase(
        &mut self,
        key: NodeKey,
        probe: &mut PointerProbe,
        tx: f32,
        ty: f32,
    ) -> Option<NodeKey> {
        enum Narrow {
            Claim,
            Reject,
            Descend(SmallVec<[NodeKey; 8]>),
        }
        let step = {
            let node = self.nodes.get(key)?;
            match &node.kind {
                NodeKind::Panel { children } => {
                    Narrow::Descend(children.iter().copied().collect())
                }
                NodeKind::Slider(state) => {
                    if node.active
                        || probe.first_down
                        || state.pill_hit(node.width, node.height, tx, ty)
                    {
                        Narrow::Claim
                    } else {
                        Narrow::Reject
                    }
                }
                _ => Narrow::Claim,
            }
        };
        match step {
            Narrow::Claim => {
                probe.tx = tx;
                probe.ty = ty;
                Some(key)
            }
            Narrow::Reject => None,
            Narrow::Descend(children) => {
                // topmost paint is tested first
                for &child in children.iter().rev() {
                    let Some(child_node) = self.nodes.get(child) else {
                        continue;
                    };
                    let local = child_node.inverse.transform_point(Point::new(tx, ty));
                    if !self.broad_phase(child, local.x, local.y) {
                        continue;
                    }
                    if let Some(winner) = self.narrow_phase(child, probe, local.x, local.y) {
                        return Some(winner);
                    }
                }
                // a panel with no matching child is itself the hit target
                probe.tx = tx;
                probe.ty = ty;
                Some(key)
            }
        }
    }

    /// Deliver a resolved collision to the winning node. A slider mid-drag
    /// recomputes its value from the probe's local x and emits VALUE_CHANGE
    /// when it moved; a fresh press only claims the track.
    pub fn notify_collision(&mut self, key: NodeKey, probe: &PointerProbe) {
        let change = {
            let Some(node) = self.nodes.get_mut(key) else {
                return;
            };
            let width = node.width;
            let active = node.active;
            match &mut node.kind {
                NodeKind::Slider(state) if active => state.drag_to(probe.tx, width),
                _ => None,
            }
        };
        if let Some((previous, value)) = change {
            tracing::trace!(?key, previous, value, "slider value changed");
            self.emit(
                event_types::VALUE_CHANGE,
                key,
                EventData::ValueChange { previous, value },
            );
        }
    }

    // ---- rendering ----

    /// Paint the tree through `surface`. Panels clip children to their own
    /// bounds and children paint in ascending z order.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        self.render_subtree(self.root, surface);
    }

    fn render_subtree(&self, key: NodeKey, surface: &mut dyn RenderSurface) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        surface.save();
        surface.apply_transform(node.interpolated);
        surface.draw_node(node);
        if node.is_panel() {
            surface.clip_rect(node.width, node.height);
            let mut order: SmallVec<[NodeKey; 8]> = node.children().iter().copied().collect();
            order.sort_by_key(|&k| self.nodes.get(k).map_or(0, |n| n.z));
            for child in order {
                self.render_subtree(child, surface);
            }
        }
        surface.restore();
    }
}
