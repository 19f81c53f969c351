//! End-to-end pointer dispatch against a live scene

use std::cell::RefCell;
use std::rc::Rc;

use vellum_core::events::event_types;
use vellum_core::{Affine2D, Clock, EventData, Key, Rect};
use vellum_input::InteractionManager;
use vellum_scene::{Node, NodeKey, NodeKind, Scene, SliderState};

fn manager() -> InteractionManager {
    let scene = Scene::with_clock(800.0, 600.0, Clock::manual(0.0));
    InteractionManager::new(scene, Rect::new(0.0, 0.0, 800.0, 600.0))
}

fn add_button(mgr: &mut InteractionManager, x: f32, y: f32, w: f32, h: f32) -> NodeKey {
    let root = mgr.scene().root();
    mgr.scene_mut().add_to(
        root,
        Node::button("button", w, h).with_transform(Affine2D::translation(x, y)),
    )
}

#[test]
fn test_click_on_press_and_release_over_same_node() {
    let mut mgr = manager();
    let node = add_button(&mut mgr, 50.0, 50.0, 50.0, 50.0);

    let clicks = Rc::new(RefCell::new(0));
    let sink = clicks.clone();
    mgr.scene_mut().on(node, event_types::CLICK, move |_| {
        *sink.borrow_mut() += 1;
    });

    mgr.mouse_down(75.0, 75.0);
    {
        let n = mgr.scene().get(node).unwrap();
        assert!(n.active && n.down);
    }
    assert_eq!(mgr.mouse().active, Some(node));

    mgr.mouse_up(75.0, 75.0);
    {
        let n = mgr.scene().get(node).unwrap();
        assert!(!n.active && !n.down);
    }
    assert!(mgr.mouse().active.is_none());
    assert_eq!(*clicks.borrow(), 1);
    assert!(mgr.mouse().clicked);
}

#[test]
fn test_no_click_when_press_started_over_empty_space() {
    let mut mgr = manager();
    let node = add_button(&mut mgr, 50.0, 50.0, 50.0, 50.0);

    let clicks = Rc::new(RefCell::new(0));
    let sink = clicks.clone();
    mgr.scene_mut().on(node, event_types::CLICK, move |_| {
        *sink.borrow_mut() += 1;
    });

    mgr.mouse_down(10.0, 10.0);
    assert!(mgr.mouse().active.is_none());

    mgr.mouse_up(75.0, 75.0);
    assert_eq!(*clicks.borrow(), 0);
    assert!(!mgr.mouse().clicked);
}

#[test]
fn test_no_click_when_released_off_the_pressed_node() {
    let mut mgr = manager();
    let pressed = add_button(&mut mgr, 50.0, 50.0, 50.0, 50.0);
    let other = add_button(&mut mgr, 200.0, 50.0, 50.0, 50.0);

    let clicks = Rc::new(RefCell::new(0));
    let sink = clicks.clone();
    mgr.scene_mut().on(pressed, event_types::CLICK, move |_| {
        *sink.borrow_mut() += 1;
    });

    mgr.mouse_down(75.0, 75.0);
    mgr.mouse_up(225.0, 75.0);
    assert_eq!(*clicks.borrow(), 0);
    assert!(!mgr.scene().get(pressed).unwrap().down);
    // release position hovers the other node
    assert_eq!(mgr.mouse().hover, Some(other));
}

#[test]
fn test_move_updates_local_coordinates_and_keeps_hover() {
    let mut mgr = manager();
    let node = add_button(&mut mgr, 50.0, 50.0, 50.0, 50.0);

    mgr.mouse_move(50.0, 50.0);
    assert_eq!(mgr.mouse().hover, Some(node));
    assert_eq!((mgr.mouse().tx, mgr.mouse().ty), (0.0, 0.0));
    assert!(mgr.scene().get(node).unwrap().hover);

    mgr.mouse_move(60.0, 60.0);
    assert_eq!(mgr.mouse().hover, Some(node));
    assert_eq!((mgr.mouse().tx, mgr.mouse().ty), (10.0, 10.0));
    assert!(mgr.scene().get(node).unwrap().hover);
}

#[test]
fn test_drag_out_of_bounds_keeps_active_target() {
    let mut mgr = manager();
    let node = add_button(&mut mgr, 50.0, 50.0, 50.0, 50.0);

    mgr.mouse_down(75.0, 75.0);
    mgr.mouse_move(500.0, 400.0);

    // the active node keeps passing broad phase while dragged
    assert_eq!(mgr.mouse().hover, Some(node));
    assert_eq!(mgr.mouse().active, Some(node));
    assert_eq!((mgr.mouse().tx, mgr.mouse().ty), (450.0, 350.0));

    mgr.mouse_up(500.0, 400.0);
    assert!(mgr.mouse().active.is_none());
}

#[test]
fn test_touch_lifecycle_tracks_by_identifier() {
    let mut mgr = manager();
    add_button(&mut mgr, 50.0, 50.0, 50.0, 50.0);

    mgr.touch_start(7, 75.0, 75.0);
    assert_eq!(mgr.touch_count(), 1);
    assert!(mgr.touch(7).is_some());
    assert!(mgr.touch(7).unwrap().down);

    mgr.touch_end(7, 75.0, 75.0);
    assert_eq!(mgr.touch_count(), 0);
    assert!(mgr.touch(7).is_none());
}

#[test]
fn test_touch_click_and_cancel_paths() {
    let mut mgr = manager();
    let node = add_button(&mut mgr, 50.0, 50.0, 50.0, 50.0);

    let clicks = Rc::new(RefCell::new(0));
    let sink = clicks.clone();
    mgr.scene_mut().on(node, event_types::CLICK, move |_| {
        *sink.borrow_mut() += 1;
    });

    mgr.touch_start(1, 75.0, 75.0);
    mgr.touch_end(1, 75.0, 75.0);
    assert_eq!(*clicks.borrow(), 1);

    // cancel never synthesizes a click
    mgr.touch_start(2, 75.0, 75.0);
    mgr.touch_cancel(2);
    assert_eq!(*clicks.borrow(), 1);
    assert!(!mgr.scene().get(node).unwrap().down);
    assert_eq!(mgr.touch_count(), 0);
}

#[test]
fn test_multi_touch_points_are_independent() {
    let mut mgr = manager();
    let left = add_button(&mut mgr, 50.0, 50.0, 50.0, 50.0);
    let right = add_button(&mut mgr, 200.0, 50.0, 50.0, 50.0);

    mgr.touch_start(1, 75.0, 75.0);
    mgr.touch_start(2, 225.0, 75.0);
    assert_eq!(mgr.touch(1).unwrap().active, Some(left));
    assert_eq!(mgr.touch(2).unwrap().active, Some(right));

    mgr.touch_end(1, 75.0, 75.0);
    // second contact unaffected by the first ending
    assert_eq!(mgr.touch(2).unwrap().active, Some(right));
    assert!(mgr.scene().get(right).unwrap().down);
}

#[test]
fn test_move_effects_precede_down_effects() {
    let mut mgr = manager();
    let node = add_button(&mut mgr, 50.0, 50.0, 50.0, 50.0);

    let order = Rc::new(RefCell::new(Vec::new()));
    let sink = order.clone();
    mgr.scene_mut()
        .on(node, event_types::POINTER_MOVE, move |_| {
            sink.borrow_mut().push("move");
        });
    let sink = order.clone();
    mgr.scene_mut()
        .on(node, event_types::POINTER_DOWN, move |_| {
            sink.borrow_mut().push("down");
        });

    mgr.mouse_down(75.0, 75.0);
    assert_eq!(order.borrow().as_slice(), &["move", "down"]);
}

#[test]
fn test_press_focuses_target() {
    let mut mgr = manager();
    let root = mgr.scene().root();
    let input = mgr
        .scene_mut()
        .add_to(root, Node::text_input("name", 100.0, 20.0));

    mgr.mouse_down(50.0, 10.0);
    mgr.mouse_up(50.0, 10.0);
    assert_eq!(mgr.scene().focused_node(), Some(input));

    mgr.key_down(Key::Char('o'));
    mgr.key_down(Key::Char('k'));
    mgr.key_down(Key::Backspace);
    match &mgr.scene().get(input).unwrap().kind {
        NodeKind::TextInput(state) => assert_eq!(state.text(), "o"),
        _ => unreachable!(),
    }
}

#[test]
fn test_slider_press_and_drag_updates_value() {
    let mut mgr = manager();
    let root = mgr.scene().root();
    let state = SliderState::new(0.0, 100.0, 0.0).with_pill(20.0, 20.0);
    let slider = mgr
        .scene_mut()
        .add_to(root, Node::slider("volume", 120.0, 20.0, state));

    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    mgr.scene_mut()
        .on(slider, event_types::VALUE_CHANGE, move |event| {
            if let EventData::ValueChange { value, .. } = event.data {
                sink.borrow_mut().push(value);
            }
        });

    // press on the bare track claims it but does not move the value yet
    mgr.mouse_down(60.0, 10.0);
    assert_eq!(mgr.mouse().active, Some(slider));
    assert!(changes.borrow().is_empty());

    // the drag recomputes; far past the end clamps at max
    mgr.mouse_move(80.0, 10.0);
    mgr.mouse_move(500.0, 10.0);
    mgr.mouse_up(500.0, 10.0);

    assert_eq!(changes.borrow().as_slice(), &[70.0, 100.0]);
    match &mgr.scene().get(slider).unwrap().kind {
        NodeKind::Slider(state) => assert_eq!(state.value, 100.0),
        _ => unreachable!(),
    }
}

#[test]
fn test_hover_check_recomputes_drag_when_track_moves() {
    let mut mgr = manager();
    let root = mgr.scene().root();
    let state = SliderState::new(0.0, 100.0, 0.0).with_pill(20.0, 20.0);
    let slider = mgr
        .scene_mut()
        .add_to(root, Node::slider("volume", 120.0, 20.0, state));

    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    mgr.scene_mut()
        .on(slider, event_types::VALUE_CHANGE, move |event| {
            if let EventData::ValueChange { value, .. } = event.data {
                sink.borrow_mut().push(value);
            }
        });

    mgr.mouse_down(60.0, 10.0);
    assert!(changes.borrow().is_empty());

    // the track slides 40px left under the stationary pointer
    mgr.scene_mut()
        .get_mut(slider)
        .unwrap()
        .move_position(-40.0, 0.0, 1.0)
        .over(100.0)
        .unwrap();
    mgr.scene_mut().clock_mut().set_ms(100.0);
    mgr.hover_check(100.0);

    // pointer local x is now 100; the engaged slider recomputes
    assert_eq!(changes.borrow().as_slice(), &[90.0]);
}

#[test]
fn test_hover_check_follows_animated_node() {
    let mut mgr = manager();
    let node = add_button(&mut mgr, 0.0, 0.0, 50.0, 50.0);
    mgr.scene_mut()
        .get_mut(node)
        .unwrap()
        .move_position(100.0, 0.0, 1.0)
        .over(100.0)
        .unwrap();

    // stationary cursor at x=120; node starts elsewhere
    mgr.mouse_move(120.0, 25.0);
    assert!(mgr.mouse().hover.is_none());

    // once the move lands, a passive rescan picks the node up
    mgr.scene_mut().clock_mut().set_ms(100.0);
    mgr.hover_check(100.0);
    assert_eq!(mgr.mouse().hover, Some(node));
    assert_eq!(mgr.mouse().tx, 20.0);
}
