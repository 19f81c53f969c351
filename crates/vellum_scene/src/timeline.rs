//! Keyframe timeline engine
//!
//! Each node owns a queue of keyframe entries consumed strictly in order
//! against absolute millisecond timestamps. A `Repeat` entry rewinds the
//! consumption cursor and rebases every entry's time bounds so the cycle
//! restarts seamlessly, without removing or reallocating entries.

use vellum_core::{Affine2D, Easing};

use crate::error::{Result, SceneError};

/// Keyframe entry discriminant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyFrameKind {
    /// Hold the current transform until `end`
    Wait,
    /// Interpolate toward `to` over `[start, end]`
    Move,
    /// Rewind consumption to the first entry; unbounded
    Repeat,
}

/// A single entry in a node's keyframe queue
#[derive(Clone, Copy, Debug)]
pub struct KeyFrame {
    pub kind: KeyFrameKind,
    /// Absolute start time in ms; `None` for `Repeat`
    pub start: Option<f64>,
    /// Absolute end time in ms; `None` for `Repeat`
    pub end: Option<f64>,
    /// Transform the entry interpolates from; `None` for `Wait`/`Repeat`
    pub from: Option<Affine2D>,
    /// Target transform; `None` for `Wait`/`Repeat`
    pub to: Option<Affine2D>,
    /// `None` for `Wait`/`Repeat`
    pub ease: Option<Easing>,
}

/// Ordered keyframe queue with a consumption cursor
#[derive(Clone, Debug)]
pub struct Timeline {
    frames: Vec<KeyFrame>,
    cursor: usize,
    last_interpolated: f64,
}

impl Timeline {
    pub fn new(now: f64) -> Self {
        Self {
            frames: Vec::new(),
            cursor: 0,
            last_interpolated: now,
        }
    }

    pub fn frames(&self) -> &[KeyFrame] {
        &self.frames
    }

    /// Timestamp up to which the queue has been consumed
    pub fn last_interpolated(&self) -> f64 {
        self.last_interpolated
    }

    pub(crate) fn set_last_interpolated(&mut self, now: f64) {
        self.last_interpolated = now;
    }

    /// Start time for the next appended entry: the previous entry's end,
    /// or "now" (the consumption watermark) when the queue is empty.
    fn next_start(&self) -> f64 {
        self.frames
            .last()
            .and_then(|f| f.end)
            .unwrap_or(self.last_interpolated)
    }

    /// Append a `Wait` entry holding for `duration` ms
    pub fn wait(&mut self, duration: f64) {
        let start = self.next_start();
        self.frames.push(KeyFrame {
            kind: KeyFrameKind::Wait,
            start: Some(start),
            end: Some(start + duration),
            from: None,
            to: None,
            ease: None,
        });
    }

    /// Append a zero-length `Move` entry toward `to`, pending `over`/`with_ease`.
    ///
    /// `fallback_from` is the transform the node currently holds; it becomes
    /// the entry's start transform unless an earlier queued `Move` already
    /// defines where the node will be when this entry begins.
    pub fn move_to(&mut self, to: Affine2D, fallback_from: Affine2D) {
        let start = self.next_start();
        let from = self
            .frames
            .iter()
            .rev()
            .find_map(|f| f.to)
            .unwrap_or(fallback_from);
        self.frames.push(KeyFrame {
            kind: KeyFrameKind::Move,
            start: Some(start),
            end: Some(start),
            from: Some(from),
            to: Some(to),
            ease: Some(Easing::Linear),
        });
    }

    /// Append a `Repeat` entry; the timeline becomes unbounded
    pub fn repeat(&mut self) {
        self.frames.push(KeyFrame {
            kind: KeyFrameKind::Repeat,
            start: None,
            end: None,
            from: None,
            to: None,
            ease: None,
        });
    }

    /// Extend the tail entry to run for `duration` ms
    pub fn over(&mut self, duration: f64) -> Result<()> {
        let tail = self.frames.last_mut().ok_or(SceneError::EmptyTimeline)?;
        let start = tail.start.ok_or(SceneError::EmptyTimeline)?;
        tail.end = Some(start + duration);
        Ok(())
    }

    /// Set the tail entry's easing function
    pub fn with_ease(&mut self, ease: Easing) -> Result<()> {
        let tail = self.frames.last_mut().ok_or(SceneError::EmptyTimeline)?;
        tail.ease = Some(ease);
        Ok(())
    }

    /// Advance `transform` to reflect `now`, consuming queue entries.
    ///
    /// No-op when `now <= last_interpolated`; `last_interpolated` is
    /// monotonically non-decreasing.
    pub fn interpolate(&mut self, now: f64, transform: &mut Affine2D) {
        if now <= self.last_interpolated {
            return;
        }

        // At most one cycle restart per call: after rebasing, the first
        // entry starts at `now`, so a second Repeat visit means the whole
        // cycle is zero-length and there is nothing left to consume.
        let mut rebased = false;
        while let Some(frame) = self.frames.get(self.cursor) {
            match frame.kind {
                KeyFrameKind::Repeat => {
                    if rebased {
                        break;
                    }
                    let Some(first_start) = self.frames.first().and_then(|f| f.start) else {
                        break;
                    };
                    let offset = now - first_start;
                    for f in &mut self.frames {
                        if let Some(s) = &mut f.start {
                            *s += offset;
                        }
                        if let Some(e) = &mut f.end {
                            *e += offset;
                        }
                    }
                    self.cursor = 0;
                    rebased = true;
                }
                _ => {
                    // Wait/Move entries always carry time bounds
                    let end = frame.end.unwrap_or(now);
                    if end <= now {
                        if frame.kind == KeyFrameKind::Move {
                            if let Some(to) = frame.to {
                                *transform = to;
                            }
                        }
                        self.cursor += 1;
                    } else {
                        let start = frame.start.unwrap_or(end);
                        if frame.kind == KeyFrameKind::Move && start <= now {
                            let span = end - start;
                            let t = if span > 0.0 {
                                ((now - start) / span) as f32
                            } else {
                                1.0
                            };
                            let ease = frame.ease.unwrap_or_default();
                            let from = frame.from.unwrap_or(*transform);
                            if let Some(to) = frame.to {
                                *transform = from.lerp(&to, ease.apply(t));
                            }
                        }
                        break;
                    }
                }
            }
        }

        self.last_interpolated = now;
    }

    /// Whether outstanding bounded work remains after `now`.
    ///
    /// A queue with a reachable `Repeat` never reports skippable: the
    /// timeline is unbounded.
    pub fn skip_animation(&self, now: f64) -> bool {
        let remaining = &self.frames[self.cursor.min(self.frames.len())..];
        if remaining.iter().any(|f| f.kind == KeyFrameKind::Repeat) {
            return false;
        }
        remaining.iter().any(|f| f.end.is_some_and(|e| e > now))
    }

    /// Empty the queue and fast-forward consumption to `now`, discarding
    /// in-flight motion without snapping to any target.
    pub fn clear_animation(&mut self, now: f64) {
        self.frames.clear();
        self.cursor = 0;
        self.last_interpolated = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(e: [f32; 6]) -> Affine2D {
        Affine2D::from_elements(e)
    }

    #[test]
    fn test_wait_appends_single_entry() {
        let mut tl = Timeline::new(0.0);
        assert!(tl.frames().is_empty());
        tl.wait(10.0);
        assert_eq!(tl.frames().len(), 1);
        let frame = &tl.frames()[0];
        assert_eq!(frame.kind, KeyFrameKind::Wait);
        assert_eq!(frame.end, Some(frame.start.unwrap() + 10.0));
        assert!(frame.ease.is_none());
        assert!(frame.to.is_none());
    }

    #[test]
    fn test_wait_chains_start_to_previous_end() {
        let mut tl = Timeline::new(0.0);
        tl.wait(10.0);
        tl.wait(20.0);
        assert_eq!(tl.frames()[1].start, tl.frames()[0].end);
        assert_eq!(tl.frames()[0].end, Some(tl.frames()[0].start.unwrap() + 10.0));
    }

    #[test]
    fn test_move_appends_zero_length_linear_entry() {
        let mut tl = Timeline::new(0.0);
        tl.move_to(m([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), Affine2D::IDENTITY);
        assert_eq!(tl.frames().len(), 1);
        let frame = &tl.frames()[0];
        assert_eq!(frame.kind, KeyFrameKind::Move);
        assert_eq!(frame.end, frame.start);
        assert_eq!(frame.ease, Some(Easing::Linear));
        assert_eq!(frame.to, Some(m([1.0, 2.0, 3.0, 4.0, 5.0, 6.0])));
    }

    #[test]
    fn test_move_chains_start_to_previous_end() {
        let mut tl = Timeline::new(0.0);
        tl.wait(10.0);
        tl.move_to(m([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), Affine2D::IDENTITY);
        assert_eq!(tl.frames()[1].start, tl.frames()[0].end);
    }

    #[test]
    fn test_move_captures_fallback_from() {
        let mut tl = Timeline::new(0.0);
        let held = m([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        tl.move_to(Affine2D::IDENTITY, held);
        assert_eq!(tl.frames()[0].from, Some(held));
    }

    #[test]
    fn test_chained_move_captures_previous_target() {
        let mut tl = Timeline::new(0.0);
        let first_to = m([2.0, 0.0, 0.0, 2.0, 10.0, 10.0]);
        tl.move_to(first_to, Affine2D::IDENTITY);
        tl.move_to(m([1.0, 0.0, 0.0, 1.0, 50.0, 50.0]), Affine2D::IDENTITY);
        assert_eq!(tl.frames()[1].from, Some(first_to));
    }

    #[test]
    fn test_repeat_appends_all_none_entry() {
        let mut tl = Timeline::new(0.0);
        tl.repeat();
        assert_eq!(tl.frames().len(), 1);
        let frame = &tl.frames()[0];
        assert_eq!(frame.kind, KeyFrameKind::Repeat);
        assert!(frame.start.is_none());
        assert!(frame.end.is_none());
        assert!(frame.to.is_none());
        assert!(frame.ease.is_none());
    }

    #[test]
    fn test_over_empty_queue_fails() {
        let mut tl = Timeline::new(0.0);
        assert_eq!(tl.over(9000.0), Err(SceneError::EmptyTimeline));
    }

    #[test]
    fn test_with_ease_empty_queue_fails() {
        let mut tl = Timeline::new(0.0);
        assert_eq!(tl.with_ease(Easing::EaseInOutSine), Err(SceneError::EmptyTimeline));
    }

    #[test]
    fn test_over_extends_tail() {
        let mut tl = Timeline::new(0.0);
        tl.move_to(Affine2D::IDENTITY, Affine2D::IDENTITY);
        tl.over(9000.0).unwrap();
        let frame = &tl.frames()[0];
        assert_eq!(frame.end, Some(frame.start.unwrap() + 9000.0));
    }

    #[test]
    fn test_with_ease_sets_tail_ease() {
        let mut tl = Timeline::new(0.0);
        tl.move_to(Affine2D::IDENTITY, Affine2D::IDENTITY);
        tl.with_ease(Easing::EaseInOutSine).unwrap();
        assert_eq!(tl.frames()[0].ease, Some(Easing::EaseInOutSine));
    }

    #[test]
    fn test_interpolate_noop_when_not_advancing() {
        let mut tl = Timeline::new(100.0);
        tl.move_to(m([2.0, 0.0, 0.0, 2.0, 0.0, 0.0]), Affine2D::IDENTITY);
        tl.over(50.0).unwrap();

        let mut transform = Affine2D::IDENTITY;
        tl.interpolate(100.0, &mut transform);
        assert_eq!(transform, Affine2D::IDENTITY);
        assert_eq!(tl.last_interpolated(), 100.0);

        tl.interpolate(50.0, &mut transform);
        assert_eq!(tl.last_interpolated(), 100.0);
    }

    #[test]
    fn test_interpolate_midpoint_lerp() {
        let mut tl = Timeline::new(0.0);
        tl.move_to(Affine2D::translation(100.0, 0.0), Affine2D::IDENTITY);
        tl.over(100.0).unwrap();

        let mut transform = Affine2D::IDENTITY;
        tl.interpolate(50.0, &mut transform);
        assert_eq!(transform, Affine2D::translation(50.0, 0.0));
    }

    #[test]
    fn test_interpolate_snaps_elapsed_move() {
        let mut tl = Timeline::new(0.0);
        let to = Affine2D::translation(100.0, 100.0);
        tl.move_to(to, Affine2D::IDENTITY);
        tl.over(10.0).unwrap();

        let mut transform = Affine2D::IDENTITY;
        tl.interpolate(500.0, &mut transform);
        assert_eq!(transform, to);
    }

    #[test]
    fn test_interpolate_holds_through_wait() {
        let mut tl = Timeline::new(0.0);
        let to = Affine2D::translation(10.0, 0.0);
        tl.move_to(to, Affine2D::IDENTITY);
        tl.over(10.0).unwrap();
        tl.wait(100.0);

        let mut transform = Affine2D::IDENTITY;
        tl.interpolate(50.0, &mut transform);
        assert_eq!(transform, to);
    }

    #[test]
    fn test_repeat_restarts_cycle() {
        let mut tl = Timeline::new(0.0);
        tl.move_to(Affine2D::translation(100.0, 0.0), Affine2D::IDENTITY);
        tl.over(100.0).unwrap();
        tl.repeat();

        let mut transform = Affine2D::IDENTITY;
        tl.interpolate(100.0, &mut transform);
        // full cycle elapsed: rebased so the cycle restarts at 100
        tl.interpolate(150.0, &mut transform);
        assert_eq!(transform, Affine2D::translation(50.0, 0.0));
    }

    #[test]
    fn test_skip_animation_with_bounded_work() {
        let mut tl = Timeline::new(0.0);
        tl.move_to(m([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), Affine2D::IDENTITY);
        tl.over(20.0).unwrap();
        assert!(tl.skip_animation(10.0));
        assert!(!tl.skip_animation(30.0));
    }

    #[test]
    fn test_skip_animation_false_when_repeating() {
        let mut tl = Timeline::new(0.0);
        tl.move_to(m([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), Affine2D::IDENTITY);
        tl.over(200.0).unwrap();
        tl.move_to(m([6.0, 5.0, 4.0, 3.0, 2.0, 1.0]), Affine2D::IDENTITY);
        tl.over(400.0).unwrap();
        tl.repeat();
        assert!(!tl.skip_animation(10.0));
    }

    #[test]
    fn test_clear_animation() {
        let mut tl = Timeline::new(0.0);
        tl.move_to(m([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), Affine2D::IDENTITY);
        assert!(!tl.frames().is_empty());
        tl.clear_animation(100.0);
        assert!(tl.frames().is_empty());
        assert_eq!(tl.last_interpolated(), 100.0);
    }
}
