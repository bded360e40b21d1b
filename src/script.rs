//! Scripted input timeline for the headless run

use glam::Vec2;
use parkour_controller::{InputAction, InputState};

/// One stretch of held input
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    /// Start time in seconds
    pub start: f32,
    pub move_axis: Vec2,
    /// Press jump on the first tick of the segment
    pub jump: bool,
    pub slide: bool,
    pub label: &'static str,
}

impl Segment {
    const fn new(start: f32, move_axis: Vec2, jump: bool, slide: bool, label: &'static str) -> Self {
        Self {
            start,
            move_axis,
            jump,
            slide,
            label,
        }
    }
}

/// A sorted list of segments, played back one fixed step at a time
#[derive(Debug, Clone)]
pub struct InputScript {
    segments: Vec<Segment>,
    current: Option<usize>,
}

impl InputScript {
    pub fn new(mut segments: Vec<Segment>) -> Self {
        segments.sort_by(|a, b| a.start.total_cmp(&b.start));
        Self {
            segments,
            current: None,
        }
    }

    /// Run, jump onto the left wall, wall-jump off it, slide, then vault the ledge
    pub fn obstacle_course() -> Self {
        let run = Vec2::Y;
        let drift_left = Vec2::new(-0.35, 1.0);
        Self::new(vec![
            Segment::new(0.0, run, false, false, "run"),
            Segment::new(1.2, drift_left, true, false, "jump at the wall"),
            Segment::new(2.6, run, true, false, "wall jump"),
            Segment::new(4.0, run, false, false, "land"),
            Segment::new(5.0, run, false, true, "slide"),
            Segment::new(6.0, run, false, false, "run to the pad"),
            Segment::new(9.0, run, true, false, "jump for the ledge"),
            Segment::new(11.0, Vec2::ZERO, false, false, "stand"),
        ])
    }

    /// Drive the device state for the step starting at `time`.
    ///
    /// Jump is pressed on the step that enters a segment and released on the
    /// next one. Returns the segment label when one was just entered.
    pub fn apply(&mut self, time: f32, input: &mut InputState) -> Option<&'static str> {
        input.release(InputAction::Jump);

        let index = self.segments.iter().rposition(|segment| segment.start <= time)?;
        let entered = self.current != Some(index);
        self.current = Some(index);

        let segment = self.segments[index];
        if segment.move_axis == Vec2::ZERO {
            input.clear_move_axis();
        } else {
            input.set_move_axis(segment.move_axis);
        }
        input.set_slide_held(segment.slide);
        if segment.jump && entered {
            input.press(InputAction::Jump);
        }

        entered.then_some(segment.label)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}
