//! On-screen Touch Controls
//!
//! Layout and hit-testing for the d-pad, jump and attack buttons. The
//! client feeds active pointer positions (window pixels, y down) each frame;
//! the controls keep held state and one-shot press pulses.

use serde::{Serialize, Deserialize};

use crate::core::geom::Vec2;
use crate::game::input::TouchInputState;

/// Distance of the d-pad center from the bottom-left corner.
pub const DPAD_INSET: f32 = 160.0;
/// D-pad background radius.
pub const DPAD_RADIUS: f32 = 60.0;
/// Horizontal offset of the left/right arrows from the d-pad center.
pub const DPAD_ARROW_OFFSET: f32 = 30.0;
/// Hit radius of each d-pad arrow.
pub const DPAD_ARROW_RADIUS: f32 = 25.0;
/// Jump button radius.
pub const JUMP_RADIUS: f32 = 50.0;
/// Attack button radius.
pub const ATTACK_RADIUS: f32 = 40.0;

/// A circular touch target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TouchButton {
    /// Center in window pixels
    pub center: Vec2,
    /// Hit radius
    pub radius: f32,
}

impl TouchButton {
    /// Check whether a pointer is inside the button.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }
}

/// Button placement for a given view size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TouchLayout {
    /// D-pad background (visual only)
    pub dpad: TouchButton,
    /// Left arrow
    pub left: TouchButton,
    /// Right arrow
    pub right: TouchButton,
    /// Jump button
    pub jump: TouchButton,
    /// Attack button
    pub attack: TouchButton,
}

impl TouchLayout {
    /// Lay out controls for a `width x height` view.
    pub fn new(width: f32, height: f32) -> Self {
        let dpad_center = Vec2::new(DPAD_INSET, height - DPAD_INSET);
        Self {
            dpad: TouchButton { center: dpad_center, radius: DPAD_RADIUS },
            left: TouchButton {
                center: dpad_center + Vec2::new(-DPAD_ARROW_OFFSET, 0.0),
                radius: DPAD_ARROW_RADIUS,
            },
            right: TouchButton {
                center: dpad_center + Vec2::new(DPAD_ARROW_OFFSET, 0.0),
                radius: DPAD_ARROW_RADIUS,
            },
            jump: TouchButton {
                center: Vec2::new(width - 120.0, height - 160.0),
                radius: JUMP_RADIUS,
            },
            attack: TouchButton {
                center: Vec2::new(width - 240.0, height - 160.0),
                radius: ATTACK_RADIUS,
            },
        }
    }
}

/// Touch control state machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TouchControls {
    layout: TouchLayout,
    left: bool,
    right: bool,
    jump_held: bool,
    attack_held: bool,
    jump_pulse: bool,
    attack_pulse: bool,
}

impl TouchControls {
    /// Create controls for a view size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            layout: TouchLayout::new(width, height),
            left: false,
            right: false,
            jump_held: false,
            attack_held: false,
            jump_pulse: false,
            attack_pulse: false,
        }
    }

    /// Current layout.
    pub fn layout(&self) -> &TouchLayout {
        &self.layout
    }

    /// Follow a view resize.
    pub fn relayout(&mut self, width: f32, height: f32) {
        self.layout = TouchLayout::new(width, height);
    }

    /// Update from the pointers currently down.
    ///
    /// A button is held while any pointer is inside it. Pressing jump or
    /// attack arms a pulse that stays set until consumed.
    pub fn update<I>(&mut self, pointers: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        let (mut left, mut right, mut jump, mut attack) = (false, false, false, false);
        for p in pointers {
            left |= self.layout.left.contains(p);
            right |= self.layout.right.contains(p);
            jump |= self.layout.jump.contains(p);
            attack |= self.layout.attack.contains(p);
        }

        if jump && !self.jump_held {
            self.jump_pulse = true;
        }
        if attack && !self.attack_held {
            self.attack_pulse = true;
        }

        self.left = left;
        self.right = right;
        self.jump_held = jump;
        self.attack_held = attack;
    }

    /// Return and clear the jump pulse.
    pub fn consume_jump_pressed(&mut self) -> bool {
        std::mem::take(&mut self.jump_pulse)
    }

    /// Return and clear the attack pulse.
    pub fn consume_attack_pressed(&mut self) -> bool {
        std::mem::take(&mut self.attack_pulse)
    }

    /// Snapshot for this frame, consuming both pulses.
    pub fn take_input(&mut self) -> TouchInputState {
        TouchInputState {
            left: self.left,
            right: self.right,
            jump_held: self.jump_held,
            jump_pulse: self.consume_jump_pressed(),
            attack_pulse: self.consume_attack_pressed(),
        }
    }

    /// Held state of (left, right, jump, attack), for highlighting.
    pub fn held(&self) -> (bool, bool, bool, bool) {
        (self.left, self.right, self.jump_held, self.attack_held)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_positions() {
        let layout = TouchLayout::new(1280.0, 720.0);
        assert_eq!(layout.dpad.center, Vec2::new(160.0, 560.0));
        assert_eq!(layout.left.center, Vec2::new(130.0, 560.0));
        assert_eq!(layout.right.center, Vec2::new(190.0, 560.0));
        assert_eq!(layout.jump.center, Vec2::new(1160.0, 560.0));
        assert_eq!(layout.attack.center, Vec2::new(1040.0, 560.0));
    }

    #[test]
    fn test_dpad_hold_and_release() {
        let mut tc = TouchControls::new(1280.0, 720.0);

        tc.update([Vec2::new(130.0, 560.0)]);
        let input = tc.take_input();
        assert!(input.left);
        assert!(!input.right);

        tc.update(std::iter::empty());
        assert!(!tc.take_input().left);
    }

    #[test]
    fn test_jump_pulse_consumed_once() {
        let mut tc = TouchControls::new(1280.0, 720.0);
        let jump = Vec2::new(1160.0, 560.0);

        tc.update([jump]);
        assert!(tc.consume_jump_pressed());
        assert!(!tc.consume_jump_pressed());

        // Still held, no new pulse
        tc.update([jump]);
        let input = tc.take_input();
        assert!(input.jump_held);
        assert!(!input.jump_pulse);

        // Release and press again
        tc.update(std::iter::empty());
        tc.update([jump]);
        assert!(tc.take_input().jump_pulse);
    }

    #[test]
    fn test_attack_pulse_survives_until_consumed() {
        let mut tc = TouchControls::new(1280.0, 720.0);
        tc.update([Vec2::new(1040.0, 560.0)]);
        tc.update(std::iter::empty());

        // Tap shorter than a frame is not lost
        assert!(tc.consume_attack_pressed());
    }

    #[test]
    fn test_multi_touch() {
        let mut tc = TouchControls::new(1280.0, 720.0);
        tc.update([Vec2::new(190.0, 560.0), Vec2::new(1160.0, 560.0)]);
        let input = tc.take_input();
        assert!(input.right);
        assert!(input.jump_held);
        assert!(input.jump_pulse);
    }

    #[test]
    fn test_relayout() {
        let mut tc = TouchControls::new(1280.0, 720.0);
        tc.relayout(800.0, 600.0);
        assert_eq!(tc.layout().jump.center, Vec2::new(680.0, 440.0));
        assert_eq!(tc.layout().dpad.center, Vec2::new(160.0, 440.0));
    }
}
