//! Device state the simulation reads: held keys and buttons, the cursor,
//! and the window size.
//!
//! Nothing here polls hardware. The host (a window loop or a test) reports
//! edges with [`Input::press`] and [`Input::release`] between frames, and
//! [`InputSystem`](crate::systems::InputSystem) forgets the edges once the
//! frame is over.

use std::collections::HashSet;
use std::hash::Hash;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// Held set plus the edges seen since the last [`clear_just`](Self::clear_just).
///
/// Used as `Input<KeyCode>` for the keyboard and `Input<MouseButton>` for the
/// mouse. A repeated press of a held key is not a new edge.
#[derive(Debug, Clone)]
pub struct Input<T: Eq + Hash + Copy> {
    held: HashSet<T>,
    went_down: HashSet<T>,
    went_up: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            went_down: HashSet::new(),
            went_up: HashSet::new(),
        }
    }

    pub fn pressed(&self, input: T) -> bool {
        self.held.contains(&input)
    }

    /// Went down during the current frame.
    pub fn just_pressed(&self, input: T) -> bool {
        self.went_down.contains(&input)
    }

    /// Went up during the current frame.
    pub fn just_released(&self, input: T) -> bool {
        self.went_up.contains(&input)
    }

    /// `+1` if only `positive` is held, `-1` if only `negative` is held, else `0`.
    pub fn axis(&self, negative: T, positive: T) -> f32 {
        f32::from(u8::from(self.pressed(positive))) - f32::from(u8::from(self.pressed(negative)))
    }

    pub fn press(&mut self, input: T) {
        if self.held.insert(input) {
            self.went_down.insert(input);
        }
    }

    pub fn release(&mut self, input: T) {
        if self.held.remove(&input) {
            self.went_up.insert(input);
        }
    }

    /// Forget this frame's edges; the held set is untouched.
    pub fn clear_just(&mut self) {
        self.went_down.clear();
        self.went_up.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mouse cursor position in window coordinates (origin top-left).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorPosition {
    pub x: f32,
    pub y: f32,
}

/// Size of the window the cursor lives in, in the same units as
/// [`CursorPosition`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}
