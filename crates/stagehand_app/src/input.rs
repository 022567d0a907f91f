//! Pointer and keyboard latch
//!
//! Host event callbacks only record what happened. The latch converts the
//! pointer into logical units during its `update()`, so every participant
//! registered after it sees this frame's input in logical space, and clears
//! the per-frame flags in `reset()`.

use crate::surface::Surface;
use stagehand_core::{FrameInfo, KeyPress, Participant, Point, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Default)]
struct InputState {
    screen: Point,
    pointer: Point,
    down: bool,
    moved: bool,
    up: bool,
    key: Option<KeyPress>,
    drag_start: Option<Point>,
    drag_delta: Point,
}

/// Per-frame input participant
#[derive(Clone)]
pub struct InputLatch {
    state: Rc<RefCell<InputState>>,
    surface: Surface,
}

impl InputLatch {
    pub fn new(surface: Surface) -> Self {
        Self {
            state: Rc::new(RefCell::new(InputState::default())),
            surface,
        }
    }

    // Host callbacks

    pub fn pointer_down(&self, screen: Point) {
        let mut state = self.state.borrow_mut();
        state.screen = screen;
        state.down = true;
    }

    pub fn pointer_move(&self, screen: Point) {
        let mut state = self.state.borrow_mut();
        state.screen = screen;
        state.moved = true;
    }

    pub fn pointer_up(&self) {
        self.state.borrow_mut().up = true;
    }

    pub fn key_down(&self, key: KeyPress) {
        self.state.borrow_mut().key = Some(key);
    }

    // Queries, valid from this participant's update() until its reset()

    /// Last known pointer position in logical units
    pub fn pointer(&self) -> Point {
        self.state.borrow().pointer
    }

    /// Pointer position if the pointer went down this frame
    pub fn pointer_down_at(&self) -> Option<Point> {
        let state = self.state.borrow();
        state.down.then_some(state.pointer)
    }

    pub fn pointer_went_down(&self) -> bool {
        self.state.borrow().down
    }

    pub fn pointer_moved(&self) -> bool {
        self.state.borrow().moved
    }

    pub fn pointer_went_up(&self) -> bool {
        self.state.borrow().up
    }

    /// Key pressed this frame
    pub fn key_pressed(&self) -> Option<KeyPress> {
        self.state.borrow().key.clone()
    }

    /// Offset from the drag start to the pointer, zero when not dragging
    pub fn drag_delta(&self) -> Point {
        self.state.borrow().drag_delta
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().drag_start.is_some()
    }
}

impl Participant for InputLatch {
    fn name(&self) -> &str {
        "input"
    }

    fn update(&mut self, _frame: &FrameInfo) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.down || state.moved || state.up {
            state.pointer = self.surface.screen_to_logical(state.screen);
        }
        if state.down && state.drag_start.is_none() {
            state.drag_start = Some(state.pointer);
        }
        if let Some(start) = state.drag_start {
            state.drag_delta = state.pointer - start;
        }
        if state.up {
            state.drag_start = None;
            state.drag_delta = Point::ZERO;
        }
        Ok(())
    }

    fn reset(&mut self, _frame: &FrameInfo) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.down = false;
        state.moved = false;
        state.up = false;
        state.key = None;
        Ok(())
    }
}

impl fmt::Debug for InputLatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputLatch")
            .field("state", &*self.state.borrow())
            .finish()
    }
}
