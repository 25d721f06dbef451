//! Single-pointer touch state and pointer events.
//!
//! Every gesture uses the same pointer identity (id 0, finger).  A session
//! keeps one [`PointerState`] and mutates its coordinates in place for each
//! event instead of building a fresh pointer description per gesture.

/// Kind of tool touching the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolType {
    Finger,
}

/// Input source an event claims to come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Touchscreen,
}

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionAction {
    Down,
    Move,
    Up,
}

/// Fixed identity of the injected pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerProperties {
    pub id: i32,
    pub tool_type: ToolType,
}

/// Per-event pointer coordinates.  Orientation and size stay at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerCoords {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    pub orientation: f32,
    pub size: f32,
}

/// The session's single pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub properties: PointerProperties,
    pub coords: PointerCoords,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            properties: PointerProperties { id: 0, tool_type: ToolType::Finger },
            coords: PointerCoords { x: 0.0, y: 0.0, pressure: 0.0, orientation: 0.0, size: 0.0 },
        }
    }
}

impl PointerState {
    /// Moves the pointer to `(x, y)` with the given pressure.
    pub fn set_position(&mut self, x: i32, y: i32, pressure: f32) {
        self.coords.x = x as f32;
        self.coords.y = y as f32;
        self.coords.pressure = pressure;
    }
}

/// One synthetic touch event handed to the capability backend.
///
/// `down_time` and `event_time` are milliseconds on the session's monotonic
/// clock; every event of one gesture shares the same `down_time`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub down_time: u64,
    pub event_time: u64,
    pub action: MotionAction,
    pub pointer: PointerState,
    pub buttons: i32,
    pub device_id: i32,
    pub source: InputSource,
}

impl PointerEvent {
    /// Builds a touchscreen event from the current pointer state.
    pub fn touch(
        down_time: u64,
        event_time: u64,
        action: MotionAction,
        pointer: &PointerState,
        buttons: i32,
    ) -> Self {
        Self {
            down_time,
            event_time,
            action,
            pointer: *pointer,
            buttons,
            device_id: 0,
            source: InputSource::Touchscreen,
        }
    }

    /// Horizontal position in display pixels.
    pub fn x(&self) -> f32 {
        self.pointer.coords.x
    }

    /// Vertical position in display pixels.
    pub fn y(&self) -> f32 {
        self.pointer.coords.y
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
