use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

/// Pointer input in surface-local pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed: starts the held trail and launches a burst
    Down { x: f32, y: f32 },
    /// Button released: stops the trail
    Up { x: f32, y: f32 },
    /// Pointer moved (with or without a button held)
    Move { x: f32, y: f32 },
    /// Tap/click: always exactly one burst
    Click { x: f32, y: f32 },
    /// Touch start: a click at the touch point that must not scroll the host
    TouchStart { x: f32, y: f32 },
}

impl PointerEvent {
    pub fn position(&self) -> (f32, f32) {
        match *self {
            PointerEvent::Down { x, y }
            | PointerEvent::Up { x, y }
            | PointerEvent::Move { x, y }
            | PointerEvent::Click { x, y }
            | PointerEvent::TouchStart { x, y } => (x, y),
        }
    }
}

/// What the host should do after the simulation consumed an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputResponse {
    /// Bursts launched by this event
    pub launched: usize,
    /// Host must suppress its default handling (scrolling, selection)
    pub prevent_default: bool,
}

/// Braille dots per terminal cell
pub const DOTS_X: u16 = 2;
pub const DOTS_Y: u16 = 4;

/// Map a terminal mouse event over `canvas` to a surface pointer event.
///
/// The pointer lands in the middle of the cell's 2x4 dot block. Left button
/// drives press/drag/release, right button is a plain click and middle
/// button stands in for a touch start. Events outside the canvas are ignored.
pub fn map_mouse_event(event: &MouseEvent, canvas: Rect) -> Option<PointerEvent> {
    let inside = event.column >= canvas.x
        && event.column < canvas.x + canvas.width
        && event.row >= canvas.y
        && event.row < canvas.y + canvas.height;

    let col = event.column.saturating_sub(canvas.x) as f32;
    let row = event.row.saturating_sub(canvas.y) as f32;
    let x = col * DOTS_X as f32 + DOTS_X as f32 / 2.0;
    let y = row * DOTS_Y as f32 + DOTS_Y as f32 / 2.0;

    match event.kind {
        // Releases outside the canvas still end the held trail
        MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up { x, y }),
        _ if !inside => None,
        MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down { x, y }),
        MouseEventKind::Down(MouseButton::Right) => Some(PointerEvent::Click { x, y }),
        MouseEventKind::Down(MouseButton::Middle) => Some(PointerEvent::TouchStart { x, y }),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            Some(PointerEvent::Move { x, y })
        }
        _ => None,
    }
}
