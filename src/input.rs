//! Pointer and touch input for the signature pad.
//!
//! Hosts deliver events with global (screen/client) coordinates. The pad maps
//! them into surface-local coordinates through [`resolve_local`], the single
//! path shared by mouse and touch input.

use egui::{Pos2, Rect};

/// Raw input as delivered by the host, in global coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Pos2 },
    PointerMove { pos: Pos2 },
    PointerUp,
    /// The pointer left the surface. Finalizes a stroke like `PointerUp`.
    PointerLeave,
    /// Active touch points, first one first.
    TouchStart { touches: Vec<Pos2> },
    TouchMove { touches: Vec<Pos2> },
    TouchEnd,
}

/// What an event asks of the host's default gesture handling
/// (page scroll, pinch zoom, text selection).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// The pad handled the event; the host must not scroll or zoom.
    Consumed,
    /// The host may run its default behaviour.
    Passthrough,
}

/// Anything that can report a pointer position: mouse-style client
/// coordinates, a list of touch points, or both.
pub trait PointerSource {
    fn client_pos(&self) -> Option<Pos2>;

    fn touches(&self) -> &[Pos2] {
        &[]
    }
}

impl PointerSource for InputEvent {
    fn client_pos(&self) -> Option<Pos2> {
        match self {
            InputEvent::PointerDown { pos } | InputEvent::PointerMove { pos } => Some(*pos),
            _ => None,
        }
    }

    fn touches(&self) -> &[Pos2] {
        match self {
            InputEvent::TouchStart { touches } | InputEvent::TouchMove { touches } => touches.as_slice(),
            _ => &[],
        }
    }
}

impl PointerSource for Pos2 {
    fn client_pos(&self) -> Option<Pos2> {
        Some(*self)
    }
}

/// Map a source's position into coordinates local to `bounds` (the surface's
/// on-screen box). The first touch point wins over mouse coordinates; further
/// simultaneous touches are ignored.
pub fn resolve_local(source: &impl PointerSource, bounds: Rect) -> Option<Pos2> {
    let global = match source.touches().first() {
        Some(first) => *first,
        None => source.client_pos()?,
    };
    Some(Pos2::new(global.x - bounds.min.x, global.y - bounds.min.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn bounds_at(x: f32, y: f32) -> Rect {
        Rect::from_min_size(Pos2::new(x, y), vec2(300.0, 200.0))
    }

    #[test]
    fn mouse_position_is_offset_by_bounds() {
        let ev = InputEvent::PointerDown { pos: Pos2::new(15.0, 25.0) };
        assert_eq!(resolve_local(&ev, bounds_at(10.0, 20.0)), Some(Pos2::new(5.0, 5.0)));
    }

    #[test]
    fn first_touch_is_used() {
        let ev = InputEvent::TouchMove {
            touches: vec![Pos2::new(40.0, 60.0), Pos2::new(200.0, 150.0)],
        };
        assert_eq!(resolve_local(&ev, bounds_at(10.0, 20.0)), Some(Pos2::new(30.0, 40.0)));
    }

    #[test]
    fn events_without_position_resolve_to_none() {
        assert_eq!(resolve_local(&InputEvent::PointerUp, bounds_at(0.0, 0.0)), None);
        let empty = InputEvent::TouchStart { touches: Vec::new() };
        assert_eq!(resolve_local(&empty, bounds_at(0.0, 0.0)), None);
    }

    #[test]
    fn positions_outside_bounds_go_negative() {
        let p = Pos2::new(3.0, 4.0);
        assert_eq!(resolve_local(&p, bounds_at(10.0, 20.0)), Some(Pos2::new(-7.0, -16.0)));
    }
}
