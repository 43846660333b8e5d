//! Drag tracking for scene panning

use crate::geometry::Point;

/// Last pointer position of an in-progress drag
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Absent,
    Active(Point),
}

impl DragState {
    pub fn is_active(&self) -> bool {
        matches!(self, DragState::Active(_))
    }

    pub fn last_position(&self) -> Option<Point> {
        match self {
            DragState::Active(position) => Some(*position),
            DragState::Absent => None,
        }
    }

    /// Start (or restart) a drag at `position`
    pub fn begin(&mut self, position: Point) {
        *self = DragState::Active(position);
    }

    /// Move an active drag to `position`, returning the offset from the last
    /// position. Returns `None` and stays absent when no drag is active.
    pub fn drag_to(&mut self, position: Point) -> Option<Point> {
        let last = self.last_position()?;
        *self = DragState::Active(position);
        Some(position - last)
    }

    pub fn release(&mut self) {
        *self = DragState::Absent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_lifecycle() {
        let mut drag = DragState::default();
        assert!(!drag.is_active());

        drag.begin(Point::new(10.0, 10.0));
        assert_eq!(drag, DragState::Active(Point::new(10.0, 10.0)));

        assert_eq!(drag.drag_to(Point::new(15.0, 12.0)), Some(Point::new(5.0, 2.0)));
        assert_eq!(drag.last_position(), Some(Point::new(15.0, 12.0)));

        drag.release();
        assert_eq!(drag, DragState::Absent);
    }

    #[test]
    fn test_move_without_begin_is_ignored() {
        let mut drag = DragState::Absent;
        assert_eq!(drag.drag_to(Point::new(3.0, 4.0)), None);
        assert_eq!(drag, DragState::Absent);
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut drag = DragState::Active(Point::ZERO);
        drag.release();
        drag.release();
        assert_eq!(drag, DragState::Absent);
    }
}
