//! User Interface module
//!
//! Terminal rendering of modal interactions with ratatui.

pub mod modals;
pub mod theme;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub use modals::{ModalHandles, ModalHost};
pub use theme::Theme;

/// Calculate a rectangle centered in `r` covering the given percentages
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);

    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(50, 50, area);

        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 20);
    }
}
