//! Frame layout: header, dashboard/tool split, help bar.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Split the frame into (header, dashboard, tool pane, help bar).
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect, Rect) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header_area = vertical[0];
    let main_area = vertical[1];
    let help_area = vertical[2];

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(32), Constraint::Percentage(68)])
        .split(main_area);

    (header_area, horizontal[0], horizontal[1], help_area)
}
