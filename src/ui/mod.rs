use crate::app::{App, Focus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 22;

pub fn draw(frame: &mut Frame, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
        .split(frame.area());

    let shell = app.shell();
    let sidebar_selection = (app.focus() == Focus::Sidebar).then(|| app.sidebar_index());
    shell.render_sidebar(frame, columns[0], sidebar_selection);

    let button_height = if shell.buttons().is_empty() { 0 } else { 1 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(button_height),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(columns[1]);

    let page = app.page();
    shell.render_header(frame, rows[0], page.title());
    shell.render_buttons(frame, rows[1], app.focus() == Focus::Buttons);
    page.render(frame, rows[2], app.focus() == Focus::Page);
    shell.render_status(frame, rows[3]);
}

/// A rectangle centered in `r`, sized as a percentage of it.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
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
