//! Persistent chrome around the mounted page: sidebar, header, contextual
//! action buttons and the status line.
//!
//! The shell never holds the page. It turns button presses into [`Intent`]s
//! for the app to route, and mirrors whatever [`PageStatus`] the app hands it.

use crate::api::ProfileImage;
use crate::pages::PageStatus;
use crate::routes::{action_buttons, ActionButton, Intent, Route};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone)]
pub struct Shell {
    path: String,
    buttons: Vec<ActionButton>,
    focused_button: usize,
    loading: bool,
    fetch_complete: bool,
    profile: Option<ProfileImage>,
    notice: Option<String>,
    spinner_frame: usize,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    pub fn new() -> Self {
        Self {
            path: String::new(),
            buttons: Vec::new(),
            focused_button: 0,
            loading: false,
            fetch_complete: false,
            profile: None,
            notice: None,
            spinner_frame: 0,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn buttons(&self) -> &[ActionButton] {
        &self.buttons
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn fetch_complete(&self) -> bool {
        self.fetch_complete
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn profile(&self) -> Option<&ProfileImage> {
        self.profile.as_ref()
    }

    /// Recomputes the button set for `path`. Every navigation clears the
    /// fetch-complete flag, even back to the same route.
    pub fn set_route(&mut self, path: &str) {
        self.path = path.to_string();
        self.buttons = action_buttons(path);
        self.focused_button = 0;
        self.loading = false;
        self.fetch_complete = false;
        self.notice = None;
    }

    pub fn apply_status(&mut self, status: PageStatus) {
        self.loading = status.loading;
        self.fetch_complete = status.fetch_complete;
    }

    pub fn set_profile(&mut self, profile: ProfileImage) {
        self.profile = Some(profile);
    }

    pub fn clear_profile(&mut self) {
        self.profile = None;
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn focus_next_button(&mut self) {
        if !self.buttons.is_empty() {
            self.focused_button = (self.focused_button + 1) % self.buttons.len();
        }
    }

    pub fn focus_prev_button(&mut self) {
        if !self.buttons.is_empty() {
            self.focused_button =
                (self.focused_button + self.buttons.len() - 1) % self.buttons.len();
        }
    }

    /// The intent behind the focused button. Disabled while the page is loading.
    pub fn click(&self) -> Option<Intent> {
        if self.loading {
            return None;
        }
        self.buttons.get(self.focused_button).map(|button| button.intent)
    }

    pub fn tick(&mut self) {
        if self.loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER.len();
        }
    }

    pub fn render_sidebar(&self, frame: &mut Frame, area: Rect, selected: Option<usize>) {
        let current = Route::from_path(&self.path);
        let mut items: Vec<ListItem> = Route::NAVIGATION
            .iter()
            .enumerate()
            .map(|(idx, route)| {
                let mut style = if Some(*route) == current {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                if selected == Some(idx) {
                    style = style.bg(Color::DarkGray);
                }
                ListItem::new(Line::from(Span::styled(
                    format!(" {} {}", idx + 1, route.label()),
                    style,
                )))
            })
            .collect();

        let sign_out_style = if selected == Some(Route::NAVIGATION.len()) {
            Style::default().fg(Color::Red).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Red)
        };
        items.push(ListItem::new(""));
        items.push(ListItem::new(Line::from(Span::styled(
            " Sign out",
            sign_out_style,
        ))));

        let border_style = if selected.is_some() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let list = List::new(items).block(
            Block::default()
                .title(" draftdesk ")
                .borders(Borders::ALL)
                .border_style(border_style),
        );
        frame.render_widget(list, area);
    }

    pub fn render_header(&self, frame: &mut Frame, area: Rect, title: &str) {
        let mut spans = vec![Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(profile) = &self.profile {
            let name = profile.username.as_deref().unwrap_or("You");
            spans.push(Span::styled(
                format!(" @{name}"),
                Style::default().fg(Color::Cyan),
            ));
            if let Some(url) = &profile.profile_image_url {
                spans.push(Span::styled(
                    format!("  {url}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM)),
            area,
        );
    }

    pub fn render_buttons(&self, frame: &mut Frame, area: Rect, focused: bool) {
        if self.buttons.is_empty() {
            return;
        }
        let mut spans = Vec::new();
        for (idx, button) in self.buttons.iter().enumerate() {
            let label = if self.loading && idx == self.focused_button {
                format!("[ {} {} ]", SPINNER[self.spinner_frame], button.label)
            } else if self.fetch_complete && button.intent.is_fetch() {
                format!("[ ✓ {} ]", button.label)
            } else {
                format!("[ {} ]", button.label)
            };
            let style = if self.loading {
                Style::default().fg(Color::DarkGray)
            } else if focused && idx == self.focused_button {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Yellow)
            };
            spans.push(Span::styled(label, style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    pub fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.notice {
            Some(notice) => Line::from(Span::styled(
                notice.clone(),
                Style::default().fg(Color::Yellow),
            )),
            None => Line::from(Span::styled(
                "Tab focus | 1-4 navigate | q quit",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}
