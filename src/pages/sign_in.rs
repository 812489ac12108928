use super::{Effect, Page, PageStatus};
use crate::api::{Request, Response};
use crate::routes::Route;
use crate::ui::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Email,
    Password,
}

#[derive(Debug, Clone)]
pub struct SignInPage {
    email: String,
    password: String,
    focus: Field,
    loading: bool,
    error: Option<String>,
}

impl Default for SignInPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SignInPage {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: Field::Email,
            loading: false,
            error: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submit(&mut self) -> Vec<Effect> {
        if self.loading {
            return Vec::new();
        }
        let email = self.email.trim().to_string();
        if email.is_empty() || self.password.is_empty() {
            self.error = Some("Email and password are required".to_string());
            return Vec::new();
        }

        self.loading = true;
        self.error = None;
        vec![Effect::Request(Request::SignIn {
            email,
            password: self.password.clone(),
        })]
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Email => Field::Password,
            Field::Password => Field::Email,
        };
    }
}

impl Page for SignInPage {
    fn route(&self) -> Route {
        Route::SignIn
    }

    fn title(&self) -> &str {
        "Sign in"
    }

    fn mount(&mut self) -> Vec<Effect> {
        Vec::new()
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Enter => {
                if self.focus == Field::Email && self.password.is_empty() {
                    self.focus = Field::Password;
                    return Vec::new();
                }
                return self.submit();
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => self.toggle_focus(),
            _ if self.loading => {}
            KeyCode::Backspace => {
                self.focused_mut().pop();
            }
            KeyCode::Char(c) => self.focused_mut().push(c),
            _ => {}
        }
        Vec::new()
    }

    fn apply(&mut self, response: Response) -> Vec<Effect> {
        match response {
            Response::SignedIn(result) => {
                self.loading = false;
                match result {
                    Ok(signed_in) => {
                        info!(user_type = ?signed_in.user_type, "signed in");
                        self.password.clear();
                        vec![
                            Effect::SaveSession(signed_in.user_id),
                            Effect::Navigate(Route::Replies),
                        ]
                    }
                    Err(err) => {
                        self.error = Some(err.to_string());
                        Vec::new()
                    }
                }
            }
            other => {
                debug!(?other, "sign-in page ignoring response");
                Vec::new()
            }
        }
    }

    fn status(&self) -> PageStatus {
        PageStatus {
            loading: self.loading,
            fetch_complete: false,
        }
    }

    fn captures_input(&self) -> bool {
        true
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let form_area = centered_rect(60, 60, area);
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        let block = Block::default()
            .title(" Sign in ")
            .borders(Borders::ALL)
            .border_style(border_style);

        let field_line = |label: &str, value: String, field: Field| {
            let active = self.focus == field;
            let style = if active {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let cursor = if active { "█" } else { "" };
            Line::from(vec![
                Span::styled(format!("{label:>9}: "), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{value}{cursor}"), style),
            ])
        };

        let mut lines = vec![
            Line::from(""),
            field_line("Email", self.email.clone(), Field::Email),
            Line::from(""),
            field_line(
                "Password",
                "*".repeat(self.password.chars().count()),
                Field::Password,
            ),
            Line::from(""),
        ];

        if self.loading {
            lines.push(Line::from(Span::styled(
                "Signing in...",
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Tab switch field | Enter sign in | Ctrl+c quit",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Left)
                .block(block),
            form_area,
        );
    }
}
