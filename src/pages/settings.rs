use super::{Effect, Page, PageStatus};
use crate::api::{Request, Response, SettingsGroup, SettingsUpdate, TwitterCredentials, UserSettings};
use crate::routes::Route;
use crate::ui::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use std::time::{Duration, Instant};
use tracing::debug;

/// Splits a comma-separated input into trimmed, non-empty entries.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_list(entries: &[String]) -> String {
    entries.join(", ")
}

#[derive(Debug, Clone, Default)]
struct SettingsForm {
    credentials: TwitterCredentials,
    target_accounts: String,
    keywords: String,
}

#[derive(Debug, Clone)]
struct Field {
    label: &'static str,
    value: String,
    secret: bool,
}

impl Field {
    fn new(label: &'static str, value: &str, secret: bool) -> Self {
        Self {
            label,
            value: value.to_string(),
            secret,
        }
    }
}

#[derive(Debug, Clone)]
struct Modal {
    group: SettingsGroup,
    fields: Vec<Field>,
    focus: usize,
}

#[derive(Debug, Clone, Default)]
struct GroupState {
    loading: bool,
    /// The values in flight, applied to the form once the save succeeds.
    pending: Option<SettingsUpdate>,
    error: Option<String>,
    success: Option<(String, Instant)>,
}

pub struct SettingsPage {
    message_clear: Duration,
    loading_settings: bool,
    load_error: Option<String>,
    form: SettingsForm,
    selected: usize,
    modal: Option<Modal>,
    groups: [GroupState; 3],
}

fn group_index(group: SettingsGroup) -> usize {
    match group {
        SettingsGroup::Credentials => 0,
        SettingsGroup::TargetAccounts => 1,
        SettingsGroup::Keywords => 2,
    }
}

impl SettingsPage {
    pub fn new(message_clear: Duration) -> Self {
        Self {
            message_clear,
            loading_settings: false,
            load_error: None,
            form: SettingsForm::default(),
            selected: 0,
            modal: None,
            groups: Default::default(),
        }
    }

    fn group_state(&self, group: SettingsGroup) -> &GroupState {
        &self.groups[group_index(group)]
    }

    fn group_state_mut(&mut self, group: SettingsGroup) -> &mut GroupState {
        &mut self.groups[group_index(group)]
    }

    pub fn success_message(&self, group: SettingsGroup) -> Option<&str> {
        self.group_state(group)
            .success
            .as_ref()
            .map(|(message, _)| message.as_str())
    }

    pub fn error_message(&self, group: SettingsGroup) -> Option<&str> {
        self.group_state(group).error.as_deref()
    }

    pub fn modal_group(&self) -> Option<SettingsGroup> {
        self.modal.as_ref().map(|modal| modal.group)
    }

    pub fn target_accounts(&self) -> &str {
        &self.form.target_accounts
    }

    pub fn keywords(&self) -> &str {
        &self.form.keywords
    }

    fn populate(&mut self, settings: UserSettings) {
        self.form.credentials.twitter_username = settings.twitter_username;
        self.form.target_accounts = join_list(&settings.target_accounts);
        self.form.keywords = join_list(&settings.search_keywords);
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Opens the edit modal for `group`, seeded from the current form.
    /// Refused until the stored settings have loaded.
    pub fn open(&mut self, group: SettingsGroup) -> bool {
        if self.loading_settings || self.load_error.is_some() {
            debug!(?group, "settings not loaded, not opening editor");
            return false;
        }
        let fields = match group {
            SettingsGroup::Credentials => {
                let creds = &self.form.credentials;
                vec![
                    Field::new("Username", &creds.twitter_username, false),
                    Field::new("Client ID", &creds.twitter_client_id, true),
                    Field::new("Client secret", &creds.twitter_client_secret, true),
                    Field::new("Access token", &creds.twitter_access_token, true),
                    Field::new(
                        "Access token secret",
                        &creds.twitter_access_token_secret,
                        true,
                    ),
                ]
            }
            SettingsGroup::TargetAccounts => vec![Field::new(
                "Accounts (comma separated)",
                &self.form.target_accounts,
                false,
            )],
            SettingsGroup::Keywords => vec![Field::new(
                "Keywords (comma separated)",
                &self.form.keywords,
                false,
            )],
        };
        self.modal = Some(Modal {
            group,
            fields,
            focus: 0,
        });
        true
    }

    fn reload(&mut self) -> Vec<Effect> {
        if self.loading_settings {
            return Vec::new();
        }
        self.loading_settings = true;
        self.load_error = None;
        vec![Effect::Request(Request::Settings)]
    }

    pub fn close(&mut self) {
        self.modal = None;
    }

    fn update_from_modal(modal: &Modal) -> SettingsUpdate {
        let value = |idx: usize| {
            modal
                .fields
                .get(idx)
                .map(|field| field.value.trim().to_string())
                .unwrap_or_default()
        };
        match modal.group {
            SettingsGroup::Credentials => SettingsUpdate::Credentials(TwitterCredentials {
                twitter_username: value(0),
                twitter_client_id: value(1),
                twitter_client_secret: value(2),
                twitter_access_token: value(3),
                twitter_access_token_secret: value(4),
            }),
            SettingsGroup::TargetAccounts => SettingsUpdate::TargetAccounts(split_list(&value(0))),
            SettingsGroup::Keywords => SettingsUpdate::Keywords(split_list(&value(0))),
        }
    }

    /// Submits the open modal's group. Ignored while that group is saving.
    pub fn submit(&mut self) -> Vec<Effect> {
        let Some(modal) = &self.modal else {
            return Vec::new();
        };
        let group = modal.group;
        if self.group_state(group).loading {
            return Vec::new();
        }

        let update = Self::update_from_modal(modal);
        let state = self.group_state_mut(group);
        state.loading = true;
        state.pending = Some(update.clone());
        state.error = None;
        state.success = None;
        vec![Effect::Request(Request::UpdateSettings(update))]
    }

    fn commit(&mut self, group: SettingsGroup) {
        let Some(update) = self.group_state_mut(group).pending.take() else {
            return;
        };
        match update {
            SettingsUpdate::Credentials(credentials) => self.form.credentials = credentials,
            SettingsUpdate::TargetAccounts(accounts) => {
                self.form.target_accounts = join_list(&accounts)
            }
            SettingsUpdate::Keywords(keywords) => self.form.keywords = join_list(&keywords),
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let Some(modal) = self.modal.as_ref() else {
            return Vec::new();
        };
        let saving = self.group_state(modal.group).loading;

        match key.code {
            KeyCode::Esc => self.close(),
            KeyCode::Enter => return self.submit(),
            _ if saving => {}
            KeyCode::Tab | KeyCode::Down => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.focus = (modal.focus + 1) % modal.fields.len();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(modal) = self.modal.as_mut() {
                    modal.focus = (modal.focus + modal.fields.len() - 1) % modal.fields.len();
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.focused_field_mut() {
                    field.value.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.focused_field_mut() {
                    field.value.push(c);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn focused_field_mut(&mut self) -> Option<&mut Field> {
        let modal = self.modal.as_mut()?;
        modal.fields.get_mut(modal.focus)
    }

    fn group_summary(&self, group: SettingsGroup) -> Vec<String> {
        match group {
            SettingsGroup::Credentials => {
                let creds = &self.form.credentials;
                let username = if creds.twitter_username.is_empty() {
                    "not connected".to_string()
                } else {
                    format!("@{}", creds.twitter_username)
                };
                let keys = if creds.twitter_access_token.is_empty() {
                    "API keys: not set this session"
                } else {
                    "API keys: saved"
                };
                vec![format!("Username: {username}"), keys.to_string()]
            }
            SettingsGroup::TargetAccounts => vec![display_or_none(&self.form.target_accounts)],
            SettingsGroup::Keywords => vec![display_or_none(&self.form.keywords)],
        }
    }

    fn render_modal(&self, frame: &mut Frame, area: Rect, modal: &Modal) {
        let modal_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" Edit {} ", modal.group.label()));
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let mut lines = vec![Line::from("")];
        for (idx, field) in modal.fields.iter().enumerate() {
            let focused = idx == modal.focus;
            let shown = if field.secret {
                "*".repeat(field.value.chars().count())
            } else {
                field.value.clone()
            };
            let marker = if focused { "> " } else { "  " };
            let cursor = if focused { "█" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{marker}{}: ", field.label),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{shown}{cursor}"), Style::default().fg(Color::White)),
            ]));
        }
        lines.push(Line::from(""));

        let state = self.group_state(modal.group);
        if state.loading {
            lines.push(Line::from(Span::styled(
                "Saving...",
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(error) = &state.error {
            lines.push(Line::from(Span::styled(
                format!("Error: {error}"),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(Span::styled(
            "Tab next field | Enter save | Esc close",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

fn display_or_none(value: &str) -> String {
    if value.is_empty() {
        "(none)".to_string()
    } else {
        value.to_string()
    }
}

impl Page for SettingsPage {
    fn route(&self) -> Route {
        Route::Settings
    }

    fn title(&self) -> &str {
        "Settings"
    }

    fn mount(&mut self) -> Vec<Effect> {
        self.loading_settings = true;
        vec![Effect::Request(Request::Settings)]
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(SettingsGroup::ALL.len() - 1)
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                self.open(SettingsGroup::ALL[self.selected]);
            }
            KeyCode::Char('r') => return self.reload(),
            _ => {}
        }
        Vec::new()
    }

    fn apply(&mut self, response: Response) -> Vec<Effect> {
        match response {
            Response::Settings(result) => {
                self.loading_settings = false;
                match result {
                    Ok(settings) => {
                        self.load_error = None;
                        self.populate(settings);
                    }
                    Err(err) => self.load_error = Some(err.to_string()),
                }
            }
            Response::SettingsUpdated { group, result } => {
                self.group_state_mut(group).loading = false;
                if result.is_err() {
                    self.group_state_mut(group).pending = None;
                }
                match result {
                    Ok(response) => {
                        self.commit(group);
                        if self.modal_group() == Some(group) {
                            self.close();
                        }
                        let message = if response.message.is_empty() {
                            format!("{} updated", group.label())
                        } else {
                            response.message
                        };
                        self.group_state_mut(group).success = Some((message, Instant::now()));
                    }
                    Err(err) => self.group_state_mut(group).error = Some(err.to_string()),
                }
            }
            other => debug!(?other, "settings page ignoring response"),
        }
        Vec::new()
    }

    fn status(&self) -> PageStatus {
        PageStatus {
            loading: self.loading_settings || self.groups.iter().any(|state| state.loading),
            fetch_complete: false,
        }
    }

    fn tick(&mut self, now: Instant) {
        let clear_after = self.message_clear;
        for state in &mut self.groups {
            let expired = state
                .success
                .as_ref()
                .is_some_and(|(_, at)| now.saturating_duration_since(*at) >= clear_after);
            if expired {
                state.success = None;
            }
        }
    }

    fn captures_input(&self) -> bool {
        self.modal.is_some()
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        let block = Block::default()
            .title(" Settings ")
            .borders(Borders::ALL)
            .border_style(border_style);

        if self.loading_settings {
            frame.render_widget(Paragraph::new("Loading settings...").block(block), area);
            return;
        }
        if let Some(error) = &self.load_error {
            let lines = vec![
                Line::from(Span::styled(
                    format!("Error: {error}"),
                    Style::default().fg(Color::Red),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "r retry",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            frame.render_widget(Paragraph::new(lines).block(block), area);
            return;
        }

        let mut lines = Vec::new();
        for (idx, group) in SettingsGroup::ALL.iter().copied().enumerate() {
            let title_style = if idx == self.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            };
            let marker = if idx == self.selected { "▶ " } else { "  " };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}", group.label()),
                title_style,
            )));
            for summary in self.group_summary(group) {
                lines.push(Line::from(Span::styled(
                    format!("    {summary}"),
                    Style::default().fg(Color::Gray),
                )));
            }
            let state = self.group_state(group);
            if let Some((message, _)) = &state.success {
                lines.push(Line::from(Span::styled(
                    format!("    ✓ {message}"),
                    Style::default().fg(Color::Green),
                )));
            }
            if state.loading && self.modal_group() != Some(group) {
                lines.push(Line::from(Span::styled(
                    "    Saving...",
                    Style::default().fg(Color::Yellow),
                )));
            } else if let Some(error) = &state.error {
                lines.push(Line::from(Span::styled(
                    format!("    Error: {error}"),
                    Style::default().fg(Color::Red),
                )));
            }
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            "↑/↓ select | Enter edit | r reload",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );

        if let Some(modal) = &self.modal {
            self.render_modal(frame, area, modal);
        }
    }
}
