pub mod review;
pub mod settings;
pub mod sign_in;

use crate::api::{Queue, Request, Response};
use crate::config::UiConfig;
use crate::routes::{Intent, Route};
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use std::time::Instant;

pub use review::ReviewPage;
pub use settings::SettingsPage;
pub use sign_in::SignInPage;

/// Side effects a page asks the app to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Request(Request),
    Navigate(Route),
    /// Persist the session cookie returned by sign-in.
    SaveSession(String),
    OpenUrl(String),
}

/// Loading and completion state a page reports to the shell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageStatus {
    pub loading: bool,
    pub fetch_complete: bool,
}

pub trait Page: Send {
    fn route(&self) -> Route;

    fn title(&self) -> &str;

    /// Called once when the page becomes the mounted page.
    fn mount(&mut self) -> Vec<Effect>;

    /// Returns `None` when the page has no handler for `intent`.
    fn handle_intent(&mut self, _intent: Intent) -> Option<Vec<Effect>> {
        None
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect>;

    fn apply(&mut self, response: Response) -> Vec<Effect>;

    fn status(&self) -> PageStatus;

    fn tick(&mut self, _now: Instant) {}

    /// True while a text field owns the keyboard, so global shortcuts stay off.
    fn captures_input(&self) -> bool {
        false
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool);
}

/// Builds a fresh page for `route`.
pub fn build(route: Route, ui: &UiConfig) -> Box<dyn Page> {
    match route {
        Route::SignIn => Box::new(SignInPage::new()),
        Route::Replies => Box::new(ReviewPage::new(Queue::Replies)),
        Route::TargetTweets => Box::new(ReviewPage::new(Queue::TopTweetReplies)),
        Route::Repurposed => Box::new(ReviewPage::new(Queue::Repurposed)),
        Route::Settings => Box::new(SettingsPage::new(ui.message_clear())),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

    pub fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    pub fn type_text(text: &str) -> Vec<KeyEvent> {
        text.chars().map(|c| key(KeyCode::Char(c))).collect()
    }

    /// Renders with `draw` into an off-screen buffer and returns its rows.
    pub fn render_rows(
        width: u16,
        height: u16,
        draw: impl FnOnce(&mut ratatui::Frame, Rect),
    ) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                draw(frame, area);
            })
            .unwrap();
        buffer_rows(terminal.backend().buffer())
    }

    pub fn buffer_rows(buffer: &Buffer) -> Vec<String> {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect()
    }
}
