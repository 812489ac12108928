use super::{Effect, Page, PageStatus};
use crate::api::{ActionRequest, FetchJob, ItemAction, PendingItem, Queue, Request, Response};
use crate::routes::{Intent, Route};
use chrono::{DateTime, NaiveDateTime};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::debug;

const HELP: &str = "c confirm | e edit | x cancel | d delete | o open | r reload";
const EDIT_HELP: &str = "Enter submit | Esc discard";

/// Review screen for one pending-draft queue.
pub struct ReviewPage {
    queue: Queue,
    items: Vec<PendingItem>,
    in_flight: usize,
    error: Option<String>,
    notice: Option<String>,
    fetch_complete: bool,
    running_job: Option<FetchJob>,
    queued_jobs: Vec<FetchJob>,
    list_state: ListState,
    editing: Option<EditState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EditState {
    tweet_id: String,
    buffer: String,
}

impl ReviewPage {
    pub fn new(queue: Queue) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            queue,
            items: Vec::new(),
            in_flight: 0,
            error: None,
            notice: None,
            fetch_complete: false,
            running_job: None,
            queued_jobs: Vec::new(),
            list_state,
            editing: None,
        }
    }

    pub fn queue(&self) -> Queue {
        self.queue
    }

    pub fn items(&self) -> &[PendingItem] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    fn view_intent(&self) -> Intent {
        match self.queue {
            Queue::Replies => Intent::ViewTweets,
            Queue::TopTweetReplies => Intent::ViewTargetTweets,
            Queue::Repurposed => Intent::ViewRepurposed,
        }
    }

    fn fetch_intent(&self) -> Option<Intent> {
        match self.queue {
            Queue::Replies => Some(Intent::FetchTweets),
            Queue::TopTweetReplies => Some(Intent::FetchTargetTweets),
            Queue::Repurposed => None,
        }
    }

    pub fn running_job(&self) -> Option<FetchJob> {
        self.running_job
    }

    fn start_job(&mut self, job: FetchJob) -> Effect {
        self.running_job = Some(job);
        self.begin(Request::RunJob(job))
    }

    fn empty_message(&self) -> &'static str {
        match self.queue {
            Queue::Replies => "No tweets with drafted replies found.",
            Queue::TopTweetReplies => "No target tweets with drafted replies found.",
            Queue::Repurposed => "No repurposed tweets found.",
        }
    }

    fn begin(&mut self, request: Request) -> Effect {
        self.in_flight += 1;
        Effect::Request(request)
    }

    fn finish(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn reload(&mut self) -> Effect {
        self.begin(Request::PendingItems(self.queue))
    }

    fn selected_item(&self) -> Option<&PendingItem> {
        self.items.get(self.list_state.selected()?)
    }

    fn clamp_selection(&mut self) {
        let last = self.items.len().saturating_sub(1);
        let selected = self.list_state.selected().unwrap_or(0).min(last);
        self.list_state.select(Some(selected));
    }

    /// Puts `tweet_id` into edit mode, discarding any other item's buffer.
    pub fn start_edit(&mut self, tweet_id: &str) -> bool {
        let Some(item) = self.items.iter().find(|item| item.tweet_id == tweet_id) else {
            return false;
        };
        self.editing = Some(EditState {
            tweet_id: item.tweet_id.clone(),
            buffer: item.draft.clone().unwrap_or_default(),
        });
        true
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_ref().map(|edit| edit.tweet_id.as_str())
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.editing.as_ref().map(|edit| edit.buffer.as_str())
    }

    /// Sends `action` for `tweet_id`. Ignored while a request is in flight.
    pub fn act(&mut self, tweet_id: &str, action: ItemAction) -> Vec<Effect> {
        if self.loading() {
            debug!(tweet_id, "ignoring action while a request is in flight");
            return Vec::new();
        }
        if !self.items.iter().any(|item| item.tweet_id == tweet_id) {
            return Vec::new();
        }
        if let ItemAction::Edit(text) = &action {
            if text.trim().is_empty() {
                self.error = Some("Edited text cannot be empty".to_string());
                return Vec::new();
            }
        }

        self.error = None;
        self.notice = None;
        let request = ActionRequest::new(tweet_id, &action);
        vec![self.begin(Request::ItemAction {
            queue: self.queue,
            request,
        })]
    }

    fn act_on_selected(&mut self, action: ItemAction) -> Vec<Effect> {
        match self.selected_item().map(|item| item.tweet_id.clone()) {
            Some(id) => self.act(&id, action),
            None => Vec::new(),
        }
    }

    pub fn submit_edit(&mut self) -> Vec<Effect> {
        let Some(edit) = self.editing.clone() else {
            return Vec::new();
        };
        self.act(&edit.tweet_id, ItemAction::Edit(edit.buffer))
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc => self.cancel_edit(),
            KeyCode::Enter => return self.submit_edit(),
            KeyCode::Backspace => {
                if let Some(edit) = self.editing.as_mut() {
                    edit.buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(edit) = self.editing.as_mut() {
                    edit.buffer.push(c);
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn scroll_up(&mut self) {
        if let Some(selected) = self.list_state.selected() {
            if selected > 0 {
                self.list_state.select(Some(selected - 1));
            }
        }
    }

    fn scroll_down(&mut self) {
        if let Some(selected) = self.list_state.selected() {
            if selected < self.items.len().saturating_sub(1) {
                self.list_state.select(Some(selected + 1));
            }
        }
    }

    fn item_lines(&self, item: &PendingItem, width: usize) -> Vec<Line<'static>> {
        let mut header = vec![Span::styled(
            format!("@{}", item.username.trim_start_matches('@')),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(keyword) = &item.keyword {
            header.push(Span::styled(
                format!("  #{keyword}"),
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(created_at) = &item.created_at {
            header.push(Span::styled(
                format!("  {}", format_created_at(created_at)),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let mut lines = vec![Line::from(header)];
        for chunk in textwrap::wrap(&item.text, width) {
            lines.push(Line::from(Span::styled(
                chunk.into_owned(),
                Style::default().fg(Color::White),
            )));
        }

        match &self.editing {
            Some(edit) if edit.tweet_id == item.tweet_id => {
                let text = format!("✎ {}█", edit.buffer);
                for chunk in textwrap::wrap(&text, width) {
                    lines.push(Line::from(Span::styled(
                        chunk.into_owned(),
                        Style::default().fg(Color::Yellow),
                    )));
                }
            }
            _ => {
                if let Some(draft) = &item.draft {
                    let text = format!("↳ {draft}");
                    for chunk in textwrap::wrap(&text, width) {
                        lines.push(Line::from(Span::styled(
                            chunk.into_owned(),
                            Style::default().fg(Color::Green),
                        )));
                    }
                }
            }
        }

        lines.push(Line::from(""));
        lines
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = if self.editing.is_some() {
            Line::from(Span::styled(EDIT_HELP, Style::default().fg(Color::DarkGray)))
        } else if let Some(error) = &self.error {
            Line::from(Span::styled(
                format!("Error: {error}"),
                Style::default().fg(Color::Red),
            ))
        } else if let Some(notice) = &self.notice {
            Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Green)))
        } else {
            Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray)))
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

impl Page for ReviewPage {
    fn route(&self) -> Route {
        match self.queue {
            Queue::Replies => Route::Replies,
            Queue::TopTweetReplies => Route::TargetTweets,
            Queue::Repurposed => Route::Repurposed,
        }
    }

    fn title(&self) -> &str {
        match self.queue {
            Queue::Replies => "Pending Replies",
            Queue::TopTweetReplies => "Target Tweet Replies",
            Queue::Repurposed => "Repurposed Tweets",
        }
    }

    fn mount(&mut self) -> Vec<Effect> {
        // The profile response goes to the shell, so it is not counted here.
        vec![self.reload(), Effect::Request(Request::ProfileImage)]
    }

    fn handle_intent(&mut self, intent: Intent) -> Option<Vec<Effect>> {
        if intent == self.view_intent() {
            if self.loading() {
                return Some(Vec::new());
            }
            return Some(vec![self.reload()]);
        }

        if Some(intent) != self.fetch_intent() {
            return None;
        }
        if self.loading() {
            return Some(Vec::new());
        }
        let Some((first, rest)) = FetchJob::refreshing(self.queue).split_first() else {
            return Some(Vec::new());
        };
        self.fetch_complete = false;
        self.error = None;
        self.notice = Some("Fetching new tweets...".to_string());
        self.queued_jobs = rest.to_vec();
        Some(vec![self.start_job(*first)])
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if self.editing.is_some() {
            return self.handle_edit_key(key);
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
            KeyCode::Char('c') => return self.act_on_selected(ItemAction::Confirm),
            KeyCode::Char('x') => return self.act_on_selected(ItemAction::Cancel),
            KeyCode::Char('d') => return self.act_on_selected(ItemAction::Delete),
            KeyCode::Char('e') => {
                if !self.loading() {
                    if let Some(id) = self.selected_item().map(|item| item.tweet_id.clone()) {
                        self.start_edit(&id);
                    }
                }
            }
            KeyCode::Char('o') => {
                if let Some(item) = self.selected_item() {
                    return vec![Effect::OpenUrl(tweet_url(item))];
                }
            }
            KeyCode::Char('r') => {
                if !self.loading() {
                    return vec![self.reload()];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn apply(&mut self, response: Response) -> Vec<Effect> {
        match response {
            Response::PendingItems { queue, result } if queue == self.queue => {
                self.finish();
                match result {
                    Ok(items) => {
                        self.items = items;
                        self.error = None;
                        let stale_edit = self
                            .editing_id()
                            .is_some_and(|id| !self.items.iter().any(|item| item.tweet_id == id));
                        if stale_edit {
                            self.editing = None;
                        }
                        self.clamp_selection();
                    }
                    Err(err) => self.error = Some(err.to_string()),
                }
            }
            Response::ItemAction {
                queue,
                tweet_id,
                result,
            } if queue == self.queue => {
                self.finish();
                match result {
                    Ok(response) => {
                        self.items.retain(|item| item.tweet_id != tweet_id);
                        if self.editing_id() == Some(tweet_id.as_str()) {
                            self.editing = None;
                        }
                        self.notice = Some(if response.message.is_empty() {
                            "Draft handled".to_string()
                        } else {
                            response.message
                        });
                        self.clamp_selection();
                    }
                    Err(err) => self.error = Some(err.to_string()),
                }
            }
            Response::JobFinished { job, result } if self.running_job == Some(job) => {
                self.finish();
                self.running_job = None;
                match result {
                    Ok(_) if !self.queued_jobs.is_empty() => {
                        let next = self.queued_jobs.remove(0);
                        debug!(?job, ?next, "fetch step done");
                        return vec![self.start_job(next)];
                    }
                    Ok(summary) => {
                        self.fetch_complete = true;
                        self.notice = Some(if summary.message.is_empty() {
                            format!("Processed {} accounts", summary.total_processed)
                        } else {
                            summary.message
                        });
                        return vec![self.reload()];
                    }
                    Err(err) => {
                        self.queued_jobs.clear();
                        self.notice = None;
                        self.error = Some(err.to_string());
                    }
                }
            }
            other => debug!(?other, "review page ignoring response"),
        }
        Vec::new()
    }

    fn status(&self) -> PageStatus {
        PageStatus {
            loading: self.loading(),
            fetch_complete: self.fetch_complete,
        }
    }

    fn captures_input(&self) -> bool {
        self.editing.is_some()
    }

    fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let block = Block::default()
            .title(format!(" {} ({}) ", self.title(), self.items.len()))
            .borders(Borders::ALL)
            .border_style(border_style);

        if self.loading() && self.items.is_empty() {
            let loading_text = List::new(vec![ListItem::new("Loading...")]).block(block);
            frame.render_widget(loading_text, chunks[0]);
        } else if self.items.is_empty() {
            let text = match &self.error {
                Some(error) => format!("Error: {error}"),
                None => self.empty_message().to_string(),
            };
            frame.render_widget(List::new(vec![ListItem::new(text)]).block(block), chunks[0]);
        } else {
            let width = chunks[0].width.saturating_sub(4).max(10) as usize;
            let rows: Vec<ListItem> = self
                .items
                .iter()
                .map(|item| ListItem::new(self.item_lines(item, width)))
                .collect();

            let list = List::new(rows)
                .block(block)
                .highlight_style(Style::default().bg(Color::DarkGray));

            let mut state = self.list_state.clone();
            frame.render_stateful_widget(list, chunks[0], &mut state);
        }

        self.render_status(frame, chunks[1]);
    }
}

fn tweet_url(item: &PendingItem) -> String {
    format!(
        "https://x.com/{}/status/{}",
        item.username.trim_start_matches('@'),
        item.tweet_id
    )
}

/// Formats backend timestamps (ISO or Twitter's legacy format) as `YYYY-MM-DD HH:MM`.
fn format_created_at(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M";
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%a %b %d %H:%M:%S %z %Y") {
        return dt.format(DISPLAY).to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, JobSummary, MessageResponse};
    use crate::pages::test_support::{key, render_rows, type_text};

    fn item(id: &str) -> PendingItem {
        PendingItem {
            tweet_id: id.to_string(),
            text: format!("tweet {id}"),
            draft: Some(format!("draft {id}")),
            username: "alice".to_string(),
            profile_image_url: None,
            keyword: None,
            created_at: None,
        }
    }

    fn loaded(queue: Queue, ids: &[&str]) -> ReviewPage {
        let mut page = ReviewPage::new(queue);
        page.mount();
        page.apply(Response::PendingItems {
            queue,
            result: Ok(ids.iter().map(|id| item(id)).collect()),
        });
        page
    }

    fn ok_action(queue: Queue, id: &str) -> Response {
        Response::ItemAction {
            queue,
            tweet_id: id.to_string(),
            result: Ok(MessageResponse::default()),
        }
    }

    #[test]
    fn test_mount_requests_list_and_profile() {
        let mut page = ReviewPage::new(Queue::Replies);
        let effects = page.mount();
        assert_eq!(
            effects,
            vec![
                Effect::Request(Request::PendingItems(Queue::Replies)),
                Effect::Request(Request::ProfileImage),
            ]
        );
        assert!(page.status().loading);
    }

    #[test]
    fn test_list_replaces_state_and_clears_loading() {
        let page = loaded(Queue::Replies, &["1", "2"]);
        assert_eq!(page.items().len(), 2);
        assert!(!page.status().loading);
        assert!(page.error().is_none());
    }

    #[test]
    fn test_failed_fetch_sets_error_and_clears_loading() {
        let mut page = ReviewPage::new(Queue::Repurposed);
        page.mount();
        page.apply(Response::PendingItems {
            queue: Queue::Repurposed,
            result: Err(ApiError::Network),
        });
        assert_eq!(page.error(), Some("Network error"));
        assert!(!page.loading());
    }

    #[test]
    fn test_successful_action_removes_only_matching_item() {
        let mut page = loaded(Queue::Replies, &["1", "2", "3"]);
        let effects = page.act("2", ItemAction::Confirm);
        assert_eq!(effects.len(), 1);
        assert!(page.loading());

        page.apply(ok_action(Queue::Replies, "2"));
        let ids: Vec<_> = page.items().iter().map(|i| i.tweet_id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert!(!page.loading());
    }

    #[test]
    fn test_failed_action_keeps_item() {
        let mut page = loaded(Queue::Replies, &["1"]);
        page.act("1", ItemAction::Cancel);
        page.apply(Response::ItemAction {
            queue: Queue::Replies,
            tweet_id: "1".to_string(),
            result: Err(ApiError::Server {
                status: 404,
                message: "No pending draft for this tweet_id".to_string(),
            }),
        });
        assert_eq!(page.items().len(), 1);
        assert_eq!(page.error(), Some("No pending draft for this tweet_id"));
        assert!(!page.loading());
    }

    #[test]
    fn test_actions_ignored_while_loading() {
        let mut page = loaded(Queue::Replies, &["1", "2"]);
        assert_eq!(page.act("1", ItemAction::Confirm).len(), 1);
        assert!(page.act("2", ItemAction::Confirm).is_empty());
        assert!(page.handle_intent(Intent::ViewTweets).unwrap().is_empty());
    }

    #[test]
    fn test_only_edit_sends_edited_text() {
        let mut page = loaded(Queue::Replies, &["1"]);
        page.start_edit("1");
        for c in "!".chars() {
            page.handle_key(key(KeyCode::Char(c)));
        }
        let effects = page.handle_key(key(KeyCode::Enter));
        let Effect::Request(Request::ItemAction { request, .. }) = &effects[0] else {
            panic!("expected an item action, got {effects:?}");
        };
        assert_eq!(request.action, "edit");
        assert_eq!(request.edited_text.as_deref(), Some("draft 1!"));

        let mut page = loaded(Queue::Replies, &["1"]);
        let effects = page.handle_key(key(KeyCode::Char('c')));
        let Effect::Request(Request::ItemAction { request, .. }) = &effects[0] else {
            panic!("expected an item action, got {effects:?}");
        };
        assert_eq!(request.action, "confirm");
        assert!(request.edited_text.is_none());
    }

    #[test]
    fn test_edit_is_exclusive() {
        let mut page = loaded(Queue::Replies, &["a", "b"]);
        assert!(page.start_edit("a"));
        for event in type_text(" changed") {
            page.handle_key(event);
        }
        assert_eq!(page.edit_buffer(), Some("draft a changed"));

        assert!(page.start_edit("b"));
        assert_eq!(page.editing_id(), Some("b"));
        assert_eq!(page.edit_buffer(), Some("draft b"));

        // a's buffer is gone for good
        page.start_edit("a");
        assert_eq!(page.edit_buffer(), Some("draft a"));
    }

    #[test]
    fn test_cancel_edit_makes_no_request() {
        let mut page = loaded(Queue::Replies, &["1"]);
        page.handle_key(key(KeyCode::Char('e')));
        assert!(page.captures_input());
        let effects = page.handle_key(key(KeyCode::Esc));
        assert!(effects.is_empty());
        assert!(page.editing_id().is_none());
        assert!(!page.loading());
    }

    #[test]
    fn test_blank_edit_is_refused_locally() {
        let mut page = loaded(Queue::Replies, &["1"]);
        assert!(page.act("1", ItemAction::Edit("   ".to_string())).is_empty());
        assert_eq!(page.error(), Some("Edited text cannot be empty"));
    }

    fn job_done(job: FetchJob) -> Response {
        Response::JobFinished {
            job,
            result: Ok(JobSummary::default()),
        }
    }

    #[test]
    fn test_fetch_intent_runs_jobs_in_order_then_reloads() {
        let mut page = loaded(Queue::Replies, &[]);
        let effects = page.handle_intent(Intent::FetchTweets).unwrap();
        assert_eq!(
            effects,
            vec![Effect::Request(Request::RunJob(FetchJob::TrackedAccounts))]
        );
        assert!(!page.status().fetch_complete);

        let effects = page.apply(job_done(FetchJob::TrackedAccounts));
        assert_eq!(
            effects,
            vec![Effect::Request(Request::RunJob(FetchJob::UserTweets))]
        );
        assert!(!page.status().fetch_complete);
        assert!(page.status().loading);

        let effects = page.apply(job_done(FetchJob::UserTweets));
        assert_eq!(
            effects,
            vec![Effect::Request(Request::PendingItems(Queue::Replies))]
        );
        assert!(page.status().fetch_complete);
        assert!(page.status().loading);
        assert!(page.running_job().is_none());
    }

    #[test]
    fn test_failed_step_stops_the_fetch() {
        let mut page = loaded(Queue::Replies, &[]);
        page.handle_intent(Intent::FetchTweets);
        let effects = page.apply(Response::JobFinished {
            job: FetchJob::TrackedAccounts,
            result: Err(ApiError::Server {
                status: 500,
                message: "RAPIDAPI_KEY environment variable missing".to_string(),
            }),
        });
        assert!(effects.is_empty());
        assert!(!page.status().fetch_complete);
        assert!(!page.loading());
        assert_eq!(page.error(), Some("RAPIDAPI_KEY environment variable missing"));
    }

    #[test]
    fn test_unrelated_job_result_is_ignored() {
        let mut page = loaded(Queue::TopTweetReplies, &[]);
        page.handle_intent(Intent::FetchTargetTweets);
        assert_eq!(page.running_job(), Some(FetchJob::TopTweets));

        assert!(page.apply(job_done(FetchJob::UserTweets)).is_empty());
        assert!(!page.status().fetch_complete);
        assert!(page.loading());

        let effects = page.apply(job_done(FetchJob::TopTweets));
        assert_eq!(
            effects,
            vec![Effect::Request(Request::PendingItems(Queue::TopTweetReplies))]
        );
        assert!(page.status().fetch_complete);
    }

    #[test]
    fn test_foreign_intents_are_unhandled() {
        let mut page = loaded(Queue::Repurposed, &[]);
        assert!(page.handle_intent(Intent::FetchTweets).is_none());
        assert!(page.handle_intent(Intent::ViewTargetTweets).is_none());
        assert!(page.handle_intent(Intent::ViewRepurposed).is_some());

        let mut page = loaded(Queue::TopTweetReplies, &[]);
        let effects = page.handle_intent(Intent::FetchTargetTweets).unwrap();
        assert_eq!(
            effects,
            vec![Effect::Request(Request::RunJob(FetchJob::TopTweets))]
        );
    }

    #[test]
    fn test_empty_replies_render_message_and_no_rows() {
        let page = loaded(Queue::Replies, &[]);
        let rows = render_rows(80, 12, |frame, area| page.render(frame, area, true));
        let screen = rows.join("\n");
        assert!(screen.contains("No tweets with drafted replies found."));
        assert!(!screen.contains('@'));
    }

    #[test]
    fn test_rows_render_author_text_and_draft() {
        let page = loaded(Queue::Replies, &["1"]);
        let rows = render_rows(80, 12, |frame, area| page.render(frame, area, true));
        let screen = rows.join("\n");
        assert!(screen.contains("@alice"));
        assert!(screen.contains("tweet 1"));
        assert!(screen.contains("draft 1"));
    }

    #[test]
    fn test_open_builds_status_url() {
        let mut page = loaded(Queue::Replies, &["99"]);
        let effects = page.handle_key(key(KeyCode::Char('o')));
        assert_eq!(
            effects,
            vec![Effect::OpenUrl("https://x.com/alice/status/99".to_string())]
        );
    }

    #[test]
    fn test_format_created_at() {
        assert_eq!(format_created_at("2024-05-01T12:30:00"), "2024-05-01 12:30");
        assert_eq!(format_created_at("2024-05-01T12:30:00.123456"), "2024-05-01 12:30");
        assert_eq!(
            format_created_at("Wed Oct 10 20:19:24 +0000 2018"),
            "2018-10-10 20:19"
        );
        assert_eq!(format_created_at("yesterday"), "yesterday");
    }
}
