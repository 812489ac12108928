use crate::api::{ApiClient, ApiError, ApiMessage, Dispatch, Request, Response};
use crate::config::UiConfig;
use crate::pages::{self, Effect, Page};
use crate::routes::{Intent, Route};
use crate::session::{Session, SessionStore};
use crate::shell::Shell;
use crate::ui;
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Which region of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Buttons,
    Page,
}

/// Common ancestor of the shell and the mounted page. Routes intents down,
/// status up, and runs every request the page asks for.
pub struct App {
    shell: Shell,
    page: Box<dyn Page>,
    focus: Focus,
    sidebar_index: usize,
    dispatcher: Arc<dyn Dispatch>,
    session: SessionStore,
    ui: UiConfig,
    tx: UnboundedSender<ApiMessage>,
    rx: UnboundedReceiver<ApiMessage>,
    generation: u64,
    should_quit: bool,
}

impl App {
    pub fn new(dispatcher: Arc<dyn Dispatch>, session: SessionStore, ui: UiConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            shell: Shell::new(),
            page: pages::build(Route::SignIn, &ui),
            focus: Focus::Page,
            sidebar_index: 0,
            dispatcher,
            session,
            ui,
            tx,
            rx,
            generation: 0,
            should_quit: false,
        }
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn page(&self) -> &dyn Page {
        self.page.as_ref()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn sidebar_index(&self) -> usize {
        self.sidebar_index
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Mounts the first page. Must run inside a tokio runtime.
    pub fn start(&mut self, route: Route) {
        self.navigate(route);
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut events = EventStream::new();
        let mut ticker = tokio::time::interval(self.ui.tick_rate());

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => self.on_key(key),
                    Some(Ok(_)) => {}
                    Some(Err(err)) => return Err(err.into()),
                    None => break,
                },
                _ = ticker.tick() => self.on_tick(Instant::now()),
                Some(message) = self.rx.recv() => self.on_message(message),
            }
        }

        Ok(())
    }

    fn on_tick(&mut self, now: Instant) {
        self.page.tick(now);
        self.shell.tick();
    }

    pub(crate) fn on_message(&mut self, message: ApiMessage) {
        if message.generation != self.generation {
            debug!(
                stale = message.generation,
                current = self.generation,
                "dropping response for an unmounted page"
            );
            return;
        }

        if let Response::ProfileImage(result) = message.response {
            match result {
                Ok(profile) => self.shell.set_profile(profile),
                Err(err) => warn!(error = %err, "could not load profile image"),
            }
            return;
        }

        let effects = self.page.apply(message.response);
        self.sync_status();
        self.run_effects(effects);
    }

    fn sync_status(&mut self) {
        self.shell.apply_status(self.page.status());
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Request(request) => self.spawn_request(request),
                Effect::Navigate(route) => self.navigate(route),
                Effect::SaveSession(user_id) => {
                    if let Err(err) = self.session.save(&Session::new(user_id)) {
                        warn!(error = %err, "could not persist session");
                    }
                }
                Effect::OpenUrl(url) => {
                    if let Err(err) = open::that(&url) {
                        warn!(%url, error = %err, "could not open browser");
                        self.shell.set_notice(format!("Could not open {url}"));
                    }
                }
            }
        }
    }

    fn spawn_request(&self, request: Request) {
        let dispatcher = Arc::clone(&self.dispatcher);
        let tx = self.tx.clone();
        let generation = self.generation;
        debug!(request = request.label(), generation, "dispatching");

        tokio::spawn(async move {
            let response = dispatcher.dispatch(request).await;
            // The receiver only goes away on shutdown.
            let _ = tx.send(ApiMessage {
                generation,
                response,
            });
        });
    }

    /// Mounts a fresh page for `route`; responses for the old page are dropped.
    pub fn navigate(&mut self, route: Route) {
        self.generation += 1;
        info!(path = route.path(), generation = self.generation, "navigate");

        self.page = pages::build(route, &self.ui);
        self.shell.set_route(route.path());
        if let Some(idx) = Route::NAVIGATION.iter().position(|r| *r == route) {
            self.sidebar_index = idx;
        }
        self.focus = if route == Route::SignIn || self.shell.buttons().is_empty() {
            Focus::Page
        } else {
            Focus::Buttons
        };

        let effects = self.page.mount();
        self.sync_status();
        self.run_effects(effects);
    }

    /// Hands `intent` to the mounted page. Unhandled intents are reported, not dropped.
    pub fn dispatch_intent(&mut self, intent: Intent) {
        match self.page.handle_intent(intent) {
            Some(effects) => {
                self.sync_status();
                self.run_effects(effects);
            }
            None => {
                warn!(
                    intent = intent.name(),
                    path = self.shell.path(),
                    "mounted page has no handler for intent"
                );
                self.shell.set_notice(format!("No handler for {intent}"));
            }
        }
    }

    fn sign_out(&mut self) {
        if let Err(err) = self.session.clear() {
            warn!(error = %err, "could not remove session file");
        }
        self.dispatcher.clear_session();
        self.shell.clear_profile();
        info!("signed out");
        self.navigate(Route::SignIn);
    }

    fn cycle_focus(&mut self, forward: bool) {
        let mut order = vec![Focus::Sidebar];
        if !self.shell.buttons().is_empty() {
            order.push(Focus::Buttons);
        }
        order.push(Focus::Page);

        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    self.should_quit = true;
                    return;
                }
                KeyCode::Char('o') if self.page.route() != Route::SignIn => {
                    self.sign_out();
                    return;
                }
                _ => {}
            }
        }

        if self.focus == Focus::Page && self.page.captures_input() {
            let effects = self.page.handle_key(key);
            self.sync_status();
            self.run_effects(effects);
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.cycle_focus(true);
                return;
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                return;
            }
            KeyCode::Char(c @ '1'..='4') => {
                let idx = (c as usize) - ('1' as usize);
                self.navigate(Route::NAVIGATION[idx]);
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Sidebar => self.on_sidebar_key(key),
            Focus::Buttons => self.on_buttons_key(key),
            Focus::Page => {
                let effects = self.page.handle_key(key);
                self.sync_status();
                self.run_effects(effects);
            }
        }
    }

    fn on_sidebar_key(&mut self, key: KeyEvent) {
        // One extra slot below the routes for "Sign out".
        let last = Route::NAVIGATION.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.sidebar_index = self.sidebar_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.sidebar_index = (self.sidebar_index + 1).min(last);
            }
            KeyCode::Enter => match Route::NAVIGATION.get(self.sidebar_index) {
                Some(route) => self.navigate(*route),
                None => self.sign_out(),
            },
            _ => {}
        }
    }

    fn on_buttons_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.shell.focus_prev_button(),
            KeyCode::Right | KeyCode::Char('l') => self.shell.focus_next_button(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(intent) = self.shell.click() {
                    self.dispatch_intent(intent);
                }
            }
            _ => {}
        }
    }
}

/// Picks the first route: restore a saved session if the backend still accepts it.
pub async fn initial_route(api: &ApiClient, session: &SessionStore) -> Route {
    let saved = match session.load() {
        Ok(saved) => saved,
        Err(err) => {
            warn!(error = %err, "ignoring unreadable session file");
            None
        }
    };
    let Some(saved) = saved else {
        return Route::SignIn;
    };

    api.set_session(&saved.user_id);
    match api.verify_auth().await {
        Ok(auth) if auth.authenticated => {
            info!(
                email = auth.user.as_ref().map(|user| user.email.as_str()),
                "restored session"
            );
            Route::Replies
        }
        Err(ApiError::Network) => {
            warn!("could not verify saved session, keeping it");
            Route::Replies
        }
        Ok(_) | Err(ApiError::Server { .. }) => {
            info!("saved session rejected by backend");
            if let Err(err) = session.clear() {
                warn!(error = %err, "could not remove session file");
            }
            api.clear_session();
            Route::SignIn
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{
        FetchJob, JobSummary, MessageResponse, PendingItem, ProfileImage, Queue, SignInResponse,
        UserSettings,
    };
    use crate::pages::test_support::key;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Default)]
    struct FakeDispatch {
        seen: Mutex<Vec<Request>>,
    }

    #[async_trait]
    impl Dispatch for FakeDispatch {
        async fn dispatch(&self, request: Request) -> Response {
            self.seen.lock().unwrap().push(request.clone());
            match request {
                Request::SignIn { .. } => Response::SignedIn(Err(ApiError::Network)),
                Request::ProfileImage => Response::ProfileImage(Ok(ProfileImage::default())),
                Request::PendingItems(queue) => Response::PendingItems {
                    queue,
                    result: Ok(Vec::new()),
                },
                Request::ItemAction { queue, request } => Response::ItemAction {
                    queue,
                    tweet_id: request.tweet_id,
                    result: Ok(MessageResponse::default()),
                },
                Request::RunJob(job) => Response::JobFinished {
                    job,
                    result: Ok(JobSummary::default()),
                },
                Request::Settings => Response::Settings(Ok(UserSettings::default())),
                Request::UpdateSettings(update) => Response::SettingsUpdated {
                    group: update.group(),
                    result: Ok(MessageResponse::default()),
                },
            }
        }
    }

    fn app(dir: &TempDir) -> (App, Arc<FakeDispatch>) {
        let dispatcher = Arc::new(FakeDispatch::default());
        let session = SessionStore::new(dir.path().join("session.json"));
        let app = App::new(dispatcher.clone(), session, UiConfig::default());
        (app, dispatcher)
    }

    fn message(app: &App, response: Response) -> ApiMessage {
        ApiMessage {
            generation: app.generation,
            response,
        }
    }

    fn items(queue: Queue, ids: &[&str]) -> Response {
        Response::PendingItems {
            queue,
            result: Ok(ids
                .iter()
                .map(|id| PendingItem {
                    tweet_id: id.to_string(),
                    text: "text".to_string(),
                    draft: None,
                    username: "alice".to_string(),
                    profile_image_url: None,
                    keyword: None,
                    created_at: None,
                })
                .collect()),
        }
    }

    /// Feeds channel messages back into the app until `done` holds.
    async fn pump_until(app: &mut App, done: impl Fn(&App) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while !done(&*app) {
                let message = app.rx.recv().await.expect("channel closed");
                app.on_message(message);
            }
        })
        .await
        .expect("app never reached the expected state");
    }

    #[tokio::test]
    async fn test_navigation_resets_fetch_complete() {
        let dir = TempDir::new().unwrap();
        let (mut app, _) = app(&dir);
        app.start(Route::TargetTweets);
        let loaded = message(&app, items(Queue::TopTweetReplies, &[]));
        app.on_message(loaded);

        app.dispatch_intent(Intent::FetchTargetTweets);
        let done = message(
            &app,
            Response::JobFinished {
                job: FetchJob::TopTweets,
                result: Ok(JobSummary::default()),
            },
        );
        app.on_message(done);
        assert!(app.shell().fetch_complete());

        app.navigate(Route::Settings);
        assert!(!app.shell().fetch_complete());
        app.navigate(Route::TargetTweets);
        assert!(!app.shell().fetch_complete());
    }

    #[tokio::test]
    async fn test_stale_responses_are_dropped() {
        let dir = TempDir::new().unwrap();
        let (mut app, _) = app(&dir);
        app.start(Route::Repurposed);
        let stale = message(&app, items(Queue::Repurposed, &["1"]));

        app.navigate(Route::Settings);
        app.navigate(Route::Repurposed);
        assert!(app.shell().loading());

        app.on_message(stale);
        assert!(app.page().status().loading);
        assert!(app.shell().loading());

        let fresh = message(&app, items(Queue::Repurposed, &["1"]));
        app.on_message(fresh);
        assert!(!app.page().status().loading);
        assert!(!app.shell().loading());
    }

    #[tokio::test]
    async fn test_unhandled_intent_is_reported() {
        let dir = TempDir::new().unwrap();
        let (mut app, _) = app(&dir);
        app.start(Route::Settings);
        app.dispatch_intent(Intent::FetchTweets);
        assert_eq!(app.shell().notice(), Some("No handler for fetchTweets"));
    }

    #[tokio::test]
    async fn test_button_click_runs_job_on_mounted_page() {
        let dir = TempDir::new().unwrap();
        let (mut app, dispatcher) = app(&dir);
        app.start(Route::Replies);
        pump_until(&mut app, |app| !app.page().status().loading).await;
        assert_eq!(app.focus(), Focus::Buttons);

        app.on_key(key(KeyCode::Right));
        app.on_key(key(KeyCode::Enter));
        assert!(app.shell().loading());

        pump_until(&mut app, |app| app.shell().fetch_complete()).await;

        let jobs: Vec<_> = dispatcher
            .seen
            .lock()
            .unwrap()
            .iter()
            .filter_map(|request| match request {
                Request::RunJob(job) => Some(*job),
                _ => None,
            })
            .collect();
        assert_eq!(jobs, [FetchJob::TrackedAccounts, FetchJob::UserTweets]);
    }

    #[tokio::test]
    async fn test_profile_response_goes_to_shell() {
        let dir = TempDir::new().unwrap();
        let (mut app, _) = app(&dir);
        app.start(Route::Replies);
        let profile = message(
            &app,
            Response::ProfileImage(Ok(ProfileImage {
                profile_image_url: Some("https://img.example/me.png".to_string()),
                username: Some("me".to_string()),
            })),
        );
        app.on_message(profile);
        assert_eq!(
            app.shell().profile().and_then(|p| p.username.as_deref()),
            Some("me")
        );
        assert!(app.page().status().loading);
    }

    #[tokio::test]
    async fn test_sign_in_saves_session_and_navigates() {
        let dir = TempDir::new().unwrap();
        let (mut app, _) = app(&dir);
        app.start(Route::SignIn);
        let signed_in = message(
            &app,
            Response::SignedIn(Ok(SignInResponse {
                message: String::new(),
                user_id: "665f".to_string(),
                user_type: None,
            })),
        );
        app.on_message(signed_in);

        assert_eq!(app.page().route(), Route::Replies);
        let saved = SessionStore::new(dir.path().join("session.json"))
            .load()
            .unwrap()
            .unwrap();
        assert_eq!(saved.user_id, "665f");
    }

    #[tokio::test]
    async fn test_sign_out_clears_session() {
        let dir = TempDir::new().unwrap();
        let (mut app, _) = app(&dir);
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&Session::new("665f")).unwrap();

        app.start(Route::Replies);
        app.on_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::CONTROL));

        assert_eq!(app.page().route(), Route::SignIn);
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_number_keys_navigate_and_quit() {
        let dir = TempDir::new().unwrap();
        let (mut app, _) = app(&dir);
        app.start(Route::Replies);
        app.on_key(key(KeyCode::Char('4')));
        assert_eq!(app.page().route(), Route::Settings);
        app.on_key(key(KeyCode::Char('2')));
        assert_eq!(app.page().route(), Route::TargetTweets);
        app.on_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }
}
