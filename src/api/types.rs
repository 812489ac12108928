use serde::{Deserialize, Serialize};

/// One of the backend's pending-draft queues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Queue {
    /// Drafted replies to tweets from tracked accounts.
    Replies,
    /// Drafted replies to keyword top tweets.
    TopTweetReplies,
    /// Repurposed drafts of keyword top tweets.
    Repurposed,
}

impl Queue {
    pub fn list_path(self) -> &'static str {
        match self {
            Queue::Replies => "/fetch_pending_replies",
            Queue::TopTweetReplies => "/fetch_pending_replies_toptweets",
            Queue::Repurposed => "/fetch_pending_repurposed_tweets",
        }
    }

    pub fn action_path(self) -> &'static str {
        match self {
            Queue::Replies => "/handle_reply_action",
            Queue::TopTweetReplies => "/handle_reply_action_toptweets",
            Queue::Repurposed => "/handle_repurpose_action_toptweets",
        }
    }
}

/// Backend jobs that scrape and draft new items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchJob {
    /// Resolves the configured target handles into tracked accounts.
    TrackedAccounts,
    /// Drafts replies to recent tweets from tracked accounts.
    UserTweets,
    /// Searches the user's keywords and drafts replies to the top results.
    TopTweets,
}

impl FetchJob {
    pub fn path(self) -> &'static str {
        match self {
            FetchJob::TrackedAccounts => "/scrape_tracked_accounts",
            FetchJob::UserTweets => "/scrape_user_tweets",
            FetchJob::TopTweets => "/scrape_top_tweets",
        }
    }

    /// The jobs that refill `queue`, in the order they must run.
    pub fn refreshing(queue: Queue) -> &'static [FetchJob] {
        match queue {
            Queue::Replies => &[FetchJob::TrackedAccounts, FetchJob::UserTweets],
            Queue::TopTweetReplies => &[FetchJob::TopTweets],
            Queue::Repurposed => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
    #[serde(default)]
    pub message: String,
    pub user_id: String,
    #[serde(default)]
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyAuthResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub twitter_username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileImage {
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// A tweet awaiting a confirm/edit/cancel decision.
///
/// The three queues name their fields slightly differently; aliases fold them
/// into one shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PendingItem {
    pub tweet_id: String,
    #[serde(alias = "original_text")]
    pub text: String,
    #[serde(rename = "draft_reply", alias = "draft_post", default)]
    pub draft: Option<String>,
    pub username: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PendingRepliesResponse {
    #[serde(default)]
    pub pending_replies: Vec<PendingItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PendingRepurposedResponse {
    #[serde(default)]
    pub pending_repurposed: Vec<PendingItem>,
}

/// Reviewer decision on a pending item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAction {
    Confirm,
    Edit(String),
    Cancel,
    /// Dismiss without opening the item. The backend has no separate delete,
    /// so this travels as `cancel`.
    Delete,
}

impl ItemAction {
    pub fn wire_name(&self) -> &'static str {
        match self {
            ItemAction::Confirm => "confirm",
            ItemAction::Edit(_) => "edit",
            ItemAction::Cancel | ItemAction::Delete => "cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRequest {
    pub tweet_id: String,
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_text: Option<String>,
}

impl ActionRequest {
    pub fn new(tweet_id: impl Into<String>, action: &ItemAction) -> Self {
        let edited_text = match action {
            ItemAction::Edit(text) => Some(text.trim().to_string()),
            _ => None,
        };
        Self {
            tweet_id: tweet_id.into(),
            action: action.wire_name(),
            edited_text,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSummary {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub total_processed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub twitter_username: String,
    #[serde(default)]
    pub search_keywords: Vec<String>,
    #[serde(default)]
    pub target_accounts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TwitterCredentials {
    pub twitter_username: String,
    pub twitter_client_id: String,
    pub twitter_client_secret: String,
    pub twitter_access_token: String,
    pub twitter_access_token_secret: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsGroup {
    Credentials,
    TargetAccounts,
    Keywords,
}

impl SettingsGroup {
    pub const ALL: [SettingsGroup; 3] = [
        SettingsGroup::Credentials,
        SettingsGroup::TargetAccounts,
        SettingsGroup::Keywords,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsGroup::Credentials => "Twitter credentials",
            SettingsGroup::TargetAccounts => "Target accounts",
            SettingsGroup::Keywords => "Keywords",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            SettingsGroup::Credentials => "/update_twitter_credentials",
            SettingsGroup::TargetAccounts => "/update_target_accounts",
            SettingsGroup::Keywords => "/update_keywords",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsUpdate {
    Credentials(TwitterCredentials),
    TargetAccounts(Vec<String>),
    Keywords(Vec<String>),
}

impl SettingsUpdate {
    pub fn group(&self) -> SettingsGroup {
        match self {
            SettingsUpdate::Credentials(_) => SettingsGroup::Credentials,
            SettingsUpdate::TargetAccounts(_) => SettingsGroup::TargetAccounts,
            SettingsUpdate::Keywords(_) => SettingsGroup::Keywords,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TargetAccountsBody<'a> {
    pub target_accounts: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct KeywordsBody<'a> {
    pub keywords: &'a [String],
}
