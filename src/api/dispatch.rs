//! Typed requests that pages hand to the app, and the responses that come back.
//!
//! Pages never talk to the network directly. They describe what they need as a
//! [`Request`]; the app runs it on a background task through a [`Dispatch`]
//! implementation and routes the matching [`Response`] back to the page that
//! was mounted when the request was issued.

use super::{
    ActionRequest, ApiClient, ApiError, FetchJob, JobSummary, MessageResponse, PendingItem,
    ProfileImage, Queue, SettingsGroup, SettingsUpdate, SignInResponse, UserSettings,
};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    SignIn { email: String, password: String },
    ProfileImage,
    PendingItems(Queue),
    ItemAction { queue: Queue, request: ActionRequest },
    RunJob(FetchJob),
    Settings,
    UpdateSettings(SettingsUpdate),
}

impl Request {
    /// Short name for logs. Never includes request bodies.
    pub fn label(&self) -> &'static str {
        match self {
            Request::SignIn { .. } => "sign-in",
            Request::ProfileImage => "profile-image",
            Request::PendingItems(_) => "pending-items",
            Request::ItemAction { .. } => "item-action",
            Request::RunJob(_) => "run-job",
            Request::Settings => "settings",
            Request::UpdateSettings(_) => "update-settings",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Response {
    SignedIn(Result<SignInResponse, ApiError>),
    ProfileImage(Result<ProfileImage, ApiError>),
    PendingItems {
        queue: Queue,
        result: Result<Vec<PendingItem>, ApiError>,
    },
    ItemAction {
        queue: Queue,
        tweet_id: String,
        result: Result<MessageResponse, ApiError>,
    },
    JobFinished {
        job: FetchJob,
        result: Result<JobSummary, ApiError>,
    },
    Settings(Result<UserSettings, ApiError>),
    SettingsUpdated {
        group: SettingsGroup,
        result: Result<MessageResponse, ApiError>,
    },
}

/// A response tagged with the mount generation that asked for it.
#[derive(Debug)]
pub struct ApiMessage {
    pub generation: u64,
    pub response: Response,
}

#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, request: Request) -> Response;

    /// Forgets the current session, if the implementation keeps one.
    fn clear_session(&self) {}
}

#[async_trait]
impl Dispatch for ApiClient {
    async fn dispatch(&self, request: Request) -> Response {
        match request {
            Request::SignIn { email, password } => {
                Response::SignedIn(self.sign_in(&email, &password).await)
            }
            Request::ProfileImage => Response::ProfileImage(self.profile_image().await),
            Request::PendingItems(queue) => Response::PendingItems {
                queue,
                result: self.pending_items(queue).await,
            },
            Request::ItemAction { queue, request } => {
                let result = self.submit_action(queue, &request).await;
                Response::ItemAction {
                    queue,
                    tweet_id: request.tweet_id,
                    result,
                }
            }
            Request::RunJob(job) => Response::JobFinished {
                job,
                result: self.run_job(job).await,
            },
            Request::Settings => Response::Settings(self.settings().await),
            Request::UpdateSettings(update) => Response::SettingsUpdated {
                group: update.group(),
                result: self.update_settings(&update).await,
            },
        }
    }

    fn clear_session(&self) {
        ApiClient::clear_session(self);
    }
}
