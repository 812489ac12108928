use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    SignIn,
    Replies,
    TargetTweets,
    Repurposed,
    Settings,
}

impl Route {
    /// Routes reachable from the sidebar, in display order.
    pub const NAVIGATION: [Route; 4] = [
        Route::Replies,
        Route::TargetTweets,
        Route::Repurposed,
        Route::Settings,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::SignIn => "/sign-in",
            Route::Replies => "/replies",
            Route::TargetTweets => "/target-tweets",
            Route::Repurposed => "/repurposed",
            Route::Settings => "/settings",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        match path.trim_end_matches('/') {
            "/sign-in" => Some(Route::SignIn),
            "/replies" => Some(Route::Replies),
            "/target-tweets" => Some(Route::TargetTweets),
            "/repurposed" => Some(Route::Repurposed),
            "/settings" => Some(Route::Settings),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::SignIn => "Sign in",
            Route::Replies => "Replies",
            Route::TargetTweets => "Target Tweets",
            Route::Repurposed => "Repurposed",
            Route::Settings => "Settings",
        }
    }
}

/// A request from the shell for the mounted page to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    ViewTweets,
    FetchTweets,
    ViewTargetTweets,
    FetchTargetTweets,
    ViewRepurposed,
}

impl Intent {
    pub fn name(self) -> &'static str {
        match self {
            Intent::ViewTweets => "viewTweets",
            Intent::FetchTweets => "fetchTweets",
            Intent::ViewTargetTweets => "viewTargetTweets",
            Intent::FetchTargetTweets => "fetchTargetTweets",
            Intent::ViewRepurposed => "viewRepurposed",
        }
    }

    /// Whether the intent starts a backend scraping job rather than a reload.
    pub fn is_fetch(self) -> bool {
        matches!(self, Intent::FetchTweets | Intent::FetchTargetTweets)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A contextual button in the shell's action bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub id: &'static str,
    pub label: &'static str,
    pub intent: Intent,
}

const fn button(id: &'static str, label: &'static str, intent: Intent) -> ActionButton {
    ActionButton { id, label, intent }
}

const REPLIES_BUTTONS: [ActionButton; 2] = [
    button("view-tweets", "View Tweets", Intent::ViewTweets),
    button("fetch-tweets", "Fetch Tweets", Intent::FetchTweets),
];

const TARGET_BUTTONS: [ActionButton; 2] = [
    button("view-target-tweets", "View Target Tweets", Intent::ViewTargetTweets),
    button("fetch-target-tweets", "Fetch Target Tweets", Intent::FetchTargetTweets),
];

const REPURPOSED_BUTTONS: [ActionButton; 1] =
    [button("view-repurposed", "View Repurposed", Intent::ViewRepurposed)];

/// Buttons for a route path. Unknown paths get none.
pub fn action_buttons(path: &str) -> Vec<ActionButton> {
    match Route::from_path(path) {
        Some(Route::Replies) => REPLIES_BUTTONS.to_vec(),
        Some(Route::TargetTweets) => TARGET_BUTTONS.to_vec(),
        Some(Route::Repurposed) => REPURPOSED_BUTTONS.to_vec(),
        Some(Route::SignIn | Route::Settings) | None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for route in [
            Route::SignIn,
            Route::Replies,
            Route::TargetTweets,
            Route::Repurposed,
            Route::Settings,
        ] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/replies/"), Some(Route::Replies));
    }

    #[test]
    fn test_unknown_routes_have_no_buttons() {
        for path in ["", "/", "/dashboard", "/replies/extra", "replies", "/REPLIES"] {
            assert!(action_buttons(path).is_empty(), "{path}");
        }
        assert!(action_buttons("/settings").is_empty());
        assert!(action_buttons("/sign-in").is_empty());
    }

    #[test]
    fn test_review_routes_have_buttons() {
        let ids: Vec<_> = action_buttons("/replies").iter().map(|b| b.id).collect();
        assert_eq!(ids, ["view-tweets", "fetch-tweets"]);

        let intents: Vec<_> = action_buttons("/target-tweets")
            .iter()
            .map(|b| b.intent)
            .collect();
        assert_eq!(intents, [Intent::ViewTargetTweets, Intent::FetchTargetTweets]);

        let buttons = action_buttons("/repurposed");
        assert_eq!(buttons.len(), 1);
        assert_eq!(buttons[0].intent, Intent::ViewRepurposed);
    }

    #[test]
    fn test_intent_names() {
        assert_eq!(Intent::FetchTargetTweets.to_string(), "fetchTargetTweets");
        assert!(Intent::FetchTweets.is_fetch());
        assert!(!Intent::ViewRepurposed.is_fetch());
    }
}
