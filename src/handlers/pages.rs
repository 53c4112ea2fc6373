//! Static control pages (`/abn_page`, `/audio_recorder`).
//!
//! The documents are fixed apart from two placeholders: `{{route_prefix}}`,
//! so the embedded scripts reach sibling routes wherever they are mounted,
//! and `{{year}}` in the recorder footer.

use axum::{extract::State, response::Html};
use chrono::{Datelike, Local};

use crate::http::server::AppState;
use crate::identity::Principal;

const INSIGHTS_PAGE: &str = include_str!("templates/abn_page.html");
const RECORDER_PAGE: &str = include_str!("templates/audio_recorder.html");

/// Page bodies with the route prefix already substituted.
#[derive(Debug, Clone)]
pub struct Pages {
    insights: String,
    recorder: String,
}

impl Pages {
    pub fn new(route_prefix: &str) -> Self {
        Self {
            insights: INSIGHTS_PAGE.replace("{{route_prefix}}", route_prefix),
            recorder: RECORDER_PAGE.replace("{{route_prefix}}", route_prefix),
        }
    }

    pub fn insights(&self) -> &str {
        &self.insights
    }

    pub fn recorder(&self, year: i32) -> String {
        self.recorder.replace("{{year}}", &year.to_string())
    }
}

pub async fn insights_page(State(state): State<AppState>) -> Html<String> {
    tracing::info!("Processing request for insights page");
    Html(state.pages.insights().to_owned())
}

pub async fn audio_recorder(
    State(state): State<AppState>,
    Principal(claim): Principal,
) -> Html<String> {
    tracing::info!(user = claim.display_name(), "Processing request for audio recorder page");
    Html(state.pages.recorder(Local::now().year()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_substituted() {
        let pages = Pages::new("/functions");
        assert!(pages.insights().contains("fetch(\"/functions/abn_insights\")"));
        assert!(!pages.insights().contains("{{"));

        let recorder = pages.recorder(2031);
        assert!(recorder.contains("action=\"/functions/upload_audio\""));
        assert!(recorder.contains("&copy; 2031"));
        assert!(!recorder.contains("{{"));
    }

    #[test]
    fn test_empty_prefix() {
        let pages = Pages::new("");
        assert!(pages.insights().contains("fetch(\"/abn_insights\")"));
    }
}
