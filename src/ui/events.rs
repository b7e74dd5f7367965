//! Application event handling.
//!
//! Applies background fetch results to the feed controller and reports the
//! outcome on the status line.

use crate::api::ErrorKind::{self, *};
use crate::app::{App, AppEvent};
use crate::feed::FetchOutcome;
use crate::util::{strip_control_chars, truncate_to_width};

/// Handle an event sent by a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::FetchCompleted { request, result } => {
            let error_text = result.as_ref().err().map(ToString::to_string);
            let outcome = app.feed.apply(&request, result);
            match outcome {
                FetchOutcome::Stale => return,
                FetchOutcome::Replaced { count } => {
                    app.fetch_handle = None;
                    if request.is_search() {
                        let query = strip_control_chars(app.feed.query().trim());
                        app.set_status(format!(
                            "{count} results for \"{}\"",
                            truncate_to_width(&query, 40)
                        ));
                    }
                }
                FetchOutcome::Failed { kind } => {
                    app.fetch_handle = None;
                    app.set_error_status(failure_message(kind, error_text.as_deref()));
                }
            }
            app.clamp_selections();
        }
        AppEvent::TaskPanicked {
            task,
            request,
            error,
        } => {
            tracing::error!(task, error = %error, "Background task panicked");
            if let Some(request) = request {
                if app.feed.abandon(&request, &error) == FetchOutcome::Stale {
                    return;
                }
                app.fetch_handle = None;
            }
            app.set_error_status(format!("Internal error in {task} task"));
        }
    }
}

fn failure_message(kind: ErrorKind, detail: Option<&str>) -> String {
    let prefix = match kind {
        FetchFailed => "Failed to load articles",
        MalformedResponse => "Unexpected response from news service",
    };
    match detail {
        Some(d) => format!("{prefix}: {}", strip_control_chars(d)),
        None => prefix.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Category};
    use crate::app::tests::{loaded_app, page};
    use pretty_assertions::assert_eq;

    fn status(app: &App) -> Option<(String, bool)> {
        app.status_message
            .as_ref()
            .map(|(m, _, is_error)| (m.to_string(), *is_error))
    }

    #[tokio::test]
    async fn test_fetch_completed_replaces_list() {
        let mut app = loaded_app(3);
        let request = app.change_category(Category::Science);
        handle_app_event(
            &mut app,
            AppEvent::FetchCompleted {
                request,
                result: Ok(page(12)),
            },
        );
        assert_eq!(app.feed.articles().len(), 12);
        assert!(!app.feed.is_loading());
        assert_eq!(app.row_count(), 10);
    }

    #[tokio::test]
    async fn test_search_completed_reports_count() {
        let mut app = loaded_app(3);
        let request = app.feed.search("mars");
        handle_app_event(
            &mut app,
            AppEvent::FetchCompleted {
                request,
                result: Ok(page(2)),
            },
        );
        assert_eq!(
            status(&app),
            Some(("2 results for \"mars\"".to_string(), false))
        );
    }

    #[tokio::test]
    async fn test_stale_completion_is_silent() {
        let mut app = loaded_app(3);
        let old = app.change_category(Category::Launches);
        let _latest = app.change_category(Category::Science);
        handle_app_event(
            &mut app,
            AppEvent::FetchCompleted {
                request: old,
                result: Ok(page(5)),
            },
        );
        assert!(app.feed.articles().is_empty());
        assert!(app.feed.is_loading());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_list_and_sets_error_status() {
        let mut app = loaded_app(4);
        let request = app.feed.refresh();
        handle_app_event(
            &mut app,
            AppEvent::FetchCompleted {
                request,
                result: Err(ApiError::HttpStatus(503)),
            },
        );
        assert_eq!(app.feed.articles().len(), 4);
        assert!(!app.feed.is_loading());
        let (msg, is_error) = status(&app).unwrap();
        assert!(is_error);
        assert!(msg.starts_with("Failed to load articles"), "{msg}");
    }

    #[tokio::test]
    async fn test_panicked_fetch_clears_loading() {
        let mut app = loaded_app(2);
        let request = app.feed.refresh();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "fetch",
                request: Some(request),
                error: "boom".to_string(),
            },
        );
        assert!(!app.feed.is_loading());
        assert_eq!(
            status(&app),
            Some(("Internal error in fetch task".to_string(), true))
        );
    }

    #[test]
    fn test_failure_message_by_kind() {
        assert_eq!(
            failure_message(MalformedResponse, None),
            "Unexpected response from news service"
        );
        assert_eq!(
            failure_message(FetchFailed, Some("HTTP 500")),
            "Failed to load articles: HTTP 500"
        );
    }
}
