//! Shared helpers for the UI layer: panic-safe background fetches and
//! layout utilities.

use crate::app::{App, AppEvent};
use crate::feed::FetchRequest;
use futures::FutureExt;
use ratatui::layout::Rect;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Run a future, turning a panic into `Err(message)`.
///
/// Spawned tasks use this so a panic surfaces as an `AppEvent::TaskPanicked`
/// instead of silently dropping the result.
///
/// ```ignore
/// match catch_task_panic(api.fetch(category, None)).await {
///     Ok(result) => send_result(result),
///     Err(panic_msg) => tracing::error!(error = %panic_msg, "Task panicked"),
/// }
/// ```
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future).catch_unwind().await.map_err(|panic| {
        if let Some(s) = panic.downcast_ref::<&'static str>() {
            s.to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else if let Some(e) = panic.downcast_ref::<Box<dyn std::error::Error + Send>>() {
            e.to_string()
        } else {
            format!("Unknown panic: {:?}", (*panic).type_id())
        }
    })
}

/// Spawn the fetch for `request`, replacing any fetch still in flight.
///
/// The superseded task is aborted; even if it slips through, the controller
/// discards its response by sequence number.
pub(super) fn spawn_fetch(app: &mut App, request: FetchRequest, tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.fetch_handle.take() {
        handle.abort();
        tracing::debug!("Aborted superseded fetch task");
    }

    let api = app.api.clone();
    let tx = tx.clone();

    tracing::debug!(
        seq = request.seq,
        category = %request.category,
        query = ?request.query,
        "Spawning fetch task"
    );

    app.fetch_handle = Some(tokio::spawn(async move {
        let fetch = api.fetch(request.category, request.query.as_deref());
        let event = match catch_task_panic(fetch).await {
            Ok(result) => AppEvent::FetchCompleted { request, result },
            Err(panic_msg) => {
                tracing::error!(task = "fetch", seq = request.seq, error = %panic_msg, "Background task panicked");
                AppEvent::TaskPanicked {
                    task: "fetch",
                    request: Some(request),
                    error: panic_msg,
                }
            }
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, event = "FetchCompleted", "Channel send failed (receiver dropped)");
        }
    }));
}

/// A rectangle of `percent_x` by `percent_y` centered in `area`.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = scale(area.width, percent_x);
    let height = scale(area.height, percent_y);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// `len * percent / 100` in u32, so wide terminals cannot overflow.
fn scale(len: u16, percent: u16) -> u16 {
    (u32::from(len) * u32::from(percent.min(100)) / 100) as u16
}
