use crate::app::{App, InputMode};
use crate::keybindings::Context;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar: the current message, or key hints for the context.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let (text, style): (Cow<'_, str>, _) = match &app.status_message {
        Some((msg, _, true)) => (Cow::Borrowed(&**msg), app.style("status_error")),
        Some((msg, _, false)) => (Cow::Borrowed(&**msg), app.style("status_bar")),
        None => (Cow::Borrowed(hints(app)), app.style("status_bar")),
    };

    f.render_widget(Paragraph::new(format!(" {text}")).style(style), area);
}

fn hints(app: &App) -> &'static str {
    match app.input_mode {
        InputMode::Search => return "Type to search | ENTER search | ESC cancel",
        InputMode::Newsletter => return "Enter your email | ENTER subscribe | ESC cancel",
        InputMode::Normal => {}
    }
    match app.context() {
        Context::Reader => "[b]ack [j/k]scroll [Ctrl+d/u]page [o]pen [Tab]panel [?]help [q]uit",
        _ => "[1-8]category [/]search [m]ore [r]efresh [o]pen [t]heme [Tab]panel [?]help [q]uit",
    }
}
