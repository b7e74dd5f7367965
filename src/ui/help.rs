//! Help overlay: scrollable keybinding table.
//!
//! Shows the live bindings, including any overrides from config, grouped by
//! the context they apply in.

use crate::app::App;
use crate::keybindings::Context;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

use super::helpers::centered_rect;

/// Order of the sections on the help screen.
const CONTEXT_ORDER: [Context; 7] = [
    Context::Global,
    Context::List,
    Context::Popular,
    Context::Categories,
    Context::Reader,
    Context::Search,
    Context::Newsletter,
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let overlay = centered_rect(80, 80, area);
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let bindings = app.keybindings.help_rows();
    let mut rows: Vec<Row> = Vec::new();

    for ctx in CONTEXT_ORDER {
        let mut section = bindings.iter().filter(|(c, _, _)| *c == ctx).peekable();
        if section.peek().is_none() {
            continue;
        }

        rows.push(
            Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {} --", ctx.label()),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(app.style("section_title")),
        );

        for (_, keys, description) in section {
            rows.push(Row::new(vec![format!("  {keys}"), description.to_string()]));
        }

        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    rows.pop();

    let total_rows = rows.len();
    // -2 border, -2 header with its margin
    let visible_height = overlay.height.saturating_sub(4) as usize;
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(
            " Keybindings ({}/{}) ",
            scroll.saturating_add(1),
            max_scroll.saturating_add(1)
        )
    } else {
        " Keybindings (? to close) ".to_string()
    };

    let widths = [Constraint::Length(24), Constraint::Min(20)];

    let table = Table::new(visible_rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(app.style("background"));

    f.render_widget(table, overlay);

    if max_scroll > 0 && scroll < max_scroll {
        let hint = Line::from(vec![Span::styled(
            " j/k to scroll, ? or Esc to close ",
            app.style("reader_metadata"),
        )]);
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}
