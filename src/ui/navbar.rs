use crate::api::Category;
use crate::app::{App, InputMode};
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const BRAND: &str = "SpaceNews";
const SEARCH_WIDTH: u16 = 28;
const SEARCH_PLACEHOLDER: &str = "Search news...";

/// Render the navbar: brand, category tabs, search box and theme indicator.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(app.style("panel_border"));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(SEARCH_WIDTH),
            Constraint::Length(4),
        ])
        .split(inner);

    let mut spans = vec![Span::styled(format!(" {BRAND} "), app.style("brand"))];
    let active = app.feed.category();
    for category in Category::ALL {
        spans.push(Span::raw(" "));
        let style = if category == active {
            app.style("tab_active")
        } else {
            app.style("tab_normal")
        };
        spans.push(Span::styled(format!(" {} ", category.name()), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), columns[0]);

    let editing = app.input_mode == InputMode::Search;
    let text = if editing {
        format!(" {}_", app.search_input)
    } else if app.search_input.is_empty() {
        format!(" {SEARCH_PLACEHOLDER}")
    } else {
        format!(" {}", app.search_input)
    };
    let style = if editing {
        app.style("search_box_active")
    } else {
        app.style("search_box")
    };
    // Keep the tail visible while typing
    let width = columns[1].width.saturating_sub(1) as usize;
    let shown: String = if editing && text.chars().count() > width {
        let skip = text.chars().count() - width;
        text.chars().skip(skip).collect()
    } else {
        truncate_to_width(&text, width).into_owned()
    };
    f.render_widget(Paragraph::new(shown).style(style), columns[1]);

    f.render_widget(
        Paragraph::new(format!(" {}", app.theme_variant.icon())).style(app.style("brand")),
        columns[2],
    );
}
