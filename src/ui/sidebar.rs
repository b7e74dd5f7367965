use crate::api::Category;
use crate::app::{App, Focus, InputMode};
use crate::util::{format_short_date, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

const NEWSLETTER_HEIGHT: u16 = 7;

/// Render the sidebar: Popular News, Categories (list view only) and the
/// newsletter box.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let popular_height = (app.popular_panel().len().max(1) as u16) * 2 + 2;
    let mut constraints = vec![Constraint::Length(popular_height)];
    if app.categories_visible() {
        constraints.push(Constraint::Length(Category::ALL.len() as u16 + 2));
    }
    constraints.push(Constraint::Length(NEWSLETTER_HEIGHT));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_popular(f, app, chunks[0]);
    if app.categories_visible() {
        render_categories(f, app, chunks[1]);
        render_newsletter(f, app, chunks[2]);
    } else {
        render_newsletter(f, app, chunks[1]);
    }
}

fn panel_block<'a>(app: &App, title: &'a str, focused: bool) -> Block<'a> {
    let border = if focused {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(title, app.style("popular_title")))
}

fn render_popular(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Popular;
    let block = panel_block(app, " Popular News ", focused);
    let popular = app.popular_panel();

    if popular.is_empty() {
        let notice = if app.feed.is_loading() {
            "Loading..."
        } else {
            "Nothing popular right now"
        };
        f.render_widget(
            Paragraph::new(notice)
                .style(app.style("empty_notice"))
                .block(block),
            area,
        );
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = popular
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let title_style = if focused && i == app.selected_popular {
                app.style("card_selected")
            } else {
                app.style("card_title")
            };
            let title = strip_control_chars(&article.title);
            let meta = format!(
                "{} • {}",
                strip_control_chars(&article.news_site),
                format_short_date(&article.published_at)
            );
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(
                    truncate_to_width(&title, width).into_owned(),
                    title_style,
                )),
                Line::from(Span::styled(
                    truncate_to_width(&meta, width).into_owned(),
                    app.style("card_date"),
                )),
            ]))
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_categories(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Categories;
    let active = app.feed.category();

    let items: Vec<ListItem> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let mut style = if *category == active {
                app.style("category_active")
            } else {
                Style::default()
            };
            if focused && i == app.selected_category {
                style = app.style("card_selected");
            }
            let marker = if *category == active { "›" } else { " " };
            ListItem::new(Line::from(Span::styled(
                format!("{marker} {}", category.name()),
                style,
            )))
        })
        .collect();

    f.render_widget(
        List::new(items).block(panel_block(app, " Categories ", focused)),
        area,
    );
}

fn render_newsletter(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.input_mode == InputMode::Newsletter;
    let input_style = if editing {
        app.style("search_box_active")
    } else {
        app.style("search_box")
    };
    let input = if editing {
        format!("{}_", app.newsletter_input)
    } else if app.newsletter_input.is_empty() {
        "Your email (n)".to_string()
    } else {
        app.newsletter_input.clone()
    };

    let text = Text::from(vec![
        Line::from(Span::styled(
            "Get the latest space news delivered to your inbox.",
            app.style("newsletter_text"),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" {input} "), input_style)),
        Line::from(Span::styled("[Subscribe]", app.style("show_more"))),
    ]);

    f.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(panel_block(app, " Stay Updated ", editing)),
        area,
    );
}
