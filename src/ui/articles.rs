use crate::app::{App, Focus};
use crate::util::{
    format_short_date, resolve_image, strip_control_chars, truncate_to_width,
    THUMBNAIL_PLACEHOLDER,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::loop_runner::SPINNER_FRAMES;

const SPINNER: [&str; SPINNER_FRAMES] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Height of the "More" section including borders, per item.
const MORE_ITEM_HEIGHT: u16 = 2;

/// Render the article list: the "Latest" cards and the "More" slice below.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let more = app.feed.more_articles();
    let show_more_section = !app.feed.is_loading() && !more.is_empty();
    let more_height = if show_more_section {
        (more.len() as u16).saturating_mul(MORE_ITEM_HEIGHT) + 2
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(more_height)])
        .split(area);

    render_latest(f, app, chunks[0]);
    if show_more_section {
        render_more(f, app, chunks[1]);
    }
}

fn border_style(app: &App) -> ratatui::style::Style {
    if app.focus == Focus::Main {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    }
}

fn render_latest(f: &mut Frame, app: &App, area: Rect) {
    let category = app.feed.category().name();
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app))
        .title(Span::styled(
            format!(" Latest {category} "),
            app.style("section_title"),
        ));

    if app.feed.is_loading() {
        let frame = SPINNER[app.spinner_frame % SPINNER_FRAMES];
        let inner_height = area.height.saturating_sub(2);
        let pad = "\n".repeat((inner_height / 2) as usize);
        let paragraph = Paragraph::new(format!("{pad}{frame} Loading..."))
            .alignment(Alignment::Center)
            .style(app.style("spinner"))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    block = block.title(
        Line::from(Span::styled(
            format!(" {} articles found ", app.feed.articles().len()),
            app.style("section_count"),
        ))
        .right_aligned(),
    );
    if app.feed.can_show_more() {
        block = block.title_bottom(
            Line::from(Span::styled(" Show more articles (m) ", app.style("show_more")))
                .centered(),
        );
    }

    let visible = app.feed.visible_articles();
    if visible.is_empty() {
        let paragraph = Paragraph::new("No articles found")
            .alignment(Alignment::Center)
            .style(app.style("empty_notice"))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let text_width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let selected = i == app.selected_row && app.focus == Focus::Main;
            let title_style = if selected {
                app.style("card_selected")
            } else {
                app.style("card_title")
            };
            let title = strip_control_chars(&article.title);
            let summary = strip_control_chars(&article.summary);
            let site = strip_control_chars(&article.news_site);

            let mut meta = vec![
                Span::styled(site.into_owned(), app.style("card_site")),
                Span::styled(
                    format!(" • {}", format_short_date(&article.published_at)),
                    app.style("card_date"),
                ),
            ];
            if article.featured {
                meta.push(Span::raw(" "));
                meta.push(Span::styled(" Featured ", app.style("badge_featured")));
            }

            ListItem::new(Text::from(vec![
                Line::from(meta),
                Line::from(Span::styled(
                    truncate_to_width(&title, text_width).into_owned(),
                    title_style,
                )),
                Line::from(Span::styled(
                    truncate_to_width(&summary, text_width).into_owned(),
                    app.style("card_summary"),
                )),
                Line::from(""),
            ]))
        })
        .collect();

    let selected = (app.selected_row < visible.len()).then_some(app.selected_row);
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn render_more(f: &mut Frame, app: &App, area: Rect) {
    let offset = app.feed.visible_articles().len();
    let text_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = app
        .feed
        .more_articles()
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let selected = offset + i == app.selected_row && app.focus == Focus::Main;
            let style = if selected {
                app.style("card_selected")
            } else {
                app.style("card_title")
            };
            let thumb = resolve_image(article.image_url.as_deref(), THUMBNAIL_PLACEHOLDER);
            let title = strip_control_chars(&article.title);
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(
                    truncate_to_width(&title, text_width).into_owned(),
                    style,
                )),
                Line::from(vec![
                    Span::styled(
                        format_short_date(&article.published_at),
                        app.style("card_date"),
                    ),
                    Span::styled(
                        format!("  [img] {}", truncate_to_width(thumb.as_str(), text_width / 2)),
                        app.style("card_site"),
                    ),
                ]),
            ]))
        })
        .collect();

    let category = app.feed.category().name();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app))
        .title(Span::styled(
            format!(" More {category} "),
            app.style("section_title"),
        ));
    f.render_widget(List::new(items).block(block), area);
}
