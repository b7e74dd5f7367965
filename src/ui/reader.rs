use crate::api::Article;
use crate::app::{App, Focus, MAX_SCROLL};
use crate::util::{
    display_width, format_long_date, resolve_image, strip_control_chars, PLACEHOLDER_IMAGE,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the article detail view.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let Some(article) = app.feed.selected() else {
        let paragraph = Paragraph::new("No article selected")
            .block(Block::default().borders(Borders::ALL).title(" Article "));
        f.render_widget(paragraph, area);
        return;
    };

    let lines = article_lines(app, article);

    let inner_width = area.width.saturating_sub(2) as usize;
    app.reader_visible_lines = area.height.saturating_sub(2) as usize;
    app.reader_content_lines = wrapped_height(&lines, inner_width);
    // Clamp before drawing so a resize never shows an out-of-range frame
    app.clamp_reader_scroll();

    let border = if app.focus == Focus::Main {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };
    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" Article ")
                .title_bottom(Line::from(" SpaceNews ").right_aligned()),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset.min(MAX_SCROLL) as u16, 0));

    f.render_widget(paragraph, area);
}

/// The detail view body, top to bottom.
fn article_lines(app: &App, article: &Article) -> Vec<Line<'static>> {
    let site = strip_control_chars(&article.news_site).into_owned();
    let image = resolve_image(article.image_url.as_deref(), PLACEHOLDER_IMAGE);

    let mut lines = vec![
        Line::from(Span::styled(
            strip_control_chars(&article.title).into_owned(),
            app.style("reader_title"),
        )),
        Line::from(vec![
            Span::styled(site.clone(), app.style("card_site")),
            Span::styled(
                format!(" • {}", format_long_date(&article.published_at)),
                app.style("reader_metadata"),
            ),
        ]),
    ];

    let mut badges = Vec::new();
    if article.is_launch_related() {
        badges.push(Span::styled(" Launch Related ", app.style("badge_launch")));
    }
    if article.has_event_coverage() {
        if !badges.is_empty() {
            badges.push(Span::raw(" "));
        }
        badges.push(Span::styled(" Event Coverage ", app.style("badge_event")));
    }
    if article.featured {
        if !badges.is_empty() {
            badges.push(Span::raw(" "));
        }
        badges.push(Span::styled(" Featured ", app.style("badge_featured")));
    }
    if !badges.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(badges));
    }

    let image_label = if image.is_placeholder() {
        "Image (placeholder): "
    } else {
        "Image: "
    };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(image_label, app.style("reader_metadata")),
        Span::styled(image.as_str().to_string(), app.style("reader_metadata")),
    ]));

    lines.push(Line::from(""));
    for paragraph in strip_control_chars(&article.summary).lines() {
        lines.push(Line::from(Span::styled(
            paragraph.to_string(),
            app.style("reader_body"),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "About this source",
        app.style("section_title"),
    )));
    lines.push(Line::from(Span::styled(
        about_source(&site, article),
        app.style("reader_body"),
    )));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "For additional information and the complete article, visit the original source at:",
        app.style("reader_metadata"),
    )));
    lines.push(Line::from(Span::styled(
        strip_control_chars(&article.url).into_owned(),
        app.style("reader_link"),
    )));

    lines
}

/// The "About this source" paragraph.
fn about_source(site: &str, article: &Article) -> String {
    let mut text = format!(
        "This article was published by {site}, a source for space-related news and information."
    );
    if article.is_launch_related() {
        text.push_str(" This article mentions specific space launches or missions.");
    }
    if article.has_event_coverage() {
        text.push_str(" This article is related to specific space events.");
    }
    text
}

/// Rows the lines occupy once wrapped to `width` columns.
fn wrapped_height(lines: &[Line<'_>], width: usize) -> usize {
    if width == 0 {
        return lines.len();
    }
    lines
        .iter()
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| display_width(&s.content)).sum();
            w.div_ceil(width).max(1)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::article;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_about_source_plain() {
        let a = article(1, false);
        assert_eq!(
            about_source("NASA", &a),
            "This article was published by NASA, a source for space-related news and information."
        );
    }

    #[test]
    fn test_about_source_mentions_launches_and_events() {
        let mut a = article(1, false);
        a.launches = 2;
        a.events = 1;
        let text = about_source("SpaceNews", &a);
        assert!(text.ends_with(
            " This article mentions specific space launches or missions. \
             This article is related to specific space events."
        ));
    }

    #[test]
    fn test_wrapped_height_counts_wrapped_rows() {
        let lines = vec![
            Line::from("x".repeat(25)),
            Line::from(""),
            Line::from("short"),
        ];
        assert_eq!(wrapped_height(&lines, 10), 3 + 1 + 1);
    }
}
