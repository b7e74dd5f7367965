//! Render functions for the TUI.
//!
//! Layout: navbar on top, the main column (list or article view) next to the
//! sidebar, and a one-line status bar at the bottom.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::{Block, Paragraph},
    Frame,
};

use super::{articles, help, navbar, reader, sidebar, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Height of the navbar including its border.
const NAVBAR_HEIGHT: u16 = 3;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    f.render_widget(Block::default().style(app.style("background")), area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(NAVBAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    navbar::render(f, app, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(rows[1]);

    if app.in_reader() {
        reader::render(f, app, columns[0]);
    } else {
        articles::render(f, app, columns[0]);
    }
    sidebar::render(f, app, columns[1]);
    status::render(f, app, rows[2]);

    if app.show_help {
        help::render(f, app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Category;
    use crate::app::tests::loaded_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_too_small_terminal_shows_notice() {
        let mut app = loaded_app(3);
        let screen = draw(&mut app, 40, 8);
        assert!(screen.contains("Terminal too small"));
    }

    #[tokio::test]
    async fn test_list_view_renders_sections() {
        let mut app = loaded_app(12);
        let screen = draw(&mut app, 140, 50);
        assert!(screen.contains("SpaceNews"));
        assert!(screen.contains("Latest Articles"));
        assert!(screen.contains("12 articles found"));
        assert!(screen.contains("Popular News"));
        assert!(screen.contains("Stay Updated"));
    }

    #[tokio::test]
    async fn test_category_fetch_in_flight_shows_only_loading() {
        let mut app = loaded_app(12);
        let screen = draw(&mut app, 140, 50);
        assert!(screen.contains("Article 11"));
        assert!(screen.contains("More Articles"));

        app.change_category(Category::Science);
        let screen = draw(&mut app, 140, 50);
        assert!(screen.contains("Latest Science"));
        assert!(screen.contains("Loading..."));
        assert!(!screen.contains("Article "));
        assert!(!screen.contains("articles found"));
        assert!(!screen.contains("More Science"));
    }

    #[tokio::test]
    async fn test_search_in_flight_hides_previous_cards() {
        let mut app = loaded_app(12);
        let _request = app.feed.search("apollo");
        let screen = draw(&mut app, 140, 50);
        assert!(screen.contains("Loading..."));
        // 11 is not featured, so it only ever appears as a list card
        assert!(!screen.contains("Article 11"));
        assert!(!screen.contains("articles found"));
        assert!(!screen.contains("More Articles"));

        app.activate();
        assert!(!app.in_reader());
    }

    #[tokio::test]
    async fn test_reader_hides_categories_panel() {
        let mut app = loaded_app(3);
        let screen = draw(&mut app, 140, 50);
        assert!(screen.contains("Categories"));

        app.activate();
        let screen = draw(&mut app, 140, 50);
        assert!(screen.contains("About this source"));
        assert!(!screen.contains("Categories"));
    }

    #[tokio::test]
    async fn test_help_overlay_lists_bindings() {
        let mut app = loaded_app(1);
        app.show_help = true;
        let screen = draw(&mut app, 140, 50);
        assert!(screen.contains("Keybindings"));
        assert!(screen.contains("Quit application"));
    }
}
