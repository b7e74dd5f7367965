//! Theme system for the TUI.
//!
//! Semantic color roles map to ratatui `Style` values. `ThemeVariant` picks
//! the Light or Dark palette, and `StyleMap` resolves role names to styles so
//! views never hardcode colors.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

/// Brand accent used for tabs, badges and focus borders.
const ACCENT: Color = Color::Indexed(62); // indigo

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeVariant {
    Dark,
    #[default]
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark ↔ Light.
    pub fn toggle(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }

    /// Navbar indicator glyph.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => "☾",
            Self::Light => "☀",
        }
    }
}

/// Every semantic UI role mapped to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    /// Applied to the whole frame before any widget draws.
    pub background: Style,

    // -- Navbar --
    pub brand: Style,
    pub tab_normal: Style,
    pub tab_active: Style,
    pub search_box: Style,
    pub search_box_active: Style,

    // -- Article list --
    pub section_title: Style,
    pub section_count: Style,
    pub card_title: Style,
    pub card_selected: Style,
    pub card_summary: Style,
    pub card_site: Style,
    pub card_date: Style,
    pub show_more: Style,
    pub spinner: Style,
    pub empty_notice: Style,

    // -- Sidebar --
    pub popular_title: Style,
    pub category_active: Style,
    pub newsletter_text: Style,

    // -- Reader --
    pub reader_title: Style,
    pub reader_body: Style,
    pub reader_metadata: Style,
    pub reader_link: Style,
    pub badge_launch: Style,
    pub badge_event: Style,
    pub badge_featured: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub status_error: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            background: Style::default().bg(Color::Black).fg(Color::Gray),

            brand: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            tab_normal: Style::default().fg(Color::Gray),
            tab_active: Style::default()
                .bg(ACCENT)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            search_box: Style::default().fg(Color::DarkGray),
            search_box_active: Style::default().fg(Color::White).bg(Color::DarkGray),

            section_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            section_count: Style::default().fg(Color::DarkGray),
            card_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            card_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            card_summary: Style::default().fg(Color::Gray),
            card_site: Style::default().fg(Color::LightBlue),
            card_date: Style::default().fg(Color::DarkGray),
            show_more: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            spinner: Style::default().fg(ACCENT),
            empty_notice: Style::default().fg(Color::DarkGray),

            popular_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            category_active: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            newsletter_text: Style::default().fg(Color::Gray),

            reader_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Gray),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_link: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            badge_launch: Style::default().bg(Color::Blue).fg(Color::White),
            badge_event: Style::default().bg(Color::Green).fg(Color::Black),
            badge_featured: Style::default().bg(Color::Yellow).fg(Color::Black),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().bg(Color::DarkGray).fg(Color::LightRed),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(ACCENT),
        }
    }

    fn light() -> Self {
        Self {
            background: Style::default().bg(Color::White).fg(Color::Black),

            brand: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            tab_normal: Style::default().fg(Color::DarkGray),
            tab_active: Style::default()
                .bg(ACCENT)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            search_box: Style::default().fg(Color::DarkGray),
            search_box_active: Style::default().fg(Color::Black).bg(Color::Gray),

            section_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            section_count: Style::default().fg(Color::DarkGray),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_selected: Style::default().bg(Color::Blue).fg(Color::White),
            card_summary: Style::default().fg(Color::DarkGray),
            card_site: Style::default().fg(Color::Blue),
            card_date: Style::default().fg(Color::DarkGray),
            show_more: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            spinner: Style::default().fg(ACCENT),
            empty_notice: Style::default().fg(Color::DarkGray),

            popular_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            category_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            newsletter_text: Style::default().fg(Color::DarkGray),

            reader_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            reader_body: Style::default().fg(Color::Black),
            reader_metadata: Style::default().fg(Color::DarkGray),
            reader_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            badge_launch: Style::default().bg(Color::LightBlue).fg(Color::Black),
            badge_event: Style::default().bg(Color::LightGreen).fg(Color::Black),
            badge_featured: Style::default().bg(Color::LightYellow).fg(Color::Black),

            status_bar: Style::default().bg(Color::Gray).fg(Color::Black),
            status_error: Style::default().bg(Color::Gray).fg(Color::Red),
            panel_border: Style::default().fg(Color::Gray),
            panel_border_focused: Style::default().fg(ACCENT),
        }
    }
}

/// String-keyed style lookup built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 30] = [
    "background",
    "brand",
    "tab_normal",
    "tab_active",
    "search_box",
    "search_box_active",
    "section_title",
    "section_count",
    "card_title",
    "card_selected",
    "card_summary",
    "card_site",
    "card_date",
    "show_more",
    "spinner",
    "empty_notice",
    "popular_title",
    "category_active",
    "newsletter_text",
    "reader_title",
    "reader_body",
    "reader_metadata",
    "reader_link",
    "badge_launch",
    "badge_event",
    "badge_featured",
    "status_bar",
    "status_error",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 30] = [
            p.background,
            p.brand,
            p.tab_normal,
            p.tab_active,
            p.search_box,
            p.search_box_active,
            p.section_title,
            p.section_count,
            p.card_title,
            p.card_selected,
            p.card_summary,
            p.card_site,
            p.card_date,
            p.show_more,
            p.spinner,
            p.empty_notice,
            p.popular_title,
            p.category_active,
            p.newsletter_text,
            p.reader_title,
            p.reader_body,
            p.reader_metadata,
            p.reader_link,
            p.badge_launch,
            p.badge_event,
            p.badge_featured,
            p.status_bar,
            p.status_error,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name. Unknown roles get `Style::default()`.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_variant_is_light() {
        assert_eq!(ThemeVariant::default(), ThemeVariant::Light);
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(ThemeVariant::Light.toggle(), ThemeVariant::Dark);
        assert_eq!(ThemeVariant::Dark.toggle().toggle(), ThemeVariant::Dark);
    }

    #[test]
    fn variant_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name(" Light "), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn palettes_differ_on_background_and_selection() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.background, light.background);
        assert_ne!(dark.card_selected, light.card_selected);
        assert_eq!(dark.tab_active, light.tab_active);
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.resolve("tab_active"), palette.tab_active);
        assert_eq!(sm.resolve("badge_featured"), palette.badge_featured);
        assert_eq!(sm.resolve("status_bar"), palette.status_bar);
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        let sm = StyleMap::from_palette(&ThemeVariant::Light.palette());
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }

    #[test]
    fn style_map_has_all_roles() {
        let sm = StyleMap::from_palette(&ThemeVariant::Light.palette());
        assert_eq!(sm.map.len(), ROLE_NAMES.len());
        for name in ROLE_NAMES {
            assert!(sm.map.contains_key(name), "Role '{name}' missing from StyleMap");
        }
    }
}
