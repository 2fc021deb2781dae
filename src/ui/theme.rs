//! Color theme

use ratatui::style::Color;

/// UI colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel
    pub panel_border: Color,
    pub panel_bg: Color,
    pub panel_title: Color,
    pub tab_active_bg: Color,
    pub tab_active_fg: Color,
    pub tab_inactive: Color,

    // Entry list
    pub entry_normal: Color,
    pub entry_active_marker: Color,
    pub cursor_bg: Color,
    pub cursor_fg: Color,
    pub list_message: Color,

    // Toolbar
    pub toolbar_fg: Color,
    pub toolbar_bg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Dialogs
    pub dialog_bg: Color,
    pub dialog_border: Color,
    pub dialog_text: Color,
    pub dialog_button_focused_bg: Color,
    pub dialog_button_focused_fg: Color,
    pub dialog_button_unfocused: Color,
    pub dialog_input_bg: Color,
    pub dialog_input_fg: Color,

    // Preview pane
    pub preview_fg: Color,
    pub preview_title: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            panel_border: Color::Cyan,
            panel_bg: Color::Blue,
            panel_title: Color::White,
            tab_active_bg: Color::Cyan,
            tab_active_fg: Color::Black,
            tab_inactive: Color::Gray,

            entry_normal: Color::White,
            entry_active_marker: Color::Yellow,
            cursor_bg: Color::Cyan,
            cursor_fg: Color::Black,
            list_message: Color::Gray,

            toolbar_fg: Color::Black,
            toolbar_bg: Color::Cyan,

            status_bg: Color::Cyan,
            status_fg: Color::Black,

            dialog_bg: Color::DarkGray,
            dialog_border: Color::White,
            dialog_text: Color::White,
            dialog_button_focused_bg: Color::Cyan,
            dialog_button_focused_fg: Color::Black,
            dialog_button_unfocused: Color::Gray,
            dialog_input_bg: Color::Black,
            dialog_input_fg: Color::White,

            preview_fg: Color::White,
            preview_title: Color::Cyan,
        }
    }
}
