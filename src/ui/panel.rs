//! Floating storage panel widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::state::Session;
use crate::state::panel::Viewport;

use super::Theme;
use super::layout::{PanelRegions, panel_regions, scroll_offset};

/// Renders the floating panel from the session state. All regions are
/// recomputed from the shared layout, matching mouse hit-testing exactly.
pub struct PanelWidget<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> PanelWidget<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    fn fill(buf: &mut Buffer, area: Rect, style: Style) {
        for row in area.y..area.bottom() {
            for col in area.x..area.right() {
                buf[(col, row)].set_char(' ').set_style(style);
            }
        }
    }

    fn draw_frame(&self, buf: &mut Buffer, regions: &PanelRegions) {
        let theme = self.theme;
        let panel = regions.panel;
        let border = Style::default().fg(theme.panel_border).bg(theme.panel_bg);

        Self::fill(buf, panel, Style::default().bg(theme.panel_bg));

        // Border box
        for col in panel.x..panel.right() {
            buf[(col, panel.y)].set_char('─').set_style(border);
            buf[(col, panel.bottom() - 1)].set_char('─').set_style(border);
        }
        for row in panel.y..panel.bottom() {
            buf[(panel.x, row)].set_char('│').set_style(border);
            buf[(panel.right() - 1, row)].set_char('│').set_style(border);
        }
        buf[(panel.x, panel.y)].set_char('┌').set_style(border);
        buf[(panel.right() - 1, panel.y)].set_char('┐').set_style(border);
        buf[(panel.x, panel.bottom() - 1)].set_char('└').set_style(border);
        buf[(panel.right() - 1, panel.bottom() - 1)].set_char('┘').set_style(border);

        // Title in the drag area, highlighted while a drag is active
        let title = " Documents ";
        let mut title_style = Style::default()
            .fg(theme.panel_title)
            .bg(theme.panel_bg)
            .add_modifier(Modifier::BOLD);
        if self.session.panel.dragging() {
            title_style = title_style.add_modifier(Modifier::REVERSED);
        }
        buf.set_stringn(panel.x + 2, panel.y, title, regions.header.width as usize, title_style);

        // Window buttons
        let button_style = Style::default().fg(theme.panel_title).bg(theme.panel_bg);
        let collapse_label = if self.session.panel.collapsed { "[+]" } else { "[-]" };
        buf.set_string(regions.collapse.x, regions.collapse.y, collapse_label, button_style);
        buf.set_string(regions.close.x, regions.close.y, "[x]", button_style);
    }

    fn draw_tabs(&self, buf: &mut Buffer, regions: &PanelRegions) {
        let theme = self.theme;
        for (kind, rect) in &regions.tabs {
            let active = *kind == self.session.panel.active_tab;
            let style = if active {
                Style::default().fg(theme.tab_active_fg).bg(theme.tab_active_bg)
            } else {
                Style::default().fg(theme.tab_inactive).bg(theme.panel_bg)
            };
            buf.set_string(rect.x, rect.y, format!(" {} ", kind.label()), style);
        }
    }

    fn draw_toolbar(&self, buf: &mut Buffer, regions: &PanelRegions) {
        let style = Style::default().fg(self.theme.toolbar_fg).bg(self.theme.toolbar_bg);
        for (action, rect) in &regions.toolbar {
            buf.set_string(rect.x, rect.y, action.label(), style);
        }
    }

    fn draw_list(&self, buf: &mut Buffer, regions: &PanelRegions) {
        let theme = self.theme;
        let list = regions.list;
        if list.height == 0 {
            return;
        }
        let listing = self.session.active_listing();

        if let Some(message) = &listing.error {
            let style = Style::default().fg(theme.list_message).bg(theme.panel_bg);
            buf.set_stringn(list.x, list.y, message, list.width as usize, style);
            return;
        }
        if listing.entries.is_empty() {
            let style = Style::default().fg(theme.list_message).bg(theme.panel_bg);
            buf.set_stringn(list.x, list.y, "(no documents)", list.width as usize, style);
            return;
        }

        let offset = scroll_offset(listing.cursor, listing.entries.len(), list.height as usize);
        for (row, entry) in listing
            .entries
            .iter()
            .enumerate()
            .skip(offset)
            .take(list.height as usize)
        {
            let y = list.y + (row - offset) as u16;
            let is_cursor = row == listing.cursor;
            let is_active = self
                .session
                .active_file
                .as_ref()
                .is_some_and(|a| a.source == entry.source && a.name == entry.file_name);

            let style = if is_cursor {
                Style::default().fg(theme.cursor_fg).bg(theme.cursor_bg)
            } else if is_active {
                Style::default()
                    .fg(theme.entry_active_marker)
                    .bg(theme.panel_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.entry_normal).bg(theme.panel_bg)
            };

            let marker = if is_active { "▶" } else { " " };
            let line = format!("{}{}", marker, entry.name);
            Self::fill(buf, Rect::new(list.x, y, list.width, 1), style);
            buf.set_stringn(list.x, y, &line, list.width as usize, style);
        }
    }
}

impl Widget for PanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let viewport = Viewport::new(area.width, area.height);
        let Some(regions) = panel_regions(&self.session.panel, viewport) else {
            return;
        };
        self.draw_frame(buf, &regions);
        self.draw_tabs(buf, &regions);
        self.draw_toolbar(buf, &regions);
        self.draw_list(buf, &regions);
    }
}
