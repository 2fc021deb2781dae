//! Bottom status bar

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

use crate::state::Session;

use super::Theme;

/// Status bar: transient messages on the left, key hints on the right
pub struct StatusBar<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }
        let style = Style::default().bg(self.theme.status_bg).fg(self.theme.status_fg);
        for col in area.x..area.right() {
            buf[(col, area.y)].set_char(' ').set_style(style);
        }

        let left = match &self.session.status {
            Some(message) => message.clone(),
            None => {
                let listing = self.session.active_listing();
                format!(
                    " {}: {} document(s)",
                    self.session.panel.active_tab.label(),
                    listing.entries.len()
                )
            }
        };
        buf.set_stringn(area.x + 1, area.y, &left, area.width.saturating_sub(2) as usize, style);

        let hints = "F9 panel  Tab next  p/n nav  q quit ";
        if area.width > left.len() as u16 + hints.len() as u16 + 4 {
            buf.set_string(
                area.right() - hints.len() as u16 - 1,
                area.y,
                hints,
                style,
            );
        }
    }
}
