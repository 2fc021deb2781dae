//! Loaded-document preview pane
//!
//! Stands in for the out-of-scope editor at its interface: it only receives
//! the loaded JSON value and pretty-prints it.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::state::Session;

use super::Theme;

pub struct PreviewPane<'a> {
    session: &'a Session,
    theme: &'a Theme,
}

impl<'a> PreviewPane<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }
}

impl Widget for PreviewPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 {
            return;
        }
        let title_style = Style::default()
            .fg(self.theme.preview_title)
            .add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(self.theme.preview_fg);

        match &self.session.document {
            Some(doc) => {
                let title = format!("{} ({})", doc.name, doc.source.label());
                buf.set_stringn(area.x + 1, area.y, &title, area.width.saturating_sub(2) as usize, title_style);

                let body = serde_json::to_string_pretty(&doc.value)
                    .unwrap_or_else(|_| doc.value.to_string());
                for (i, line) in body.lines().take(area.height as usize - 2).enumerate() {
                    buf.set_stringn(
                        area.x + 1,
                        area.y + 2 + i as u16,
                        line,
                        area.width.saturating_sub(2) as usize,
                        text_style,
                    );
                }
            }
            None => {
                buf.set_stringn(
                    area.x + 1,
                    area.y,
                    "No document loaded. Open the panel (F9) and pick one.",
                    area.width.saturating_sub(2) as usize,
                    text_style,
                );
            }
        }
    }
}
