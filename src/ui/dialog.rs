//! Modal dialogs: delete confirmation, text input, alert

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::Theme;

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn clear_with(buf: &mut Buffer, area: Rect, style: Style) {
    for row in area.y..area.bottom() {
        for col in area.x..area.right() {
            buf[(col, row)].set_char(' ').set_style(style);
        }
    }
}

fn draw_border(buf: &mut Buffer, area: Rect, style: Style, title: &str) {
    for col in area.x..area.right() {
        buf[(col, area.y)].set_char('─').set_style(style);
        buf[(col, area.bottom() - 1)].set_char('─').set_style(style);
    }
    for row in area.y..area.bottom() {
        buf[(area.x, row)].set_char('│').set_style(style);
        buf[(area.right() - 1, row)].set_char('│').set_style(style);
    }
    buf[(area.x, area.y)].set_char('┌').set_style(style);
    buf[(area.right() - 1, area.y)].set_char('┐').set_style(style);
    buf[(area.x, area.bottom() - 1)].set_char('└').set_style(style);
    buf[(area.right() - 1, area.bottom() - 1)].set_char('┘').set_style(style);
    buf.set_stringn(
        area.x + 2,
        area.y,
        format!(" {} ", title),
        area.width.saturating_sub(4) as usize,
        style.add_modifier(Modifier::BOLD),
    );
}

/// Yes/No confirmation dialog
pub struct ConfirmDialog<'a> {
    message: &'a str,
    /// 0 = Yes, 1 = No
    focus: usize,
    theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(message: &'a str, focus: usize, theme: &'a Theme) -> Self {
        Self { message, focus, theme }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 30 || area.height < 8 {
            return;
        }
        let theme = self.theme;
        let width = (self.message.len() as u16 + 6).max(30);
        let dialog = centered(area, width, 6);

        let bg = Style::default().bg(theme.dialog_bg).fg(theme.dialog_text);
        clear_with(buf, dialog, bg);
        draw_border(buf, dialog, Style::default().fg(theme.dialog_border).bg(theme.dialog_bg), "Confirm");

        buf.set_stringn(
            dialog.x + 3,
            dialog.y + 2,
            self.message,
            dialog.width.saturating_sub(6) as usize,
            bg,
        );

        let focused = Style::default()
            .fg(theme.dialog_button_focused_fg)
            .bg(theme.dialog_button_focused_bg)
            .add_modifier(Modifier::BOLD);
        let unfocused = Style::default().fg(theme.dialog_button_unfocused).bg(theme.dialog_bg);

        let buttons_y = dialog.y + 4;
        let yes_x = dialog.x + (dialog.width / 2).saturating_sub(9);
        let no_x = dialog.x + dialog.width / 2 + 2;
        buf.set_string(yes_x, buttons_y, "[ Yes ]", if self.focus == 0 { focused } else { unfocused });
        buf.set_string(no_x, buttons_y, "[ No ]", if self.focus == 1 { focused } else { unfocused });
    }
}

/// Single-line text input dialog (folder path, save-as name)
pub struct InputDialog<'a> {
    title: &'a str,
    prompt: &'a str,
    input: &'a str,
    theme: &'a Theme,
}

impl<'a> InputDialog<'a> {
    pub fn new(title: &'a str, prompt: &'a str, input: &'a str, theme: &'a Theme) -> Self {
        Self { title, prompt, input, theme }
    }

    /// Terminal cursor position for the input field, mirroring the
    /// horizontal scroll the renderer applies to long inputs
    pub fn cursor_position(area: Rect, input: &str, input_cursor: usize) -> (u16, u16) {
        let dialog = centered(area, 50, 7);
        let field_width = dialog.width.saturating_sub(6) as usize;
        let visible_start = input.chars().count().saturating_sub(field_width);
        let col = input_cursor.saturating_sub(visible_start).min(field_width);
        (dialog.x + 3 + col as u16, dialog.y + 3)
    }
}

impl Widget for InputDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 30 || area.height < 8 {
            return;
        }
        let theme = self.theme;
        let dialog = centered(area, 50, 7);

        let bg = Style::default().bg(theme.dialog_bg).fg(theme.dialog_text);
        clear_with(buf, dialog, bg);
        draw_border(
            buf,
            dialog,
            Style::default().fg(theme.dialog_border).bg(theme.dialog_bg),
            self.title,
        );

        buf.set_stringn(
            dialog.x + 3,
            dialog.y + 2,
            self.prompt,
            dialog.width.saturating_sub(6) as usize,
            bg,
        );

        let field = Rect::new(dialog.x + 3, dialog.y + 3, dialog.width.saturating_sub(6), 1);
        let field_style = Style::default().fg(theme.dialog_input_fg).bg(theme.dialog_input_bg);
        clear_with(buf, field, field_style);
        let chars: Vec<char> = self.input.chars().collect();
        let visible_start = chars.len().saturating_sub(field.width as usize);
        let visible: String = chars[visible_start..].iter().collect();
        buf.set_stringn(field.x, field.y, &visible, field.width as usize, field_style);

        buf.set_stringn(
            dialog.x + 3,
            dialog.y + 5,
            "Enter: accept   Esc: cancel",
            dialog.width.saturating_sub(6) as usize,
            Style::default().fg(theme.dialog_button_unfocused).bg(theme.dialog_bg),
        );
    }
}

/// Blocking alert for a failed interactive operation
pub struct AlertDialog<'a> {
    message: &'a str,
    theme: &'a Theme,
}

impl<'a> AlertDialog<'a> {
    pub fn new(message: &'a str, theme: &'a Theme) -> Self {
        Self { message, theme }
    }
}

impl Widget for AlertDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 30 || area.height < 8 {
            return;
        }
        let theme = self.theme;
        let width = (self.message.len() as u16 + 6).max(30).min(area.width);
        let dialog = centered(area, width, 6);

        let bg = Style::default().bg(theme.dialog_bg).fg(theme.dialog_text);
        clear_with(buf, dialog, bg);
        draw_border(buf, dialog, Style::default().fg(theme.dialog_border).bg(theme.dialog_bg), "Error");

        buf.set_stringn(
            dialog.x + 3,
            dialog.y + 2,
            self.message,
            dialog.width.saturating_sub(6) as usize,
            bg,
        );
        buf.set_stringn(
            dialog.x + 3,
            dialog.y + 4,
            "Press Enter or Esc to dismiss",
            dialog.width.saturating_sub(6) as usize,
            Style::default().fg(theme.dialog_button_unfocused).bg(theme.dialog_bg),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_cursor_tracks_scrolled_field() {
        let area = Rect::new(0, 0, 100, 30);
        let dialog = centered(area, 50, 7);
        let field_width = dialog.width.saturating_sub(6);

        // Short input: cursor sits at its character offset
        let (x, y) = InputDialog::cursor_position(area, "docs", 4);
        assert_eq!((x, y), (dialog.x + 3 + 4, dialog.y + 3));

        // Long input scrolls; the cursor stays pinned inside the field
        let long = "x".repeat(100);
        let (x, _) = InputDialog::cursor_position(area, &long, 100);
        assert_eq!(x, dialog.x + 3 + field_width);

        // Multi-byte input counts characters, not bytes
        let (x, _) = InputDialog::cursor_position(area, "café", 4);
        assert_eq!(x, dialog.x + 3 + 4);
    }
}
