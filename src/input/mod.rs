//! Event handling: translates raw terminal events into session transitions
//!
//! The terminal is a thin adapter; every state change goes through the
//! session's named operations, so the same transitions are reachable from
//! keys, mouse and (in tests) direct calls.

mod text_field;

pub use text_field::TextField;

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::backends::SourceKind;
use crate::state::panel::Viewport;
use crate::state::{Mode, Session};
use crate::ui::layout::{ToolbarAction, hit, panel_regions, scroll_offset};

/// Handle a key event
pub fn handle_key(session: &mut Session, key: KeyEvent, viewport: Viewport) {
    match std::mem::take(&mut session.mode) {
        Mode::Normal => handle_normal_key(session, key, viewport),
        Mode::ConfirmDelete { entry, focus } => {
            handle_confirm_key(session, key, entry, focus);
        }
        Mode::SelectFolder { input, cursor } => {
            handle_input_key(session, key, input, cursor, InputTarget::Folder);
        }
        Mode::SaveAs { input, cursor } => {
            handle_input_key(session, key, input, cursor, InputTarget::SaveAs);
        }
        Mode::Alert { message } => match key.code {
            KeyCode::Enter | KeyCode::Esc => {}
            _ => session.mode = Mode::Alert { message },
        },
    }
}

fn handle_normal_key(session: &mut Session, key: KeyEvent, viewport: Viewport) {
    match key.code {
        KeyCode::Char('q') => session.should_quit = true,
        KeyCode::F(9) => {
            if session.panel.visible {
                session.close_panel();
            } else {
                session.open_panel(viewport);
            }
        }
        _ if !session.panel.visible => {}
        KeyCode::Esc => session.close_panel(),
        KeyCode::Tab => {
            let next = match session.panel.active_tab {
                SourceKind::Local => SourceKind::Library,
                SourceKind::Library => SourceKind::Cloud,
                SourceKind::Cloud => SourceKind::Local,
            };
            session.switch_tab(next);
        }
        KeyCode::Char('1') => session.switch_tab(SourceKind::Local),
        KeyCode::Char('2') => session.switch_tab(SourceKind::Library),
        KeyCode::Char('3') => session.switch_tab(SourceKind::Cloud),
        KeyCode::Char('c') => session.toggle_collapse(viewport),
        KeyCode::Up => session.move_cursor(-1),
        KeyCode::Down => session.move_cursor(1),
        KeyCode::Enter => session.load_selected(),
        KeyCode::Char('r') => session.refresh_active(),
        KeyCode::Char('d') | KeyCode::Delete => session.request_delete(),
        KeyCode::Char('n') => session.navigate(1),
        KeyCode::Char('p') => session.navigate(-1),
        KeyCode::Char('g') => session.grant_local_access(),
        KeyCode::Char('f') => {
            let input = session.local_mut().folder_label().unwrap_or_default();
            let cursor = input.chars().count();
            session.mode = Mode::SelectFolder { input, cursor };
        }
        KeyCode::Char('s') => {
            if session.document.is_some() {
                let input = String::new();
                session.mode = Mode::SaveAs { input, cursor: 0 };
            } else {
                session.set_status("No document loaded");
            }
        }
        _ => {}
    }
}

fn handle_confirm_key(
    session: &mut Session,
    key: KeyEvent,
    entry: crate::backends::DocEntry,
    focus: usize,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => session.perform_delete(&entry),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
        KeyCode::Enter => {
            if focus == 0 {
                session.perform_delete(&entry);
            }
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            session.mode = Mode::ConfirmDelete {
                entry,
                focus: 1 - focus,
            };
        }
        _ => session.mode = Mode::ConfirmDelete { entry, focus },
    }
}

enum InputTarget {
    Folder,
    SaveAs,
}

fn handle_input_key(
    session: &mut Session,
    key: KeyEvent,
    mut input: String,
    mut cursor: usize,
    target: InputTarget,
) {
    match key.code {
        KeyCode::Esc => return,
        KeyCode::Enter => {
            let trimmed = input.trim();
            if trimmed.is_empty() {
                return;
            }
            match target {
                InputTarget::Folder => {
                    session.select_folder(std::path::Path::new(trimmed));
                }
                InputTarget::SaveAs => session.save_document_as(trimmed),
            }
            return;
        }
        KeyCode::Backspace => TextField::backspace(&mut input, &mut cursor),
        KeyCode::Delete => TextField::delete(&mut input, cursor),
        KeyCode::Left => TextField::left(&mut cursor),
        KeyCode::Right => TextField::right(&input, &mut cursor),
        KeyCode::Home => TextField::home(&mut cursor),
        KeyCode::End => TextField::end(&input, &mut cursor),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            TextField::insert_char(&mut input, &mut cursor, c);
        }
        _ => {}
    }
    session.mode = match target {
        InputTarget::Folder => Mode::SelectFolder { input, cursor },
        InputTarget::SaveAs => Mode::SaveAs { input, cursor },
    };
}

fn pointer_id(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Right => 1,
        MouseButton::Middle => 2,
    }
}

/// Handle a mouse event. Dialogs are keyboard-only; while one is open the
/// mouse is ignored.
pub fn handle_mouse(session: &mut Session, mouse: MouseEvent, viewport: Viewport) {
    if !session.mode.is_normal() {
        return;
    }
    let (col, row) = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(button) => {
            let Some(regions) = panel_regions(&session.panel, viewport) else {
                return;
            };
            if hit(regions.close, col, row) {
                session.close_panel();
            } else if hit(regions.collapse, col, row) {
                session.toggle_collapse(viewport);
            } else if let Some((kind, _)) =
                regions.tabs.iter().find(|(_, r)| hit(*r, col, row)).copied()
            {
                session.switch_tab(kind);
            } else if let Some((action, _)) = regions
                .toolbar
                .iter()
                .find(|(_, r)| hit(*r, col, row))
                .copied()
            {
                run_toolbar_action(session, action);
            } else if hit(regions.header, col, row) {
                session.panel.drag_start(pointer_id(button), (col, row));
            } else if hit(regions.list, col, row) {
                let listing = session.active_listing();
                let offset = scroll_offset(
                    listing.cursor,
                    listing.entries.len(),
                    regions.list.height as usize,
                );
                let index = offset + (row - regions.list.y) as usize;
                if index < listing.entries.len() {
                    session.set_cursor(index);
                    session.load_selected();
                }
            }
        }
        MouseEventKind::Drag(button) => {
            session.panel.drag_move(pointer_id(button), (col, row), viewport);
        }
        MouseEventKind::Up(button) => {
            session.panel.drag_end(pointer_id(button));
        }
        MouseEventKind::ScrollUp => {
            if session.panel.visible {
                session.move_cursor(-1);
            }
        }
        MouseEventKind::ScrollDown => {
            if session.panel.visible {
                session.move_cursor(1);
            }
        }
        _ => {}
    }
}

fn run_toolbar_action(session: &mut Session, action: ToolbarAction) {
    match action {
        ToolbarAction::Refresh => session.refresh_active(),
        ToolbarAction::Load => session.load_selected(),
        ToolbarAction::Save => {
            if session.document.is_some() {
                session.mode = Mode::SaveAs {
                    input: String::new(),
                    cursor: 0,
                };
            } else {
                session.set_status("No document loaded");
            }
        }
        ToolbarAction::Delete => session.request_delete(),
        ToolbarAction::Folder => {
            let input = session.local_mut().folder_label().unwrap_or_default();
            let cursor = input.chars().count();
            session.mode = Mode::SelectFolder { input, cursor };
        }
    }
}
