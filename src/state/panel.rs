//! Floating panel geometry state machine
//!
//! `Hidden <-> Visible{Expanded|Collapsed} x {Local|Library|Cloud}`.
//! Position is unset until first shown, then computed from the viewport,
//! drag-moved by the user and always re-clamped so the header stays within
//! the margin-bounded rectangle.

use crate::backends::SourceKind;

/// Panel box width in terminal cells
pub const PANEL_WIDTH: u16 = 38;
/// Panel box height when expanded (title bar + tabs + toolbar + list)
pub const PANEL_HEIGHT: u16 = 16;
/// Panel box height when collapsed (title bar only, with borders)
pub const COLLAPSED_HEIGHT: u16 = 3;
/// Margin kept between the panel and the viewport edges
pub const MARGIN: u16 = 1;

/// Terminal dimensions, the panel's coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// An in-progress header drag
#[derive(Debug, Clone, Copy)]
struct DragState {
    pointer: u8,
    origin: (u16, u16),
    pointer_origin: (u16, u16),
}

/// Panel geometry and visibility state
#[derive(Debug)]
pub struct PanelGeometry {
    pub visible: bool,
    /// Unset until the panel is first shown
    pub position: Option<(u16, u16)>,
    pub collapsed: bool,
    pub active_tab: SourceKind,
    drag: Option<DragState>,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            visible: false,
            position: None,
            collapsed: false,
            active_tab: SourceKind::Local,
            drag: None,
        }
    }
}

impl PanelGeometry {
    /// Current panel box height
    pub fn height(&self) -> u16 {
        if self.collapsed {
            COLLAPSED_HEIGHT
        } else {
            PANEL_HEIGHT
        }
    }

    /// Show the panel. Computes a fresh top-right default position if none
    /// was previously recorded, otherwise re-clamps the remembered one.
    /// Does not touch `collapsed` or `active_tab`.
    pub fn open(&mut self, viewport: Viewport) {
        self.visible = true;
        match self.position {
            None => self.position = Some(default_position(viewport)),
            Some(_) => self.clamp(viewport),
        }
    }

    /// Hide the panel, keeping position, collapse state and active tab
    pub fn close(&mut self) {
        self.visible = false;
        self.drag = None;
    }

    pub fn switch_tab(&mut self, tab: SourceKind) {
        self.active_tab = tab;
    }

    pub fn toggle_collapse(&mut self, viewport: Viewport) {
        self.collapsed = !self.collapsed;
        self.clamp(viewport);
    }

    /// Begin a header drag. Ignored while another pointer's drag is active.
    pub fn drag_start(&mut self, pointer: u8, at: (u16, u16)) {
        if self.drag.is_some() {
            return;
        }
        if let Some(origin) = self.position {
            self.drag = Some(DragState {
                pointer,
                origin,
                pointer_origin: at,
            });
        }
    }

    /// Move an active drag: position = origin + (pointer - pointer_origin),
    /// clamped to the viewport margins. Other pointers are ignored.
    pub fn drag_move(&mut self, pointer: u8, at: (u16, u16), viewport: Viewport) {
        let Some(drag) = self.drag else { return };
        if drag.pointer != pointer {
            return;
        }
        let dx = at.0 as i32 - drag.pointer_origin.0 as i32;
        let dy = at.1 as i32 - drag.pointer_origin.1 as i32;
        let x = (drag.origin.0 as i32 + dx).max(0) as u16;
        let y = (drag.origin.1 as i32 + dy).max(0) as u16;
        self.position = Some((x, y));
        self.clamp(viewport);
    }

    /// End a drag (pointer release, cancel or capture loss)
    pub fn drag_end(&mut self, pointer: u8) {
        if let Some(drag) = self.drag
            && drag.pointer == pointer
        {
            self.drag = None;
        }
    }

    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Viewport resize: re-clamp without moving an already-fitting panel
    pub fn resize(&mut self, viewport: Viewport) {
        if self.visible {
            self.clamp(viewport);
        }
    }

    /// Clamp position into the margin-bounded rectangle
    fn clamp(&mut self, viewport: Viewport) {
        if let Some((x, y)) = self.position {
            let max_x = viewport
                .width
                .saturating_sub(PANEL_WIDTH + MARGIN)
                .max(MARGIN);
            let max_y = viewport
                .height
                .saturating_sub(self.height() + MARGIN)
                .max(MARGIN);
            self.position = Some((x.clamp(MARGIN, max_x), y.clamp(MARGIN, max_y)));
        }
    }
}

/// Default position: anchored to the top-right corner
fn default_position(viewport: Viewport) -> (u16, u16) {
    let x = viewport
        .width
        .saturating_sub(PANEL_WIDTH + MARGIN)
        .max(MARGIN);
    (x, MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport {
        width: 120,
        height: 40,
    };

    #[test]
    fn test_open_defaults_top_right() {
        let mut panel = PanelGeometry::default();
        panel.open(VP);
        assert!(panel.visible);
        assert_eq!(panel.position, Some((120 - PANEL_WIDTH - MARGIN, MARGIN)));
        assert_eq!(panel.active_tab, SourceKind::Local);
        assert!(!panel.collapsed);
    }

    #[test]
    fn test_drag_moves_by_exact_delta() {
        let mut panel = PanelGeometry::default();
        panel.open(VP);
        panel.position = Some((20, 10));

        panel.drag_start(0, (25, 11));
        panel.drag_move(0, (30, 14), VP);
        assert_eq!(panel.position, Some((25, 13)));
        panel.drag_end(0);
        assert!(!panel.dragging());
    }

    #[test]
    fn test_drag_clamped_to_margins() {
        let mut panel = PanelGeometry::default();
        panel.open(VP);
        panel.position = Some((5, 5));

        panel.drag_start(0, (6, 6));
        // Way past the top-left corner
        panel.drag_move(0, (0, 0), VP);
        assert_eq!(panel.position, Some((MARGIN, MARGIN)));
        // Way past the bottom-right corner
        panel.drag_move(0, (200, 200), VP);
        assert_eq!(
            panel.position,
            Some((
                VP.width - PANEL_WIDTH - MARGIN,
                VP.height - PANEL_HEIGHT - MARGIN
            ))
        );
    }

    #[test]
    fn test_second_pointer_down_ignored() {
        let mut panel = PanelGeometry::default();
        panel.open(VP);
        panel.position = Some((20, 10));

        panel.drag_start(0, (25, 11));
        panel.drag_start(1, (40, 20));
        panel.drag_move(1, (50, 30), VP);
        // Pointer 1 never captured anything
        assert_eq!(panel.position, Some((20, 10)));
        panel.drag_end(1);
        assert!(panel.dragging());
        panel.drag_end(0);
        assert!(!panel.dragging());
    }

    #[test]
    fn test_resize_relocates_out_of_bounds_panel() {
        let mut panel = PanelGeometry::default();
        panel.open(VP);
        panel.collapsed = true;
        panel.switch_tab(SourceKind::Cloud);
        panel.position = Some((80, 30));
        panel.close();

        // Shrink below the remembered position, then reopen
        let small = Viewport::new(60, 20);
        panel.open(small);
        assert_eq!(
            panel.position,
            Some((
                (60 - PANEL_WIDTH - MARGIN).max(MARGIN),
                20 - COLLAPSED_HEIGHT - MARGIN
            ))
        );
        // Collapse state and tab untouched
        assert!(panel.collapsed);
        assert_eq!(panel.active_tab, SourceKind::Cloud);
    }

    #[test]
    fn test_resize_keeps_fitting_panel_in_place() {
        let mut panel = PanelGeometry::default();
        panel.open(VP);
        panel.position = Some((10, 10));
        panel.resize(Viewport::new(100, 38));
        assert_eq!(panel.position, Some((10, 10)));
    }

    #[test]
    fn test_close_preserves_state() {
        let mut panel = PanelGeometry::default();
        panel.open(VP);
        panel.switch_tab(SourceKind::Library);
        panel.toggle_collapse(VP);
        let pos = panel.position;
        panel.close();
        assert!(!panel.visible);
        assert_eq!(panel.position, pos);
        assert!(panel.collapsed);
        assert_eq!(panel.active_tab, SourceKind::Library);
    }
}
