//! Panel layout and hit regions
//!
//! One function computes every interactive region of the floating panel
//! from the current geometry. The renderer and the mouse hit-tester both
//! call it each frame, so toolbar placement always reflects the currently
//! active tab and collapse state.

use ratatui::layout::Rect;

use crate::backends::SourceKind;
use crate::state::panel::{PANEL_WIDTH, PanelGeometry, Viewport};

/// Toolbar buttons, per tab capability (the library is read-only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    Refresh,
    Load,
    Save,
    Delete,
    Folder,
}

impl ToolbarAction {
    pub fn label(&self) -> &'static str {
        match self {
            ToolbarAction::Refresh => "[Rfr]",
            ToolbarAction::Load => "[Opn]",
            ToolbarAction::Save => "[Sav]",
            ToolbarAction::Delete => "[Del]",
            ToolbarAction::Folder => "[Dir]",
        }
    }

    /// Actions available on a tab's toolbar
    pub fn for_tab(tab: SourceKind) -> &'static [ToolbarAction] {
        match tab {
            SourceKind::Local => &[
                ToolbarAction::Refresh,
                ToolbarAction::Load,
                ToolbarAction::Save,
                ToolbarAction::Delete,
                ToolbarAction::Folder,
            ],
            SourceKind::Library => &[ToolbarAction::Refresh, ToolbarAction::Load],
            SourceKind::Cloud => &[
                ToolbarAction::Refresh,
                ToolbarAction::Load,
                ToolbarAction::Save,
                ToolbarAction::Delete,
            ],
        }
    }
}

/// Every interactive region of the panel, in viewport coordinates
#[derive(Debug)]
pub struct PanelRegions {
    pub panel: Rect,
    /// Drag area: the top border row, excluding the window buttons
    pub header: Rect,
    pub collapse: Rect,
    pub close: Rect,
    /// Tab strip (empty while collapsed)
    pub tabs: Vec<(SourceKind, Rect)>,
    /// The active tab's toolbar; lives in the body when expanded and is
    /// relocated into the title-bar row while collapsed
    pub toolbar: Vec<(ToolbarAction, Rect)>,
    /// Entry list area (zero-height while collapsed)
    pub list: Rect,
}

/// Compute the panel's regions, or None while hidden
pub fn panel_regions(geometry: &PanelGeometry, viewport: Viewport) -> Option<PanelRegions> {
    if !geometry.visible {
        return None;
    }
    let (x, y) = geometry.position?;
    let width = PANEL_WIDTH.min(viewport.width.saturating_sub(x));
    let height = geometry.height().min(viewport.height.saturating_sub(y));
    if width < 12 || height < 3 {
        return None;
    }
    let panel = Rect::new(x, y, width, height);

    // Window buttons sit at the right end of the top border row
    let close = Rect::new(panel.right().saturating_sub(4), panel.y, 3, 1);
    let collapse = Rect::new(panel.right().saturating_sub(8), panel.y, 3, 1);
    let header = Rect::new(panel.x, panel.y, width.saturating_sub(8), 1);

    let actions = ToolbarAction::for_tab(geometry.active_tab);
    let mut tabs = Vec::new();
    let toolbar_row;
    let list;

    if geometry.collapsed {
        // Body hidden: the toolbar moves into the title-bar area
        toolbar_row = panel.y + 1;
        list = Rect::new(panel.x + 1, panel.y + 1, 0, 0);
    } else {
        // Row 1: tab strip
        let mut tab_x = panel.x + 1;
        for kind in SourceKind::ALL {
            let label_width = kind.label().len() as u16 + 2;
            tabs.push((kind, Rect::new(tab_x, panel.y + 1, label_width, 1)));
            tab_x += label_width + 1;
        }
        // Row 2: toolbar, rows 3..: list
        toolbar_row = panel.y + 2;
        list = Rect::new(
            panel.x + 1,
            panel.y + 3,
            width.saturating_sub(2),
            height.saturating_sub(4),
        );
    }

    let mut toolbar = Vec::new();
    let mut tb_x = panel.x + 1;
    for action in actions {
        let w = action.label().len() as u16;
        if tb_x + w >= panel.right().saturating_sub(if geometry.collapsed { 0 } else { 1 }) {
            break;
        }
        toolbar.push((*action, Rect::new(tb_x, toolbar_row, w, 1)));
        tb_x += w + 1;
    }

    Some(PanelRegions {
        panel,
        header,
        collapse,
        close,
        tabs,
        toolbar,
        list,
    })
}

/// First visible entry index for a cursor within a window of `visible` rows
pub fn scroll_offset(cursor: usize, len: usize, visible: usize) -> usize {
    if visible == 0 || len <= visible {
        return 0;
    }
    let max_offset = len - visible;
    cursor.saturating_sub(visible - 1).min(max_offset)
}

/// True if a point falls inside a rect
pub fn hit(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}
