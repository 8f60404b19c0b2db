//! Floating terminal window state: layout, drag, resize and window-manager actions

use bevy::prelude::*;

pub const TERMINAL_ID: &str = "terminal";
const TASKBAR_TITLE: &str = "Terminal";

/// Top-left position and size in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRect {
    pub position: Vec2,
    pub size: Vec2,
}

/// Size used on a viewport: compact below the breakpoint, 800×500 otherwise.
pub fn default_size(viewport: Vec2, breakpoint: f32) -> Vec2 {
    if viewport.x < breakpoint {
        Vec2::new(320.0_f32.min(viewport.x - 32.0), 400.0)
    } else {
        Vec2::new(800.0, 500.0)
    }
}

/// Centred horizontally, slightly above centre vertically, never closer than 20 px to the top.
pub fn default_layout(viewport: Vec2, breakpoint: f32) -> WindowRect {
    let size = default_size(viewport, breakpoint);
    WindowRect {
        position: Vec2::new(
            (viewport.x - size.x) / 2.0,
            ((viewport.y - size.y) / 2.0 - 100.0).max(20.0),
        ),
        size,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Bottom,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeGrab {
    edge: ResizeEdge,
    start_cursor: Vec2,
    start_rect: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarEntry {
    pub id: &'static str,
    pub title: &'static str,
}

#[derive(Resource, Debug, Clone)]
pub struct TerminalWindow {
    pub rect: WindowRect,
    pub visible: bool,
    pub minimized: bool,
    pub fullscreen: bool,
    pub active: bool,
    pub taskbar: Vec<TaskbarEntry>,
    drag_offset: Option<Vec2>,
    resize: Option<ResizeGrab>,
}

impl Default for TerminalWindow {
    fn default() -> Self {
        Self::new(Vec2::new(1280.0, 720.0), 768.0)
    }
}

impl TerminalWindow {
    pub fn new(viewport: Vec2, breakpoint: f32) -> Self {
        Self {
            rect: default_layout(viewport, breakpoint),
            visible: true,
            minimized: false,
            fullscreen: false,
            active: false,
            taskbar: Vec::new(),
            drag_offset: None,
            resize: None,
        }
    }

    /// Shown on screen (open and not minimized)
    pub fn is_shown(&self) -> bool {
        self.visible && !self.minimized
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_some()
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Rect actually drawn: fullscreen covers 90%×85% of the viewport, capped at 1600×900.
    pub fn display_rect(&self, viewport: Vec2) -> WindowRect {
        if !self.fullscreen {
            return self.rect;
        }
        let size = Vec2::new(
            (viewport.x * 0.9).min(1600.0),
            (viewport.y * 0.85).min(900.0),
        );
        WindowRect {
            position: (viewport - size) / 2.0,
            size,
        }
    }

    pub fn begin_drag(&mut self, cursor: Vec2) -> bool {
        if self.fullscreen {
            return false;
        }
        self.activate();
        self.drag_offset = Some(cursor - self.rect.position);
        true
    }

    pub fn drag_to(&mut self, cursor: Vec2) {
        if let Some(offset) = self.drag_offset {
            self.rect.position = cursor - offset;
        }
    }

    pub fn begin_resize(&mut self, edge: ResizeEdge, cursor: Vec2) -> bool {
        if self.fullscreen {
            return false;
        }
        self.activate();
        self.resize = Some(ResizeGrab {
            edge,
            start_cursor: cursor,
            start_rect: self.rect,
        });
        true
    }

    /// Resize from the grabbed edge; dragging the left edge keeps the right edge in place.
    pub fn resize_to(&mut self, cursor: Vec2, min_size: Vec2) {
        let Some(grab) = self.resize else { return };
        let delta = cursor - grab.start_cursor;
        let start = grab.start_rect;

        match grab.edge {
            ResizeEdge::Right => {
                self.rect.size.x = (start.size.x + delta.x).max(min_size.x);
            }
            ResizeEdge::Left => {
                let width = (start.size.x - delta.x).max(min_size.x);
                self.rect.size.x = width;
                self.rect.position.x = start.position.x + (start.size.x - width);
            }
            ResizeEdge::Bottom => {
                self.rect.size.y = (start.size.y + delta.y).max(min_size.y);
            }
            ResizeEdge::BottomRight => {
                self.rect.size.x = (start.size.x + delta.x).max(min_size.x);
                self.rect.size.y = (start.size.y + delta.y).max(min_size.y);
            }
        }
    }

    pub fn end_gesture(&mut self) {
        self.drag_offset = None;
        self.resize = None;
    }

    /// Keep the window usable after the viewport changes size.
    pub fn fit_viewport(&mut self, viewport: Vec2, breakpoint: f32) {
        let size = if viewport.x < breakpoint {
            default_size(viewport, breakpoint)
        } else {
            self.rect.size
        };
        self.rect.size = Vec2::new(size.x.min(viewport.x - 32.0), size.y);
        self.rect.position = Vec2::new(
            self.rect.position.x.max(0.0).min(viewport.x - size.x),
            self.rect.position.y.max(20.0).min(viewport.y - size.y),
        );
    }

    pub fn minimize(&mut self) {
        self.fullscreen = false;
        self.end_gesture();
        self.minimized = true;
        self.taskbar.retain(|e| e.id != TERMINAL_ID);
        self.taskbar.push(TaskbarEntry {
            id: TERMINAL_ID,
            title: TASKBAR_TITLE,
        });
    }

    /// Restore a minimized window by taskbar id. Returns false for unknown ids.
    pub fn restore(&mut self, id: &str) -> bool {
        if id != TERMINAL_ID {
            return false;
        }
        self.minimized = false;
        self.taskbar.retain(|e| e.id != TERMINAL_ID);
        true
    }

    pub fn toggle_fullscreen(&mut self) {
        self.end_gesture();
        self.fullscreen = !self.fullscreen;
    }

    pub fn close(&mut self) {
        self.fullscreen = false;
        self.end_gesture();
        self.active = false;
        self.visible = false;
        self.taskbar.retain(|e| e.id != TERMINAL_ID);
    }

    /// Reopen with a fresh layout for the current viewport.
    pub fn open(&mut self, viewport: Vec2, breakpoint: f32) {
        self.rect = default_layout(viewport, breakpoint);
        self.visible = true;
        self.minimized = false;
        self.fullscreen = false;
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Vec2 = Vec2::new(400.0, 200.0);

    #[test]
    fn test_desktop_layout() {
        let rect = default_layout(Vec2::new(1280.0, 800.0), 768.0);
        assert_eq!(rect.size, Vec2::new(800.0, 500.0));
        assert_eq!(rect.position, Vec2::new(240.0, 50.0));
    }

    #[test]
    fn test_mobile_layout() {
        let rect = default_layout(Vec2::new(340.0, 700.0), 768.0);
        assert_eq!(rect.size, Vec2::new(308.0, 400.0));
        assert_eq!(rect.position, Vec2::new(16.0, 50.0));

        // Short viewport pins the window 20 px from the top
        let rect = default_layout(Vec2::new(600.0, 300.0), 768.0);
        assert_eq!(rect.size, Vec2::new(320.0, 400.0));
        assert_eq!(rect.position.y, 20.0);
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut window = TerminalWindow::new(Vec2::new(1280.0, 800.0), 768.0);
        assert!(window.begin_drag(Vec2::new(300.0, 60.0)));
        window.drag_to(Vec2::new(400.0, 160.0));
        assert_eq!(window.rect.position, Vec2::new(340.0, 150.0));
        assert!(window.active);
        window.end_gesture();
        window.drag_to(Vec2::new(0.0, 0.0));
        assert_eq!(window.rect.position, Vec2::new(340.0, 150.0));
    }

    #[test]
    fn test_no_drag_or_resize_in_fullscreen() {
        let mut window = TerminalWindow::new(Vec2::new(1280.0, 800.0), 768.0);
        window.toggle_fullscreen();
        assert!(!window.begin_drag(Vec2::ZERO));
        assert!(!window.begin_resize(ResizeEdge::Right, Vec2::ZERO));
    }

    #[test]
    fn test_resize_respects_minimums() {
        let mut window = TerminalWindow::new(Vec2::new(1280.0, 800.0), 768.0);
        window.begin_resize(ResizeEdge::BottomRight, Vec2::new(1040.0, 550.0));
        window.resize_to(Vec2::new(100.0, 100.0), MIN);
        assert_eq!(window.rect.size, MIN);
        window.resize_to(Vec2::new(1140.0, 600.0), MIN);
        assert_eq!(window.rect.size, Vec2::new(900.0, 550.0));
    }

    #[test]
    fn test_left_resize_keeps_right_edge() {
        let mut window = TerminalWindow::new(Vec2::new(1280.0, 800.0), 768.0);
        let right = window.rect.position.x + window.rect.size.x;
        window.begin_resize(ResizeEdge::Left, Vec2::new(240.0, 300.0));
        window.resize_to(Vec2::new(140.0, 300.0), MIN);
        assert_eq!(window.rect.size.x, 900.0);
        assert_eq!(window.rect.position.x + window.rect.size.x, right);

        // Clamped at the minimum width, the right edge still does not move
        window.resize_to(Vec2::new(900.0, 300.0), MIN);
        assert_eq!(window.rect.size.x, 400.0);
        assert_eq!(window.rect.position.x + window.rect.size.x, right);
    }

    #[test]
    fn test_minimize_and_restore() {
        let mut window = TerminalWindow::new(Vec2::new(1280.0, 800.0), 768.0);
        window.toggle_fullscreen();
        window.minimize();
        window.minimize();
        assert!(!window.fullscreen);
        assert!(!window.is_shown());
        assert_eq!(window.taskbar.len(), 1);
        assert_eq!(window.taskbar[0].title, "Terminal");

        assert!(!window.restore("browser"));
        assert!(window.restore(TERMINAL_ID));
        assert!(window.is_shown());
        assert!(window.taskbar.is_empty());
    }

    #[test]
    fn test_close_and_open() {
        let viewport = Vec2::new(1280.0, 800.0);
        let mut window = TerminalWindow::new(viewport, 768.0);
        window.begin_drag(Vec2::new(300.0, 60.0));
        window.drag_to(Vec2::new(10.0, 10.0));
        window.end_gesture();
        window.minimize();
        window.close();
        assert!(!window.visible);
        assert!(window.taskbar.is_empty());

        window.open(viewport, 768.0);
        assert!(window.is_shown());
        assert_eq!(window.rect, default_layout(viewport, 768.0));
    }

    #[test]
    fn test_fit_viewport_clamps_position() {
        let mut window = TerminalWindow::new(Vec2::new(1280.0, 800.0), 768.0);
        window.rect.position = Vec2::new(-50.0, 5.0);
        window.fit_viewport(Vec2::new(1280.0, 800.0), 768.0);
        assert_eq!(window.rect.position, Vec2::new(0.0, 20.0));

        window.rect.position = Vec2::new(900.0, 700.0);
        window.fit_viewport(Vec2::new(1000.0, 600.0), 768.0);
        assert_eq!(window.rect.position, Vec2::new(200.0, 100.0));

        window.fit_viewport(Vec2::new(500.0, 900.0), 768.0);
        assert_eq!(window.rect.size, Vec2::new(320.0, 400.0));
    }

    #[test]
    fn test_fullscreen_display_rect() {
        let mut window = TerminalWindow::new(Vec2::new(1000.0, 800.0), 768.0);
        window.toggle_fullscreen();
        let rect = window.display_rect(Vec2::new(1000.0, 800.0));
        assert_eq!(rect.size, Vec2::new(900.0, 680.0));
        assert_eq!(rect.position, Vec2::new(50.0, 60.0));
    }
}
