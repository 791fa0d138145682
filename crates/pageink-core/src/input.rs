//! Pointer/keyboard event types and the toolbar/modifier mode controller.

use crate::surface::DrawingSurface;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Key name reported for the Alt modifier.
pub const ALT_KEY: &str = "Alt";

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Keyboard event type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

/// Toolbar modes. Ordinals are stable for the whole session.
///
/// Only `FreeDrawing` has surface-level behavior. Selecting text or brushing
/// just turns free drawing off; neither tool is implemented yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ToolMode {
    #[default]
    FreeDrawing = 1,
    FreeTexting = 2,
    FreeBrushing = 3,
}

impl ToolMode {
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            1 => Some(ToolMode::FreeDrawing),
            2 => Some(ToolMode::FreeTexting),
            3 => Some(ToolMode::FreeBrushing),
            _ => None,
        }
    }
}

/// History commands produced by keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Undo,
    Redo,
}

/// Keeps every surface's drawing mode in line with the toolbar selection
/// and the Alt pan override.
#[derive(Debug, Clone, Default)]
pub struct InputModeController {
    mode: ToolMode,
    /// Alt is held: drawing is off everywhere so drags pan the view.
    pan_override: bool,
}

impl InputModeController {
    pub fn new(mode: ToolMode) -> Self {
        Self {
            mode,
            pan_override: false,
        }
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn is_pan_override(&self) -> bool {
        self.pan_override
    }

    /// Whether surfaces should currently accept free drawing.
    pub fn drawing_enabled(&self) -> bool {
        self.mode == ToolMode::FreeDrawing && !self.pan_override
    }

    /// Push the current drawing state to every surface.
    pub fn apply(&self, surfaces: &mut [DrawingSurface]) {
        let enabled = self.drawing_enabled();
        for surface in surfaces {
            surface.set_drawing_mode_enabled(enabled);
        }
    }

    /// Toolbar selection.
    pub fn select_mode(&mut self, mode: ToolMode, surfaces: &mut [DrawingSurface]) {
        log::debug!("Tool mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.apply(surfaces);
    }

    /// Handle a key event; returns the history command it maps to, if any.
    pub fn handle_key(
        &mut self,
        event: &KeyEvent,
        modifiers: Modifiers,
        surfaces: &mut [DrawingSurface],
    ) -> Option<KeyCommand> {
        match event {
            KeyEvent::Pressed(key) if key == ALT_KEY => {
                self.pan_override = true;
                self.apply(surfaces);
                None
            }
            KeyEvent::Released(key) if key == ALT_KEY => {
                self.pan_override = false;
                self.apply(surfaces);
                None
            }
            KeyEvent::Pressed(key) if modifiers.command() && key.eq_ignore_ascii_case("z") => {
                if modifiers.shift {
                    Some(KeyCommand::Redo)
                } else {
                    Some(KeyCommand::Undo)
                }
            }
            KeyEvent::Pressed(_) | KeyEvent::Released(_) => None,
        }
    }
}
