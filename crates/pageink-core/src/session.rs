//! Whiteboard session: the owned context tying pages, input and history together.

use crate::broadcast::{SelectionBroadcastChannel, Subscription};
use crate::color::BrushColor;
use crate::config::WhiteboardConfig;
use crate::error::{Result, WhiteboardError};
use crate::history::UndoRedoCoordinator;
use crate::input::{InputModeController, KeyCommand, KeyEvent, Modifiers, PointerEvent, ToolMode};
use crate::shapes::ImageSource;
use crate::surface::{DrawingSurface, SurfaceContainer, SurfaceId};
use std::collections::HashMap;

/// Element that hosts page containers.
#[derive(Debug, Clone, PartialEq)]
pub struct MountTarget {
    pub id: String,
    /// Measured width; every page is displayed at this width.
    pub client_width: f64,
    /// Ids of mounted page containers, in mount order.
    pub children: Vec<String>,
}

impl MountTarget {
    pub fn new(id: impl Into<String>, client_width: f64) -> Self {
        Self {
            id: id.into(),
            client_width,
            children: Vec::new(),
        }
    }

    pub fn mount(&mut self, container: &SurfaceContainer) {
        self.children.push(container.id.clone());
    }
}

/// The host's element tree, reduced to what the session needs to find.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    targets: HashMap<String, MountTarget>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: MountTarget) -> Self {
        self.insert(target);
        self
    }

    pub fn insert(&mut self, target: MountTarget) {
        self.targets.insert(target.id.clone(), target);
    }

    pub fn target(&self, id: &str) -> Option<&MountTarget> {
        self.targets.get(id)
    }

    pub fn target_mut(&mut self, id: &str) -> Option<&mut MountTarget> {
        self.targets.get_mut(id)
    }
}

/// A multi-page whiteboard session.
///
/// Every handler processes one external event to completion (surface
/// mutated, history updated) before returning.
#[derive(Debug)]
pub struct Session {
    surfaces: Vec<DrawingSurface>,
    history: UndoRedoCoordinator,
    input: InputModeController,
    colors: Subscription<BrushColor>,
    selected_color: BrushColor,
}

impl Session {
    /// Load every configured page into the layout's mount target.
    ///
    /// Fails before loading anything if the mount target is missing, and
    /// fails outright on the first page that does not load.
    pub fn open(
        config: &WhiteboardConfig,
        layout: &mut Layout,
        colors: &SelectionBroadcastChannel<BrushColor>,
    ) -> Result<Self> {
        let target = layout
            .target_mut(&config.mount_target)
            .ok_or_else(|| WhiteboardError::MissingMountTarget(config.mount_target.clone()))?;

        let input = InputModeController::new(config.mode);
        let mut surfaces = Vec::with_capacity(config.pages.len());
        for (position, page) in config.pages.iter().enumerate() {
            let mut surface = DrawingSurface::initialize(&ImageSource::path(page), position + 1, target.client_width)?;
            surface.set_view_zoom(config.initial_zoom);
            surface.set_drawing_mode_enabled(input.drawing_enabled());
            surface.set_brush_color(config.brush_color);
            surface.set_brush_width(config.brush_width);
            target.mount(surface.container());
            surfaces.push(surface);
        }

        Ok(Self::assemble(surfaces, input, config.brush_color, colors.subscribe(config.color_topic.clone())))
    }

    /// Build a session from surfaces that are already initialized.
    pub fn from_surfaces(
        surfaces: Vec<DrawingSurface>,
        mode: ToolMode,
        colors: Subscription<BrushColor>,
    ) -> Self {
        let input = InputModeController::new(mode);
        let mut session = Self::assemble(surfaces, input, BrushColor::default(), colors);
        session.input.apply(&mut session.surfaces);
        for surface in &mut session.surfaces {
            surface.set_brush_color(session.selected_color);
        }
        session
    }

    fn assemble(
        mut surfaces: Vec<DrawingSurface>,
        input: InputModeController,
        selected_color: BrushColor,
        colors: Subscription<BrushColor>,
    ) -> Self {
        // Tracking starts only after every background is in place.
        let mut history = UndoRedoCoordinator::new();
        for surface in &mut surfaces {
            history.track(surface);
        }
        log::info!("Session ready with {} pages", surfaces.len());
        Self {
            surfaces,
            history,
            input,
            colors,
            selected_color,
        }
    }

    /// Apply pending color selections and record pending edits.
    pub fn pump(&mut self) {
        for color in self.colors.drain() {
            log::debug!("Brush color selected: {}", color);
            for surface in &mut self.surfaces {
                surface.set_brush_color(color);
            }
            self.selected_color = color;
        }
        self.history.absorb(&mut self.surfaces);
    }

    /// Route a pointer event to one page.
    pub fn handle_pointer(&mut self, surface: SurfaceId, event: PointerEvent, modifiers: Modifiers) {
        self.pump();
        match self.surfaces.iter_mut().find(|s| s.index() == surface) {
            Some(target) => target.handle_pointer(event, modifiers),
            None => log::warn!("Pointer event for unknown surface {}", surface),
        }
        self.pump();
    }

    /// Handle a keyboard event: Alt pan override and undo/redo shortcuts.
    pub fn handle_key(&mut self, event: KeyEvent, modifiers: Modifiers) {
        self.pump();
        match self.input.handle_key(&event, modifiers, &mut self.surfaces) {
            Some(KeyCommand::Undo) => {
                self.undo();
            }
            Some(KeyCommand::Redo) => {
                self.redo();
            }
            None => {}
        }
    }

    /// Toolbar mode selection.
    pub fn select_mode(&mut self, mode: ToolMode) {
        self.input.select_mode(mode, &mut self.surfaces);
    }

    pub fn undo(&mut self) -> bool {
        self.pump();
        self.history.request_undo(&mut self.surfaces)
    }

    pub fn redo(&mut self) -> bool {
        self.pump();
        self.history.request_redo(&mut self.surfaces)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &UndoRedoCoordinator {
        &self.history
    }

    pub fn surfaces(&self) -> &[DrawingSurface] {
        &self.surfaces
    }

    pub fn surface(&self, index: SurfaceId) -> Option<&DrawingSurface> {
        self.surfaces.iter().find(|s| s.index() == index)
    }

    pub fn selected_color(&self) -> BrushColor {
        self.selected_color
    }

    pub fn selected_mode(&self) -> ToolMode {
        self.input.mode()
    }
}
