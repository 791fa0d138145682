//! A single page: background image, view transform, brush and strokes.

use crate::camera::Camera;
use crate::changes::{ChangeKind, ChangeRecord, Origin, SurfaceChanges};
use crate::color::BrushColor;
use crate::error::Result;
use crate::input::{Modifiers, MouseButton, PointerEvent};
use crate::shapes::{BackgroundImage, Drawable, ImageSource, Stroke};
use kurbo::{Point, Size};
use std::sync::mpsc::{self, Sender};

/// Identity of a surface within a session.
pub type SurfaceId = usize;

/// Default brush width for new surfaces.
pub const DEFAULT_BRUSH_WIDTH: f64 = 1.0;

/// Host element a surface is mounted into.
///
/// Opaque to the core apart from its ids and size; a presentation layer
/// creates the real element from it.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceContainer {
    pub id: String,
    pub canvas_id: String,
    pub width: f64,
    pub height: f64,
}

impl SurfaceContainer {
    fn new(index: SurfaceId, width: f64, height: f64) -> Self {
        Self {
            id: format!("whiteboard-container-{index}"),
            canvas_id: format!("whiteboard-canvas-{index}"),
            width,
            height,
        }
    }
}

/// Pointer gesture in progress.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Alt-drag moving the view.
    Panning { last: Point },
    /// Free-drawing a stroke.
    Drawing { stroke: Stroke },
}

/// One independently pannable/zoomable drawing canvas bound to a page image.
///
/// The object sequence always starts with the background image; strokes
/// follow in the order they were added. Strokes removed by [`undo`] wait in a
/// LIFO buffer so [`redo`] can restore the exact same object.
///
/// [`undo`]: DrawingSurface::undo
/// [`redo`]: DrawingSurface::redo
#[derive(Debug)]
pub struct DrawingSurface {
    index: SurfaceId,
    camera: Camera,
    /// Visible canvas size (display width x scaled image height).
    canvas_size: Size,
    container: SurfaceContainer,
    drawing_mode: bool,
    brush_color: BrushColor,
    brush_width: f64,
    objects: Vec<Drawable>,
    /// Objects removed by undo, awaiting redo.
    undone: Vec<Drawable>,
    observers: Vec<Sender<ChangeRecord>>,
    gesture: Gesture,
}

impl DrawingSurface {
    /// Load the background and build the surface.
    ///
    /// Nothing is returned if the image fails to load. Free drawing starts
    /// enabled.
    pub fn initialize(source: &ImageSource, index: SurfaceId, display_width: f64) -> Result<Self> {
        let background = BackgroundImage::load(source)?;
        let height = f64::from(background.height());

        log::info!(
            "Surface {} initialized from {} ({}x{}, display width {})",
            index,
            background.source,
            background.width(),
            background.height(),
            display_width
        );

        Ok(Self {
            index,
            camera: Camera::new(),
            canvas_size: Size::new(display_width, height),
            container: SurfaceContainer::new(index, display_width, height),
            drawing_mode: true,
            brush_color: BrushColor::default(),
            brush_width: DEFAULT_BRUSH_WIDTH,
            objects: vec![Drawable::Background(background)],
            undone: Vec::new(),
            observers: Vec::new(),
            gesture: Gesture::Idle,
        })
    }

    pub fn index(&self) -> SurfaceId {
        self.index
    }

    pub fn background(&self) -> &BackgroundImage {
        match &self.objects[0] {
            Drawable::Background(image) => image,
            Drawable::Stroke(_) => unreachable!("object 0 is always the background"),
        }
    }

    /// Objects in paint order, background first.
    pub fn objects(&self) -> &[Drawable] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of strokes waiting in the redo buffer.
    pub fn undone_count(&self) -> usize {
        self.undone.len()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    pub fn container(&self) -> &SurfaceContainer {
        &self.container
    }

    pub fn is_drawing_mode_enabled(&self) -> bool {
        self.drawing_mode
    }

    pub fn brush_color(&self) -> BrushColor {
        self.brush_color
    }

    pub fn brush_width(&self) -> f64 {
        self.brush_width
    }

    /// Scale the view uniformly. Stored coordinates are unchanged; the
    /// visible height follows the zoom.
    pub fn set_view_zoom(&mut self, scale: f64) {
        self.camera.set_zoom(scale);
        let height = f64::from(self.background().height()) * scale;
        self.canvas_size.height = height;
        self.container.height = height;
        log::debug!("Surface {} zoom set to {}", self.index, scale);
    }

    pub fn set_brush_color(&mut self, color: BrushColor) {
        self.brush_color = color;
    }

    pub fn set_brush_width(&mut self, width: f64) {
        self.brush_width = width;
    }

    pub fn set_drawing_mode_enabled(&mut self, enabled: bool) {
        self.drawing_mode = enabled;
    }

    /// Add a finished user stroke.
    pub fn add_stroke(&mut self, stroke: Stroke) {
        self.add_object(Drawable::Stroke(stroke), Origin::User);
    }

    /// Remove the topmost stroke into the redo buffer.
    /// Returns false when only the background is left.
    pub fn undo(&mut self) -> bool {
        if self.objects.len() <= 1 {
            return false;
        }
        let Some(object) = self.objects.pop() else {
            return false;
        };
        log::debug!("Surface {} undo removed {}", self.index, object.id());
        self.undone.push(object);
        true
    }

    /// Restore the most recently undone stroke.
    /// Returns false when the redo buffer is empty.
    pub fn redo(&mut self) -> bool {
        match self.undone.pop() {
            Some(object) => {
                log::debug!("Surface {} redo restored {}", self.index, object.id());
                self.add_object(object, Origin::System);
                true
            }
            None => false,
        }
    }

    /// Drop every stroke waiting for redo.
    pub fn discard_undone(&mut self) {
        if !self.undone.is_empty() {
            log::debug!("Surface {} discarding {} undone strokes", self.index, self.undone.len());
            self.undone.clear();
        }
    }

    /// Subscribe to every add on this surface, user and system alike.
    pub fn observe_changes(&mut self) -> SurfaceChanges {
        let (tx, rx) = mpsc::channel();
        self.observers.push(tx);
        SurfaceChanges::new(self.index, rx)
    }

    /// Feed a pointer event in screen coordinates.
    ///
    /// Holding Alt on press starts a view pan instead of a stroke. Strokes
    /// are only started while drawing mode is on.
    pub fn handle_pointer(&mut self, event: PointerEvent, modifiers: Modifiers) {
        match event {
            PointerEvent::Down { position, button } => {
                if modifiers.alt {
                    self.gesture = Gesture::Panning { last: position };
                } else if button == MouseButton::Left && self.drawing_mode {
                    let mut stroke = Stroke::new(self.brush_color, self.brush_width);
                    stroke.add_point(self.camera.screen_to_canvas(position));
                    self.gesture = Gesture::Drawing { stroke };
                }
            }
            PointerEvent::Move { position } => match &mut self.gesture {
                Gesture::Panning { last } => {
                    self.camera.pan(position - *last);
                    *last = position;
                }
                Gesture::Drawing { stroke } => {
                    stroke.add_point(self.camera.screen_to_canvas(position));
                }
                Gesture::Idle => {}
            },
            PointerEvent::Up { position, .. } => match std::mem::take(&mut self.gesture) {
                Gesture::Drawing { mut stroke } => {
                    stroke.add_point(self.camera.screen_to_canvas(position));
                    self.add_stroke(stroke);
                }
                Gesture::Panning { .. } | Gesture::Idle => {}
            },
        }
    }

    fn add_object(&mut self, object: Drawable, origin: Origin) {
        let record = ChangeRecord::new(self.index, object.id(), ChangeKind::ObjectAdded, origin);
        self.objects.push(object);

        if origin == Origin::User {
            // A new edit invalidates whatever was waiting for redo.
            self.undone.clear();
        }

        self.observers.retain(|tx| tx.send(record.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WhiteboardError;
    use crate::shapes::DrawableId;
    use crate::test_support::{png_bytes, stroke, surface};
    use kurbo::Vec2;

    fn ids(page: &DrawingSurface) -> Vec<DrawableId> {
        page.objects().iter().map(Drawable::id).collect()
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_initialize() {
        let page = surface(3);
        assert_eq!(page.index(), 3);
        assert_eq!(page.object_count(), 1);
        assert!(page.objects()[0].is_background());
        assert!(page.is_drawing_mode_enabled());
        assert_eq!(page.canvas_size(), Size::new(300.0, 100.0));
        assert_eq!(page.container().id, "whiteboard-container-3");
        assert_eq!(page.container().canvas_id, "whiteboard-canvas-3");
        assert_eq!(page.background().width(), 200);
    }

    #[test]
    fn test_initialize_fails_on_bad_image() {
        let source = ImageSource::bytes("broken", vec![0, 1, 2, 3, 4]);
        let result = DrawingSurface::initialize(&source, 1, 300.0);
        assert!(matches!(result, Err(WhiteboardError::ImageLoad { .. })));
    }

    #[test]
    fn test_zoom_scales_view_only() {
        let mut page = surface(1);
        page.add_stroke(stroke());
        let before = page.objects()[1].as_stroke().unwrap().points.clone();

        page.set_view_zoom(1.25);

        assert!((page.canvas_size().height - 125.0).abs() < f64::EPSILON);
        assert!((page.container().height - 125.0).abs() < f64::EPSILON);
        assert!((page.canvas_size().width - 300.0).abs() < f64::EPSILON);
        assert_eq!(page.objects()[1].as_stroke().unwrap().points, before);
    }

    #[test]
    fn test_undo_all_strokes_leaves_background() {
        let mut page = surface(1);
        let background = page.objects()[0].id();
        for _ in 0..5 {
            page.add_stroke(stroke());
        }
        for _ in 0..5 {
            assert!(page.undo());
        }
        assert_eq!(ids(&page), vec![background]);
        assert!(!page.undo());
        assert_eq!(ids(&page), vec![background]);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut page = surface(1);
        page.add_stroke(stroke());
        page.add_stroke(stroke());
        let original = ids(&page);

        assert!(page.undo());
        assert!(page.redo());
        assert_eq!(ids(&page), original);

        assert!(page.undo());
        assert!(page.undo());
        assert!(page.redo());
        assert!(page.undo());
        assert_eq!(ids(&page), original[..1].to_vec());
    }

    #[test]
    fn test_redo_with_empty_buffer_is_noop() {
        let mut page = surface(1);
        page.add_stroke(stroke());
        assert!(!page.redo());
        assert_eq!(page.object_count(), 2);
    }

    #[test]
    fn test_new_stroke_clears_redo_buffer() {
        let mut page = surface(1);
        let a = stroke();
        let b = stroke();
        let c = stroke();
        let (a_id, b_id, c_id) = (a.id(), b.id(), c.id());
        let background = page.objects()[0].id();

        page.add_stroke(a);
        page.add_stroke(b);
        page.undo();
        assert_eq!(ids(&page), vec![background, a_id]);
        assert_eq!(page.undone.last().map(Drawable::id), Some(b_id));

        page.add_stroke(c);
        assert_eq!(ids(&page), vec![background, a_id, c_id]);
        assert_eq!(page.undone_count(), 0);
        assert!(!page.redo());
    }

    #[test]
    fn test_pointer_gesture_draws_stroke() {
        let mut page = surface(1);
        page.set_brush_color(BrushColor::rgb(255, 0, 0));
        page.set_brush_width(4.0);
        let changes = page.observe_changes();

        page.handle_pointer(down(10.0, 10.0), Modifiers::default());
        page.handle_pointer(PointerEvent::Move { position: Point::new(20.0, 15.0) }, Modifiers::default());
        page.handle_pointer(up(30.0, 20.0), Modifiers::default());

        assert_eq!(page.object_count(), 2);
        let drawn = page.objects()[1].as_stroke().unwrap();
        assert_eq!(drawn.len(), 3);
        assert_eq!(drawn.color, BrushColor::rgb(255, 0, 0));
        assert!((drawn.width - 4.0).abs() < f64::EPSILON);

        let records = changes.drain();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].origin, Origin::User);
    }

    #[test]
    fn test_pointer_points_are_canvas_space() {
        let mut page = surface(1);
        page.set_view_zoom(2.0);

        page.handle_pointer(down(20.0, 40.0), Modifiers::default());
        page.handle_pointer(up(20.0, 40.0), Modifiers::default());

        let drawn = page.objects()[1].as_stroke().unwrap();
        assert_eq!(drawn.points[0], Point::new(10.0, 20.0));
    }

    #[test]
    fn test_no_stroke_when_drawing_disabled() {
        let mut page = surface(1);
        page.set_drawing_mode_enabled(false);

        page.handle_pointer(down(10.0, 10.0), Modifiers::default());
        page.handle_pointer(up(20.0, 20.0), Modifiers::default());

        assert_eq!(page.object_count(), 1);
    }

    #[test]
    fn test_alt_drag_pans_view() {
        let mut page = surface(1);
        let alt = Modifiers {
            alt: true,
            ..Modifiers::default()
        };

        page.handle_pointer(down(10.0, 10.0), alt);
        page.handle_pointer(PointerEvent::Move { position: Point::new(25.0, 5.0) }, alt);
        page.handle_pointer(PointerEvent::Move { position: Point::new(30.0, 0.0) }, alt);
        page.handle_pointer(up(30.0, 0.0), alt);

        assert_eq!(page.camera().offset, Vec2::new(20.0, -10.0));
        assert_eq!(page.object_count(), 1);
    }

    #[test]
    fn test_brush_changes_apply_to_next_stroke_only() {
        let mut page = surface(1);
        page.handle_pointer(down(0.0, 0.0), Modifiers::default());
        page.handle_pointer(up(1.0, 1.0), Modifiers::default());

        page.set_brush_color(BrushColor::rgb(0, 255, 0));

        assert_eq!(page.objects()[1].as_stroke().unwrap().color, BrushColor::default());
    }

    #[test]
    fn test_dropped_observer_is_pruned() {
        let mut page = surface(1);
        drop(page.observe_changes());
        let kept = page.observe_changes();

        page.add_stroke(stroke());

        assert_eq!(page.observers.len(), 1);
        assert_eq!(kept.drain().len(), 1);
    }

    #[test]
    fn test_display_width_is_independent_of_image() {
        let source = ImageSource::bytes("wide", png_bytes(50, 80));
        let page = DrawingSurface::initialize(&source, 7, 640.0).unwrap();
        assert_eq!(page.canvas_size(), Size::new(640.0, 80.0));
    }
}
