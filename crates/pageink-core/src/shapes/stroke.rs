//! Freehand stroke drawn with the brush.

use super::DrawableId;
use crate::color::BrushColor;
use kurbo::{BezPath, Point, Rect};
use uuid::Uuid;

/// A freehand stroke (series of canvas-space points).
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    id: DrawableId,
    /// Points in canvas coordinates.
    pub points: Vec<Point>,
    pub color: BrushColor,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: BrushColor, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            color,
            width,
        }
    }

    pub fn from_points(points: Vec<Point>, color: BrushColor, width: f64) -> Self {
        Self {
            points,
            ..Self::new(color, width)
        }
    }

    pub fn id(&self) -> DrawableId {
        self.id
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the points, ignoring stroke width.
    pub fn bounds(&self) -> Option<Rect> {
        let (first, rest) = self.points.split_first()?;
        Some(
            rest.iter()
                .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p)),
        )
    }

    /// Polyline path through the points, for renderers.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = self.points.split_first() {
            path.move_to(*first);
            for point in rest {
                path.line_to(*point);
            }
        }
        path
    }
}
