//! Drawable objects held by a surface's canvas.

mod background;
mod stroke;

pub use background::{BackgroundImage, ImageFormat, ImageSource};
pub use stroke::Stroke;

use uuid::Uuid;

/// Unique identifier for drawables.
pub type DrawableId = Uuid;

/// Anything that can sit in a surface's object sequence.
///
/// The sequence always starts with exactly one `Background`; every later
/// entry is a `Stroke`.
#[derive(Debug, Clone)]
pub enum Drawable {
    Background(BackgroundImage),
    Stroke(Stroke),
}

impl Drawable {
    pub fn id(&self) -> DrawableId {
        match self {
            Drawable::Background(image) => image.id(),
            Drawable::Stroke(stroke) => stroke.id(),
        }
    }

    pub fn is_background(&self) -> bool {
        matches!(self, Drawable::Background(_))
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Drawable::Stroke(stroke) => Some(stroke),
            Drawable::Background(_) => None,
        }
    }
}

impl From<Stroke> for Drawable {
    fn from(stroke: Stroke) -> Self {
        Drawable::Stroke(stroke)
    }
}
