//! PageInk Core Library
//!
//! Drawing surfaces backed by page images, the change-notification protocol
//! between them, and the global undo/redo timeline that spans every page.

pub mod broadcast;
pub mod camera;
pub mod changes;
pub mod color;
pub mod config;
pub mod error;
pub mod history;
pub mod input;
pub mod session;
pub mod shapes;
pub mod surface;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcast::{SelectionBroadcastChannel, Subscription, SubscriptionId};
pub use camera::Camera;
pub use changes::{ChangeKind, ChangeRecord, ChangeStream, Origin, SurfaceChanges};
pub use color::BrushColor;
pub use config::WhiteboardConfig;
pub use error::{Result, WhiteboardError};
pub use history::UndoRedoCoordinator;
pub use input::{InputModeController, KeyCommand, KeyEvent, Modifiers, MouseButton, PointerEvent, ToolMode};
pub use session::{Layout, MountTarget, Session};
pub use shapes::{BackgroundImage, Drawable, DrawableId, ImageSource, Stroke};
pub use surface::{DrawingSurface, SurfaceContainer, SurfaceId};
