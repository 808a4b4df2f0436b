//! Data models of an XBM sheet (frames, sprites, the sheet itself)
//! and their JSON transfer formats.

mod format;
mod frame;
mod preview;
mod sheet;
mod sprite;

// Re-export all public types
pub use format::{FrameFormat, SheetFormat, SpriteFormat};
pub use frame::Frame;
pub use preview::PreviewMode;
pub use sheet::Sheet;
pub use sprite::Sprite;
