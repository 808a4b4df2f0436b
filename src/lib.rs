//! XBM sprite sheets - editor core and toolchain for monochrome bitmaps
//!
//! This library provides functionality to:
//! - Edit packed-bit frames, multi-frame sprites and whole sheets with change notifications
//! - Save and load sheets as JSON documents
//! - Export sprites as C arrays for embedded displays
//! - Import images and render frames to PNG, GIF and the terminal

pub mod cli;
pub mod codec;
pub mod color;
pub mod config;
pub mod error;
pub mod gif;
pub mod import;
pub mod models;
pub mod observable;
pub mod output;
pub mod renderer;
pub mod spritesheet;
pub mod suggest;
pub mod terminal;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Result, XbmError};
