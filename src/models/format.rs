//! Transfer format of sheet files (`*.json`).
//!
//! ```json
//! { "sprites": [ { "name": "hero", "width": 8, "height": 14,
//!                  "data": [[0, 24, ...], [0, 24, ...]], "previewMode": 2 } ] }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::preview::PreviewMode;
use crate::error::{Result, XbmError};

/// Packed bytes of one frame. The size comes from the owning sprite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameFormat {
    pub data: Vec<u8>,
}

/// One sprite: name, size, one packed byte array per frame, preview mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteFormat {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub data: Vec<Vec<u8>>,
    /// Missing in files written before preview modes existed.
    #[serde(rename = "previewMode", default)]
    pub preview_mode: PreviewMode,
}

/// A whole sheet: sprites in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SheetFormat {
    pub sprites: Vec<SpriteFormat>,
}

#[derive(Deserialize)]
struct RawSheet {
    sprites: Vec<Value>,
}

impl SheetFormat {
    /// Parse a sheet document.
    ///
    /// A document that is not an object with a `sprites` array fails with
    /// [`XbmError::Json`]; a malformed sprite entry fails with
    /// [`XbmError::Deserialization`] naming the entry's index.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSheet = serde_json::from_str(json)?;
        let sprites = raw
            .sprites
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value::<SpriteFormat>(value)
                    .map_err(|e| XbmError::deserialization(index, e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        log::debug!("parsed sheet document with {} sprites", sprites.len());
        Ok(SheetFormat { sprites })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
