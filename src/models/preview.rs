//! Preview mode: how a sprite's frames are shown in the editor preview.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::XbmError;

/// Display hint persisted with a sprite.
///
/// Stored in sheet files as its numeric code (`0..=3`).
///
/// | Mode | Code | Preview |
/// |------|------|---------|
/// | `first` | 0 | first frame only |
/// | `loop` | 1 | frames in order, repeating |
/// | `alternate` | 2 | ping-pong: forward then backward |
/// | `tile` | 3 | all frames side by side |
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum PreviewMode {
    #[default]
    First,
    Loop,
    Alternate,
    Tile,
}

impl PreviewMode {
    pub const ALL: [PreviewMode; 4] =
        [PreviewMode::First, PreviewMode::Loop, PreviewMode::Alternate, PreviewMode::Tile];

    pub fn code(self) -> u8 {
        match self {
            PreviewMode::First => 0,
            PreviewMode::Loop => 1,
            PreviewMode::Alternate => 2,
            PreviewMode::Tile => 3,
        }
    }

    /// The mode after this one, wrapping back to `First`.
    pub fn next(self) -> Self {
        Self::ALL[(self.code() as usize + 1) % Self::ALL.len()]
    }

    /// Frame shown at animation step `tick`, or `None` when the preview shows
    /// every frame at once (`Tile`) or there is nothing to show.
    ///
    /// # Examples
    ///
    /// ```
    /// use xbm_editor::models::PreviewMode;
    ///
    /// let steps: Vec<_> = (0..6).map(|t| PreviewMode::Alternate.frame_index(t, 3).unwrap()).collect();
    /// assert_eq!(steps, vec![2, 1, 0, 1, 2, 1]);
    /// assert_eq!(PreviewMode::Loop.frame_index(4, 3), Some(1));
    /// assert_eq!(PreviewMode::Tile.frame_index(4, 3), None);
    /// ```
    pub fn frame_index(self, tick: usize, frame_count: usize) -> Option<usize> {
        if frame_count == 0 {
            return None;
        }
        if frame_count == 1 {
            return Some(0);
        }
        match self {
            PreviewMode::First => Some(0),
            PreviewMode::Loop => Some(tick % frame_count),
            PreviewMode::Alternate => {
                let m = frame_count - 1;
                Some(m.abs_diff(tick % (m << 1)))
            }
            PreviewMode::Tile => None,
        }
    }

    /// One full cycle of frame indices for an animated preview.
    ///
    /// `First` yields a single entry, `Tile` yields every frame once.
    pub fn sequence(self, frame_count: usize) -> Vec<usize> {
        match self {
            _ if frame_count == 0 => Vec::new(),
            PreviewMode::First => vec![0],
            PreviewMode::Tile => (0..frame_count).collect(),
            PreviewMode::Loop => (0..frame_count).collect(),
            PreviewMode::Alternate => {
                let period = if frame_count == 1 { 1 } else { (frame_count - 1) * 2 };
                (0..period).filter_map(|tick| self.frame_index(tick, frame_count)).collect()
            }
        }
    }
}

impl From<PreviewMode> for u8 {
    fn from(mode: PreviewMode) -> u8 {
        mode.code()
    }
}

impl TryFrom<u8> for PreviewMode {
    type Error = XbmError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        PreviewMode::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| XbmError::invariant(format!("unknown preview mode {}", code)))
    }
}

impl std::fmt::Display for PreviewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewMode::First => write!(f, "first"),
            PreviewMode::Loop => write!(f, "loop"),
            PreviewMode::Alternate => write!(f, "alternate"),
            PreviewMode::Tile => write!(f, "tile"),
        }
    }
}
