//! Sprite: a named, ordered sequence of same-sized frames.

use std::fmt;
use std::rc::Rc;

use super::format::SpriteFormat;
use super::frame::Frame;
use super::preview::PreviewMode;
use crate::codec::{self, Size, DEFAULT_ENTRIES_PER_LINE};
use crate::error::{Result, XbmError};
use crate::observable::{
    CollectionEvent, ObservableCollection, ObservableValue, Subscription,
};

/// A named animation (or a single static bitmap).
///
/// All frames share the sprite's size, which never changes. Frames are owned
/// by the sprite: removing one detaches its observers.
#[derive(Debug)]
pub struct Sprite {
    size: Size,
    name: ObservableValue<String>,
    frames: ObservableCollection<Frame>,
    preview_mode: ObservableValue<PreviewMode>,
}

impl Sprite {
    /// A sprite without frames.
    pub fn new(width: u32, height: u32, name: &str) -> Result<Self> {
        Ok(Self {
            size: Size::new(width, height)?,
            name: ObservableValue::new(name.trim().to_string()),
            frames: ObservableCollection::new(),
            preview_mode: ObservableValue::new(PreviewMode::default()),
        })
    }

    /// A sprite with exactly one blank frame.
    pub fn single(width: u32, height: u32, name: &str) -> Result<Self> {
        let sprite = Self::new(width, height, name)?;
        sprite.insert_frame(Some(0));
        Ok(sprite)
    }

    /// A sprite with one frame per packed byte array.
    ///
    /// Every array must be exactly as long as the frame size requires.
    pub fn from_data<B: AsRef<[u8]>>(width: u32, height: u32, frames: &[B], name: &str) -> Result<Self> {
        let sprite = Self::new(width, height, name)?;
        let expected = sprite.frame_byte_size();
        for (index, bytes) in frames.iter().enumerate() {
            let bytes = bytes.as_ref();
            if bytes.len() != expected {
                return Err(XbmError::invariant(format!(
                    "frame {} of '{}' has {} bytes, a {} frame needs {}",
                    index,
                    sprite.name(),
                    bytes.len(),
                    sprite.size,
                    expected
                )));
            }
            sprite.insert_frame(None).write_data(bytes)?;
        }
        Ok(sprite)
    }

    /// Rebuild a sprite from its transfer format.
    pub fn from_format(format: &SpriteFormat) -> Result<Self> {
        let sprite = Self::from_data(format.width, format.height, &format.data, &format.name)?;
        sprite.set_preview_mode(format.preview_mode);
        Ok(sprite)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn name(&self) -> String {
        self.name.get()
    }

    /// Rename; surrounding whitespace is dropped. Returns whether the name changed.
    pub fn set_name(&self, name: &str) -> bool {
        self.name.set(name.trim().to_string())
    }

    pub fn observe_name(&self, observer: impl Fn(&String) + 'static) -> Subscription {
        self.name.add_observer(observer)
    }

    pub fn preview_mode(&self) -> PreviewMode {
        self.preview_mode.get()
    }

    pub fn set_preview_mode(&self, mode: PreviewMode) -> bool {
        self.preview_mode.set(mode)
    }

    pub fn observe_preview_mode(&self, observer: impl Fn(&PreviewMode) + 'static) -> Subscription {
        self.preview_mode.add_observer(observer)
    }

    /// Observe frame insertions, removals and reordering.
    pub fn observe_frames(
        &self,
        observer: impl Fn(&CollectionEvent<Frame>) + 'static,
        notify_existing: bool,
    ) -> Subscription {
        self.frames.add_observer(observer, notify_existing)
    }

    /// Insert a blank frame at `index` (`None` appends) and return it.
    pub fn insert_frame(&self, index: Option<usize>) -> Rc<Frame> {
        let frame = Rc::new(Frame::new(self.size));
        self.frames.add(Rc::clone(&frame), index);
        log::trace!("'{}': inserted frame, now {}", self.name(), self.frame_count());
        frame
    }

    /// Duplicate the frame at `index`; the copy goes right after it.
    pub fn copy_frame(&self, index: usize) -> Result<Rc<Frame>> {
        let source = self.frame(index).ok_or_else(|| self.missing_frame(index))?;
        let copy = self.insert_frame(Some(index + 1));
        source.with_data(|data| copy.write_data(data))?;
        Ok(copy)
    }

    /// Remove `frame` and release its observers.
    pub fn remove_frame(&self, frame: &Rc<Frame>) -> Result<()> {
        if !self.frames.remove(frame) {
            return Err(XbmError::invariant(format!(
                "frame is not part of sprite '{}'",
                self.name()
            )));
        }
        frame.terminate();
        Ok(())
    }

    pub fn move_frame(&self, from: usize, to: usize) -> Result<()> {
        let count = self.frame_count();
        if from >= count {
            return Err(self.missing_frame(from));
        }
        if to >= count {
            return Err(self.missing_frame(to));
        }
        self.frames.move_item(from, to);
        Ok(())
    }

    fn missing_frame(&self, index: usize) -> XbmError {
        XbmError::invariant(format!(
            "sprite '{}' has no frame {} ({} frames)",
            self.name(),
            index,
            self.frame_count()
        ))
    }

    pub fn frame(&self, index: usize) -> Option<Rc<Frame>> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> Vec<Rc<Frame>> {
        self.frames.items()
    }

    pub fn index_of(&self, frame: &Rc<Frame>) -> Option<usize> {
        self.frames.index_of(frame)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_single_frame(&self) -> bool {
        self.frame_count() == 1
    }

    pub fn frame_byte_size(&self) -> usize {
        codec::byte_size(self.size)
    }

    pub fn serialize(&self) -> SpriteFormat {
        SpriteFormat {
            name: self.name(),
            width: self.size.width,
            height: self.size.height,
            data: self.frames.items().iter().map(|frame| frame.data()).collect(),
            preview_mode: self.preview_mode(),
        }
    }

    /// C source for this sprite.
    ///
    /// A single frame is emitted as a flat `<name>_xbm[]`; anything else as
    /// `<name>_xbm[frames][bytes]` with one braced block per frame.
    pub fn to_c_source(&self, entries_per_line: usize) -> String {
        let name = self.name();
        let frames = self.frames.items();
        if let [frame] = frames.as_slice() {
            return frame.to_c_source(&name, entries_per_line);
        }
        let blocks: Vec<String> = frames
            .iter()
            .map(|frame| {
                let block =
                    frame.with_data(|data| codec::write_data_block(data, "\t\t", entries_per_line));
                format!("\n\t{{\n{}\n\t}}", block)
            })
            .collect();
        format!(
            "{}static unsigned char {}_xbm[{}][{}] PROGMEM = {{{}\n}};",
            codec::write_header(self.size, &name),
            name,
            frames.len(),
            self.frame_byte_size(),
            blocks.join(",")
        )
    }

    /// Release every observer of the sprite and of its frames.
    pub fn terminate(&self) {
        self.name.terminate();
        self.preview_mode.terminate();
        for frame in self.frames.items() {
            frame.terminate();
        }
        self.frames.terminate();
    }
}

impl fmt::Display for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_c_source(DEFAULT_ENTRIES_PER_LINE))
    }
}
