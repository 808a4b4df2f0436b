//! Sheet: the whole project, an ordered collection of sprites.

use std::fmt;
use std::rc::Rc;

use super::format::SheetFormat;
use super::sprite::Sprite;
use crate::codec::DEFAULT_ENTRIES_PER_LINE;
use crate::error::{Result, XbmError};
use crate::observable::{CollectionEvent, ObservableCollection, Subscription};

/// Root of the model and unit of persistence.
///
/// Sprites are independently sized. The sheet owns them: removing a sprite
/// (directly, through `clear`, or by `deserialize`) releases its observers.
#[derive(Debug, Default)]
pub struct Sheet {
    sprites: ObservableCollection<Sprite>,
}

impl Sheet {
    /// A sheet holding `sprites` in order; repeated instances are kept once.
    pub fn new(sprites: impl IntoIterator<Item = Rc<Sprite>>) -> Self {
        let sheet = Self::default();
        sheet.sprites.add_all(sprites);
        sheet
    }

    /// Parse a sheet document into a new sheet.
    pub fn from_json(json: &str) -> Result<Self> {
        let sheet = Self::default();
        sheet.deserialize(&SheetFormat::from_json(json)?)?;
        Ok(sheet)
    }

    pub fn observe_sprites(
        &self,
        observer: impl Fn(&CollectionEvent<Sprite>) + 'static,
        notify_existing: bool,
    ) -> Subscription {
        self.sprites.add_observer(observer, notify_existing)
    }

    pub fn add_sprite(&self, sprite: Rc<Sprite>) -> Result<()> {
        self.insert_sprite(sprite, None)
    }

    /// Insert at `index` (`None` appends). The same instance cannot be added twice.
    pub fn insert_sprite(&self, sprite: Rc<Sprite>, index: Option<usize>) -> Result<()> {
        let name = sprite.name();
        if !self.sprites.add(sprite, index) {
            return Err(XbmError::invariant(format!("sprite '{}' is already in the sheet", name)));
        }
        log::debug!("added sprite '{}'", name);
        Ok(())
    }

    /// Remove `sprite` and release its observers and those of its frames.
    pub fn remove_sprite(&self, sprite: &Rc<Sprite>) -> Result<()> {
        if !self.sprites.remove(sprite) {
            return Err(XbmError::invariant(format!(
                "sprite '{}' is not part of the sheet",
                sprite.name()
            )));
        }
        sprite.terminate();
        log::debug!("removed sprite '{}'", sprite.name());
        Ok(())
    }

    pub fn move_sprite(&self, from: usize, to: usize) -> Result<()> {
        let count = self.len();
        if from >= count || to >= count {
            return Err(XbmError::invariant(format!(
                "cannot move sprite {} to {} in a sheet of {}",
                from, to, count
            )));
        }
        self.sprites.move_item(from, to);
        Ok(())
    }

    pub fn sprite(&self, index: usize) -> Option<Rc<Sprite>> {
        self.sprites.get(index)
    }

    pub fn sprites(&self) -> Vec<Rc<Sprite>> {
        self.sprites.items()
    }

    /// First sprite called `name`.
    pub fn find(&self, name: &str) -> Option<Rc<Sprite>> {
        self.sprites.items().into_iter().find(|sprite| sprite.name() == name)
    }

    pub fn sprite_names(&self) -> Vec<String> {
        self.sprites.items().iter().map(|sprite| sprite.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Remove every sprite, last first; observers see one `Remove` per sprite.
    pub fn clear(&self) {
        for sprite in self.sprites.clear() {
            sprite.terminate();
        }
    }

    pub fn serialize(&self) -> SheetFormat {
        SheetFormat { sprites: self.sprites.items().iter().map(|sprite| sprite.serialize()).collect() }
    }

    /// Replace every sprite with those described by `format`.
    ///
    /// All entries are validated and built before anything is touched, so on
    /// error the sheet keeps its current sprites and nobody is notified.
    pub fn deserialize(&self, format: &SheetFormat) -> Result<&Self> {
        let sprites = format
            .sprites
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                Sprite::from_format(entry)
                    .map(Rc::new)
                    .map_err(|e| XbmError::deserialization(index, e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.clear();
        self.sprites.add_all(sprites);
        log::debug!("sheet replaced with {} sprites", self.len());
        Ok(self)
    }

    /// C source for every sprite, separated by blank lines.
    pub fn to_c_source(&self, entries_per_line: usize) -> String {
        self.sprites
            .items()
            .iter()
            .map(|sprite| sprite.to_c_source(entries_per_line))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Like [`Sheet::to_c_source`], preceded by a block comment holding
    /// `header` (one line per entry). An empty header adds nothing.
    pub fn to_c_source_with_header(&self, header: &[String], entries_per_line: usize) -> String {
        let body = self.to_c_source(entries_per_line);
        if header.is_empty() {
            return body;
        }
        let comment: String = header.iter().map(|line| format!(" * {}\n", line)).collect();
        format!("/*\n{} */\n\n{}", comment, body)
    }
}

impl fmt::Display for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_c_source(DEFAULT_ENTRIES_PER_LINE))
    }
}
