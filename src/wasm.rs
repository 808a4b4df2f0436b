//! WASM API module for browser/JS interop
//!
//! Exposes a sheet to the browser editor: loading and saving the JSON
//! document, C export, sprite creation and pixel editing. Sprites and
//! frames are addressed by index.

use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::models::{Frame, Sheet, Sprite};
use crate::renderer::{render_frame, Palette};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A sheet owned by JavaScript.
#[wasm_bindgen]
#[derive(Default)]
pub struct WasmSheet {
    sheet: Sheet,
}

#[wasm_bindgen]
impl WasmSheet {
    /// An empty sheet
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmSheet {
        WasmSheet::default()
    }

    /// Parse a sheet document
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(json: &str) -> Result<WasmSheet, JsValue> {
        Sheet::from_json(json).map(|sheet| WasmSheet { sheet }).map_err(js_error)
    }

    /// Replace the content with a sheet document; unchanged on error
    #[wasm_bindgen(js_name = loadJson)]
    pub fn load_json(&self, json: &str) -> Result<(), JsValue> {
        let format = crate::models::SheetFormat::from_json(json).map_err(js_error)?;
        self.sheet.deserialize(&format).map_err(js_error)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.sheet.serialize().to_json().map_err(js_error)
    }

    /// C source of the whole sheet
    #[wasm_bindgen(js_name = toCSource)]
    pub fn to_c_source(&self, entries_per_line: usize) -> String {
        self.sheet.to_c_source(entries_per_line)
    }

    #[wasm_bindgen(js_name = spriteCount)]
    pub fn sprite_count(&self) -> usize {
        self.sheet.len()
    }

    #[wasm_bindgen(js_name = spriteNames)]
    pub fn sprite_names(&self) -> Vec<String> {
        self.sheet.sprite_names()
    }

    /// Append a sprite with `frames` blank frames; returns its index
    #[wasm_bindgen(js_name = addSprite)]
    pub fn add_sprite(&self, width: u32, height: u32, name: &str, frames: u32) -> Result<usize, JsValue> {
        let sprite = Sprite::new(width, height, name).map_err(js_error)?;
        for _ in 0..frames.max(1) {
            sprite.insert_frame(None);
        }
        self.sheet.add_sprite(Rc::new(sprite)).map_err(js_error)?;
        Ok(self.sheet.len() - 1)
    }

    #[wasm_bindgen(js_name = removeSprite)]
    pub fn remove_sprite(&self, sprite: usize) -> Result<(), JsValue> {
        let target = self.sprite(sprite)?;
        self.sheet.remove_sprite(&target).map_err(js_error)
    }

    #[wasm_bindgen(js_name = renameSprite)]
    pub fn rename_sprite(&self, sprite: usize, name: &str) -> Result<bool, JsValue> {
        Ok(self.sprite(sprite)?.set_name(name))
    }

    #[wasm_bindgen(js_name = frameCount)]
    pub fn frame_count(&self, sprite: usize) -> Result<usize, JsValue> {
        Ok(self.sprite(sprite)?.frame_count())
    }

    /// Duplicate a frame; returns the index of the copy
    #[wasm_bindgen(js_name = copyFrame)]
    pub fn copy_frame(&self, sprite: usize, frame: usize) -> Result<usize, JsValue> {
        self.sprite(sprite)?.copy_frame(frame).map_err(js_error)?;
        Ok(frame + 1)
    }

    #[wasm_bindgen(js_name = removeFrame)]
    pub fn remove_frame(&self, sprite: usize, frame: usize) -> Result<(), JsValue> {
        let target = self.sprite(sprite)?;
        let frame = self.frame(sprite, frame)?;
        target.remove_frame(&frame).map_err(js_error)
    }

    #[wasm_bindgen(js_name = getPixel)]
    pub fn get_pixel(&self, sprite: usize, frame: usize, x: u32, y: u32) -> Result<bool, JsValue> {
        self.frame(sprite, frame)?.get_pixel(x, y).map_err(js_error)
    }

    #[wasm_bindgen(js_name = setPixel)]
    pub fn set_pixel(&self, sprite: usize, frame: usize, x: u32, y: u32, on: bool) -> Result<(), JsValue> {
        self.frame(sprite, frame)?.set_pixel(x, y, on).map_err(js_error)
    }

    #[wasm_bindgen(js_name = togglePixel)]
    pub fn toggle_pixel(&self, sprite: usize, frame: usize, x: u32, y: u32) -> Result<bool, JsValue> {
        self.frame(sprite, frame)?.toggle_pixel(x, y).map_err(js_error)
    }

    #[wasm_bindgen(js_name = shiftFrame)]
    pub fn shift_frame(&self, sprite: usize, frame: usize, dx: i32, dy: i32) -> Result<(), JsValue> {
        self.frame(sprite, frame)?.shift(dx, dy);
        Ok(())
    }

    /// Packed XBM bytes of a frame
    #[wasm_bindgen(js_name = frameData)]
    pub fn frame_data(&self, sprite: usize, frame: usize) -> Result<Vec<u8>, JsValue> {
        Ok(self.frame(sprite, frame)?.data())
    }

    /// Frame as raw RGBA pixels (4 bytes per pixel), black on white
    #[wasm_bindgen(js_name = frameRgba)]
    pub fn frame_rgba(&self, sprite: usize, frame: usize) -> Result<Vec<u8>, JsValue> {
        Ok(render_frame(&self.frame(sprite, frame)?, Palette::default()).into_raw())
    }

    /// Frame index the preview shows at animation step `tick`
    /// (`undefined` for tiled previews)
    #[wasm_bindgen(js_name = previewFrame)]
    pub fn preview_frame(&self, sprite: usize, tick: usize) -> Result<Option<usize>, JsValue> {
        let target = self.sprite(sprite)?;
        Ok(target.preview_mode().frame_index(tick, target.frame_count()))
    }

    /// Advance to the next preview mode; returns its numeric code
    #[wasm_bindgen(js_name = cyclePreviewMode)]
    pub fn cycle_preview_mode(&self, sprite: usize) -> Result<u8, JsValue> {
        let target = self.sprite(sprite)?;
        let next = target.preview_mode().next();
        target.set_preview_mode(next);
        Ok(next.code())
    }
}

impl WasmSheet {
    fn sprite(&self, index: usize) -> Result<Rc<Sprite>, JsValue> {
        self.sheet
            .sprite(index)
            .ok_or_else(|| JsValue::from_str(&format!("no sprite {}", index)))
    }

    fn frame(&self, sprite: usize, index: usize) -> Result<Rc<Frame>, JsValue> {
        self.sprite(sprite)?
            .frame(index)
            .ok_or_else(|| JsValue::from_str(&format!("sprite {} has no frame {}", sprite, index)))
    }
}
