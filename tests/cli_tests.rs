//! CLI integration tests for the `xbm` binary.
//!
//! Every test works on a sheet in its own temporary directory, which is also
//! the working directory and config home of the process, so no stray
//! `xbm.toml` is picked up.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Path to the xbm binary built for this test run.
fn xbm_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_xbm"))
}

/// Run xbm in `dir` and return (stdout, stderr, exit code).
fn run(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(xbm_binary())
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute xbm");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

const SHEET: &str = r#"{"sprites":[
  {"name":"dot","width":8,"height":2,"data":[[24,60]],"previewMode":0},
  {"name":"blink","width":8,"height":1,"data":[[1],[2]],"previewMode":1}
]}"#;

const DOT_SOURCE: &str = "#define dot_width 8\n#define dot_height 2\n\
static unsigned char dot_xbm[] PROGMEM = {\n\t0x18,0x3C\n};";

const BLINK_SOURCE: &str = "#define blink_width 8\n#define blink_height 1\n\
static unsigned char blink_xbm[2][1] PROGMEM = {\n\t{\n\t\t0x01\n\t},\n\t{\n\t\t0x02\n\t}\n};";

fn write_sheet(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("sheet.json");
    fs::write(&path, SHEET).unwrap();
    path
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================================
// new / info
// ============================================================================

#[test]
fn test_new_creates_sheet() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) =
        run(dir.path(), &["new", "art.json", "--name", "hero", "--size", "8x14", "--frames", "3"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Added 'hero' (8x14, 3 frame(s))"), "{}", stdout);

    let json = read_json(&dir.path().join("art.json"));
    let sprite = &json["sprites"][0];
    assert_eq!(sprite["name"], "hero");
    assert_eq!(sprite["width"], 8);
    assert_eq!(sprite["height"], 14);
    assert_eq!(sprite["previewMode"], 0);
    assert_eq!(sprite["data"].as_array().unwrap().len(), 3);
    assert_eq!(sprite["data"][0].as_array().unwrap().len(), 14);
}

#[test]
fn test_new_uses_config_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("xbm.toml"),
        "[defaults]\nwidth = 16\nheight = 4\nname = \"tile\"\n",
    )
    .unwrap();
    let (_, stderr, code) = run(dir.path(), &["new", "art.json"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let json = read_json(&dir.path().join("art.json"));
    assert_eq!(json["sprites"][0]["name"], "tile");
    assert_eq!(json["sprites"][0]["data"][0].as_array().unwrap().len(), 8);
}

#[test]
fn test_new_rejects_bad_size() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run(dir.path(), &["new", "art.json", "--size", "0x8"]);
    assert_eq!(code, 2);
    assert!(!dir.path().join("art.json").exists());
}

#[test]
fn test_info_lists_sprites() {
    let dir = TempDir::new().unwrap();
    write_sheet(&dir);
    let (stdout, _, code) = run(dir.path(), &["info", "sheet.json"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("2 sprite(s)"));
    assert!(stdout.contains("dot"));
    assert!(stdout.contains("loop"));

    let (stdout, _, code) = run(dir.path(), &["info", "sheet.json", "--json"]);
    assert_eq!(code, 0);
    let rows: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(rows[1]["name"], "blink");
    assert_eq!(rows[1]["frames"], 2);
    assert_eq!(rows[0]["bytes_per_frame"], 2);
}

#[test]
fn test_info_reports_bad_sprite_index() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(
        &path,
        r#"{"sprites":[{"name":"ok","width":8,"height":1,"data":[[0]]},{"name":"bad","width":8,"height":2,"data":[[0]]}]}"#,
    )
    .unwrap();
    let (_, stderr, code) = run(dir.path(), &["info", "broken.json"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("sprite #1"), "{}", stderr);
}

// ============================================================================
// export
// ============================================================================

#[test]
fn test_export_to_stdout() {
    let dir = TempDir::new().unwrap();
    write_sheet(&dir);
    let (stdout, stderr, code) = run(dir.path(), &["export", "sheet.json"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(stdout, format!("{}\n\n{}\n", DOT_SOURCE, BLINK_SOURCE));
}

#[test]
fn test_export_single_sprite_to_file() {
    let dir = TempDir::new().unwrap();
    write_sheet(&dir);
    let (_, stderr, code) =
        run(dir.path(), &["export", "sheet.json", "--sprite", "blink", "-o", "out/blink.h"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let written = fs::read_to_string(dir.path().join("out/blink.h")).unwrap();
    assert_eq!(written, format!("{}\n", BLINK_SOURCE));
}

#[test]
fn test_export_header_and_line_width_from_config() {
    let dir = TempDir::new().unwrap();
    write_sheet(&dir);
    fs::write(
        dir.path().join("xbm.toml"),
        "[export]\nentries_per_line = 1\nheader = [\"generated sprites\"]\n",
    )
    .unwrap();

    let (stdout, _, code) = run(dir.path(), &["export", "sheet.json"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("/*\n * generated sprites\n */\n\n#define dot_width 8\n"));
    assert!(stdout.contains("PROGMEM = {\n\t0x18,\n\t0x3C\n};"));

    // flags override the file
    let (stdout, _, code) =
        run(dir.path(), &["export", "sheet.json", "--no-header", "--entries-per-line", "8"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, format!("{}\n\n{}\n", DOT_SOURCE, BLINK_SOURCE));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    write_sheet(&dir);
    fs::write(dir.path().join("xbm.toml"), "[render]\nscale = 0\n").unwrap();
    let (_, stderr, code) = run(dir.path(), &["export", "sheet.json"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("render.scale"), "{}", stderr);
}

// ============================================================================
// draw / show
// ============================================================================

#[test]
fn test_draw_and_show() {
    let dir = TempDir::new().unwrap();
    let path = write_sheet(&dir);
    let (_, stderr, code) = run(
        dir.path(),
        &["draw", "sheet.json", "--sprite", "dot", "--clear", "--set", "0,0", "--set", "7,1"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(read_json(&path)["sprites"][0]["data"][0], serde_json::json!([1, 128]));

    let (stdout, _, code) = run(dir.path(), &["show", "sheet.json", "--sprite", "dot"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("#.......\n.......#\n"), "{}", stdout);
}

#[test]
fn test_draw_shift_negative() {
    let dir = TempDir::new().unwrap();
    let path = write_sheet(&dir);
    let (_, stderr, code) =
        run(dir.path(), &["draw", "sheet.json", "--sprite", "blink", "--frame", "1", "--shift", "-1,0"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(read_json(&path)["sprites"][1]["data"][1], serde_json::json!([1]));
}

#[test]
fn test_draw_out_of_range_leaves_file() {
    let dir = TempDir::new().unwrap();
    let path = write_sheet(&dir);
    let (_, stderr, code) =
        run(dir.path(), &["draw", "sheet.json", "--sprite", "dot", "--set", "1,1", "--set", "8,0"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("outside the 8x2 bitmap"), "{}", stderr);
    assert_eq!(fs::read_to_string(&path).unwrap(), SHEET);
}

#[test]
fn test_draw_dry_run() {
    let dir = TempDir::new().unwrap();
    let path = write_sheet(&dir);
    let (stdout, _, code) =
        run(dir.path(), &["draw", "sheet.json", "--sprite", "blink", "--toggle", "0,0", "--dry-run"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "........\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), SHEET);
}

#[test]
fn test_unknown_sprite_suggests() {
    let dir = TempDir::new().unwrap();
    write_sheet(&dir);
    let (_, stderr, code) = run(dir.path(), &["show", "sheet.json", "--sprite", "blnk"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Did you mean 'blink'?"), "{}", stderr);
}

// ============================================================================
// frame / rename / remove / mode
// ============================================================================

#[test]
fn test_frame_commands() {
    let dir = TempDir::new().unwrap();
    let path = write_sheet(&dir);
    let frames = |path: &Path| read_json(path)["sprites"][1]["data"].clone();

    let (_, _, code) = run(dir.path(), &["frame", "copy", "sheet.json", "--sprite", "blink", "1"]);
    assert_eq!(code, 0);
    assert_eq!(frames(&path), serde_json::json!([[1], [2], [2]]));

    let (_, _, code) = run(dir.path(), &["frame", "add", "sheet.json", "--sprite", "blink", "--at", "0"]);
    assert_eq!(code, 0);
    assert_eq!(frames(&path), serde_json::json!([[0], [1], [2], [2]]));

    let (_, _, code) = run(dir.path(), &["frame", "move", "sheet.json", "--sprite", "blink", "0", "3"]);
    assert_eq!(code, 0);
    assert_eq!(frames(&path), serde_json::json!([[1], [2], [2], [0]]));

    let (_, _, code) = run(dir.path(), &["frame", "remove", "sheet.json", "--sprite", "blink", "1"]);
    assert_eq!(code, 0);
    assert_eq!(frames(&path), serde_json::json!([[1], [2], [0]]));

    let (_, _, code) = run(dir.path(), &["frame", "remove", "sheet.json", "--sprite", "blink", "9"]);
    assert_eq!(code, 2);
}

#[test]
fn test_cannot_remove_last_frame() {
    let dir = TempDir::new().unwrap();
    write_sheet(&dir);
    let (_, stderr, code) = run(dir.path(), &["frame", "remove", "sheet.json", "--sprite", "dot", "0"]);
    assert_eq!(code, 2);
    assert!(stderr.contains("only frame"));
}

#[test]
fn test_rename_remove_and_mode() {
    let dir = TempDir::new().unwrap();
    let path = write_sheet(&dir);

    let (_, _, code) = run(dir.path(), &["rename", "sheet.json", "dot", "  pip "]);
    assert_eq!(code, 0);
    assert_eq!(read_json(&path)["sprites"][0]["name"], "pip");

    let (stdout, _, code) = run(dir.path(), &["mode", "sheet.json", "blink"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "blink: alternate\n");
    let (_, _, code) = run(dir.path(), &["mode", "sheet.json", "blink", "tile"]);
    assert_eq!(code, 0);
    assert_eq!(read_json(&path)["sprites"][1]["previewMode"], 3);

    let (_, _, code) = run(dir.path(), &["remove", "sheet.json", "pip"]);
    assert_eq!(code, 0);
    let json = read_json(&path);
    assert_eq!(json["sprites"].as_array().unwrap().len(), 1);
    assert_eq!(json["sprites"][0]["name"], "blink");
}

// ============================================================================
// import / render
// ============================================================================

#[test]
fn test_import_png() {
    let dir = TempDir::new().unwrap();
    let mut image = image::RgbaImage::from_pixel(10, 2, image::Rgba([0, 0, 0, 255]));
    image.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));
    image.put_pixel(9, 1, image::Rgba([200, 0, 0, 255]));
    image.save(dir.path().join("logo.png")).unwrap();

    let (_, stderr, code) = run(dir.path(), &["import", "logo.png", "--sheet", "art.json"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let json = read_json(&dir.path().join("art.json"));
    assert_eq!(json["sprites"][0]["name"], "logo");
    assert_eq!(json["sprites"][0]["data"][0], serde_json::json!([1, 0, 0, 2]));

    // wrong size for an existing 8x2 sprite
    write_sheet(&dir);
    let (_, _, code) =
        run(dir.path(), &["import", "logo.png", "--sheet", "sheet.json", "--sprite", "dot"]);
    assert_eq!(code, 2);
}

#[test]
fn test_render_png_and_gif() {
    let dir = TempDir::new().unwrap();
    write_sheet(&dir);

    let (_, stderr, code) = run(dir.path(), &["render", "sheet.json", "--scale", "2"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    let dot = image::open(dir.path().join("sheet_dot.png")).unwrap().to_rgba8();
    assert_eq!(dot.dimensions(), (16, 4));
    assert_eq!(*dot.get_pixel(6, 0), image::Rgba([0, 0, 0, 255]));
    assert_eq!(*dot.get_pixel(0, 0), image::Rgba([255, 255, 255, 255]));
    assert!(dir.path().join("sheet_blink.png").exists());

    let (_, stderr, code) =
        run(dir.path(), &["render", "sheet.json", "--sprite", "blink", "--gif", "-o", "anim/"]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(dir.path().join("anim/blink.gif").exists());
}

#[test]
fn test_render_spritesheet() {
    let dir = TempDir::new().unwrap();
    write_sheet(&dir);
    let (stdout, stderr, code) = run(
        dir.path(),
        &["render", "sheet.json", "--spritesheet", "--cols", "2", "--on-color", "#FF0000", "-o", "all.png"],
    );
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("16x4"), "{}", stdout);
    let image = image::open(dir.path().join("all.png")).unwrap().to_rgba8();
    assert_eq!(*image.get_pixel(3, 0), image::Rgba([255, 0, 0, 255]));
}

#[test]
fn test_missing_sheet_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run(dir.path(), &["info", "nope.json"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("Error: cannot load 'nope.json'"), "{}", stderr);
}
