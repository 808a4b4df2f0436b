//! Export command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::output;

use super::{find_sprite, finish, load_settings, open_sheet, EXIT_ERROR};

/// Execute the export command
pub fn run_export(
    sheet_path: &Path,
    output_path: Option<&Path>,
    sprite: Option<&str>,
    config: Option<&Path>,
    overrides: &CliOverrides,
) -> ExitCode {
    finish(export(sheet_path, output_path, sprite, config, overrides))
}

fn export(
    sheet_path: &Path,
    output_path: Option<&Path>,
    sprite: Option<&str>,
    config: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<(), ExitCode> {
    let settings = load_settings(config, overrides)?;
    let entries = settings.export.entries_per_line;
    let sheet = open_sheet(sheet_path)?;

    let source = match sprite {
        Some(name) => find_sprite(&sheet, name)?.to_c_source(entries),
        None => sheet.to_c_source_with_header(settings.export.effective_header(), entries),
    };

    match output_path {
        Some(path) => {
            output::write_c_source(&source, path).map_err(|e| {
                eprintln!("Error: cannot write '{}': {}", path.display(), e);
                ExitCode::from(EXIT_ERROR)
            })?;
            eprintln!("Wrote: {}", path.display());
        }
        None => println!("{}", source),
    }
    Ok(())
}
