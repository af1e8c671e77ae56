use std::io::Read;
use std::path::Path;

use fdoc_style::StyleRegistry;

use crate::error::{CliError, Result};

/// Read a whole input file, or stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                return Err(CliError::MissingInput {
                    path: path.to_path_buf(),
                });
            }
            Ok(std::fs::read_to_string(path)?)
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Load a style registry from a JSON config file, or the standard preset.
pub fn load_styles(path: Option<&Path>) -> Result<StyleRegistry> {
    let Some(path) = path else {
        return Ok(StyleRegistry::standard());
    };
    let json = read_input(Some(path))?;
    let registry = StyleRegistry::from_json(&json)?;
    tracing::debug!(path = %path.display(), styles = registry.len(), "loaded style config");
    Ok(registry)
}
