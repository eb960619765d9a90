//! quill_options: quill.json parsing and compiler options.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Options for one compilation, matching the quill.json schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
    /// Bind top-level statements into `$eval`, where any expression may
    /// stand alone and the last one's value is the result.
    pub script_mode: bool,
    pub remove_unreachable_code: bool,
    /// Maximum depth of nested calls; unbounded when absent.
    pub max_call_depth: Option<usize>,
    /// File name reported in diagnostics.
    pub file: Option<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            script_mode: false,
            remove_unreachable_code: true,
            max_call_depth: None,
            file: None,
        }
    }
}

impl CompilerOptions {
    pub fn script() -> Self {
        Self {
            script_mode: true,
            ..Self::default()
        }
    }
}

/// The quill.json file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuillConfig {
    pub compiler_options: CompilerOptions,
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid quill.json: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_options(content: &str) -> Result<QuillConfig, OptionsError> {
    Ok(serde_json::from_str(content)?)
}

pub fn parse_options_file(path: impl AsRef<Path>) -> Result<QuillConfig, OptionsError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_options(&content)
}
