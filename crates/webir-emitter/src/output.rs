use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("package name '{name}' is not a valid Gleam module name")]
    InvalidPackageName { name: String },

    #[error("interfaces {first} and {second} both map to module '{module}'")]
    ModuleClash {
        module: String,
        first: String,
        second: String,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One generated file, with its path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl EmittedFile {
    pub fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        EmittedFile {
            path: path.into(),
            contents,
        }
    }
}

/// Write every file under `out_dir`, creating directories as needed.
///
/// Existing files are overwritten. The first failure stops the run; files
/// already written stay in place. Returns the written paths in order.
pub fn write_files(out_dir: &Path, files: &[EmittedFile]) -> Result<Vec<PathBuf>, EmitError> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = out_dir.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| EmitError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&path, &file.contents).map_err(|source| EmitError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = file.contents.len(), "wrote binding file");
        written.push(path);
    }
    Ok(written)
}
