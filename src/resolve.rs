//! Import path remapping and filesystem resolution.
//!
//! Input tokens of the form `context:prefix=path` remap import prefixes,
//! as in `solc`. Imports named by loaded units are read from the
//! filesystem, restricted to the directories of the explicitly given
//! inputs.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// One `context:prefix=path` remapping. The context part is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remapping {
    pub context: Option<String>,
    pub prefix: String,
    pub target: String,
}

impl Remapping {
    /// Parse a remapping token. Returns `None` when the token is not a
    /// well-formed remapping (missing `=`, empty prefix).
    pub fn parse(token: &str) -> Option<Self> {
        let (head, target) = token.split_once('=')?;
        let (context, prefix) = match head.split_once(':') {
            Some((context, prefix)) => (Some(context.to_string()), prefix),
            None => (None, head),
        };
        if prefix.is_empty() {
            return None;
        }
        Some(Self {
            context,
            prefix: prefix.to_string(),
            target: target.to_string(),
        })
    }
}

/// Why an import could not be loaded.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("file outside of allowed directories: {0}")]
    OutsideAllowed(PathBuf),
    #[error("not a valid file: {0}")]
    NotAFile(PathBuf),
}

/// Resolves import paths to readable files on disk.
pub struct ImportResolver {
    remappings: Vec<Remapping>,
    allowed: Vec<PathBuf>,
}

impl ImportResolver {
    pub fn new(remappings: Vec<Remapping>) -> Self {
        Self {
            remappings,
            allowed: Vec::new(),
        }
    }

    /// Permit reads under `dir`. The CLI allows the directory of every
    /// explicitly named input.
    pub fn allow_dir(&mut self, dir: impl Into<PathBuf>) {
        self.allowed.push(dir.into());
    }

    /// Map `import_path` as written in `importer` to a file on disk.
    pub fn resolve(&self, importer: &Path, import_path: &str) -> Result<PathBuf, ResolveError> {
        let candidate = if import_path.starts_with("./") || import_path.starts_with("../") {
            let importer_dir = importer.parent().unwrap_or_else(|| Path::new("."));
            importer_dir.join(import_path)
        } else {
            PathBuf::from(self.apply_remappings(importer, import_path))
        };

        let canonical = candidate
            .canonicalize()
            .map_err(|_| ResolveError::NotFound(candidate.clone()))?;
        if !self.is_allowed(&canonical) {
            return Err(ResolveError::OutsideAllowed(canonical));
        }
        if !canonical.is_file() {
            return Err(ResolveError::NotAFile(canonical));
        }
        Ok(canonical)
    }

    /// Longest matching prefix wins; a remapping with a context only
    /// applies when the importer's path starts with that context.
    fn apply_remappings(&self, importer: &Path, import_path: &str) -> String {
        let importer_str = importer.to_string_lossy();
        let mut best: Option<&Remapping> = None;

        for remapping in &self.remappings {
            if !import_path.starts_with(&remapping.prefix) {
                continue;
            }
            if let Some(context) = &remapping.context {
                if !importer_str.starts_with(context.as_str()) {
                    continue;
                }
            }
            let better = match best {
                Some(current) => remapping.prefix.len() > current.prefix.len(),
                None => true,
            };
            if better {
                best = Some(remapping);
            }
        }

        match best {
            Some(remapping) => format!(
                "{}{}",
                remapping.target,
                &import_path[remapping.prefix.len()..]
            ),
            None => import_path.to_string(),
        }
    }

    fn is_allowed(&self, path: &Path) -> bool {
        self.allowed.iter().any(|dir| {
            dir.canonicalize()
                .map(|dir| path.starts_with(dir))
                .unwrap_or(false)
        })
    }
}
