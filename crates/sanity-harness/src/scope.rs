// crates/sanity-harness/src/scope.rs
// ============================================================================
// Module: Resource Scope
// Description: Per-scenario temporary working directories.
// Purpose: Give each scenario an isolated area that is always cleaned up.
// Dependencies: tempfile, thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`ResourceScope`] is a uniquely named temporary directory owned by one
//! scenario. Callers should finish it with [`ResourceScope::close`]; if the
//! scope is dropped instead (error path, panic unwind) the directory is still
//! removed. Removal tolerates a root that the subject process already deleted.
//!
//! Invariants:
//! - Relative paths handed to the scope never resolve outside its root.
//! - The directory is removed exactly once.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while creating, populating, or removing a scope.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// The temporary directory could not be created.
    #[error("failed to create scope under {parent}: {source}")]
    Create {
        /// Parent directory the scope was requested in.
        parent: String,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A relative path pointed outside the scope root.
    #[error("path {path} escapes the scope root")]
    Escape {
        /// Offending relative path.
        path: String,
    },
    /// Creating a directory or file inside the scope failed.
    #[error("failed to prepare {path}: {source}")]
    Prepare {
        /// Absolute path being prepared.
        path: String,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Removing the scope failed for a reason other than it being gone.
    #[error("failed to remove scope {root}: {source}")]
    Remove {
        /// Scope root.
        root: String,
        /// Underlying IO error.
        source: io::Error,
    },
}

// ============================================================================
// SECTION: Scope
// ============================================================================

/// Isolated, uniquely named temporary directory with guaranteed cleanup.
#[derive(Debug)]
pub struct ResourceScope {
    /// Backing temp directory; `None` once closed.
    dir: Option<TempDir>,
    /// Cached root path, valid for the lifetime of the scope.
    root: PathBuf,
}

impl ResourceScope {
    /// Creates a fresh scope named `<prefix><random>` under `parent`, or under
    /// the system temp directory when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Create`] when the directory cannot be created.
    pub fn create(parent: Option<&Path>, prefix: &str) -> Result<Self, ScopeError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let created = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        };
        let dir = created.map_err(|source| ScopeError::Create {
            parent: parent.map_or_else(
                || std::env::temp_dir().display().to_string(),
                |path| path.display().to_string(),
            ),
            source,
        })?;
        let root = dir.path().to_path_buf();
        tracing::debug!(root = %root.display(), "resource scope created");
        Ok(Self {
            dir: Some(dir),
            root,
        })
    }

    /// Returns the scope root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a scope-relative path.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Escape`] for absolute paths or `..` components.
    pub fn path(&self, relative: impl AsRef<Path>) -> Result<PathBuf, ScopeError> {
        let relative = relative.as_ref();
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ScopeError::Escape {
                path: relative.display().to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    /// Creates a directory (and missing parents) inside the scope.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] when the path escapes or creation fails.
    pub fn create_dir(&self, relative: impl AsRef<Path>) -> Result<PathBuf, ScopeError> {
        let path = self.path(relative)?;
        fs::create_dir_all(&path).map_err(|source| ScopeError::Prepare {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }

    /// Writes a UTF-8 file inside the scope, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] when the path escapes or the write fails.
    pub fn write_file(
        &self,
        relative: impl AsRef<Path>,
        contents: &str,
    ) -> Result<PathBuf, ScopeError> {
        let path = self.path(relative)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ScopeError::Prepare {
                path: parent.display().to_string(),
                source,
            })?;
        }
        fs::write(&path, contents.as_bytes()).map_err(|source| ScopeError::Prepare {
            path: path.display().to_string(),
            source,
        })?;
        Ok(path)
    }

    /// Removes the scope. A root that no longer exists counts as removed.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Remove`] when removal fails for another reason.
    pub fn close(mut self) -> Result<(), ScopeError> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };
        match dir.close() {
            Ok(()) => {
                tracing::debug!(root = %self.root.display(), "resource scope removed");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ScopeError::Remove {
                root: self.root.display().to_string(),
                source,
            }),
        }
    }
}

impl Drop for ResourceScope {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take()
            && let Err(err) = dir.close()
            && err.kind() != io::ErrorKind::NotFound
        {
            tracing::warn!(root = %self.root.display(), error = %err, "scope removal failed");
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
