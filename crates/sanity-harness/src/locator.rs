// crates/sanity-harness/src/locator.rs
// ============================================================================
// Module: Binary Locator
// Description: Existence and executability probes for subject binaries.
// Purpose: Turn binary availability into a skip signal instead of a failure.
// Dependencies: nix (unix)
// ============================================================================

//! ## Overview
//! A [`BinaryRef`] names a subject binary by logical name and directory. The
//! [`BinaryLocator`] probes the filesystem read-only; probes never error, a
//! missing or unreadable path simply reports as unavailable.

use std::fmt;
use std::path::Path;
use std::path::PathBuf;

// ============================================================================
// SECTION: Binary Reference
// ============================================================================

/// Logical reference to a subject binary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinaryRef {
    /// Logical binary name without the platform suffix.
    logical_name: String,
    /// Directory expected to contain the binary.
    directory: PathBuf,
}

impl BinaryRef {
    /// Creates a binary reference.
    #[must_use]
    pub fn new(logical_name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            logical_name: logical_name.into(),
            directory: directory.into(),
        }
    }

    /// Returns the logical name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.logical_name
    }

    /// Returns the directory expected to contain the binary.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Resolves the concrete path `directory/logical_name[.exe]`.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}{}", self.logical_name, exe_suffix()))
    }
}

impl fmt::Display for BinaryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.logical_name)
    }
}

/// Platform executable suffix.
const fn exe_suffix() -> &'static str {
    if cfg!(windows) { ".exe" } else { "" }
}

// ============================================================================
// SECTION: Availability
// ============================================================================

/// Result of probing a binary reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Nothing exists at the resolved path.
    Missing,
    /// Something exists but cannot be executed by the current user.
    NotExecutable,
    /// The binary exists and is executable.
    Ready,
}

impl Availability {
    /// Returns true when the resolved path exists at all.
    #[must_use]
    pub const fn exists(self) -> bool {
        !matches!(self, Self::Missing)
    }
}

// ============================================================================
// SECTION: Locator
// ============================================================================

/// Read-only filesystem probe for subject binaries.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryLocator;

impl BinaryLocator {
    /// Returns true when the resolved path exists.
    #[must_use]
    pub fn exists(self, binary: &BinaryRef) -> bool {
        binary.path().exists()
    }

    /// Returns true when the resolved path is a file the current user may execute.
    #[must_use]
    pub fn is_executable(self, binary: &BinaryRef) -> bool {
        is_executable_path(&binary.path())
    }

    /// Classifies the binary in a single probe.
    #[must_use]
    pub fn availability(self, binary: &BinaryRef) -> Availability {
        let path = binary.path();
        if !path.exists() {
            Availability::Missing
        } else if is_executable_path(&path) {
            Availability::Ready
        } else {
            Availability::NotExecutable
        }
    }
}

/// Checks that the current user may execute the regular file at `path`.
#[cfg(unix)]
fn is_executable_path(path: &Path) -> bool {
    use nix::unistd::AccessFlags;
    use nix::unistd::access;

    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}

/// Non-Unix platforms have no execute bit; a regular file is runnable.
#[cfg(not(unix))]
fn is_executable_path(path: &Path) -> bool {
    std::fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
