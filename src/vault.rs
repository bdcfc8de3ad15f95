//! External collaborators of the move pipeline.
//!
//! This module defines the seam between the core logic and its host: a
//! [`Vault`] trait for the storage tree being organized, and a [`Notifier`]
//! trait for user-visible messages. The shipped implementation, [`FsVault`],
//! runs directly on the local filesystem; an embedding application can
//! substitute its own storage by implementing the trait.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file found directly under the vault root.
///
/// Carries the pieces of identity the move pipeline needs: the full name,
/// the stem/extension split used for disambiguation, and the parent
/// directory recorded for undo.
#[derive(Debug, Clone)]
pub struct RootFile {
    /// Full filename including extension (e.g. "notes.md").
    pub name: String,
    /// Filename without the extension (e.g. "notes").
    pub stem: String,
    /// Extension key including the leading separator (e.g. ".md").
    /// Empty string if the file has no extension.
    pub extension: String,
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Path of the directory containing the file.
    pub parent: PathBuf,
}

impl RootFile {
    /// Builds a `RootFile` from a path known to point at a file.
    ///
    /// Returns `None` if the path has no filename component or the name is
    /// not valid UTF-8; such entries cannot be matched against extension
    /// rules and are left untouched.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        let parent = path.parent()?.to_path_buf();
        let (stem, extension) = split_name(&name);
        Some(Self {
            name,
            stem,
            extension,
            path,
            parent,
        })
    }
}

/// Splits a filename into its stem and its extension key.
///
/// The extension key keeps the leading dot ("notes.md" → ".md"). Dotfiles
/// and extensionless names yield an empty key, which no valid rule can
/// match.
fn split_name(name: &str) -> (String, String) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem.to_string(), format!(".{}", ext))
        }
        _ => (name.to_string(), String::new()),
    }
}

/// Errors raised by vault storage operations.
#[derive(Debug)]
pub enum VaultError {
    /// The vault root does not exist or is not a directory.
    InvalidRoot { path: PathBuf },
    /// Reading the root directory listing failed.
    ListFailed { path: PathBuf, source: io::Error },
    /// A path already occupies the rename destination.
    DestinationOccupied { path: PathBuf },
    /// The underlying rename operation was rejected.
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl std::fmt::Display for VaultError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot { path } => {
                write!(f, "Invalid vault root {}", path.display())
            }
            Self::ListFailed { path, source } => {
                write!(f, "Failed to list {}: {}", path.display(), source)
            }
            Self::DestinationOccupied { path } => {
                write!(f, "Destination already exists: {}", path.display())
            }
            Self::RenameFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for VaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ListFailed { source, .. } | Self::RenameFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Storage tree the move pipeline operates on.
///
/// Implementations must serialize their own storage operations; the pipeline
/// issues calls strictly one at a time and never retries a failed rename.
pub trait Vault {
    /// Lists the immediate children of the vault root that are files.
    ///
    /// Files nested in subdirectories are never returned. Order is whatever
    /// the underlying listing produces; the pipeline does not reorder.
    fn list_root_files(&self) -> Result<Vec<RootFile>, VaultError>;

    /// Checks whether any entry (file or directory) exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Checks whether `path` resolves to an existing directory.
    fn is_directory(&self, path: &Path) -> bool;

    /// Resolves a target folder string from configuration to a path.
    ///
    /// Absolute paths are taken as-is; everything else names a folder
    /// inside the storage tree.
    fn resolve_target(&self, target: &str) -> PathBuf;

    /// Atomically renames `from` to `to` within the storage tree.
    ///
    /// Must refuse to overwrite: if `to` is already occupied the call fails
    /// with [`VaultError::DestinationOccupied`].
    fn rename(&self, from: &Path, to: &Path) -> Result<(), VaultError>;
}

/// [`Vault`] implementation over the local filesystem.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Opens a vault rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidRoot`] if `root` does not exist or is
    /// not a directory.
    pub fn open(root: &Path) -> Result<Self, VaultError> {
        if !root.is_dir() {
            return Err(VaultError::InvalidRoot {
                path: root.to_path_buf(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Vault for FsVault {
    fn list_root_files(&self) -> Result<Vec<RootFile>, VaultError> {
        let entries = fs::read_dir(&self.root).map_err(|e| VaultError::ListFailed {
            path: self.root.clone(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries.flatten() {
            if let Ok(file_type) = entry.file_type()
                && file_type.is_file()
                && let Some(file) = RootFile::from_path(entry.path())
            {
                files.push(file);
            }
        }
        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn resolve_target(&self, target: &str) -> PathBuf {
        let target_path = Path::new(target);
        if target_path.is_absolute() {
            target_path.to_path_buf()
        } else {
            self.root.join(target_path)
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<(), VaultError> {
        // fs::rename silently replaces existing files on Unix; the vault
        // contract is no-overwrite, so probe the destination first.
        if to.exists() {
            return Err(VaultError::DestinationOccupied {
                path: to.to_path_buf(),
            });
        }
        fs::rename(from, to).map_err(|e| VaultError::RenameFailed {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: e,
        })
    }
}

/// Sink for user-visible messages.
///
/// Fire-and-forget: implementations must not fail and the pipeline never
/// waits on acknowledgement.
pub trait Notifier {
    /// Informational message.
    fn notify(&self, message: &str);

    /// Recoverable per-file condition the user should see.
    fn warn(&self, message: &str);

    /// Per-file failure with a cause.
    fn error(&self, message: &str);
}

/// Notifier that discards every message.
///
/// For embedding hosts that surface outcomes through the returned reports
/// instead of a message stream.
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
