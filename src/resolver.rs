//! Destination path resolution with collision disambiguation.
//!
//! Given a target directory and a filename split into stem and extension,
//! picks the first free destination path: `name.ext`, then `name-1.ext`,
//! `name-2.ext`, and so on. Resolution only probes existence through the
//! vault; it never creates, reserves, or otherwise touches the path.

use std::path::{Path, PathBuf};

use crate::vault::Vault;

/// Highest numeric suffix tried before resolution gives up.
pub const MAX_CONFLICT_ATTEMPTS: u32 = 1000;

/// Resolution failure.
#[derive(Debug)]
pub enum ResolveError {
    /// Every candidate up to the suffix bound was occupied.
    TooManyConflicts { name: String, dir: PathBuf },
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyConflicts { name, dir } => {
                write!(
                    f,
                    "Too many name conflicts for \"{}\" in {}",
                    name,
                    dir.display()
                )
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Picks a non-colliding destination for `stem` + `extension` under `dir`.
///
/// `extension` carries its leading dot (".md") or is empty for extensionless
/// names, so candidates are formed by plain concatenation. The caller is
/// responsible for having validated that `dir` exists; resolution does not
/// create directories.
///
/// # Errors
///
/// Returns [`ResolveError::TooManyConflicts`] when `name.ext` and all of
/// `name-1.ext` … `name-1000.ext` are occupied.
pub fn resolve_destination<V: Vault + ?Sized>(
    vault: &V,
    dir: &Path,
    stem: &str,
    extension: &str,
) -> Result<PathBuf, ResolveError> {
    let candidate = dir.join(format!("{}{}", stem, extension));
    if !vault.exists(&candidate) {
        return Ok(candidate);
    }

    for n in 1..=MAX_CONFLICT_ATTEMPTS {
        let candidate = dir.join(format!("{}-{}{}", stem, n, extension));
        if !vault.exists(&candidate) {
            return Ok(candidate);
        }
    }

    Err(ResolveError::TooManyConflicts {
        name: format!("{}{}", stem, extension),
        dir: dir.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::{FsVault, RootFile, VaultError};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolves_to_plain_name_when_free() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let vault = FsVault::open(temp_dir.path()).expect("Failed to open vault");

        let dest = resolve_destination(&vault, temp_dir.path(), "notes", ".md")
            .expect("Resolution failed");
        assert_eq!(dest, temp_dir.path().join("notes.md"));
    }

    #[test]
    fn test_suffixes_are_strictly_increasing_first_free_wins() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("notes.md"), "0").expect("Failed to write file");
        let vault = FsVault::open(temp_dir.path()).expect("Failed to open vault");

        let dest = resolve_destination(&vault, temp_dir.path(), "notes", ".md")
            .expect("Resolution failed");
        assert_eq!(dest, temp_dir.path().join("notes-1.md"));

        fs::write(temp_dir.path().join("notes-1.md"), "1").expect("Failed to write file");
        let dest = resolve_destination(&vault, temp_dir.path(), "notes", ".md")
            .expect("Resolution failed");
        assert_eq!(dest, temp_dir.path().join("notes-2.md"));
    }

    #[test]
    fn test_gap_in_suffixes_is_reused() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("notes.md"), "0").expect("Failed to write file");
        fs::write(temp_dir.path().join("notes-2.md"), "2").expect("Failed to write file");
        let vault = FsVault::open(temp_dir.path()).expect("Failed to open vault");

        let dest = resolve_destination(&vault, temp_dir.path(), "notes", ".md")
            .expect("Resolution failed");
        assert_eq!(dest, temp_dir.path().join("notes-1.md"));
    }

    #[test]
    fn test_extensionless_names_suffix_without_dot() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("Makefile"), "m").expect("Failed to write file");
        let vault = FsVault::open(temp_dir.path()).expect("Failed to open vault");

        let dest = resolve_destination(&vault, temp_dir.path(), "Makefile", "")
            .expect("Resolution failed");
        assert_eq!(dest, temp_dir.path().join("Makefile-1"));
    }

    /// Vault stub where every path is occupied.
    struct SaturatedVault;

    impl Vault for SaturatedVault {
        fn list_root_files(&self) -> Result<Vec<RootFile>, VaultError> {
            Ok(Vec::new())
        }

        fn exists(&self, _path: &Path) -> bool {
            true
        }

        fn is_directory(&self, _path: &Path) -> bool {
            true
        }

        fn resolve_target(&self, target: &str) -> PathBuf {
            PathBuf::from(target)
        }

        fn rename(&self, _from: &Path, _to: &Path) -> Result<(), VaultError> {
            unreachable!("resolution never renames")
        }
    }

    #[test]
    fn test_exhausted_suffixes_fail() {
        let result = resolve_destination(&SaturatedVault, Path::new("/vault/Notes"), "notes", ".md");
        assert!(matches!(
            result,
            Err(ResolveError::TooManyConflicts { .. })
        ));
    }
}
