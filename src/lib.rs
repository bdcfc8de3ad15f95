//! vaultmove - relocate root-level vault files into per-extension folders
//!
//! This library moves files sitting at the root of a document vault into
//! target folders chosen per file extension, resolves name collisions with
//! numeric suffixes, and can undo the last moves in reverse order. Storage
//! access goes through the [`vault::Vault`] trait so an embedding
//! application can supply its own tree.

pub mod cli;
pub mod config;
pub mod mover;
pub mod output;
pub mod resolver;
pub mod undo;
pub mod vault;

pub use config::{ConfigError, FileFilters, TargetRule, VaultConfig};
pub use mover::{BatchReport, MoveError, MoveRecord, Mover, SkipReason};
pub use resolver::{MAX_CONFLICT_ATTEMPTS, ResolveError, resolve_destination};
pub use undo::{MoveHistory, UndoReport};
pub use vault::{FsVault, Notifier, RootFile, SilentNotifier, Vault, VaultError};

pub use cli::{Cli, Command, run_cli};
