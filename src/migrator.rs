//! Embedded migrator: re-exports the workspace `migrations` crate so the
//! server binary can apply the schema itself when `auto_migrate` is set.

pub use migrations::Migrator;
