//! # Archivos estáticos
//! src/files/mod.rs
//!
//! ```text
//! Request → PathResolver → StaticFiles::select → ResolvedTarget → Response
//! ```
//!
//! - `path`: path del request -> path absoluto bajo el document root
//! - `target`: tabla de decisión de status y páginas de error

pub mod path;
pub mod target;

pub use path::{PathError, PathResolver};
pub use target::{ResolvedTarget, StaticFiles, TargetError};
