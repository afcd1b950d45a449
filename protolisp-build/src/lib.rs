//! `protolisp-build` compiles `.proto` files into [cl-protobufs] Common Lisp
//! sources at build time.
//!
//! # Example
//!
//! ```rust,no_run
//! // In build.rs
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     protolisp_build::compile_protos(&["proto/addressbook.proto"], &["proto/"])?;
//!     Ok(())
//! }
//! ```
//!
//! Each schema `dir/name.proto` is written to `<out_dir>/dir/name.lisp`.
//!
//! # Advanced Usage
//!
//! ```rust,no_run
//! fn main() -> Result<(), protolisp_build::Error> {
//!     protolisp_build::Config::new()
//!         .out_dir("lisp/generated")
//!         .package_prefix("PB.")
//!         .file_descriptor_set_path("lisp/generated/descriptors.bin")
//!         .compile_protos(&["proto/addressbook.proto"], &["proto/"])?;
//!     Ok(())
//! }
//! ```
//!
//! [cl-protobufs]: https://github.com/qitab/cl-protobufs

mod compile;
mod config;
mod error;
mod protoc;

pub use config::Config;
pub use error::Error;

use std::path::{Path, PathBuf};

/// Compile `.proto` files into Lisp with default settings, returning the
/// paths written.
///
/// # Arguments
/// * `protos` - Paths to `.proto` files to compile
/// * `includes` - Include paths for resolving imports
pub fn compile_protos(
    protos: &[impl AsRef<Path>],
    includes: &[impl AsRef<Path>],
) -> Result<Vec<PathBuf>, Error> {
    Config::new().compile_protos(protos, includes)
}
