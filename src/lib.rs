//! `protolisp` generates [cl-protobufs] Common Lisp source from protobuf
//! schemas.
//!
//! It consumes the descriptor graph `protoc` produces, either as a protoc
//! plugin (`protoc-gen-lisp`) or through [`generate`], and writes one `.lisp`
//! file per schema file.
//!
//! # Example
//!
//! ```
//! use protolisp::descriptor::{DescriptorProto, FileDescriptorProto};
//!
//! let file = FileDescriptorProto {
//!     name: Some("greeting.proto".into()),
//!     package: Some("hello".into()),
//!     message_type: vec![DescriptorProto {
//!         name: Some("Greeting".into()),
//!         ..Default::default()
//!     }],
//!     syntax: Some("proto3".into()),
//!     ..Default::default()
//! };
//!
//! let files = protolisp::generate([file], &["greeting.proto"], protolisp::GeneratorOptions::new())?;
//! assert_eq!(files[0].name, "greeting.lisp");
//! assert!(files[0].content.contains("(proto:define-message greeting"));
//! # Ok::<(), protolisp::Error>(())
//! ```
//!
//! [cl-protobufs]: https://github.com/qitab/cl-protobufs

mod config;
mod context;
mod error;
mod printer;
mod resolve;

pub mod codegen;
pub mod descriptor;
pub mod names;
pub mod plugin;
pub mod pool;
pub mod wire;

pub use codegen::{generate_file, ExportSet, GeneratedFile};
pub use config::GeneratorOptions;
pub use context::GenerationContext;
pub use error::Error;
pub use pool::DescriptorPool;
pub use printer::{joined, render, Printer};
pub use resolve::{FieldType, PackageSet, ResolvedType, Resolver, TypeKind};

use descriptor::FileDescriptorProto;

/// Generate Lisp source for each file in `file_to_generate`.
///
/// `files` must hold the requested files and everything they import, in
/// dependency order. Output is in the order of `file_to_generate`.
pub fn generate<P: AsRef<str>>(
    files: impl IntoIterator<Item = FileDescriptorProto>,
    file_to_generate: &[P],
    options: GeneratorOptions,
) -> Result<Vec<GeneratedFile>, Error> {
    let pool = DescriptorPool::new(files)?;
    let ctx = GenerationContext::new(pool, options)?;
    file_to_generate
        .iter()
        .map(|path| generate_file(&ctx, path.as_ref()))
        .collect()
}
