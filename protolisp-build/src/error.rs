//! Error types for protolisp-build.

use std::io;

/// Errors that can occur while compiling schemas into Lisp sources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// protoc not found.
    #[error("protoc not found. Set PROTOC env var or install protoc.")]
    ProtocNotFound,
    /// protoc invocation failed.
    #[error("protoc failed: {}", truncate(.0))]
    ProtocFailed(String),
    /// Missing OUT_DIR environment variable.
    #[error("OUT_DIR not set. Run from build.rs or set out_dir().")]
    MissingOutDir,
    /// Missing file_descriptor_set_path when skip_protoc is set.
    #[error("file_descriptor_set_path required when skip_protoc is set")]
    MissingDescriptorPath,
    /// Decoding or generation failed.
    #[error(transparent)]
    Generate(#[from] protolisp::Error),
}

/// Keep very long protoc output readable.
fn truncate(msg: &str) -> String {
    const MAX_LEN: usize = 1000;
    match msg.char_indices().nth(MAX_LEN) {
        Some((end, _)) => format!("{}... (truncated)", &msg[..end]),
        None => msg.to_string(),
    }
}
