//! Configuration for build-time Lisp generation.

use std::path::{Path, PathBuf};

use protolisp::descriptor::FileDescriptorSet;
use protolisp::GeneratorOptions;

/// Configuration for build-time Lisp generation.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Output directory for generated files.
    pub(crate) out_dir: Option<PathBuf>,

    /// Path to the protoc executable.
    pub(crate) protoc_path: Option<PathBuf>,

    /// Additional arguments for protoc.
    pub(crate) protoc_args: Vec<String>,

    /// Skip running protoc, use pre-existing FileDescriptorSet.
    pub(crate) skip_protoc: bool,

    /// Path to read/write FileDescriptorSet.
    pub(crate) file_descriptor_set_path: Option<PathBuf>,

    /// Package naming handed to the generator.
    pub(crate) options: GeneratorOptions,
}

impl Config {
    /// Create a new Config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory for generated Lisp files.
    pub fn out_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.out_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set path to the protoc executable.
    pub fn protoc_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.protoc_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add an argument to pass to protoc.
    pub fn protoc_arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.protoc_args.push(arg.into());
        self
    }

    /// Skip running protoc; use an existing FileDescriptorSet instead.
    pub fn skip_protoc_run(&mut self) -> &mut Self {
        self.skip_protoc = true;
        self
    }

    /// Path to write/read the FileDescriptorSet.
    ///
    /// When protoc runs, the descriptor set it produced is saved here.
    pub fn file_descriptor_set_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.file_descriptor_set_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Prefix for derived Lisp package names (default `CL-PROTOBUFS.`).
    pub fn package_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.options.package_prefix(prefix);
        self
    }

    /// Generate everything in the protobuf package `package` into the Lisp
    /// package `lisp_package`.
    ///
    /// # Example
    /// ```no_run
    /// protolisp_build::Config::new()
    ///     .package_override("tutorial", "addressbook")
    ///     .compile_protos(&["proto/addressbook.proto"], &["proto/"])?;
    /// # Ok::<(), protolisp_build::Error>(())
    /// ```
    pub fn package_override(
        &mut self,
        package: impl Into<String>,
        lisp_package: impl Into<String>,
    ) -> &mut Self {
        self.options.package_override(package, lisp_package);
        self
    }

    /// Compile `.proto` files into Lisp files.
    pub fn compile_protos(
        &self,
        protos: &[impl AsRef<Path>],
        includes: &[impl AsRef<Path>],
    ) -> Result<Vec<PathBuf>, crate::Error> {
        crate::compile::compile(self, protos, includes)
    }

    /// Compile every file of an existing FileDescriptorSet.
    pub fn compile_fds(&self, fds: FileDescriptorSet) -> Result<Vec<PathBuf>, crate::Error> {
        crate::compile::compile_fds(self, fds)
    }
}
