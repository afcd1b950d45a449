//! Drives protoc and the generator, then writes the results.

use std::path::{Path, PathBuf};

use protolisp::descriptor::{decode_file_descriptor_set, FileDescriptorSet};
use protolisp::GeneratedFile;

use crate::protoc;
use crate::{Config, Error};

/// Compile `.proto` files using protoc.
pub fn compile(
    config: &Config,
    protos: &[impl AsRef<Path>],
    includes: &[impl AsRef<Path>],
) -> Result<Vec<PathBuf>, Error> {
    let bytes = if config.skip_protoc {
        let path = config
            .file_descriptor_set_path
            .as_ref()
            .ok_or(Error::MissingDescriptorPath)?;
        std::fs::read(path)?
    } else {
        let protoc_path = config
            .protoc_path
            .clone()
            .map(Ok)
            .unwrap_or_else(protoc::find_protoc)?;
        let bytes = protoc::invoke_protoc(&protoc_path, protos, includes, &config.protoc_args)?;
        if let Some(path) = &config.file_descriptor_set_path {
            write_file(path, &bytes)?;
        }
        bytes
    };

    let fds = decode_file_descriptor_set(&bytes)?;
    let requested: Vec<String> = protos
        .iter()
        .map(|proto| protoc::descriptor_name(proto.as_ref(), includes))
        .collect();
    generate(config, fds, &requested)
}

/// Compile every file in a FileDescriptorSet.
pub fn compile_fds(config: &Config, fds: FileDescriptorSet) -> Result<Vec<PathBuf>, Error> {
    let requested: Vec<String> = fds.file.iter().map(|file| file.name().to_string()).collect();
    generate(config, fds, &requested)
}

fn generate(
    config: &Config,
    fds: FileDescriptorSet,
    requested: &[String],
) -> Result<Vec<PathBuf>, Error> {
    let out_dir = config
        .out_dir
        .clone()
        .or_else(|| std::env::var_os("OUT_DIR").map(Into::into))
        .ok_or(Error::MissingOutDir)?;

    let generated = protolisp::generate(fds.file, requested, config.options.clone())?;
    generated
        .iter()
        .map(|file| write_generated(&out_dir, file))
        .collect()
}

fn write_generated(out_dir: &Path, file: &GeneratedFile) -> Result<PathBuf, Error> {
    let path = out_dir.join(&file.name);
    write_file(&path, file.content.as_bytes())?;
    tracing::info!(path = %path.display(), "wrote generated file");
    Ok(path)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}
