//! Generation context shared by every file in a request.

use std::collections::BTreeMap;

use crate::config::GeneratorOptions;
use crate::names::{type_symbol, SymbolScope};
use crate::pool::{DescriptorPool, FileId};
use crate::Error;

/// Immutable state shared by every file generated from one descriptor pool.
///
/// Namespaces are computed once per file when the context is built, so
/// generating one file never observes another file's generation.
#[derive(Debug)]
pub struct GenerationContext {
    pool: DescriptorPool,
    /// Lisp package of each file, indexed by file id.
    namespaces: Vec<String>,
}

impl GenerationContext {
    /// Build the context, failing when two protobuf packages map to the same
    /// Lisp package or when files sharing a Lisp package declare clashing
    /// top-level types.
    pub fn new(pool: DescriptorPool, options: GeneratorOptions) -> Result<Self, Error> {
        let namespaces: Vec<String> = pool
            .file_ids()
            .map(|id| options.namespace(pool.file(id).descriptor.package()))
            .collect();

        let mut packages = SymbolScope::new("Lisp packages");
        let mut files_by_namespace: BTreeMap<&str, Vec<FileId>> = BTreeMap::new();
        for id in pool.file_ids() {
            let namespace = namespaces[id.index()].as_str();
            if !namespace.is_empty() {
                packages.claim(pool.file(id).descriptor.package(), namespace)?;
            }
            files_by_namespace.entry(namespace).or_default().push(id);
        }

        for (namespace, files) in &files_by_namespace {
            if files.len() > 1 {
                check_shared_namespace(&pool, namespace, files)?;
            }
        }

        Ok(Self { pool, namespaces })
    }

    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    /// The Lisp package of `file`, empty for `COMMON-LISP-USER`.
    pub fn namespace(&self, file: FileId) -> &str {
        &self.namespaces[file.index()]
    }
}

/// Claim the top-level messages, enums and services of every file read into
/// `namespace` in one scope.
fn check_shared_namespace(
    pool: &DescriptorPool,
    namespace: &str,
    files: &[FileId],
) -> Result<(), Error> {
    let label = if namespace.is_empty() {
        "COMMON-LISP-USER"
    } else {
        namespace
    };
    let mut types = SymbolScope::new(format!("types of Lisp package `{label}`"));

    for &id in files {
        let file = &pool.file(id).descriptor;
        let names = file
            .message_type
            .iter()
            .map(|message| message.name.as_deref())
            .chain(file.enum_type.iter().map(|enum_type| enum_type.name.as_deref()))
            .chain(file.service.iter().map(|service| service.name.as_deref()));
        for name in names {
            let name = name.ok_or(Error::MissingName)?;
            let source = match file.package() {
                "" => format!("{name} ({})", file.name()),
                package => format!("{package}.{name} ({})", file.name()),
            };
            types.claim(&source, &type_symbol(&[name]))?;
        }
    }

    Ok(())
}
