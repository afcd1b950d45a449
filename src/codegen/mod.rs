//! Code generation from protobuf descriptors.

mod default;
mod enumeration;
mod extension;
mod field;
mod file;
mod message;
mod service;

pub use file::generate_file;

use std::collections::{BTreeSet, HashSet};

use crate::descriptor::{FieldDescriptorProto, Syntax};
use crate::names::SymbolScope;
use crate::resolve::{FieldType, PackageSet, ResolvedType, Resolver};
use crate::Error;

/// A generated Lisp source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Output path, relative to the output directory.
    pub name: String,
    pub content: String,
}

/// Symbols to export from a package, in declaration order.
///
/// Duplicates are dropped, keeping the first occurrence.
#[derive(Debug, Clone, Default)]
pub struct ExportSet {
    symbols: Vec<String>,
    seen: HashSet<String>,
}

impl ExportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, symbol: impl Into<String>) {
        let symbol = symbol.into();
        if self.seen.insert(symbol.clone()) {
            self.symbols.push(symbol);
        }
    }

    pub fn extend(&mut self, other: ExportSet) {
        for symbol in other.symbols {
            self.push(symbol);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.symbols.iter().map(String::as_str)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.seen.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Per-file generation state. Created fresh for every file and dropped
/// once its output is assembled.
pub(crate) struct FileState<'a> {
    pub resolver: Resolver<'a>,
    pub syntax: Syntax,
    /// The declared protobuf package, used to name schema elements in errors.
    pub package: &'a str,
    pub packages: PackageSet,
    /// Types referenced from other files, as written in this file.
    pub imported: BTreeSet<String>,
    /// Messages, enums and services.
    pub types: SymbolScope,
    /// `+enum-value+` constants.
    pub constants: SymbolScope,
    pub extensions: SymbolScope,
    /// `call-*` and `*-impl` symbols of the RPC package.
    pub rpc: SymbolScope,
}

impl<'a> FileState<'a> {
    pub fn new(resolver: Resolver<'a>, syntax: Syntax, package: &'a str, path: &str) -> Self {
        Self {
            resolver,
            syntax,
            package,
            packages: PackageSet::new(),
            imported: BTreeSet::new(),
            types: SymbolScope::new(format!("types of `{path}`")),
            constants: SymbolScope::new(format!("enum constants of `{path}`")),
            extensions: SymbolScope::new(format!("extensions of `{path}`")),
            rpc: SymbolScope::new(format!("RPC symbols of `{path}`")),
        }
    }

    /// Namespace the file's code is read in.
    pub fn namespace(&self) -> &'a str {
        self.resolver.namespace()
    }

    /// Resolve a field's type, recording the namespaces and imports it needs.
    pub fn resolve_field_type(
        &mut self,
        field: &FieldDescriptorProto,
        referenced_from: &str,
    ) -> Result<FieldType, Error> {
        let field_type = self
            .resolver
            .resolve_field_type(field, referenced_from, &mut self.packages)?;
        match &field_type {
            FieldType::Named(resolved) => self.note_import(resolved),
            FieldType::Map { key, value } => {
                for side in [key, value] {
                    if let FieldType::Named(resolved) = side.as_ref() {
                        self.note_import(resolved);
                    }
                }
            }
            FieldType::Scalar(_) => {}
        }
        Ok(field_type)
    }

    /// Resolve an extendee or method type, recording the namespaces and
    /// imports it needs.
    pub fn resolve_type_name(
        &mut self,
        type_name: &str,
        referenced_from: &str,
    ) -> Result<ResolvedType, Error> {
        let resolved = self
            .resolver
            .resolve_type_name(type_name, referenced_from, &mut self.packages)?;
        self.note_import(&resolved);
        Ok(resolved)
    }

    fn note_import(&mut self, resolved: &ResolvedType) {
        if resolved.requires_import {
            let written = resolved.qualified(self.namespace());
            self.imported.insert(written);
        }
    }

    /// Fully-qualified protobuf name of `name` nested in `parents`.
    pub fn full_name(&self, parents: &[String], name: &str) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(parents.len() + 2);
        if !self.package.is_empty() {
            parts.push(self.package);
        }
        parts.extend(parents.iter().map(String::as_str));
        parts.push(name);
        parts.join(".")
    }
}
