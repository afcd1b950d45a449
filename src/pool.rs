//! Arena of every file, message and enum in a generation request.
//!
//! Entries are addressed by stable ids and by fully-qualified proto name, so
//! resolving a reference never depends on which file is being generated.

use std::collections::HashMap;

use crate::descriptor::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto, Syntax,
};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

impl FileId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumId(usize);

/// What a fully-qualified name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef {
    Message(MessageId),
    Enum(EnumId),
}

/// A schema file and its parsed syntax.
#[derive(Debug)]
pub struct FileEntry {
    pub descriptor: FileDescriptorProto,
    pub syntax: Syntax,
}

/// A message type registered in the pool.
#[derive(Debug)]
pub struct MessageEntry {
    /// Declaring file.
    pub file: FileId,
    /// Fully-qualified name without the leading period.
    pub full_name: String,
    /// Names of the containing messages, outermost first, ending with this
    /// message's own name.
    pub scope: Vec<String>,
    /// Key and value fields when this is a synthetic map entry.
    pub map_entry: Option<MapEntry>,
}

/// Key and value fields of a map entry message.
#[derive(Debug, Clone)]
pub struct MapEntry {
    pub key: FieldDescriptorProto,
    pub value: FieldDescriptorProto,
}

/// An enum type registered in the pool.
#[derive(Debug)]
pub struct EnumEntry {
    pub file: FileId,
    pub full_name: String,
    pub scope: Vec<String>,
    /// Name of the first declared value, the implicit default.
    pub first_value: Option<String>,
}

/// Registry of every type visible to the generator.
#[derive(Debug, Default)]
pub struct DescriptorPool {
    files: Vec<FileEntry>,
    messages: Vec<MessageEntry>,
    enums: Vec<EnumEntry>,
    by_name: HashMap<String, TypeRef>,
    files_by_path: HashMap<String, FileId>,
}

impl DescriptorPool {
    /// Build a pool from files in dependency order.
    ///
    /// Every file's imports must already be present, which protoc guarantees
    /// for `--include_imports` descriptor sets and plugin requests.
    pub fn new(files: impl IntoIterator<Item = FileDescriptorProto>) -> Result<Self, Error> {
        let mut pool = Self::default();
        for file in files {
            pool.add_file(file)?;
        }
        Ok(pool)
    }

    fn add_file(&mut self, file: FileDescriptorProto) -> Result<FileId, Error> {
        let path = file.name.clone().ok_or(Error::MissingName)?;
        let syntax = file.syntax()?;

        for dependency in &file.dependency {
            if !self.files_by_path.contains_key(dependency) {
                return Err(Error::MissingDependency {
                    file: path,
                    dependency: dependency.clone(),
                });
            }
        }

        let id = FileId(self.files.len());
        let package = file.package();
        for message in &file.message_type {
            self.register_message(id, package, &[], message)?;
        }
        for enum_type in &file.enum_type {
            self.register_enum(id, package, &[], enum_type)?;
        }

        tracing::trace!(path = %path, ?syntax, "registered file");
        self.files_by_path.insert(path, id);
        self.files.push(FileEntry {
            descriptor: file,
            syntax,
        });
        Ok(id)
    }

    fn register_message(
        &mut self,
        file: FileId,
        package: &str,
        parents: &[String],
        message: &DescriptorProto,
    ) -> Result<(), Error> {
        let name = message.name.clone().ok_or(Error::MissingName)?;
        let mut scope = parents.to_vec();
        scope.push(name);
        let full_name = qualify(package, &scope);

        let map_entry = if message.is_map_entry() {
            let key = message.field.iter().find(|f| f.number == Some(1));
            let value = message.field.iter().find(|f| f.number == Some(2));
            match (key, value) {
                (Some(key), Some(value)) => Some(MapEntry {
                    key: key.clone(),
                    value: value.clone(),
                }),
                _ => return Err(Error::MissingFieldNumber(full_name)),
            }
        } else {
            None
        };

        let id = MessageId(self.messages.len());
        self.by_name.insert(full_name.clone(), TypeRef::Message(id));
        self.messages.push(MessageEntry {
            file,
            full_name,
            scope: scope.clone(),
            map_entry,
        });

        for nested in &message.nested_type {
            self.register_message(file, package, &scope, nested)?;
        }
        for enum_type in &message.enum_type {
            self.register_enum(file, package, &scope, enum_type)?;
        }
        Ok(())
    }

    fn register_enum(
        &mut self,
        file: FileId,
        package: &str,
        parents: &[String],
        enum_type: &EnumDescriptorProto,
    ) -> Result<(), Error> {
        let name = enum_type.name.clone().ok_or(Error::MissingName)?;
        let mut scope = parents.to_vec();
        scope.push(name);
        let full_name = qualify(package, &scope);

        let id = EnumId(self.enums.len());
        self.by_name.insert(full_name.clone(), TypeRef::Enum(id));
        self.enums.push(EnumEntry {
            file,
            full_name,
            scope,
            first_value: enum_type.value.first().and_then(|v| v.name.clone()),
        });
        Ok(())
    }

    /// Look up a type by fully-qualified name. A leading period, as protoc
    /// writes in `type_name`, is accepted.
    pub fn lookup(&self, type_name: &str) -> Option<TypeRef> {
        let name = type_name.strip_prefix('.').unwrap_or(type_name);
        self.by_name.get(name).copied()
    }

    pub fn file_id(&self, path: &str) -> Result<FileId, Error> {
        self.files_by_path
            .get(path)
            .copied()
            .ok_or_else(|| Error::UnknownFile(path.to_string()))
    }

    pub fn file(&self, id: FileId) -> &FileEntry {
        &self.files[id.0]
    }

    pub fn message(&self, id: MessageId) -> &MessageEntry {
        &self.messages[id.0]
    }

    pub fn enumeration(&self, id: EnumId) -> &EnumEntry {
        &self.enums[id.0]
    }

    /// All file ids in registration order.
    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.files.len()).map(FileId)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn qualify(package: &str, scope: &[String]) -> String {
    let local = scope.join(".");
    if package.is_empty() {
        local
    } else {
        format!("{package}.{local}")
    }
}
