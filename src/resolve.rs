//! Resolution of field, extendee and method type references.

use std::collections::BTreeSet;

use crate::context::GenerationContext;
use crate::descriptor::{FieldDescriptorProto, Label, Type};
use crate::names::type_symbol;
use crate::pool::{FileId, TypeRef};
use crate::Error;

/// The Lisp type of a scalar protobuf type.
pub fn scalar_symbol(ty: Type) -> Option<&'static str> {
    let symbol = match ty {
        Type::Int32 => "cl-protobufs:int32",
        Type::Int64 => "cl-protobufs:int64",
        Type::Uint32 => "cl-protobufs:uint32",
        Type::Uint64 => "cl-protobufs:uint64",
        Type::Sint32 => "cl-protobufs:sint32",
        Type::Sint64 => "cl-protobufs:sint64",
        Type::Fixed32 => "cl-protobufs:fixed32",
        Type::Fixed64 => "cl-protobufs:fixed64",
        Type::Sfixed32 => "cl-protobufs:sfixed32",
        Type::Sfixed64 => "cl-protobufs:sfixed64",
        Type::Float => "cl:float",
        Type::Double => "cl:double-float",
        Type::Bool => "cl:boolean",
        Type::String => "cl:string",
        Type::Bytes => "cl-protobufs:byte-vector",
        Type::Message | Type::Group | Type::Enum => return None,
    };
    Some(symbol)
}

/// How a field's value is serialized, as the `:kind` keyword names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Enum,
    Message,
    Group,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Scalar => ":scalar",
            Self::Enum => ":enum",
            Self::Message => ":message",
            Self::Group => ":group",
        }
    }
}

/// A message or enum reference resolved through the pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Symbol of the type within its own namespace.
    pub symbol: String,
    /// Namespace of the file declaring the type.
    pub origin_namespace: String,
    /// The type is declared in a different file.
    pub requires_import: bool,
    pub kind: TypeKind,
    pub target: TypeRef,
}

impl ResolvedType {
    /// The symbol as written from code in the `current` namespace.
    pub fn qualified(&self, current: &str) -> String {
        qualify(&self.origin_namespace, current, &self.symbol)
    }
}

/// Write `symbol` from `origin` so it reads correctly in `current`.
pub fn qualify(origin: &str, current: &str, symbol: &str) -> String {
    if origin == current {
        symbol.to_string()
    } else if origin.is_empty() {
        format!("cl-user::{symbol}")
    } else {
        format!("{}::{symbol}", origin.to_ascii_lowercase())
    }
}

/// A field's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Scalar(&'static str),
    Named(ResolvedType),
    Map {
        key: Box<FieldType>,
        value: Box<FieldType>,
    },
}

impl FieldType {
    /// The `:type` value as written from the `current` namespace.
    pub fn lisp_type(&self, current: &str) -> String {
        match self {
            Self::Scalar(symbol) => symbol.to_string(),
            Self::Named(resolved) => resolved.qualified(current),
            Self::Map { value, .. } => value.lisp_type(current),
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Named(resolved) => resolved.kind,
            Self::Map { value, .. } => value.kind(),
        }
    }
}

/// Namespaces a file's generated code touches, in lexicographic order.
///
/// The empty namespace (`COMMON-LISP-USER`) always exists and is never
/// recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSet(BTreeSet<String>);

impl PackageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, namespace: &str) {
        if !namespace.is_empty() && !self.0.contains(namespace) {
            self.0.insert(namespace.to_string());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.0.contains(namespace)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Resolves type references made from one file.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    ctx: &'a GenerationContext,
    file: FileId,
}

impl<'a> Resolver<'a> {
    pub fn new(ctx: &'a GenerationContext, file: FileId) -> Self {
        Self { ctx, file }
    }

    pub fn context(&self) -> &'a GenerationContext {
        self.ctx
    }

    /// Namespace of the file references are made from.
    pub fn namespace(&self) -> &'a str {
        self.ctx.namespace(self.file)
    }

    /// Resolve a field's declared type, recording the namespaces it touches.
    ///
    /// `referenced_from` names the field in error messages.
    pub fn resolve_field_type(
        &self,
        field: &FieldDescriptorProto,
        referenced_from: &str,
        packages: &mut PackageSet,
    ) -> Result<FieldType, Error> {
        let ty = field.field_type().ok_or_else(|| Error::InvalidFieldType {
            field: referenced_from.to_string(),
            type_id: field.r#type.unwrap_or_default(),
        })?;
        if let Some(symbol) = scalar_symbol(ty) {
            return Ok(FieldType::Scalar(symbol));
        }

        let type_name = field.type_name.as_deref().unwrap_or("");
        let mut resolved = self.resolve_type_name(type_name, referenced_from, packages)?;

        match resolved.target {
            TypeRef::Message(id) => {
                let entry = self.ctx.pool().message(id);
                if let (Some(map_entry), Label::Repeated) = (&entry.map_entry, field.label()) {
                    let key = self.resolve_field_type(&map_entry.key, referenced_from, packages)?;
                    let value =
                        self.resolve_field_type(&map_entry.value, referenced_from, packages)?;
                    return Ok(FieldType::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    });
                }
                if ty == Type::Group {
                    resolved.kind = TypeKind::Group;
                }
            }
            TypeRef::Enum(_) => {}
        }

        Ok(FieldType::Named(resolved))
    }

    /// Resolve a fully-qualified type name, as used by fields, extendees and
    /// method signatures.
    pub fn resolve_type_name(
        &self,
        type_name: &str,
        referenced_from: &str,
        packages: &mut PackageSet,
    ) -> Result<ResolvedType, Error> {
        let pool = self.ctx.pool();
        let target = pool
            .lookup(type_name)
            .ok_or_else(|| Error::UnresolvedType {
                type_name: type_name.to_string(),
                referenced_from: referenced_from.to_string(),
            })?;

        let (file, scope, kind) = match target {
            TypeRef::Message(id) => {
                let entry = pool.message(id);
                (entry.file, &entry.scope, TypeKind::Message)
            }
            TypeRef::Enum(id) => {
                let entry = pool.enumeration(id);
                (entry.file, &entry.scope, TypeKind::Enum)
            }
        };

        let origin_namespace = self.ctx.namespace(file);
        packages.insert(origin_namespace);

        Ok(ResolvedType {
            symbol: type_symbol(scope),
            origin_namespace: origin_namespace.to_string(),
            requires_import: file != self.file,
            kind,
            target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorOptions;
    use crate::descriptor::{DescriptorProto, FileDescriptorProto, MessageOptions};
    use crate::pool::DescriptorPool;

    fn field(name: &str, ty: Type, type_name: Option<&str>, label: Label) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.into()),
            number: Some(1),
            label: Some(label as i32),
            r#type: Some(ty as i32),
            type_name: type_name.map(str::to_string),
            ..Default::default()
        }
    }

    fn context() -> GenerationContext {
        let common = FileDescriptorProto {
            name: Some("common.proto".into()),
            package: Some("common".into()),
            message_type: vec![DescriptorProto {
                name: Some("Timestamp".into()),
                ..Default::default()
            }],
            syntax: Some("proto3".into()),
            ..Default::default()
        };

        let mut entry = DescriptorProto {
            name: Some("LabelsEntry".into()),
            options: Some(MessageOptions {
                map_entry: Some(true),
            }),
            ..Default::default()
        };
        entry.field.push(field("key", Type::String, None, Label::Optional));
        let mut value = field("value", Type::Message, Some(".common.Timestamp"), Label::Optional);
        value.number = Some(2);
        entry.field.push(value);

        let event = FileDescriptorProto {
            name: Some("event.proto".into()),
            package: Some("event".into()),
            dependency: vec!["common.proto".into()],
            message_type: vec![DescriptorProto {
                name: Some("Event".into()),
                nested_type: vec![entry],
                ..Default::default()
            }],
            syntax: Some("proto3".into()),
            ..Default::default()
        };

        let pool = DescriptorPool::new([common, event]).unwrap();
        GenerationContext::new(pool, GeneratorOptions::default()).unwrap()
    }

    #[test]
    fn test_scalar() {
        let ctx = context();
        let resolver = Resolver::new(&ctx, ctx.pool().file_id("event.proto").unwrap());
        let mut packages = PackageSet::new();

        let ty = resolver
            .resolve_field_type(&field("id", Type::Sint64, None, Label::Optional), "id", &mut packages)
            .unwrap();
        assert_eq!(ty, FieldType::Scalar("cl-protobufs:sint64"));
        assert!(packages.is_empty());
    }

    #[test]
    fn test_cross_file_reference() {
        let ctx = context();
        let resolver = Resolver::new(&ctx, ctx.pool().file_id("event.proto").unwrap());
        let mut packages = PackageSet::new();

        let ty = resolver
            .resolve_field_type(
                &field("at", Type::Message, Some(".common.Timestamp"), Label::Optional),
                "event.Event.at",
                &mut packages,
            )
            .unwrap();
        let FieldType::Named(resolved) = &ty else {
            panic!("expected a named type, got {ty:?}");
        };
        assert!(resolved.requires_import);
        assert_eq!(resolved.origin_namespace, "CL-PROTOBUFS.COMMON");
        assert_eq!(ty.lisp_type(resolver.namespace()), "cl-protobufs.common::timestamp");
        assert_eq!(ty.lisp_type("CL-PROTOBUFS.COMMON"), "timestamp");
        assert_eq!(ty.kind(), TypeKind::Message);
        assert!(packages.contains("CL-PROTOBUFS.COMMON"));
    }

    #[test]
    fn test_map_field() {
        let ctx = context();
        let resolver = Resolver::new(&ctx, ctx.pool().file_id("event.proto").unwrap());
        let mut packages = PackageSet::new();

        let ty = resolver
            .resolve_field_type(
                &field("labels", Type::Message, Some(".event.Event.LabelsEntry"), Label::Repeated),
                "event.Event.labels",
                &mut packages,
            )
            .unwrap();
        let FieldType::Map { key, value } = ty else {
            panic!("expected a map");
        };
        assert_eq!(*key, FieldType::Scalar("cl:string"));
        assert_eq!(value.lisp_type("CL-PROTOBUFS.EVENT"), "cl-protobufs.common::timestamp");
        assert_eq!(
            packages.iter().collect::<Vec<_>>(),
            vec!["CL-PROTOBUFS.COMMON", "CL-PROTOBUFS.EVENT"]
        );
    }

    #[test]
    fn test_unresolved_type() {
        let ctx = context();
        let resolver = Resolver::new(&ctx, ctx.pool().file_id("event.proto").unwrap());
        let err = resolver
            .resolve_type_name(".event.Missing", "event.Event.missing", &mut PackageSet::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedType { type_name, referenced_from }
                if type_name == ".event.Missing" && referenced_from == "event.Event.missing"
        ));
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("A", "A", "x"), "x");
        assert_eq!(qualify("", "A", "x"), "cl-user::x");
        assert_eq!(qualify("CL-PROTOBUFS.B", "", "x"), "cl-protobufs.b::x");
    }
}
