//! Field, oneof and map generation.

use crate::codegen::default::render_default;
use crate::codegen::{ExportSet, FileState};
use crate::descriptor::{DescriptorProto, FieldDescriptorProto, Label, Syntax, Type};
use crate::names::{json_name, map_identifier, string_literal, Role, SymbolScope};
use crate::pool::TypeRef;
use crate::printer::Printer;
use crate::resolve::{FieldType, TypeKind};
use crate::Error;

/// Emit every field of `message` in declaration order.
///
/// Members of a oneof are grouped in a `proto:define-oneof` form placed
/// where the first member is declared. Accessor symbols are added to
/// `exports`.
pub(crate) fn generate_fields(
    state: &mut FileState<'_>,
    printer: &mut Printer,
    message_name: &str,
    message: &DescriptorProto,
    exports: &mut ExportSet,
) -> Result<(), Error> {
    let mut scope = SymbolScope::new(format!("message `{message_name}`"));
    let mut emitted_oneofs = vec![false; message.oneof_decl.len()];

    for field in &message.field {
        let Some(index) = field.real_oneof_index() else {
            generate_field(state, printer, message_name, field, false, &mut scope, exports)?;
            continue;
        };

        let oneof = message.oneof_decl.get(index).ok_or_else(|| Error::InvalidFieldType {
            field: format!("{message_name}.{}", field.name()),
            type_id: field.r#type.unwrap_or_default(),
        })?;
        if emitted_oneofs[index] {
            continue;
        }
        emitted_oneofs[index] = true;

        let oneof_name = oneof.name.as_deref().ok_or(Error::MissingName)?;
        let symbol = map_identifier(oneof_name, Role::Field);
        scope.claim(oneof_name, &symbol)?;

        printer.print("\n(proto:define-oneof $symbol$", &[("symbol", &symbol)])?;
        printer.indent();
        printer.indent();
        printer.print_raw("\n()");
        printer.outdent();
        for member in message
            .field
            .iter()
            .filter(|f| f.real_oneof_index() == Some(index))
        {
            generate_field(state, printer, message_name, member, true, &mut scope, exports)?;
        }
        printer.outdent();
        printer.print_raw(")");
    }

    Ok(())
}

fn generate_field(
    state: &mut FileState<'_>,
    printer: &mut Printer,
    message_name: &str,
    field: &FieldDescriptorProto,
    in_oneof: bool,
    scope: &mut SymbolScope,
    exports: &mut ExportSet,
) -> Result<(), Error> {
    let name = field.name.as_deref().ok_or(Error::MissingName)?;
    let accessor = map_identifier(name, Role::Field);
    scope.claim(name, &accessor)?;

    let referenced_from = format!("{message_name}.{name}");
    print_field(state, printer, field, &referenced_from, &accessor, in_oneof)?;
    exports.push(accessor);
    Ok(())
}

/// Print the declaration of one field.
///
/// `explicit_presence` marks fields that track presence regardless of
/// syntax: oneof members and extensions.
pub(crate) fn print_field(
    state: &mut FileState<'_>,
    printer: &mut Printer,
    field: &FieldDescriptorProto,
    referenced_from: &str,
    accessor: &str,
    explicit_presence: bool,
) -> Result<(), Error> {
    let number = field
        .number
        .ok_or_else(|| Error::MissingFieldNumber(referenced_from.to_string()))?;
    let field_type = state.resolve_field_type(field, referenced_from)?;
    let namespace = state.namespace();
    let json = string_literal(
        &field
            .json_name
            .clone()
            .unwrap_or_else(|| json_name(field.name())),
    );

    tracing::trace!(field = %referenced_from, accessor, number, "generating field");

    if let FieldType::Map { key, value } = &field_type {
        return printer.print(
            "\n(proto:define-map $accessor$\n :index $number$ :key-type $key$ :value-type $value$ :value-kind $kind$ :json-name $json$)",
            &[
                ("accessor", accessor),
                ("number", &number.to_string()),
                ("key", &key.lisp_type(namespace)),
                ("value", &value.lisp_type(namespace)),
                ("kind", value.kind().keyword()),
                ("json", &json),
            ],
        );
    }

    // Validated by the resolver.
    let ty = field.field_type().unwrap_or(Type::Message);
    let kind = field_type.kind();

    let packed = if is_packed(field, ty, state.syntax) {
        " :packed cl:t"
    } else {
        ""
    };
    let default = default_value(state, field, &field_type, ty, referenced_from)?;

    printer.print(
        "\n($accessor$\n :index $number$ :type $type$ :kind $kind$ :label ($label$) :json-name $json$$packed$",
        &[
            ("accessor", accessor),
            ("number", &number.to_string()),
            ("type", &field_type.lisp_type(namespace)),
            ("kind", kind.keyword()),
            ("label", label(field, state.syntax, kind, explicit_presence)),
            ("json", &json),
            ("packed", packed),
        ],
    )?;
    if let Some(default) = default {
        printer.print_raw(" :default ");
        printer.print_verbatim(&default);
    }
    printer.print_raw(")");
    Ok(())
}

/// The `:label` cardinality of a field.
fn label(
    field: &FieldDescriptorProto,
    syntax: Syntax,
    kind: TypeKind,
    explicit_presence: bool,
) -> &'static str {
    match field.label() {
        Label::Required => ":required",
        Label::Repeated => ":repeated :list",
        Label::Optional => {
            let implicit = syntax == Syntax::Proto3
                && !explicit_presence
                && !field.is_proto3_optional()
                && !matches!(kind, TypeKind::Message | TypeKind::Group);
            if implicit {
                ":singular"
            } else {
                ":optional"
            }
        }
    }
}

/// Repeated numeric fields are packed when requested, and by default in
/// proto3.
fn is_packed(field: &FieldDescriptorProto, ty: Type, syntax: Syntax) -> bool {
    if field.label() != Label::Repeated || !ty.is_packable() {
        return false;
    }
    match field.options.as_ref().and_then(|o| o.packed) {
        Some(packed) => packed,
        None => syntax == Syntax::Proto3,
    }
}

/// The `:default` value: an explicit default, or the first declared value
/// for singular enum fields.
fn default_value(
    state: &FileState<'_>,
    field: &FieldDescriptorProto,
    field_type: &FieldType,
    ty: Type,
    referenced_from: &str,
) -> Result<Option<String>, Error> {
    if field.label() == Label::Repeated {
        return Ok(None);
    }
    if let Some(value) = field.default_value.as_deref() {
        return render_default(referenced_from, ty, value);
    }

    let FieldType::Named(resolved) = field_type else {
        return Ok(None);
    };
    let TypeRef::Enum(id) = resolved.target else {
        return Ok(None);
    };
    let first = state
        .resolver
        .context()
        .pool()
        .enumeration(id)
        .first_value
        .as_deref()
        .map(|value| format!(":{}", map_identifier(value, Role::EnumValue)));
    Ok(first)
}
