//! Message generation.

use crate::codegen::enumeration::generate_enum;
use crate::codegen::extension::generate_extension;
use crate::codegen::field::generate_fields;
use crate::codegen::{ExportSet, FileState};
use crate::descriptor::DescriptorProto;
use crate::names::{string_literal, type_symbol};
use crate::printer::Printer;
use crate::Error;

/// Emit a `proto:define-message` form for `message`, nested in `parents`.
///
/// Nested enums, nested messages, nested extensions and fields are emitted
/// inside the form, in that order. Synthetic map entry messages are not
/// emitted; their fields surface as `proto:define-map`.
///
/// Returns the message symbol, then the exports of nested types, then the
/// field accessors.
pub(crate) fn generate_message(
    state: &mut FileState<'_>,
    printer: &mut Printer,
    parents: &[String],
    message: &DescriptorProto,
) -> Result<ExportSet, Error> {
    let name = message.name.as_deref().ok_or(Error::MissingName)?;
    let full_name = state.full_name(parents, name);
    let mut chain = parents.to_vec();
    chain.push(name.to_string());
    let symbol = type_symbol(&chain);
    state.types.claim(&full_name, &symbol)?;

    tracing::trace!(full_name = %full_name, symbol = %symbol, fields = message.field.len(), "generating message");

    let mut exports = ExportSet::new();
    exports.push(symbol.as_str());

    printer.print("\n(proto:define-message $symbol$", &[("symbol", &symbol)])?;
    printer.indent();
    printer.indent();
    printer.print("\n(:name $name$)", &[("name", &string_literal(name))])?;
    printer.outdent();

    if !message.enum_type.is_empty() {
        printer.print_raw("\n;; Nested enums.");
        for enum_type in &message.enum_type {
            exports.extend(generate_enum(state, printer, &chain, enum_type)?);
        }
    }

    let nested: Vec<&DescriptorProto> = message
        .nested_type
        .iter()
        .filter(|nested| !nested.is_map_entry())
        .collect();
    if !nested.is_empty() {
        printer.print_raw("\n;; Nested messages.");
        for nested in nested {
            exports.extend(generate_message(state, printer, &chain, nested)?);
        }
    }

    if !message.extension.is_empty() {
        printer.print_raw("\n;; Nested extensions.");
        for extension in &message.extension {
            generate_extension(state, printer, &chain, extension)?;
        }
    }

    if !message.field.is_empty() {
        printer.print_raw("\n;; Fields.");
        generate_fields(state, printer, &full_name, message, &mut exports)?;
    }

    printer.outdent();
    printer.print_raw(")");
    Ok(exports)
}
