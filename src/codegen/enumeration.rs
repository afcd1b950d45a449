//! Enum generation.

use crate::codegen::{ExportSet, FileState};
use crate::descriptor::EnumDescriptorProto;
use crate::names::{enum_value_constant, map_identifier, string_literal, type_symbol, Role, SymbolScope};
use crate::printer::Printer;
use crate::Error;

/// Emit a `proto:define-enum` form for `enum_type`, nested in `parents`.
///
/// Returns the enum symbol followed by one `+enum-value+` constant per
/// value.
pub(crate) fn generate_enum(
    state: &mut FileState<'_>,
    printer: &mut Printer,
    parents: &[String],
    enum_type: &EnumDescriptorProto,
) -> Result<ExportSet, Error> {
    let name = enum_type.name.as_deref().ok_or(Error::MissingName)?;
    let full_name = state.full_name(parents, name);
    let mut chain = parents.to_vec();
    chain.push(name.to_string());
    let symbol = type_symbol(&chain);
    state.types.claim(&full_name, &symbol)?;

    tracing::trace!(full_name = %full_name, symbol = %symbol, values = enum_type.value.len(), "generating enum");

    let mut exports = ExportSet::new();
    exports.push(symbol.as_str());

    printer.print("\n(proto:define-enum $symbol$", &[("symbol", &symbol)])?;
    printer.indent();
    printer.indent();
    printer.print("\n(:name $name$)", &[("name", &string_literal(name))])?;
    printer.outdent();

    let mut values = SymbolScope::new(format!("enum `{full_name}`"));
    for value in &enum_type.value {
        let value_name = value.name.as_deref().ok_or(Error::MissingName)?;
        let value_full_name = format!("{full_name}.{value_name}");
        let number = value
            .number
            .ok_or_else(|| Error::MissingFieldNumber(value_full_name.clone()))?;

        let keyword = map_identifier(value_name, Role::EnumValue);
        values.claim(value_name, &keyword)?;
        let constant = enum_value_constant(&symbol, value_name);
        state.constants.claim(&value_full_name, &constant)?;

        printer.print(
            "\n(:$keyword$ :index $number$)",
            &[("keyword", &keyword), ("number", &number.to_string())],
        )?;
        exports.push(constant);
    }

    printer.outdent();
    printer.print_raw(")");
    Ok(exports)
}
