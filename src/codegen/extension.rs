//! Extension generation.

use crate::codegen::field::print_field;
use crate::codegen::FileState;
use crate::descriptor::FieldDescriptorProto;
use crate::names::{map_identifier, Role};
use crate::printer::Printer;
use crate::Error;

/// Emit a `proto:define-extend` form adding `field` to its extendee.
///
/// Extensions export nothing.
pub(crate) fn generate_extension(
    state: &mut FileState<'_>,
    printer: &mut Printer,
    parents: &[String],
    field: &FieldDescriptorProto,
) -> Result<(), Error> {
    let name = field.name.as_deref().ok_or(Error::MissingName)?;
    let full_name = state.full_name(parents, name);
    let accessor = map_identifier(name, Role::Field);
    state.extensions.claim(&full_name, &accessor)?;

    let extendee = field.extendee.as_deref().unwrap_or("");
    let extendee = state
        .resolve_type_name(extendee, &full_name)?
        .qualified(state.namespace());

    tracing::trace!(extension = %full_name, extendee = %extendee, "generating extension");

    printer.print("\n(proto:define-extend $extendee$", &[("extendee", &extendee)])?;
    printer.indent();
    printer.indent();
    printer.print_raw("\n()");
    printer.outdent();
    print_field(state, printer, field, &full_name, &accessor, true)?;
    printer.outdent();
    printer.print_raw(")");
    Ok(())
}
