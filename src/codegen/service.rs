//! Service generation.

use crate::codegen::{ExportSet, FileState};
use crate::descriptor::{MethodDescriptorProto, ServiceDescriptorProto};
use crate::names::{hyphenate, map_identifier, string_literal, type_symbol, Role, SymbolScope};
use crate::printer::Printer;
use crate::Error;

/// Exports of one service: the service symbol for the schema package, and
/// the stub symbols for the RPC package.
#[derive(Debug, Default)]
pub(crate) struct ServiceExports {
    pub types: ExportSet,
    pub rpc: ExportSet,
}

/// Emit a `proto:define-service` form for `service`.
pub(crate) fn generate_service(
    state: &mut FileState<'_>,
    printer: &mut Printer,
    service: &ServiceDescriptorProto,
) -> Result<ServiceExports, Error> {
    let name = service.name.as_deref().ok_or(Error::MissingName)?;
    let full_name = state.full_name(&[], name);
    let symbol = type_symbol(&[name]);
    state.types.claim(&full_name, &symbol)?;

    tracing::trace!(service = %full_name, methods = service.method.len(), "generating service");

    let mut exports = ServiceExports::default();
    exports.types.push(symbol.as_str());

    printer.print("\n(proto:define-service $symbol$", &[("symbol", &symbol)])?;
    printer.indent();
    printer.indent();
    printer.print("\n(:name $name$)", &[("name", &string_literal(name))])?;
    printer.outdent();

    let mut methods = SymbolScope::new(format!("service `{full_name}`"));
    for method in &service.method {
        let method_name = method.name.as_deref().ok_or(Error::MissingName)?;
        let method_full_name = format!("{full_name}.{method_name}");
        let method_symbol = map_identifier(method_name, Role::Method);
        methods.claim(method_name, &method_symbol)?;

        let namespace = state.namespace();
        let input = state
            .resolve_type_name(method.input_type.as_deref().unwrap_or(""), &method_full_name)?
            .qualified(namespace);
        let output = state
            .resolve_type_name(method.output_type.as_deref().unwrap_or(""), &method_full_name)?
            .qualified(namespace);

        printer.print(
            "\n($method$ ($input$ => $output$)\n :name $name$\n :streaming $streaming$)",
            &[
                ("method", &method_symbol),
                ("input", &input),
                ("output", &output),
                ("name", &string_literal(method_name)),
                ("streaming", streaming(method)),
            ],
        )?;

        // Stubs are generic functions specialized on the request type, so
        // methods of different services may share a stub name as long as
        // their inputs differ.
        let stub = hyphenate(method_name);
        for rpc_symbol in [format!("call-{stub}"), format!("{stub}-impl")] {
            state
                .rpc
                .claim(&method_full_name, &format!("{rpc_symbol} ({input})"))?;
            exports.rpc.push(rpc_symbol);
        }
    }

    printer.outdent();
    printer.print_raw(")");
    Ok(exports)
}

/// The `:streaming` keyword for a method's client/server streaming flags.
fn streaming(method: &MethodDescriptorProto) -> &'static str {
    match (
        method.client_streaming.unwrap_or(false),
        method.server_streaming.unwrap_or(false),
    ) {
        (false, false) => ":unary",
        (true, false) => ":client-streaming",
        (false, true) => ":server-streaming",
        (true, true) => ":bidirectional",
    }
}
