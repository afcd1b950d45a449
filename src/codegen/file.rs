//! Per-file generation driver.

use crate::codegen::enumeration::generate_enum;
use crate::codegen::extension::generate_extension;
use crate::codegen::message::generate_message;
use crate::codegen::service::generate_service;
use crate::codegen::{ExportSet, FileState, GeneratedFile};
use crate::context::GenerationContext;
use crate::names::{output_file_name, rpc_package_name, schema_name, string_literal, symbol};
use crate::printer::{joined, Printer};
use crate::resolve::Resolver;
use crate::Error;

/// Generate the Lisp source for the schema file at `path`.
///
/// Any error aborts the file; nothing is returned for it.
pub fn generate_file(ctx: &GenerationContext, path: &str) -> Result<GeneratedFile, Error> {
    let file_id = ctx.pool().file_id(path)?;
    let entry = ctx.pool().file(file_id);
    let file = &entry.descriptor;
    let schema = symbol(&schema_name(path));
    let output_name = output_file_name(path);

    let resolver = Resolver::new(ctx, file_id);
    let namespace = resolver.namespace();
    let mut state = FileState::new(resolver, entry.syntax, file.package(), path);

    state.packages.insert(namespace);
    if !namespace.is_empty() && !file.service.is_empty() {
        state.packages.insert(&rpc_package_name(namespace));
    }

    // The body is generated first: the package prelude must list every
    // namespace that resolution touches.
    let mut body = Printer::new();
    let mut exports = ExportSet::new();
    exports.push(schema.as_str());
    let mut rpc_exports = ExportSet::new();

    if !file.enum_type.is_empty() {
        body.print_raw("\n;; Top-Level enums.\n");
        for enum_type in &file.enum_type {
            exports.extend(generate_enum(&mut state, &mut body, &[], enum_type)?);
            body.print_raw("\n");
        }
    }

    if !file.message_type.is_empty() {
        body.print_raw("\n;; Top-Level messages.\n");
        for message in &file.message_type {
            exports.extend(generate_message(&mut state, &mut body, &[], message)?);
            body.print_raw("\n");
        }
    }

    if !file.extension.is_empty() {
        body.print_raw("\n;; Top-Level extensions.\n");
        for extension in &file.extension {
            generate_extension(&mut state, &mut body, &[], extension)?;
            body.print_raw("\n");
        }
    }

    if !file.service.is_empty() {
        body.print_raw("\n;; Services.\n");
        for service in &file.service {
            let service_exports = generate_service(&mut state, &mut body, service)?;
            exports.extend(service_exports.types);
            rpc_exports.extend(service_exports.rpc);
            body.print_raw("\n");
        }
    }

    // Names the file actually written (`a/b.lisp`), not `a/b.proto.lisp`.
    let mut printer = Printer::new();
    printer.print(
        ";;; $file_name$\n;;;\n;;; Generated by the protocol buffer compiler. DO NOT EDIT!\n",
        &[("file_name", &output_name)],
    )?;
    printer.print_raw("\n(cl:in-package #:common-lisp-user)\n");
    printer.print_raw(
        "\n#+sbcl (cl:declaim (cl:optimize (cl:debug 0) (sb-c:store-coverage-data 0)))\n",
    );
    for package in state.packages.iter() {
        printer.print(
            "\n(cl:eval-when (:compile-toplevel :load-toplevel :execute)\n  (cl:unless (cl:find-package \"$package$\")\n    (cl:defpackage \"$package$\" (:use))))\n",
            &[("package", package)],
        )?;
    }
    if !namespace.is_empty() {
        printer.print("\n(cl:in-package \"$package$\")\n", &[("package", namespace)])?;
    }

    print_schema(&mut printer, &schema, &state, file.package(), &file.dependency)?;
    printer.print_raw(&body.finish());

    printer.print(
        "\n(cl:eval-when (:compile-toplevel :load-toplevel :execute)\n  (cl:setf (cl:gethash #P$path$ proto-impl::*all-schemas*)\n           (proto:find-schema '$schema$)))\n",
        &[("path", &string_literal(path)), ("schema", &schema)],
    )?;

    if !namespace.is_empty() {
        print_exports(&mut printer, &exports)?;
        if !rpc_exports.is_empty() {
            printer.print(
                "\n(cl:in-package \"$package$\")\n",
                &[("package", &rpc_package_name(namespace))],
            )?;
            print_exports(&mut printer, &rpc_exports)?;
        }
    }

    tracing::debug!(
        path,
        namespace,
        enums = file.enum_type.len(),
        messages = file.message_type.len(),
        services = file.service.len(),
        packages = state.packages.len(),
        imported_types = state.imported.len(),
        exports = exports.len(),
        "generated file"
    );

    Ok(GeneratedFile {
        name: output_name,
        content: printer.finish(),
    })
}

/// Print the `proto:define-schema` form.
fn print_schema(
    printer: &mut Printer,
    schema: &str,
    state: &FileState<'_>,
    package: &str,
    dependencies: &[String],
) -> Result<(), Error> {
    printer.print(
        "\n(cl:eval-when (:compile-toplevel :load-toplevel :execute)\n  (proto:define-schema '$schema$",
        &[("schema", schema)],
    )?;
    printer.indent();
    printer.indent();
    printer.print("\n:syntax $syntax$", &[("syntax", state.syntax.keyword())])?;
    if !package.is_empty() {
        printer.print("\n:package $package$", &[("package", &string_literal(package))])?;
    }
    if !dependencies.is_empty() {
        let imports = joined(
            dependencies.iter().map(|dependency| string_literal(dependency)),
            "\n          ",
        );
        printer.print("\n:import '($imports$)", &[("imports", &imports)])?;
    }
    printer.outdent();
    printer.outdent();
    printer.print_raw("))\n");
    Ok(())
}

/// Print a `cl:export` form. Empty sets print nothing.
fn print_exports(printer: &mut Printer, exports: &ExportSet) -> Result<(), Error> {
    if exports.is_empty() {
        return Ok(());
    }
    let symbols = joined(exports.iter(), "\n             ");
    printer.print("\n(cl:export '($symbols$))\n", &[("symbols", &symbols)])
}
