//! `protoc-gen-lisp`: protoc plugin emitting cl-protobufs Common Lisp.
//!
//! ```text
//! protoc --plugin=protoc-gen-lisp --lisp_out=out/ --lisp_opt=package_prefix=PB. addressbook.proto
//! ```
//!
//! Logging goes to stderr, filtered by `PROTOLISP_LOG` (default `warn`).

use std::io::{self, Read, Write};
use std::process::ExitCode;

use protolisp::plugin::{handle_request, CodeGeneratorRequest, CodeGeneratorResponse};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("PROTOLISP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "protoc-gen-lisp failed");
            eprintln!("protoc-gen-lisp: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), protolisp::Error> {
    let mut input = Vec::new();
    io::stdin().lock().read_to_end(&mut input)?;

    // A request that can't be decoded is still answered through the
    // protocol so protoc shows the reason.
    let response = match CodeGeneratorRequest::decode(&input) {
        Ok(request) => {
            tracing::debug!(
                files = request.file_to_generate.len(),
                parameter = request.parameter.as_deref().unwrap_or(""),
                "received request"
            );
            handle_request(request)
        }
        Err(err) => CodeGeneratorResponse::from_error(format!("failed to decode request: {err}")),
    };

    let output = response.encode()?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(&output)?;
    stdout.flush()?;
    Ok(())
}
