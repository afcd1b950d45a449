//! The protoc plugin protocol: `CodeGeneratorRequest` in, `CodeGeneratorResponse` out.

use crate::descriptor::{decode_file_descriptor_proto, FileDescriptorProto};
use crate::wire::{
    decode_bytes, decode_key, decode_string, encode_bytes, encode_string, encode_uint64, skip_field,
};
use crate::{generate, Error, GeneratorOptions};

/// `CodeGeneratorResponse.Feature.FEATURE_PROTO3_OPTIONAL`.
pub const FEATURE_PROTO3_OPTIONAL: u64 = 1;

/// Corresponds to google.protobuf.compiler.CodeGeneratorRequest.
#[derive(Debug, Clone, Default)]
pub struct CodeGeneratorRequest {
    /// Files named on the protoc command line.
    pub file_to_generate: Vec<String>, // field 1
    /// The `--lisp_opt` / `--lisp_out=<param>:` parameter.
    pub parameter: Option<String>, // field 2
    /// Every file in `file_to_generate` plus everything it imports, in
    /// topological order.
    pub proto_file: Vec<FileDescriptorProto>, // field 15
}

impl CodeGeneratorRequest {
    /// Decode a request from protobuf binary data.
    pub fn decode(data: &[u8]) -> Result<Self, Error> {
        let mut buf = data;
        let mut request = Self::default();

        while !buf.is_empty() {
            let (field_number, wire_type) = decode_key(&mut buf)?;
            match field_number {
                1 => request.file_to_generate.push(decode_string(&mut buf)?),
                2 => request.parameter = Some(decode_string(&mut buf)?),
                15 => request
                    .proto_file
                    .push(decode_file_descriptor_proto(decode_bytes(&mut buf)?)?),
                _ => skip_field(&mut buf, wire_type)?,
            }
        }

        Ok(request)
    }
}

/// A generated output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFile {
    /// Path relative to the output directory.
    pub name: String,
    /// File contents.
    pub content: String,
}

/// Corresponds to google.protobuf.compiler.CodeGeneratorResponse.
#[derive(Debug, Clone, Default)]
pub struct CodeGeneratorResponse {
    /// Set when generation failed; protoc reports it and exits non-zero.
    pub error: Option<String>, // field 1
    /// Bitset of supported features.
    pub supported_features: u64, // field 2
    /// Generated files.
    pub file: Vec<ResponseFile>, // field 15
}

impl CodeGeneratorResponse {
    /// A response carrying only an error message.
    pub fn from_error(error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            supported_features: FEATURE_PROTO3_OPTIONAL,
            file: Vec::new(),
        }
    }

    /// Encode the response to protobuf binary.
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        if let Some(error) = &self.error {
            encode_string(1, error, &mut out)?;
        }
        if self.supported_features != 0 {
            encode_uint64(2, self.supported_features, &mut out)?;
        }
        for file in &self.file {
            let mut entry = Vec::new();
            encode_string(1, &file.name, &mut entry)?;
            encode_string(15, &file.content, &mut entry)?;
            encode_bytes(15, &entry, &mut out)?;
        }
        Ok(out)
    }
}

/// Generate every file a request asks for.
///
/// Failures are reported through the response's `error` field, which protoc
/// prints before exiting non-zero.
pub fn handle_request(request: CodeGeneratorRequest) -> CodeGeneratorResponse {
    let result = GeneratorOptions::from_parameter(request.parameter.as_deref().unwrap_or(""))
        .and_then(|options| generate(request.proto_file, request.file_to_generate.as_slice(), options));

    match result {
        Ok(files) => CodeGeneratorResponse {
            error: None,
            supported_features: FEATURE_PROTO3_OPTIONAL,
            file: files
                .into_iter()
                .map(|file| ResponseFile {
                    name: file.name,
                    content: file.content,
                })
                .collect(),
        },
        Err(err) => {
            tracing::warn!(error = %err, "generation failed");
            CodeGeneratorResponse::from_error(err)
        }
    }
}
