//! Decoder for FileDescriptorSet from protobuf binary format.

use super::*;
use crate::wire::{
    decode_bool, decode_bytes, decode_int32, decode_key, decode_string, skip_field,
};
use crate::Error;

/// Decode a FileDescriptorSet from protobuf binary data.
pub fn decode_file_descriptor_set(data: &[u8]) -> Result<FileDescriptorSet, Error> {
    let mut buf = data;
    let mut fds = FileDescriptorSet::default();

    while !buf.is_empty() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => fds
                .file
                .push(decode_file_descriptor_proto(decode_bytes(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(fds)
}

/// Decode a FileDescriptorProto.
pub fn decode_file_descriptor_proto(data: &[u8]) -> Result<FileDescriptorProto, Error> {
    let mut buf = data;
    let mut fdp = FileDescriptorProto::default();

    while !buf.is_empty() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => fdp.name = Some(decode_string(&mut buf)?),
            2 => fdp.package = Some(decode_string(&mut buf)?),
            3 => fdp.dependency.push(decode_string(&mut buf)?),
            4 => fdp
                .message_type
                .push(decode_descriptor_proto(decode_bytes(&mut buf)?)?),
            5 => fdp
                .enum_type
                .push(decode_enum_descriptor_proto(decode_bytes(&mut buf)?)?),
            6 => fdp
                .service
                .push(decode_service_descriptor_proto(decode_bytes(&mut buf)?)?),
            7 => fdp
                .extension
                .push(decode_field_descriptor_proto(decode_bytes(&mut buf)?)?),
            12 => fdp.syntax = Some(decode_string(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(fdp)
}

/// Decode a DescriptorProto (message type).
fn decode_descriptor_proto(data: &[u8]) -> Result<DescriptorProto, Error> {
    let mut buf = data;
    let mut dp = DescriptorProto::default();

    while !buf.is_empty() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => dp.name = Some(decode_string(&mut buf)?),
            2 => dp
                .field
                .push(decode_field_descriptor_proto(decode_bytes(&mut buf)?)?),
            3 => dp
                .nested_type
                .push(decode_descriptor_proto(decode_bytes(&mut buf)?)?),
            4 => dp
                .enum_type
                .push(decode_enum_descriptor_proto(decode_bytes(&mut buf)?)?),
            6 => dp
                .extension
                .push(decode_field_descriptor_proto(decode_bytes(&mut buf)?)?),
            7 => dp.options = Some(decode_message_options(decode_bytes(&mut buf)?)?),
            8 => dp
                .oneof_decl
                .push(decode_oneof_descriptor_proto(decode_bytes(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(dp)
}

/// Decode a FieldDescriptorProto.
fn decode_field_descriptor_proto(data: &[u8]) -> Result<FieldDescriptorProto, Error> {
    let mut buf = data;
    let mut fdp = FieldDescriptorProto::default();

    while !buf.is_empty() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => fdp.name = Some(decode_string(&mut buf)?),
            2 => fdp.extendee = Some(decode_string(&mut buf)?),
            3 => fdp.number = Some(decode_int32(&mut buf)?),
            4 => fdp.label = Some(decode_int32(&mut buf)?),
            5 => fdp.r#type = Some(decode_int32(&mut buf)?),
            6 => fdp.type_name = Some(decode_string(&mut buf)?),
            7 => fdp.default_value = Some(decode_string(&mut buf)?),
            8 => fdp.options = Some(decode_field_options(decode_bytes(&mut buf)?)?),
            9 => fdp.oneof_index = Some(decode_int32(&mut buf)?),
            10 => fdp.json_name = Some(decode_string(&mut buf)?),
            17 => fdp.proto3_optional = Some(decode_bool(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(fdp)
}

/// Decode FieldOptions.
fn decode_field_options(data: &[u8]) -> Result<FieldOptions, Error> {
    let mut buf = data;
    let mut opts = FieldOptions::default();

    while !buf.is_empty() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            2 => opts.packed = Some(decode_bool(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(opts)
}

/// Decode an EnumDescriptorProto.
fn decode_enum_descriptor_proto(data: &[u8]) -> Result<EnumDescriptorProto, Error> {
    let mut buf = data;
    let mut edp = EnumDescriptorProto::default();

    while !buf.is_empty() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => edp.name = Some(decode_string(&mut buf)?),
            2 => edp
                .value
                .push(decode_enum_value_descriptor_proto(decode_bytes(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(edp)
}

/// Decode an EnumValueDescriptorProto.
fn decode_enum_value_descriptor_proto(data: &[u8]) -> Result<EnumValueDescriptorProto, Error> {
    let mut buf = data;
    let mut evdp = EnumValueDescriptorProto::default();

    while !buf.is_empty() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => evdp.name = Some(decode_string(&mut buf)?),
            2 => evdp.number = Some(decode_int32(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(evdp)
}

/// Decode a OneofDescriptorProto.
fn decode_oneof_descriptor_proto(data: &[u8]) -> Result<OneofDescriptorProto, Error> {
    let mut buf = data;
    let mut odp = OneofDescriptorProto::default();

    while !buf.is_empty() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => odp.name = Some(decode_string(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(odp)
}

/// Decode a ServiceDescriptorProto.
fn decode_service_descriptor_proto(data: &[u8]) -> Result<ServiceDescriptorProto, Error> {
    let mut buf = data;
    let mut sdp = ServiceDescriptorProto::default();

    while !buf.is_empty() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => sdp.name = Some(decode_string(&mut buf)?),
            2 => sdp
                .method
                .push(decode_method_descriptor_proto(decode_bytes(&mut buf)?)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(sdp)
}

/// Decode a MethodDescriptorProto.
fn decode_method_descriptor_proto(data: &[u8]) -> Result<MethodDescriptorProto, Error> {
    let mut buf = data;
    let mut mdp = MethodDescriptorProto::default();

    while !buf.is_empty() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            1 => mdp.name = Some(decode_string(&mut buf)?),
            2 => mdp.input_type = Some(decode_string(&mut buf)?),
            3 => mdp.output_type = Some(decode_string(&mut buf)?),
            5 => mdp.client_streaming = Some(decode_bool(&mut buf)?),
            6 => mdp.server_streaming = Some(decode_bool(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(mdp)
}

/// Decode MessageOptions.
fn decode_message_options(data: &[u8]) -> Result<MessageOptions, Error> {
    let mut buf = data;
    let mut mo = MessageOptions::default();

    while !buf.is_empty() {
        let (field_number, wire_type) = decode_key(&mut buf)?;
        match field_number {
            7 => mo.map_entry = Some(decode_bool(&mut buf)?),
            _ => skip_field(&mut buf, wire_type)?,
        }
    }

    Ok(mo)
}
