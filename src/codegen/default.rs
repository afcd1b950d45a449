//! Rendering of explicit field default values.

use crate::descriptor::Type;
use crate::names::{map_identifier, string_literal, Role};
use crate::Error;

/// Render a protoc `default_value` string as a Lisp literal.
///
/// `field` only names the field in errors. Message and group fields have no
/// defaults and yield `None`.
pub(crate) fn render_default(field: &str, ty: Type, value: &str) -> Result<Option<String>, Error> {
    let invalid = |reason: &'static str| Error::InvalidDefault {
        field: field.to_string(),
        value: value.to_string(),
        reason,
    };

    let rendered = match ty {
        Type::Int32
        | Type::Int64
        | Type::Uint32
        | Type::Uint64
        | Type::Sint32
        | Type::Sint64
        | Type::Fixed32
        | Type::Fixed64
        | Type::Sfixed32
        | Type::Sfixed64 => {
            value
                .parse::<i128>()
                .map_err(|_| invalid("not an integer"))?;
            value.to_string()
        }
        Type::Float => render_float(value, 'f', "single").ok_or_else(|| invalid("not a number"))?,
        Type::Double => render_float(value, 'd', "double").ok_or_else(|| invalid("not a number"))?,
        Type::Bool => match value {
            "true" => "cl:t".to_string(),
            "false" => "cl:nil".to_string(),
            _ => return Err(invalid("not a boolean")),
        },
        Type::String => string_literal(value),
        Type::Bytes => {
            let bytes = unescape_c(value).ok_or_else(|| invalid("malformed escape sequence"))?;
            let items: Vec<String> = bytes.iter().map(u8::to_string).collect();
            format!("#({})", items.join(" "))
        }
        Type::Enum => format!(":{}", map_identifier(value, Role::EnumValue)),
        Type::Message | Type::Group => return Ok(None),
    };

    Ok(Some(rendered))
}

/// Render a float in Lisp syntax with the exponent marker for its width
/// (`1.5` -> `1.5d0`, `2e10` -> `2d10`).
fn render_float(value: &str, marker: char, width: &str) -> Option<String> {
    match value {
        "inf" => return Some(format!("float-features:{width}-float-positive-infinity")),
        "-inf" => return Some(format!("float-features:{width}-float-negative-infinity")),
        "nan" => return Some(format!("float-features:{width}-float-nan")),
        _ => {}
    }

    value.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if !value.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E')) {
        return None;
    }

    Some(match value.find(&['e', 'E'][..]) {
        Some(exponent) => format!("{}{marker}{}", &value[..exponent], &value[exponent + 1..]),
        None => format!("{value}{marker}0"),
    })
}

/// Undo protoc's C escaping of `bytes` defaults.
fn unescape_c(value: &str) -> Option<Vec<u8>> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'\\' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        let escape = *bytes.get(i + 1)?;
        i += 2;
        match escape {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'v' => out.push(0x0B),
            b'\\' | b'\'' | b'"' | b'?' => out.push(escape),
            b'0'..=b'7' => {
                let mut code = u32::from(escape - b'0');
                let mut digits = 1;
                while digits < 3 {
                    match bytes.get(i).copied() {
                        Some(d @ b'0'..=b'7') => {
                            code = code * 8 + u32::from(d - b'0');
                            i += 1;
                            digits += 1;
                        }
                        _ => break,
                    }
                }
                out.push(u8::try_from(code).ok()?);
            }
            b'x' => {
                let mut code = 0u32;
                let mut digits = 0;
                while digits < 2 {
                    match bytes.get(i).and_then(|d| (*d as char).to_digit(16)) {
                        Some(d) => {
                            code = code * 16 + d;
                            i += 1;
                            digits += 1;
                        }
                        None => break,
                    }
                }
                if digits == 0 {
                    return None;
                }
                out.push(u8::try_from(code).ok()?);
            }
            _ => return None,
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(ty: Type, value: &str) -> String {
        render_default("f", ty, value).unwrap().unwrap()
    }

    #[test]
    fn test_integers_and_bools() {
        assert_eq!(render(Type::Int32, "-42"), "-42");
        assert_eq!(render(Type::Uint64, "18446744073709551615"), "18446744073709551615");
        assert_eq!(render(Type::Bool, "true"), "cl:t");
        assert_eq!(render(Type::Bool, "false"), "cl:nil");
    }

    #[test]
    fn test_floats() {
        assert_eq!(render(Type::Float, "1.5"), "1.5f0");
        assert_eq!(render(Type::Double, "1.5"), "1.5d0");
        assert_eq!(render(Type::Double, "-2e-10"), "-2d-10");
        assert_eq!(render(Type::Float, "3E4"), "3f4");
        assert_eq!(
            render(Type::Double, "inf"),
            "float-features:double-float-positive-infinity"
        );
        assert_eq!(
            render(Type::Float, "-inf"),
            "float-features:single-float-negative-infinity"
        );
        assert_eq!(render(Type::Float, "nan"), "float-features:single-float-nan");
    }

    #[test]
    fn test_strings_bytes_enums() {
        assert_eq!(render(Type::String, "say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(render(Type::Bytes, "ab\\001\\n\\xff"), "#(97 98 1 10 255)");
        assert_eq!(render(Type::Bytes, ""), "#()");
        assert_eq!(render(Type::Enum, "PHONE_TYPE_HOME"), ":phone-type-home");
        assert_eq!(render_default("m", Type::Message, "x").unwrap(), None);
    }

    #[test]
    fn test_invalid_defaults() {
        for (ty, value) in [
            (Type::Int32, "ten"),
            (Type::Double, "1.0.0"),
            (Type::Float, "0x10"),
            (Type::Bool, "yes"),
            (Type::Bytes, "\\q"),
            (Type::Bytes, "\\777"),
            (Type::Bytes, "trailing\\"),
        ] {
            assert!(
                matches!(
                    render_default("f", ty, value),
                    Err(Error::InvalidDefault { .. })
                ),
                "{value} should be rejected for {ty:?}"
            );
        }
    }
}
