//! Mapping from protobuf names to Common Lisp identifiers.

use std::collections::HashMap;

use crate::Error;

/// Suffix appended to identifiers that would otherwise be a reserved Lisp
/// name. `%` never occurs in a protobuf identifier, so a suffixed name can
/// not collide with any other mapped name.
pub const RESERVED_SUFFIX: char = '%';

/// Default prefix of generated Lisp package names.
pub const DEFAULT_PACKAGE_PREFIX: &str = "CL-PROTOBUFS.";

/// Common Lisp constants and special operators that generated symbols must
/// not shadow.
const RESERVED: &[&str] = &[
    "t",
    "nil",
    "block",
    "catch",
    "declare",
    "eval-when",
    "flet",
    "function",
    "go",
    "if",
    "labels",
    "lambda",
    "let",
    "let*",
    "load-time-value",
    "locally",
    "macrolet",
    "multiple-value-call",
    "multiple-value-prog1",
    "progn",
    "progv",
    "quote",
    "return-from",
    "setq",
    "symbol-macrolet",
    "tagbody",
    "the",
    "throw",
    "unwind-protect",
];

/// What a schema name is being mapped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A dotted protobuf package.
    Package,
    /// A message, enum or service name.
    Type,
    /// A field, oneof or extension name.
    Field,
    /// An enum value; rendered as a keyword.
    EnumValue,
    /// An RPC method name.
    Method,
}

/// Map a schema name to its Lisp identifier for `role`.
///
/// - `Package`: each dotted component is hyphenated and upper-cased
///   (`foo_bar.baz` -> `FOO-BAR.BAZ`).
/// - `EnumValue`: hyphenated lower case, without the leading `:`.
/// - Everything else: hyphenated lower case, with reserved names suffixed.
pub fn map_identifier(name: &str, role: Role) -> String {
    match role {
        Role::Package => name
            .split('.')
            .map(|component| hyphenate(component).to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join("."),
        Role::EnumValue => hyphenate(name),
        Role::Type | Role::Field | Role::Method => {
            let ident = hyphenate(name);
            if is_reserved(&ident) {
                format!("{ident}{RESERVED_SUFFIX}")
            } else {
                ident
            }
        }
    }
}

/// Convert a CamelCase or snake_case name to lower-case hyphenated words.
///
/// Consecutive capitals are kept together as one word:
/// - "PhoneNumber" -> "phone-number"
/// - "HTTPServer" -> "http-server"
/// - "phone_type" -> "phone-type"
/// - "MOBILE" -> "mobile"
pub fn hyphenate(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let prev_lower = prev.is_ascii_lowercase() || prev.is_ascii_digit();
                let prev_upper = prev.is_ascii_uppercase();
                let next_lower = chars.get(i + 1).is_some_and(|c| c.is_ascii_lowercase());
                if prev_lower || (prev_upper && next_lower) {
                    result.push('-');
                }
            }
            result.push(c.to_ascii_lowercase());
        } else if c.is_ascii_alphanumeric() {
            result.push(c);
        } else {
            result.push('-');
        }
    }
    result
}

/// Check if an identifier names a reserved Common Lisp operator or constant.
pub fn is_reserved(ident: &str) -> bool {
    RESERVED.contains(&ident)
}

/// Whether `ident` can be written as a bare symbol without escaping.
pub fn is_plain_symbol(ident: &str) -> bool {
    !ident.is_empty()
        && !ident.bytes().all(|b| b.is_ascii_digit() || b == b'-' || b == b'.')
        && ident.bytes().all(|b| {
            b.is_ascii_lowercase()
                || b.is_ascii_digit()
                || matches!(b, b'-' | b'.' | b'%' | b'+' | b'*' | b'_')
        })
}

/// Write `ident` as a symbol, escaping it with `|...|` when needed.
pub fn symbol(ident: &str) -> String {
    if is_plain_symbol(ident) {
        ident.to_string()
    } else {
        let escaped = ident.replace('\\', "\\\\").replace('|', "\\|");
        format!("|{escaped}|")
    }
}

/// Write `value` as a Lisp string literal.
pub fn string_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

/// The Lisp symbol of a (possibly nested) type, given its container chain
/// from outermost to innermost (`["Person", "PhoneNumber"]` ->
/// `person.phone-number`).
pub fn type_symbol<S: AsRef<str>>(scope: &[S]) -> String {
    scope
        .iter()
        .map(|name| map_identifier(name.as_ref(), Role::Type))
        .collect::<Vec<_>>()
        .join(".")
}

/// The exported constant naming one enum value (`+phone-type-mobile+`).
pub fn enum_value_constant(enum_symbol: &str, value_name: &str) -> String {
    format!("+{}-{}+", enum_symbol, map_identifier(value_name, Role::EnumValue))
}

/// Derive the Lisp package of a protobuf package.
///
/// An empty protobuf package has no Lisp package: its code lives in
/// `COMMON-LISP-USER`.
pub fn lisp_package_name(prefix: &str, package: &str) -> String {
    if package.is_empty() {
        String::new()
    } else {
        format!("{}{}", prefix, map_identifier(package, Role::Package))
    }
}

/// The package holding RPC stubs for services of `package`.
pub fn rpc_package_name(package: &str) -> String {
    format!("{package}-RPC")
}

/// Derive the schema identifier from a file path: the last path component
/// (either separator), without extension, lower-cased.
pub fn schema_name(path: &str) -> String {
    let base = path.rsplit(&['/', '\\'][..]).next().unwrap_or(path);
    let stem = match base.rfind('.') {
        Some(period) => &base[..period],
        None => base,
    };
    stem.to_lowercase()
}

/// Name of the generated Lisp file for a schema path.
pub fn output_file_name(path: &str) -> String {
    let stem = path.strip_suffix(".proto").unwrap_or(path);
    format!("{stem}.lisp")
}

/// Derive the JSON name protoc would assign (`phone_number` -> `phoneNumber`).
pub fn json_name(field_name: &str) -> String {
    let mut result = String::with_capacity(field_name.len());
    let mut capitalize = false;
    for c in field_name.chars() {
        if c == '_' {
            capitalize = true;
        } else if capitalize {
            result.push(c.to_ascii_uppercase());
            capitalize = false;
        } else {
            result.push(c);
        }
    }
    result
}

/// A set of Lisp identifiers that must be pairwise distinct.
///
/// Identifiers are compared case-insensitively because the Lisp reader folds
/// symbol names to upper case.
#[derive(Debug)]
pub struct SymbolScope {
    label: String,
    claimed: HashMap<String, String>,
}

impl SymbolScope {
    /// Create an empty scope; `label` appears in collision errors.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            claimed: HashMap::new(),
        }
    }

    /// Record that `source` maps to `identifier`.
    ///
    /// Claiming the same identifier again for the same source is allowed;
    /// a different source is an [`Error::IdentifierCollision`].
    pub fn claim(&mut self, source: &str, identifier: &str) -> Result<(), Error> {
        let key = identifier.to_ascii_uppercase();
        match self.claimed.get(&key) {
            Some(existing) if existing != source => Err(Error::IdentifierCollision {
                scope: self.label.clone(),
                identifier: identifier.to_string(),
                first: existing.clone(),
                second: source.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.claimed.insert(key, source.to_string());
                Ok(())
            }
        }
    }

    /// Number of distinct identifiers claimed.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Whether nothing has been claimed yet.
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
