//! Generator options.

use std::collections::BTreeMap;

use crate::names::{lisp_package_name, DEFAULT_PACKAGE_PREFIX};
use crate::Error;

/// Options controlling how protobuf packages map to Lisp packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Prepended to every derived Lisp package name.
    pub(crate) package_prefix: String,

    /// Maps a protobuf package to the exact Lisp package to use for it.
    pub(crate) package_overrides: BTreeMap<String, String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            package_prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
            package_overrides: BTreeMap::new(),
        }
    }
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefix of derived Lisp package names (default `CL-PROTOBUFS.`).
    pub fn package_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.package_prefix = prefix.into().to_ascii_uppercase();
        self
    }

    /// Place everything declared in the protobuf package `package` into the
    /// Lisp package `lisp_package`.
    ///
    /// # Example
    /// ```
    /// let mut options = protolisp::GeneratorOptions::new();
    /// options.package_override("tutorial", "addressbook");
    /// assert_eq!(options.namespace("tutorial"), "ADDRESSBOOK");
    /// ```
    pub fn package_override(
        &mut self,
        package: impl Into<String>,
        lisp_package: impl Into<String>,
    ) -> &mut Self {
        self.package_overrides
            .insert(package.into(), lisp_package.into().to_ascii_uppercase());
        self
    }

    /// Parse the protoc plugin parameter string.
    ///
    /// The parameter is a comma separated list of `key=value` pairs:
    /// - `package_prefix=<PREFIX>`
    /// - `package_override=<proto.package>:<LISP-PACKAGE>`, repeatable
    pub fn from_parameter(parameter: &str) -> Result<Self, Error> {
        let mut options = Self::default();

        for pair in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| Error::InvalidParameter(pair.to_string()))?;
            match key.trim() {
                "package_prefix" => {
                    options.package_prefix(value.trim());
                }
                "package_override" => {
                    let (package, lisp_package) = value
                        .split_once(':')
                        .filter(|(_, lisp)| !lisp.trim().is_empty())
                        .ok_or_else(|| Error::InvalidParameter(pair.to_string()))?;
                    options.package_override(package.trim(), lisp_package.trim());
                }
                _ => return Err(Error::InvalidParameter(pair.to_string())),
            }
        }

        Ok(options)
    }

    /// The Lisp package that code for protobuf package `package` lives in.
    /// Empty when the code belongs in `COMMON-LISP-USER`.
    pub fn namespace(&self, package: &str) -> String {
        match self.package_overrides.get(package) {
            Some(lisp_package) => lisp_package.clone(),
            None => lisp_package_name(&self.package_prefix, package),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_namespace() {
        let options = GeneratorOptions::default();
        assert_eq!(options.namespace("tutorial"), "CL-PROTOBUFS.TUTORIAL");
        assert_eq!(options.namespace("foo.bar_baz"), "CL-PROTOBUFS.FOO.BAR-BAZ");
        assert_eq!(options.namespace(""), "");
    }

    #[test]
    fn test_from_parameter() {
        let options =
            GeneratorOptions::from_parameter("package_prefix=pb., package_override=tutorial:Book")
                .unwrap();
        assert_eq!(options.namespace("tutorial"), "BOOK");
        assert_eq!(options.namespace("other"), "PB.OTHER");

        let options = GeneratorOptions::from_parameter("").unwrap();
        assert_eq!(options, GeneratorOptions::default());
    }

    #[test]
    fn test_invalid_parameter() {
        for parameter in [
            "verbose",
            "unknown=1",
            "package_override=tutorial",
            "package_override=tutorial:",
        ] {
            assert!(
                matches!(
                    GeneratorOptions::from_parameter(parameter),
                    Err(Error::InvalidParameter(_))
                ),
                "{parameter} should be rejected"
            );
        }
    }
}
