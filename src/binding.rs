// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::naming::{reference_regex, replace_references, to_display_name};
use crate::BindingError;
use regex::Regex;

lazy_static! {
    static ref LEADING_WORD: Regex = Regex::new(r"^\w+").unwrap();
    static ref TYPE_PATH: Regex = Regex::new(r"^\w+(?:::\w+)*$").unwrap();
}

/// Ties a family of header constants to the flag type generated for them.
///
/// A binding is built once and may then be reused for any number of generation runs.
///
/// # Example
///
/// ```
/// use ffi_gen::Binding;
///
/// let binding = Binding::new("MNT|UMOUNT", "c_uint").unwrap();
/// assert_eq!(binding.display_name(), "MNT");
/// assert_eq!(binding.type_name(), "MntFlags");
/// ```
#[derive(Debug, Clone)]
pub struct Binding {
    prefix: String,
    underlying_type: String,
    define: Regex,
    member: Regex,
    reference: Regex,
}

impl Binding {
    /// Creates a binding for the constants named `<prefix>_WORD`.
    ///
    /// The prefix is a regular expression fragment, so alternations such as `MNT|UMOUNT` select
    /// several constant families into the same type.
    pub fn new<P, T>(prefix: P, underlying_type: T) -> Result<Self, BindingError>
    where
        P: Into<String>,
        T: Into<String>,
    {
        let prefix = prefix.into();
        let underlying_type = underlying_type.into();
        let invalid_prefix = |source| BindingError::InvalidPrefix {
            prefix: prefix.clone(),
            source,
        };
        let define = Regex::new(&format!(
            r"^#define\s+(?P<name>(?:{prefix})_\w+)\s+(?P<value>\S+)\s*(?P<comment>/\*.+?\*/)?.*"
        ))
        .map_err(invalid_prefix)?;
        let member = Regex::new(&format!(r"^(?:{prefix})_\w+$")).map_err(invalid_prefix)?;
        let reference = reference_regex(&prefix)?;
        if !LEADING_WORD.is_match(&prefix) {
            return Err(BindingError::MissingName { prefix });
        }
        if !TYPE_PATH.is_match(&underlying_type) {
            return Err(BindingError::InvalidType { underlying_type });
        }
        Ok(Binding {
            prefix,
            underlying_type,
            define,
            member,
            reference,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn underlying_type(&self) -> &str {
        &self.underlying_type
    }

    /// Leading word of the prefix, which names the generated type.
    pub fn display_name(&self) -> &str {
        LEADING_WORD
            .find(&self.prefix)
            .map(|m| m.as_str())
            .unwrap_or_default()
    }

    /// Name of the generated flag type, e.g. `CloneFlags` for the `CLONE` prefix.
    pub fn type_name(&self) -> String {
        format!("{}Flags", to_display_name(self.display_name()))
    }

    /// Same as [`rewrite_references()`](crate::rewrite_references) with this binding's prefix.
    pub fn rewrite_references(&self, expression: &str) -> String {
        replace_references(&self.reference, expression)
    }

    pub(crate) fn is_member(&self, identifier: &str) -> bool {
        self.member.is_match(identifier)
    }

    pub(crate) fn match_define<'l>(&self, line: &'l str) -> Option<MacroMatch<'l>> {
        let caps = self.define.captures(line)?;
        Some(MacroMatch {
            name: caps.name("name")?.as_str(),
            value: caps.name("value")?.as_str(),
            comment: caps.name("comment").map(|m| m.as_str()),
        })
    }
}

/// A `#define` line selected by a [`Binding`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct MacroMatch<'l> {
    pub(crate) name: &'l str,
    pub(crate) value: &'l str,
    pub(crate) comment: Option<&'l str>,
}
