// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::BindingError;
use regex::{Captures, Regex};

/// Converts a `SCREAMING_SNAKE_CASE` identifier to `PascalCase`.
///
/// The whole identifier is lower-cased, split on `_`, and each word gets its first letter
/// capitalized.  Any string is accepted: `CLONE` gives `Clone` and `CLONE_NEWUSER` gives
/// `CloneNewuser`.
pub fn to_display_name(identifier: &str) -> String {
    identifier.to_lowercase().split('_').map(capitalize).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds the pattern matching every `<prefix>_WORD` reference inside a value expression.
pub(crate) fn reference_regex(prefix: &str) -> Result<Regex, BindingError> {
    Regex::new(&format!(r"\b(?:{prefix})_\w+")).map_err(|source| BindingError::InvalidPrefix {
        prefix: prefix.to_string(),
        source,
    })
}

/// Spelling of a reference to a generated member inside a value expression.
pub(crate) fn member_reference(identifier: &str) -> String {
    format!("Self::{}.bits()", to_display_name(identifier))
}

pub(crate) fn replace_references(reference: &Regex, expression: &str) -> String {
    reference
        .replace_all(expression, |caps: &Captures| member_reference(&caps[0]))
        .into_owned()
}

/// Rewrites every `<prefix>_WORD` occurrence of `expression` into a reference to the matching
/// member of the generated type.
///
/// This is a plain textual substitution: operators, parentheses and whitespace are left
/// untouched.
///
/// # Example
///
/// ```
/// use ffi_gen::rewrite_references;
///
/// assert_eq!(
///     rewrite_references("CLONE", "(CLONE_VM|CLONE_FS)").unwrap(),
///     "(Self::CloneVm.bits()|Self::CloneFs.bits())",
/// );
/// ```
pub fn rewrite_references(prefix: &str, expression: &str) -> Result<String, BindingError> {
    Ok(replace_references(&reference_regex(prefix)?, expression))
}

#[test]
fn display_name() {
    assert_eq!(to_display_name("CLONE_VM"), "CloneVm");
    assert_eq!(to_display_name("CLONE_PARENT_SETTID"), "CloneParentSettid");
    assert_eq!(to_display_name("clone_newns"), "CloneNewns");
    assert_eq!(to_display_name("MS"), "Ms");
    assert_eq!(to_display_name("CLONE_ARGS_SIZE_VER0"), "CloneArgsSizeVer0");
    // Empty words vanish.
    assert_eq!(to_display_name("__CLONE__VM_"), "CloneVm");
    assert_eq!(to_display_name(""), "");
}

#[test]
fn rewrite() {
    assert_eq!(
        rewrite_references("MS", "(MS_RDONLY|MS_NOSUID)").unwrap(),
        "(Self::MsRdonly.bits()|Self::MsNosuid.bits())"
    );
    assert_eq!(rewrite_references("MS", "0x00000100").unwrap(), "0x00000100");
    // Only whole words starting with the prefix are references.
    assert_eq!(rewrite_references("MS", "SMS_FOO|MS_BAR").unwrap(), "SMS_FOO|Self::MsBar.bits()");
    assert_eq!(rewrite_references("MS", "MSX_FOO").unwrap(), "MSX_FOO");
    assert_eq!(
        rewrite_references("MNT|UMOUNT", "MNT_FORCE|UMOUNT_NOFOLLOW").unwrap(),
        "Self::MntForce.bits()|Self::UmountNofollow.bits()"
    );
}

#[test]
fn rewrite_invalid_prefix() {
    assert!(matches!(
        rewrite_references("MS(", "MS_RDONLY"),
        Err(BindingError::InvalidPrefix { prefix, .. }) if prefix == "MS("
    ));
}
