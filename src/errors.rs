// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Identifies errors when creating a [`Binding`](crate::Binding).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BindingError {
    /// The prefix is not a valid regular expression fragment.
    #[error("invalid prefix \"{prefix}\": {source}")]
    #[non_exhaustive]
    InvalidPrefix { prefix: String, source: regex::Error },
    /// The prefix does not start with a word that could name the generated type.
    #[error("no type name can be derived from prefix \"{prefix}\"")]
    MissingName { prefix: String },
    #[error("invalid underlying type \"{underlying_type}\"")]
    InvalidType { underlying_type: String },
}

/// Identifies value expressions that cannot be expressed with the generated members.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TranslateError {
    #[error("unexpected {token} in \"{expression}\"")]
    UnexpectedToken { expression: String, token: String },
    #[error("invalid integer literal \"{literal}\"")]
    InvalidLiteral { literal: String },
    /// The identifier is not a member of the generated type (yet).
    #[error("unknown reference \"{reference}\"")]
    UnknownReference { reference: String },
    #[error("literal \"{literal}\" does not fit in {underlying_type}")]
    LiteralOverflow {
        literal: String,
        underlying_type: String,
    },
    /// The shift amount or its result exceeds the storage type.
    #[error("shift \"{shift}\" overflows {underlying_type}")]
    ShiftOverflow {
        shift: String,
        underlying_type: String,
    },
}

/// Maps to all errors that can be returned by a generation run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerateError {
    /// The header file cannot be opened.
    #[error("failed to open source header \"{path}\": {source}")]
    #[non_exhaustive]
    SourceNotFound { source: io::Error, path: PathBuf },
    #[error("failed to create \"{path}\": {source}")]
    #[non_exhaustive]
    CreateOutput { source: io::Error, path: PathBuf },
    #[error("failed to read the source header: {source}")]
    #[non_exhaustive]
    ReadCall { source: io::Error },
    #[error("failed to write the generated code: {source}")]
    #[non_exhaustive]
    WriteCall { source: io::Error },
    /// The temporary file of an atomic run cannot be renamed over the output.
    #[error("failed to persist \"{path}\": {source}")]
    #[non_exhaustive]
    Persist { source: io::Error, path: PathBuf },
    #[error("cannot translate the value of {name}: {source}")]
    Translate {
        name: String,
        source: TranslateError,
    },
}

#[test]
fn generate_error_display() {
    let error = GenerateError::Translate {
        name: "MS_RMT_MASK".into(),
        source: TranslateError::UnknownReference {
            reference: "MS_LAZYTIME".into(),
        },
    };
    assert_eq!(
        error.to_string(),
        "cannot translate the value of MS_RMT_MASK: unknown reference \"MS_LAZYTIME\""
    );

    let error = GenerateError::SourceNotFound {
        source: io::Error::from(io::ErrorKind::NotFound),
        path: "linux/include/uapi/linux/sched.h".into(),
    };
    assert!(error
        .to_string()
        .starts_with("failed to open source header \"linux/include/uapi/linux/sched.h\": "));
}
