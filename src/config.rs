// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::ExprPolicy;
use enumflags2::{bitflags, BitFlags};

/// Optional parts of the generated code.
#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Emit {
    /// Carry the trailing comment of each `#define` above its member.
    Comments = 1 << 0,
    /// Declare the generated types `pub`.
    Public = 1 << 1,
}

/// Settings shared by every generated file.
///
/// The default configuration produces `bitflags` types stored in `libc` integer types:
///
/// ```
/// use ffi_gen::{Config, Emit, ExprPolicy};
///
/// let config = Config::default()
///     .set_policy(ExprPolicy::Strict)
///     .set_emit(Emit::Comments)
///     .set_derives(["Debug", "Clone", "Copy"]);
/// assert!(!config.emit().contains(Emit::Public));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    allow: Vec<String>,
    flags_import: String,
    types_crate: String,
    derives: Vec<String>,
    emit: BitFlags<Emit>,
    policy: ExprPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            allow: to_strings(["dead_code", "non_upper_case_globals"]),
            flags_import: "bitflags::bitflags".into(),
            types_crate: "libc".into(),
            derives: to_strings(["Debug", "Clone", "Copy", "PartialEq", "Eq", "Hash"]),
            emit: BitFlags::all(),
            policy: ExprPolicy::default(),
        }
    }
}

fn to_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl Config {
    /// Lints allowed for the whole generated file.
    pub fn set_allow<I, S>(mut self, lints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow = to_strings(lints);
        self
    }

    /// Path of the flag macro, imported once at the top of the generated file.
    pub fn set_flags_import<S>(mut self, path: S) -> Self
    where
        S: Into<String>,
    {
        self.flags_import = path.into();
        self
    }

    /// Crate providing the underlying storage types (e.g. `c_uint`).
    pub fn set_types_crate<S>(mut self, name: S) -> Self
    where
        S: Into<String>,
    {
        self.types_crate = name.into();
        self
    }

    /// Traits derived by every generated type.  An empty list omits the derive attribute.
    pub fn set_derives<I, S>(mut self, derives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.derives = to_strings(derives);
        self
    }

    pub fn set_emit<T>(mut self, emit: T) -> Self
    where
        T: Into<BitFlags<Emit>>,
    {
        self.emit = emit.into();
        self
    }

    pub fn set_policy(mut self, policy: ExprPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn allow(&self) -> &[String] {
        &self.allow
    }

    pub fn flags_import(&self) -> &str {
        &self.flags_import
    }

    pub fn types_crate(&self) -> &str {
        &self.types_crate
    }

    pub fn derives(&self) -> &[String] {
        &self.derives
    }

    pub fn emit(&self) -> BitFlags<Emit> {
        self.emit
    }

    pub fn policy(&self) -> ExprPolicy {
        self.policy
    }
}

#[test]
fn config_default() {
    let config = Config::default();
    assert_eq!(config.allow(), ["dead_code", "non_upper_case_globals"]);
    assert_eq!(config.flags_import(), "bitflags::bitflags");
    assert_eq!(config.types_crate(), "libc");
    assert_eq!(config.derives().len(), 6);
    assert_eq!(config.emit(), Emit::Comments | Emit::Public);
    assert_eq!(config.policy(), ExprPolicy::Lenient);
}

#[test]
fn config_builder() {
    let config = Config::default()
        .set_allow(["dead_code"])
        .set_flags_import("crate::bitflags")
        .set_types_crate("core::ffi")
        .set_derives(Vec::<String>::new())
        .set_emit(BitFlags::<Emit>::EMPTY)
        .set_policy(ExprPolicy::Strict);
    assert_eq!(config.allow(), ["dead_code"]);
    assert_eq!(config.flags_import(), "crate::bitflags");
    assert_eq!(config.types_crate(), "core::ffi");
    assert!(config.derives().is_empty());
    assert!(config.emit().is_empty());
    assert_eq!(config.policy(), ExprPolicy::Strict);
}
