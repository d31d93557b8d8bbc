// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::mem::size_of;

#[cfg(test)]
use strum::IntoEnumIterator;
#[cfg(test)]
use strum_macros::EnumIter;

/// C integer types exported by `libc`, usable as storage for a flag type.
#[cfg_attr(test, derive(EnumIter))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CType {
    Char,
    SChar,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    LongLong,
    ULongLong,
}

impl CType {
    pub fn from_name(name: &str) -> Option<Self> {
        // Accepts both `c_uint` and `libc::c_uint`.
        let name = name.strip_prefix("libc::").unwrap_or(name);
        Some(match name {
            "c_char" => CType::Char,
            "c_schar" => CType::SChar,
            "c_uchar" => CType::UChar,
            "c_short" => CType::Short,
            "c_ushort" => CType::UShort,
            "c_int" => CType::Int,
            "c_uint" => CType::UInt,
            "c_long" => CType::Long,
            "c_ulong" => CType::ULong,
            "c_longlong" => CType::LongLong,
            "c_ulonglong" => CType::ULongLong,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            CType::Char => "c_char",
            CType::SChar => "c_schar",
            CType::UChar => "c_uchar",
            CType::Short => "c_short",
            CType::UShort => "c_ushort",
            CType::Int => "c_int",
            CType::UInt => "c_uint",
            CType::Long => "c_long",
            CType::ULong => "c_ulong",
            CType::LongLong => "c_longlong",
            CType::ULongLong => "c_ulonglong",
        }
    }

    /// Width of this type on the host, which is the target of the generated bindings.
    pub fn width(self) -> Width {
        let (bytes, signed) = match self {
            // The signedness of c_char depends on the architecture.
            CType::Char => (size_of::<libc::c_char>(), libc::c_char::MIN != 0),
            CType::SChar => (size_of::<libc::c_schar>(), true),
            CType::UChar => (size_of::<libc::c_uchar>(), false),
            CType::Short => (size_of::<libc::c_short>(), true),
            CType::UShort => (size_of::<libc::c_ushort>(), false),
            CType::Int => (size_of::<libc::c_int>(), true),
            CType::UInt => (size_of::<libc::c_uint>(), false),
            CType::Long => (size_of::<libc::c_long>(), true),
            CType::ULong => (size_of::<libc::c_ulong>(), false),
            CType::LongLong => (size_of::<libc::c_longlong>(), true),
            CType::ULongLong => (size_of::<libc::c_ulonglong>(), false),
        };
        Width {
            bits: bytes as u32 * 8,
            signed,
        }
    }
}

/// Storage width of an integer type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Width {
    pub bits: u32,
    pub signed: bool,
}

impl Width {
    /// Greatest literal value a member of this width can hold.
    pub fn max(self) -> u128 {
        let magnitude = if self.signed { self.bits - 1 } else { self.bits };
        if magnitude >= 128 {
            u128::MAX
        } else {
            (1u128 << magnitude) - 1
        }
    }
}

fn primitive_width(name: &str) -> Option<Width> {
    let (signed, bits) = match name {
        "usize" => (false, usize::BITS),
        "isize" => (true, isize::BITS),
        _ => {
            let signed = match name.as_bytes().first()? {
                b'u' => false,
                b'i' => true,
                _ => return None,
            };
            let bits = match &name[1..] {
                "8" => 8,
                "16" => 16,
                "32" => 32,
                "64" => 64,
                "128" => 128,
                _ => return None,
            };
            (signed, bits)
        }
    };
    Some(Width { bits, signed })
}

/// Width of a storage type name, when known.
pub fn storage_width(underlying_type: &str) -> Option<Width> {
    primitive_width(underlying_type).or_else(|| CType::from_name(underlying_type).map(CType::width))
}

/// Rust primitive integers are in scope everywhere and need no import.
pub fn needs_import(underlying_type: &str) -> bool {
    primitive_width(underlying_type).is_none() && !underlying_type.contains("::")
}

#[test]
fn ctype_names() {
    for ctype in CType::iter() {
        assert_eq!(CType::from_name(ctype.name()), Some(ctype));
        assert_eq!(
            CType::from_name(&format!("libc::{}", ctype.name())),
            Some(ctype)
        );
        assert!(needs_import(ctype.name()));
        assert!(matches!(ctype.width().bits, 8 | 16 | 32 | 64));
    }
    assert_eq!(CType::from_name("c_float"), None);
    assert_eq!(CType::from_name("uint32_t"), None);
}

#[test]
fn widths() {
    assert_eq!(
        storage_width("c_uint"),
        Some(Width {
            bits: 32,
            signed: false
        })
    );
    assert_eq!(storage_width("c_uint").unwrap().max(), u32::MAX as u128);
    assert_eq!(storage_width("c_int").unwrap().max(), i32::MAX as u128);
    assert_eq!(storage_width("u8").unwrap().max(), 0xff);
    assert_eq!(storage_width("i64").unwrap().max(), i64::MAX as u128);
    assert_eq!(storage_width("u128").unwrap().max(), u128::MAX);
    assert_eq!(storage_width("usize").unwrap().bits, usize::BITS);
    assert_eq!(storage_width("u"), None);
    assert_eq!(storage_width("u31"), None);
    assert_eq!(storage_width("__u32"), None);
}

#[test]
fn imports() {
    assert!(needs_import("c_ulong"));
    assert!(needs_import("__u32"));
    assert!(!needs_import("u32"));
    assert!(!needs_import("libc::c_ulong"));
}
