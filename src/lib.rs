// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generator of Rust flag types from the constants of Linux UAPI headers.
//!
//! Kernel interfaces define their flags as preprocessor constants sharing a common prefix:
//!
//! ```c
//! #define CLONE_VM	0x00000100	/* set if VM shared between processes */
//! #define CLONE_FS	0x00000200	/* set if fs info shared between processes */
//! ```
//!
//! For each [`Binding`] (a prefix and an underlying integer type),
//! this crate scans a header for the matching `#define` lines
//! and writes a [`bitflags`](https://docs.rs/bitflags) type with one member per constant,
//! keeping the comment of each constant:
//!
//! ```text
//! bitflags! {
//!     #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//!     pub struct CloneFlags: c_uint {
//!         /* set if VM shared between processes */
//!         const CloneVm = 0x00000100;
//!
//!         /* set if fs info shared between processes */
//!         const CloneFs = 0x00000200;
//!     }
//! }
//! ```
//!
//! Constants defined as a combination of sibling constants (e.g. `(MS_RDONLY|MS_NOSUID)`)
//! are expressed with the generated members (`Self::MsRdonly.bits()|Self::MsNosuid.bits()`),
//! so the generated module doesn't depend on the header's symbols.
//!
//! # Current limitations
//!
//! This is a lexical transformation, not a preprocessor:
//! conditional compilation, multi-line macros and function-like macros are ignored,
//! and only values made of integer literals, sibling constants, `|`, `<<` and parentheses
//! are translated.
//! See [`ExprPolicy`] for the handling of other values.
//!
//! # Example
//!
//! ```
//! use ffi_gen::{write_flags, Binding, Config};
//! use std::io::Cursor;
//!
//! let header = "#define CLONE_VM 0x00000100 /* share memory */\n";
//! let mut output = Vec::new();
//! write_flags(
//!     &mut Cursor::new(header),
//!     &mut output,
//!     &[Binding::new("CLONE", "c_uint").unwrap()],
//!     &Config::default(),
//! )
//! .unwrap();
//! let output = String::from_utf8(output).unwrap();
//! assert!(output.contains("        /* share memory */\n        const CloneVm = 0x00000100;\n"));
//! ```

extern crate enumflags2;
extern crate libc;
extern crate thiserror;

#[macro_use]
extern crate lazy_static;

pub use binding::Binding;
pub use config::{Config, Emit};
pub use ctype::{storage_width, CType, Width};
pub use emit::{generate, generate_atomic, is_up_to_date, write_flags};
pub use errors::{BindingError, GenerateError, TranslateError};
pub use expr::ExprPolicy;
pub use jobs::{default_jobs, Job, WriteMode, DEFAULT_LINUX_SRC};
pub use naming::{rewrite_references, to_display_name};

mod binding;
mod config;
mod ctype;
mod emit;
mod errors;
mod expr;
mod jobs;
mod naming;

#[cfg(test)]
mod tests {
    use crate::*;
    use std::io::Cursor;

    fn render(header: &str, bindings: &[Binding]) -> String {
        let mut output = Vec::new();
        write_flags(
            &mut Cursor::new(header),
            &mut output,
            bindings,
            &Config::default(),
        )
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn clone_member() {
        let output = render(
            "#define CLONE_VM 0x00000100 /* share memory */\n",
            &[Binding::new("CLONE", "uint32").unwrap()],
        );
        assert!(output.contains("use libc::uint32;\n"));
        assert!(output.contains(
            "    pub struct CloneFlags: uint32 {\n        /* share memory */\n        const CloneVm = 0x00000100;\n    }\n"
        ));
    }

    #[test]
    fn clone_composite() {
        let output = render(
            "#define CLONE_VM 0x100\n#define CLONE_FS 0x200\n#define CLONE_ALL (CLONE_VM|CLONE_FS)\n",
            &[Binding::new("CLONE", "c_uint").unwrap()],
        );
        assert!(output.contains("        const CloneAll = Self::CloneVm.bits()|Self::CloneFs.bits();\n"));
    }

    #[test]
    fn member_order_and_separators() {
        let header = "\
#define CLONE_C 3
#define CSIGNAL 0xff
#define CLONE_A 1
/* CLONE_X 9 */
#define CLONE_B 2
";
        let output = render(header, &[Binding::new("CLONE", "c_uint").unwrap()]);
        let body = output
            .split_once("pub struct CloneFlags: c_uint {\n")
            .unwrap()
            .1;
        assert_eq!(
            body,
            "        const CloneC = 3;\n\n        const CloneA = 1;\n\n        const CloneB = 2;\n    }\n}\n"
        );
    }

    #[test]
    fn deterministic() {
        let header = "#define MS_RDONLY 1 /* ro */\n#define MS_RMT_MASK (MS_RDONLY)\n";
        let bindings = [Binding::new("MS", "c_ulong").unwrap()];
        assert_eq!(render(header, &bindings), render(header, &bindings));
    }
}
