// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based tests of the naming and emission rules.

use ffi_gen::{rewrite_references, to_display_name, write_flags, Binding, Config};
use proptest::prelude::*;
use std::io::Cursor;

fn constant_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9]{0,8}(_[A-Z0-9]{1,8}){0,4}"
}

fn render(header: &str, binding: Binding) -> String {
    let mut output = Vec::new();
    write_flags(
        &mut Cursor::new(header),
        &mut output,
        &[binding],
        &Config::default(),
    )
    .unwrap();
    String::from_utf8(output).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Display names have no separator and start with an uppercase letter.
    #[test]
    fn display_name_shape(name in constant_name()) {
        let display = to_display_name(&name);
        prop_assert!(!display.contains('_'));
        prop_assert!(display.chars().next().unwrap().is_uppercase());
        // Lower-casing first doesn't change the result.
        prop_assert_eq!(to_display_name(&name.to_lowercase()), display);
    }

    /// Text without a prefixed identifier is left untouched.
    #[test]
    fn rewrite_keeps_other_text(expression in "[a-z0-9|()<> ]{0,40}") {
        prop_assert_eq!(rewrite_references("MS", &expression).unwrap(), expression);
    }

    /// Only the prefixed operands of an OR chain are rewritten.
    #[test]
    fn rewrite_or_chain(
        operands in prop::collection::vec(
            prop_oneof!["MS_[A-Z]{1,6}", "0x[0-9a-f]{1,8}", "[A-Z]{1,3}_[A-Z]{1,6}"],
            1..8,
        )
    ) {
        let expression = operands.join("|");
        let rewritten = rewrite_references("MS", &expression).unwrap();
        let rewritten: Vec<&str> = rewritten.split('|').collect();
        prop_assert_eq!(rewritten.len(), operands.len());
        for (operand, result) in operands.iter().zip(rewritten) {
            if operand.starts_with("MS_") {
                prop_assert_eq!(result, format!("Self::{}.bits()", to_display_name(operand)));
            } else {
                prop_assert_eq!(result, operand.as_str());
            }
        }
    }

    /// Members keep the header order and are separated by exactly one blank line.
    #[test]
    fn member_order(
        names in prop::collection::vec("[A-Z]{1,8}", 1..12),
        noise in "[a-z ]{0,20}",
    ) {
        let mut header = String::new();
        for (i, name) in names.iter().enumerate() {
            header.push_str(&format!("#define FLAG_{name} {}\n", 1u64 << i));
            header.push_str(&format!("/* {noise} */\n#define OTHER_{name} {i}\n"));
        }
        let output = render(&header, Binding::new("FLAG", "u64").unwrap());
        let body = output.split_once("pub struct FlagFlags: u64 {\n").unwrap().1;

        let members: Vec<&str> = body
            .lines()
            .filter_map(|line| line.strip_prefix("        const "))
            .collect();
        prop_assert_eq!(members.len(), names.len());
        for (i, (member, name)) in members.iter().zip(&names).enumerate() {
            prop_assert_eq!(
                *member,
                format!("{} = {};", to_display_name(&format!("FLAG_{name}")), 1u64 << i)
            );
        }
        prop_assert_eq!(body.matches("\n\n").count(), names.len() - 1);
        let closed = body.ends_with(";\n    }\n}\n");
        prop_assert!(closed);
    }

    /// Generation is deterministic.
    #[test]
    fn deterministic(names in prop::collection::vec("[A-Z]{1,8}", 0..8)) {
        let header: String = names
            .iter()
            .map(|name| format!("#define MS_{name} (MS_{name}|1) /* {name} */\n"))
            .collect();
        prop_assert_eq!(
            render(&header, Binding::new("MS", "c_ulong").unwrap()),
            render(&header, Binding::new("MS", "c_ulong").unwrap())
        );
    }
}
