// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation of `#define` values into expressions over the generated members.
//!
//! Header constants are either integer literals or small expressions combining literals and
//! sibling constants, e.g. `(1<<16)` or `(MS_RDONLY|MS_SYNCHRONOUS)`.  Such values are
//! tokenized and re-spelled in Rust.  Anything outside this grammar is handled according to the
//! [`ExprPolicy`].

use crate::ctype::{storage_width, Width};
use crate::naming::{member_reference, to_display_name};
use crate::{Binding, TranslateError};
use log::warn;

/// What to do with a value expression that cannot be translated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ExprPolicy {
    /// Logs a warning and only rewrites the references found in the raw value.
    #[default]
    Lenient,
    /// Fails the generation.  References must also name a member defined above.
    Strict,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Int(Literal),
    Or,
    Shl,
    Open,
    Close,
}

impl Token<'_> {
    fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier \"{name}\""),
            Token::Int(literal) => format!("literal \"{}\"", literal.spelling),
            Token::Or => "\"|\"".into(),
            Token::Shl => "\"<<\"".into(),
            Token::Open => "\"(\"".into(),
            Token::Close => "\")\"".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Literal {
    value: u128,
    // Rust spelling.
    spelling: String,
}

fn word_len(text: &str) -> usize {
    text.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len())
}

fn parse_literal(text: &str) -> Result<Literal, TranslateError> {
    let invalid = || TranslateError::InvalidLiteral {
        literal: text.to_string(),
    };
    let body = text.trim_end_matches(|c: char| matches!(c, 'u' | 'U' | 'l' | 'L'));
    let (radix, prefix, digits) = if let Some(digits) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        (16, "0x", digits)
    } else if let Some(digits) = body
        .strip_prefix("0b")
        .or_else(|| body.strip_prefix("0B"))
    {
        (2, "0b", digits)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, "0o", &body[1..])
    } else {
        (10, "", body)
    };
    if digits.is_empty() {
        return Err(invalid());
    }
    let value = u128::from_str_radix(digits, radix).map_err(|_| invalid())?;
    Ok(Literal {
        value,
        spelling: format!("{prefix}{digits}"),
    })
}

fn tokenize(expression: &str) -> Result<Vec<Token<'_>>, TranslateError> {
    let mut tokens = Vec::new();
    let mut rest = expression;
    while let Some(c) = rest.chars().next() {
        let (token, len) = match c {
            c if c.is_whitespace() => {
                rest = &rest[c.len_utf8()..];
                continue;
            }
            '|' => (Token::Or, 1),
            '(' => (Token::Open, 1),
            ')' => (Token::Close, 1),
            '<' if rest.starts_with("<<") => (Token::Shl, 2),
            '0'..='9' => {
                let len = word_len(rest);
                (Token::Int(parse_literal(&rest[..len])?), len)
            }
            c if c == '_' || c.is_ascii_alphabetic() => {
                let len = word_len(rest);
                (Token::Ident(&rest[..len]), len)
            }
            c => {
                return Err(TranslateError::UnexpectedToken {
                    expression: expression.to_string(),
                    token: format!("\"{c}\""),
                })
            }
        };
        tokens.push(token);
        rest = &rest[len..];
    }
    Ok(tokens)
}

// Drops parentheses wrapping the whole expression, e.g. `((A|B))` gives `A|B`.
fn strip_outer_parens<'t, 'a>(mut tokens: &'t [Token<'a>]) -> &'t [Token<'a>] {
    while let [Token::Open, inner @ .., Token::Close] = tokens {
        let mut depth = 0usize;
        let balanced = inner.iter().all(|token| {
            match token {
                Token::Open => depth += 1,
                Token::Close if depth == 0 => return false,
                Token::Close => depth -= 1,
                _ => {}
            }
            true
        });
        if !balanced || depth != 0 {
            break;
        }
        tokens = inner;
    }
    tokens
}

/// Translates the values of one binding's constants.
pub(crate) struct Translator<'b> {
    binding: &'b Binding,
    policy: ExprPolicy,
    width: Option<Width>,
}

impl<'b> Translator<'b> {
    pub(crate) fn new(binding: &'b Binding, policy: ExprPolicy) -> Self {
        Translator {
            binding,
            policy,
            width: storage_width(binding.underlying_type()),
        }
    }

    /// Translates `value`, `defined` being the members already emitted for this binding.
    pub(crate) fn translate(&self, value: &str, defined: &[String]) -> Result<String, TranslateError> {
        match self.parse(value, defined) {
            Ok(translated) => Ok(translated),
            Err(error) if self.policy == ExprPolicy::Lenient => {
                let fallback = self.binding.rewrite_references(value);
                warn!("{error}, keeping \"{fallback}\"");
                Ok(fallback)
            }
            Err(error) => Err(error),
        }
    }

    fn parse(&self, value: &str, defined: &[String]) -> Result<String, TranslateError> {
        let tokens = tokenize(value)?;
        let mut parser = Parser {
            translator: self,
            expression: value,
            defined,
            tokens: strip_outer_parens(&tokens).iter(),
            output: String::new(),
        };
        parser.expr()?;
        match parser.tokens.next() {
            None => Ok(parser.output),
            Some(token) => Err(parser.unexpected(Some(token))),
        }
    }
}

struct Parser<'p, 'a> {
    translator: &'p Translator<'p>,
    expression: &'p str,
    defined: &'p [String],
    tokens: std::slice::Iter<'p, Token<'a>>,
    output: String,
}

impl<'a> Parser<'_, 'a> {
    fn unexpected(&self, token: Option<&Token>) -> TranslateError {
        TranslateError::UnexpectedToken {
            expression: self.expression.to_string(),
            token: token.map_or_else(|| "end of expression".into(), Token::describe),
        }
    }

    fn eat(&mut self, expected: &Token<'a>) -> bool {
        if self.tokens.as_slice().first() == Some(expected) {
            self.tokens.next();
            true
        } else {
            false
        }
    }

    // The parsing functions return the value of what they parsed, when it only involves literals.

    fn expr(&mut self) -> Result<Option<u128>, TranslateError> {
        let mut value = self.term()?;
        while self.eat(&Token::Or) {
            self.output.push('|');
            let rhs = self.term()?;
            value = value.zip(rhs).map(|(lhs, rhs)| lhs | rhs);
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Option<u128>, TranslateError> {
        let start = self.output.len();
        let lhs = self.atom()?;
        if !self.eat(&Token::Shl) {
            return Ok(lhs);
        }
        self.output.push_str("<<");
        let rhs = self.atom()?;

        let Some(width) = self.translator.width else {
            return Ok(lhs
                .zip(rhs)
                .and_then(|(value, shift)| value.checked_shl(u32::try_from(shift).ok()?)));
        };
        let overflow = || TranslateError::ShiftOverflow {
            shift: self.output[start..].to_string(),
            underlying_type: self.translator.binding.underlying_type().to_string(),
        };
        // Rust rejects shifting by the width of the type or more.
        let Some(shift) = rhs else {
            return Ok(None);
        };
        if shift >= u128::from(width.bits) {
            return Err(overflow());
        }
        match lhs {
            Some(value) if value > width.max() >> shift => Err(overflow()),
            Some(value) => Ok(Some(value << shift)),
            None => Ok(None),
        }
    }

    fn atom(&mut self) -> Result<Option<u128>, TranslateError> {
        match self.tokens.next() {
            Some(Token::Int(literal)) => {
                if let Some(width) = self.translator.width {
                    if literal.value > width.max() {
                        return Err(TranslateError::LiteralOverflow {
                            literal: literal.spelling.clone(),
                            underlying_type: self.translator.binding.underlying_type().to_string(),
                        });
                    }
                }
                self.output.push_str(&literal.spelling);
                Ok(Some(literal.value))
            }
            Some(Token::Ident(name)) => {
                let unknown = || TranslateError::UnknownReference {
                    reference: name.to_string(),
                };
                if !self.translator.binding.is_member(name) {
                    return Err(unknown());
                }
                if self.translator.policy == ExprPolicy::Strict
                    && !self.defined.contains(&to_display_name(name))
                {
                    return Err(unknown());
                }
                self.output.push_str(&member_reference(name));
                Ok(None)
            }
            Some(Token::Open) => {
                self.output.push('(');
                let value = self.expr()?;
                if !self.eat(&Token::Close) {
                    let next = self.tokens.as_slice().first();
                    return Err(self.unexpected(next));
                }
                self.output.push(')');
                Ok(value)
            }
            token => Err(self.unexpected(token)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(policy: ExprPolicy, binding: &Binding, value: &str) -> Result<String, TranslateError> {
        let defined = ["MsRdonly", "MsNosuid"].map(String::from);
        Translator::new(binding, policy).translate(value, &defined)
    }

    #[test]
    fn literals() {
        for (c, rust) in [
            ("0x00000100", "0x00000100"),
            ("0X1f", "0x1f"),
            ("0x80000000U", "0x80000000"),
            ("1UL", "1"),
            ("0", "0"),
            ("0755", "0o755"),
            ("0b101", "0b101"),
            ("16384", "16384"),
        ] {
            assert_eq!(parse_literal(c).unwrap().spelling, rust, "{c}");
        }
        assert_eq!(parse_literal("0755").unwrap().value, 0o755);
        assert_eq!(parse_literal("0xC0ED0000").unwrap().value, 0xc0ed0000);
        for c in ["0x", "08", "12ab", "0xfg"] {
            assert_eq!(
                parse_literal(c),
                Err(TranslateError::InvalidLiteral {
                    literal: c.to_string()
                })
            );
        }
    }

    #[test]
    fn outer_parens() {
        let tokens = tokenize("((1<<16))").unwrap();
        assert_eq!(
            strip_outer_parens(&tokens),
            &[Token::Int(parse_literal("1").unwrap()), Token::Shl, Token::Int(parse_literal("16").unwrap())]
        );
        // Not a single group.
        let tokens = tokenize("(1)|(2)").unwrap();
        assert_eq!(strip_outer_parens(&tokens).len(), tokens.len());
    }

    #[test]
    fn translate_values() {
        let ms = Binding::new("MS", "c_ulong").unwrap();
        for policy in [ExprPolicy::Lenient, ExprPolicy::Strict] {
            assert_eq!(translate(policy, &ms, "16384").unwrap(), "16384");
            assert_eq!(translate(policy, &ms, "(1<<16)").unwrap(), "1<<16");
            assert_eq!(
                translate(policy, &ms, "(MS_RDONLY|MS_NOSUID)").unwrap(),
                "Self::MsRdonly.bits()|Self::MsNosuid.bits()"
            );
            assert_eq!(
                translate(policy, &ms, "(MS_RDONLY|(1<<3))").unwrap(),
                "Self::MsRdonly.bits()|(1<<3)"
            );
        }
    }

    #[test]
    fn strict_errors() {
        let ms = Binding::new("MS", "c_uint").unwrap();
        let strict = |value| translate(ExprPolicy::Strict, &ms, value);
        assert_eq!(
            strict("(MS_RDONLY|MS_LAZYTIME)"),
            Err(TranslateError::UnknownReference {
                reference: "MS_LAZYTIME".into()
            })
        );
        assert_eq!(
            strict("(MS_RDONLY|FOO)"),
            Err(TranslateError::UnknownReference {
                reference: "FOO".into()
            })
        );
        assert_eq!(
            strict("(~MS_RDONLY)"),
            Err(TranslateError::UnexpectedToken {
                expression: "(~MS_RDONLY)".into(),
                token: "\"~\"".into(),
            })
        );
        assert_eq!(
            strict("(MS_RDONLY|"),
            Err(TranslateError::UnexpectedToken {
                expression: "(MS_RDONLY|".into(),
                token: "end of expression".into(),
            })
        );
        assert_eq!(
            strict("MS_RDONLY)"),
            Err(TranslateError::UnexpectedToken {
                expression: "MS_RDONLY)".into(),
                token: "\")\"".into(),
            })
        );
        assert_eq!(
            strict("0x100000000"),
            Err(TranslateError::LiteralOverflow {
                literal: "0x100000000".into(),
                underlying_type: "c_uint".into(),
            })
        );
        assert_eq!(
            strict("(1<<32)"),
            Err(TranslateError::ShiftOverflow {
                shift: "1<<32".into(),
                underlying_type: "c_uint".into(),
            })
        );
        assert_eq!(
            strict("(MS_RDONLY|(0x3<<31))"),
            Err(TranslateError::ShiftOverflow {
                shift: "0x3<<31".into(),
                underlying_type: "c_uint".into(),
            })
        );
        assert_eq!(strict("(1<<31)").unwrap(), "1<<31");
        assert_eq!(strict("((1<<4)<<27)").unwrap(), "(1<<4)<<27");

        let int = Binding::new("MS", "c_int").unwrap();
        assert!(matches!(
            translate(ExprPolicy::Strict, &int, "1<<31"),
            Err(TranslateError::ShiftOverflow { .. })
        ));
        assert_eq!(translate(ExprPolicy::Strict, &int, "1<<30").unwrap(), "1<<30");
    }

    #[test]
    fn lenient_fallback() {
        let ms = Binding::new("MS", "c_uint").unwrap();
        let lenient = |value| translate(ExprPolicy::Lenient, &ms, value);
        assert_eq!(
            lenient("(~MS_RDONLY)").unwrap(),
            "(~Self::MsRdonly.bits())"
        );
        assert_eq!(lenient("FOO").unwrap(), "FOO");
        assert_eq!(lenient("(1<<32)").unwrap(), "(1<<32)");
        // Forward references are fine for Rust constants.
        assert_eq!(
            lenient("MS_LAZYTIME").unwrap(),
            "Self::MsLazytime.bits()"
        );
    }
}
