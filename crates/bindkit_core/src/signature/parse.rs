//! Textual signature parser.
//!
//! Grammar (whitespace allowed between tokens):
//!
//! ```text
//! signature := wildcard | name [ '<' signature { ',' signature } '>' ]
//! wildcard  := '?' [ ( "extends" | "super" ) signature ]
//! name      := segment { ( '.' | "::" ) segment }
//! ```
//!
//! Wildcard bounds are parsed and discarded: a bounded wildcard is still a
//! wildcard for key purposes.
//!
//! Type arguments and wildcard bounds each open one nesting level. Input that
//! nests deeper than `MAX_SIGNATURE_DEPTH` is rejected before the parser
//! recurses further.

use crate::signature::key::{is_valid_type_name, MAX_SIGNATURE_DEPTH};
use crate::signature::type_signature::TypeSignature;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Signature parse errors. Positions are byte offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureParseError {
    UnexpectedEnd,
    UnexpectedChar { found: char, position: usize },
    InvalidTypeName { name: String, position: usize },
    EmptyArguments { position: usize },
    TrailingInput { position: usize },
    DepthExceeded { limit: usize },
}

impl Display for SignatureParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEnd => write!(f, "unexpected end of type signature"),
            Self::UnexpectedChar { found, position } => {
                write!(f, "unexpected `{found}` at offset {position}")
            }
            Self::InvalidTypeName { name, position } => {
                write!(f, "invalid type name `{name}` at offset {position}")
            }
            Self::EmptyArguments { position } => {
                write!(f, "empty type argument list at offset {position}")
            }
            Self::TrailingInput { position } => {
                write!(f, "unexpected trailing input at offset {position}")
            }
            Self::DepthExceeded { limit } => {
                write!(f, "type signature nests deeper than {limit} levels")
            }
        }
    }
}

impl Error for SignatureParseError {}

pub(crate) fn parse_signature(input: &str) -> Result<TypeSignature, SignatureParseError> {
    let mut parser = Parser { input, position: 0 };
    let signature = parser.signature(0)?;
    parser.skip_whitespace();
    if parser.position < input.len() {
        return Err(SignatureParseError::TrailingInput {
            position: parser.position,
        });
    }
    Ok(signature)
}

struct Parser<'a> {
    input: &'a str,
    position: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.position += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SignatureParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(SignatureParseError::UnexpectedChar {
                found,
                position: self.position,
            }),
            None => Err(SignatureParseError::UnexpectedEnd),
        }
    }

    fn signature(&mut self, depth: usize) -> Result<TypeSignature, SignatureParseError> {
        if depth >= MAX_SIGNATURE_DEPTH {
            return Err(SignatureParseError::DepthExceeded {
                limit: MAX_SIGNATURE_DEPTH,
            });
        }
        self.skip_whitespace();
        match self.peek() {
            None => Err(SignatureParseError::UnexpectedEnd),
            Some('?') => {
                self.bump();
                self.wildcard_bound(depth + 1)?;
                Ok(TypeSignature::Wildcard)
            }
            Some(_) => {
                let raw = self.name()?;
                self.skip_whitespace();
                if self.peek() != Some('<') {
                    return Ok(TypeSignature::Raw { name: raw });
                }
                let open = self.position;
                self.bump();
                self.skip_whitespace();
                if self.peek() == Some('>') {
                    return Err(SignatureParseError::EmptyArguments { position: open });
                }

                let mut args = vec![self.signature(depth + 1)?];
                loop {
                    self.skip_whitespace();
                    match self.peek() {
                        Some(',') => {
                            self.bump();
                            args.push(self.signature(depth + 1)?);
                        }
                        Some(_) => {
                            self.expect('>')?;
                            break;
                        }
                        None => return Err(SignatureParseError::UnexpectedEnd),
                    }
                }
                Ok(TypeSignature::Parameterized { raw, args })
            }
        }
    }

    fn wildcard_bound(&mut self, depth: usize) -> Result<(), SignatureParseError> {
        self.skip_whitespace();
        let rest = &self.input[self.position..];
        for keyword in ["extends", "super"] {
            let Some(after) = rest.strip_prefix(keyword) else {
                continue;
            };
            if after.starts_with(char::is_whitespace) {
                self.position += keyword.len();
                self.signature(depth)?;
                return Ok(());
            }
        }
        Ok(())
    }

    fn name(&mut self) -> Result<String, SignatureParseError> {
        let start = self.position;
        while matches!(
            self.peek(),
            Some(c) if c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | ':')
        ) {
            self.bump();
        }
        let name = &self.input[start..self.position];
        if name.is_empty() {
            return match self.peek() {
                Some(found) => Err(SignatureParseError::UnexpectedChar {
                    found,
                    position: start,
                }),
                None => Err(SignatureParseError::UnexpectedEnd),
            };
        }
        if !is_valid_type_name(name) {
            return Err(SignatureParseError::InvalidTypeName {
                name: name.to_string(),
                position: start,
            });
        }
        Ok(name.to_string())
    }
}
