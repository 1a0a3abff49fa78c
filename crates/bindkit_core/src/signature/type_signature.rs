//! Structural type description tree.

use crate::signature::key::{derive_type_key, TypeKeyError};
use crate::signature::parse::{parse_signature, SignatureParseError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Structural description of a contract type.
///
/// The tree is owned top-down, so it cannot reference itself. Depth is still
/// bounded during key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeSignature {
    /// Plain, non-parameterized type identified by its fully-qualified name.
    Raw { name: String },
    /// Generic type applied to ordered type arguments.
    Parameterized {
        raw: String,
        args: Vec<TypeSignature>,
    },
    /// Unconstrained argument (`?`), elided from canonical keys.
    Wildcard,
}

impl TypeSignature {
    pub fn raw(name: impl Into<String>) -> Self {
        Self::Raw { name: name.into() }
    }

    pub fn parameterized(
        raw: impl Into<String>,
        args: impl IntoIterator<Item = TypeSignature>,
    ) -> Self {
        Self::Parameterized {
            raw: raw.into(),
            args: args.into_iter().collect(),
        }
    }

    pub fn wildcard() -> Self {
        Self::Wildcard
    }

    /// Parses a textual signature, e.g. `java.util.List<? extends Foo>`.
    pub fn parse(input: &str) -> Result<Self, SignatureParseError> {
        parse_signature(input)
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// Returns the erased base type name, or `None` for a wildcard.
    pub fn raw_name(&self) -> Option<&str> {
        match self {
            Self::Raw { name } => Some(name.as_str()),
            Self::Parameterized { raw, .. } => Some(raw.as_str()),
            Self::Wildcard => None,
        }
    }

    /// Derives the canonical lookup key for this signature.
    pub fn canonical_key(&self) -> Result<String, TypeKeyError> {
        derive_type_key(self)
    }
}

impl Display for TypeSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw { name } => write!(f, "{name}"),
            Self::Parameterized { raw, args } => {
                write!(f, "{raw}<")?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            Self::Wildcard => write!(f, "?"),
        }
    }
}
