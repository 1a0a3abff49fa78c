//! Canonical type key derivation.
//!
//! # Responsibility
//! - Encode a `TypeSignature` as the string key generic lookups match on.
//!
//! # Invariants
//! - Non-parameterized types map to their fully-qualified name unchanged.
//! - Wildcard arguments are dropped; a type left with no arguments loses its
//!   angle-bracket suffix and collides with its erased form on purpose.
//! - Argument order is preserved.
//! - Nesting deeper than `MAX_SIGNATURE_DEPTH` is rejected, never recursed.

use crate::signature::type_signature::TypeSignature;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum nesting depth accepted by key derivation.
pub const MAX_SIGNATURE_DEPTH: usize = 64;

static TYPE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(?:(?:\.|::)[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("valid type name regex")
});

/// Key derivation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKeyError {
    EmptyTypeName,
    InvalidTypeName(String),
    /// A wildcard cannot stand on its own as a contract type.
    BareWildcard,
    DepthExceeded { limit: usize },
}

impl Display for TypeKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTypeName => write!(f, "type name must not be empty"),
            Self::InvalidTypeName(value) => write!(f, "type name is invalid: `{value}`"),
            Self::BareWildcard => write!(f, "wildcard is not a contract type"),
            Self::DepthExceeded { limit } => {
                write!(f, "type signature nests deeper than {limit} levels")
            }
        }
    }
}

impl Error for TypeKeyError {}

/// Returns whether `value` is a fully-qualified type name accepted in keys.
///
/// Segments are identifiers (`$` allowed for nested classes) joined by `.`
/// or `::`.
pub fn is_valid_type_name(value: &str) -> bool {
    TYPE_NAME_RE.is_match(value)
}

/// Derives the canonical key for `signature`.
///
/// # Errors
/// - `EmptyTypeName` / `InvalidTypeName` for malformed raw names.
/// - `BareWildcard` when the root itself is a wildcard.
/// - `DepthExceeded` when nesting passes `MAX_SIGNATURE_DEPTH`.
pub fn derive_type_key(signature: &TypeSignature) -> Result<String, TypeKeyError> {
    let mut key = String::new();
    write_key(signature, 0, &mut key)?;
    Ok(key)
}

fn write_key(
    signature: &TypeSignature,
    depth: usize,
    key: &mut String,
) -> Result<(), TypeKeyError> {
    if depth >= MAX_SIGNATURE_DEPTH {
        return Err(TypeKeyError::DepthExceeded {
            limit: MAX_SIGNATURE_DEPTH,
        });
    }

    match signature {
        TypeSignature::Raw { name } => {
            key.push_str(checked_type_name(name)?);
            Ok(())
        }
        TypeSignature::Parameterized { raw, args } => {
            key.push_str(checked_type_name(raw)?);

            let mut concrete = args.iter().filter(|arg| !arg.is_wildcard()).peekable();
            if concrete.peek().is_none() {
                return Ok(());
            }

            key.push('<');
            for (index, arg) in concrete.enumerate() {
                if index > 0 {
                    key.push(',');
                }
                write_key(arg, depth + 1, key)?;
            }
            key.push('>');
            Ok(())
        }
        TypeSignature::Wildcard => Err(TypeKeyError::BareWildcard),
    }
}

pub(crate) fn checked_type_name(name: &str) -> Result<&str, TypeKeyError> {
    if name.is_empty() {
        return Err(TypeKeyError::EmptyTypeName);
    }
    if !is_valid_type_name(name) {
        return Err(TypeKeyError::InvalidTypeName(name.to_string()));
    }
    Ok(name)
}
