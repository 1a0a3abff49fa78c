//! Contract descriptors attached to staged bindings.
//!
//! # Responsibility
//! - Describe what a binding can be looked up by: a name, a class-like type,
//!   or a parameterized type signature.
//! - Expose one lookup key per contract for registry indexing.
//!
//! # Invariants
//! - Signature contracts always carry a derived canonical key, never a raw
//!   unvalidated signature.
//! - Type contracts carry a validated plain type name. Generic text such as
//!   `List<Foo>` is rejected so it cannot alias a signature key.

use crate::signature::key::{checked_type_name, TypeKeyError};
use crate::signature::type_signature::TypeSignature;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Fully-qualified name of a class-like contract type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Names a Rust type through `std::any::type_name`.
    ///
    /// The compiler does not guarantee this text is stable across releases, so
    /// only compare names produced by the same build.
    pub fn of<T: ?Sized>() -> Self {
        Self(std::any::type_name::<T>().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One lookup key a binding can satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Contract {
    Name {
        name: String,
    },
    Type {
        type_name: TypeName,
    },
    /// Parameterized contract: canonical key plus the erased base type.
    Signature {
        key: String,
        raw: TypeName,
    },
}

impl Contract {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name { name: name.into() }
    }

    /// Builds a class-like contract.
    ///
    /// The name must be identifiers joined by `.` or `::`. Parameterized types
    /// go through `Contract::signature` instead.
    pub fn of_type(type_name: impl Into<TypeName>) -> Result<Self, TypeKeyError> {
        let type_name = type_name.into();
        checked_type_name(type_name.as_str())?;
        Ok(Self::Type { type_name })
    }

    /// Builds a signature contract by deriving the canonical key.
    pub fn signature(signature: &TypeSignature) -> Result<Self, TypeKeyError> {
        let key = signature.canonical_key()?;
        let raw = signature.raw_name().ok_or(TypeKeyError::BareWildcard)?;
        Ok(Self::Signature {
            key,
            raw: TypeName::new(raw),
        })
    }

    /// Registry index key for this contract.
    pub fn lookup_key(&self) -> &str {
        match self {
            Self::Name { name } => name.as_str(),
            Self::Type { type_name } => type_name.as_str(),
            Self::Signature { key, .. } => key.as_str(),
        }
    }
}

impl Display for Contract {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name { name } => write!(f, "name:{name}"),
            Self::Type { type_name } => write!(f, "type:{type_name}"),
            Self::Signature { key, .. } => write!(f, "signature:{key}"),
        }
    }
}
