use smol_str::SmolStr;

use super::QualifiedName;

/// The best-effort type attached to a binding, attribute, parameter, or
/// state slot.
///
/// `Internal` names may be forward references that no catalog entry backs;
/// resolution degrades on them instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeDescriptor {
    /// A fully qualified name inside the analyzed program.
    Internal(QualifiedName),
    /// A fully qualified name under an allow-listed external namespace.
    External(QualifiedName),
    /// A primitive or container tag.
    Primitive(PrimitiveType),
    /// No inference available.
    Unknown,
}

impl TypeDescriptor {
    /// The qualified name this descriptor carries, if any.
    pub fn fqn(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Internal(fqn) | TypeDescriptor::External(fqn) => Some(fqn),
            TypeDescriptor::Primitive(_) | TypeDescriptor::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, TypeDescriptor::Unknown)
    }
}

/// Primitive and container kind tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveType {
    Str,
    Int,
    Float,
    Bool,
    List,
    Dict,
    Set,
    Tuple,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::Str => "str",
            PrimitiveType::Int => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::Bool => "bool",
            PrimitiveType::List => "list",
            PrimitiveType::Dict => "dict",
            PrimitiveType::Set => "set",
            PrimitiveType::Tuple => "tuple",
        }
    }

    /// Map a normalized annotation token to a tag.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "str" => Some(PrimitiveType::Str),
            "int" => Some(PrimitiveType::Int),
            "float" => Some(PrimitiveType::Float),
            "bool" => Some(PrimitiveType::Bool),
            "list" => Some(PrimitiveType::List),
            "dict" => Some(PrimitiveType::Dict),
            "set" => Some(PrimitiveType::Set),
            "tuple" => Some(PrimitiveType::Tuple),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalize a raw annotation token to its base name.
///
/// Strips quoting (`'Foo'`), `Optional[...]` wrappers, generic argument
/// lists (`list[int]` → `list`, `Registry[User]` → `Registry`), and union
/// arms, keeping the first non-`None` arm. Returns `None` when nothing
/// usable remains (empty token, or a bare `None`).
pub fn normalize_annotation(token: &str) -> Option<SmolStr> {
    let mut text = token.trim();

    // Quoted forward references: 'Foo' / "Foo"
    text = text
        .trim_matches('\'')
        .trim_matches('"')
        .trim();

    // Union types: keep the first arm that is not None.
    if text.contains('|') {
        return text
            .split('|')
            .map(str::trim)
            .find(|arm| !arm.is_empty() && *arm != "None")
            .and_then(normalize_annotation);
    }

    // Optional[X] unwraps to X; any other Generic[...] keeps its base.
    if let Some(open) = text.find('[') {
        let base = text[..open].trim();
        if base == "Optional" {
            let inner = text[open + 1..].trim_end_matches(']').trim();
            return normalize_annotation(inner);
        }
        text = base;
    }

    if text.is_empty() || text == "None" {
        return None;
    }
    Some(SmolStr::new(text))
}
