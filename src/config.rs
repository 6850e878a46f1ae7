//! Analyzer configuration.
//!
//! Everything the engine is parameterized on lives here and is passed into
//! constructors explicitly; there are no process-wide registries. The
//! "is this imported name a class" heuristic is a swappable function rather
//! than string checks scattered through the catalog builder.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::error::ConfigError;
use crate::syntax::is_dotted_path;

/// What kind of declaration an imported external name is taken to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Class,
    Function,
}

/// The default classification heuristic: capitalized and underscore-free
/// names are classes, everything else is a function.
pub fn default_name_kind(name: &str) -> NameKind {
    let capitalized = name.chars().next().is_some_and(|c| c.is_uppercase());
    if capitalized && !name.contains('_') {
        NameKind::Class
    } else {
        NameKind::Function
    }
}

/// Read-only configuration supplied at construction.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Allow-listed external namespace prefixes, e.g. `["sqlkit", "webkit.http"]`.
    external_namespaces: Vec<String>,
    /// Known members per allow-listed namespace; attribute steps on external
    /// classes are accepted only for listed members.
    external_members: FxHashMap<String, Vec<SmolStr>>,
    /// Method name treated as the constructor during attribute extraction.
    constructor_name: SmolStr,
    /// Conventional receiver name; receiver references resolve to the
    /// current class, or to nothing outside one.
    receiver_name: SmolStr,
    kind_classifier: fn(&str) -> NameKind,
}

impl AnalyzerConfig {
    /// Build a configuration from an external-namespace allowlist.
    ///
    /// Every prefix must be a dotted identifier path; anything else is a
    /// fatal [`ConfigError`].
    pub fn new<I, S>(external_namespaces: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut namespaces = Vec::new();
        for ns in external_namespaces {
            let ns = ns.into();
            if !is_dotted_path(&ns) {
                return Err(ConfigError::InvalidNamespace(ns));
            }
            if !namespaces.contains(&ns) {
                namespaces.push(ns);
            }
        }
        Ok(Self {
            external_namespaces: namespaces,
            external_members: FxHashMap::default(),
            constructor_name: SmolStr::new("init"),
            receiver_name: SmolStr::new("self"),
            kind_classifier: default_name_kind,
        })
    }

    /// Register the known members of one allow-listed namespace.
    pub fn with_members<I, S>(mut self, namespace: &str, members: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        if self.external_namespaces.is_empty() {
            return Err(ConfigError::EmptyAllowlist);
        }
        if !self.external_namespaces.iter().any(|ns| ns == namespace) {
            return Err(ConfigError::UnknownNamespace(namespace.to_string()));
        }
        self.external_members
            .entry(namespace.to_string())
            .or_default()
            .extend(members.into_iter().map(Into::into));
        Ok(self)
    }

    /// Override the constructor method name (default `init`).
    pub fn with_constructor_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.constructor_name = name.into();
        self
    }

    /// Override the conventional receiver name (default `self`).
    pub fn with_receiver_name(mut self, name: impl Into<SmolStr>) -> Self {
        self.receiver_name = name.into();
        self
    }

    /// Swap the external name-kind heuristic.
    pub fn with_kind_classifier(mut self, classifier: fn(&str) -> NameKind) -> Self {
        self.kind_classifier = classifier;
        self
    }

    pub fn external_namespaces(&self) -> &[String] {
        &self.external_namespaces
    }

    pub fn constructor_name(&self) -> &str {
        &self.constructor_name
    }

    pub fn receiver_name(&self) -> &str {
        &self.receiver_name
    }

    pub fn classify_name(&self, name: &str) -> NameKind {
        (self.kind_classifier)(name)
    }

    /// The allow-listed prefix covering `fqn`, if any.
    ///
    /// A prefix matches the whole name or a dotted boundary: `webkit.http`
    /// covers `webkit.http.Request` but not `webkit.httpx`.
    pub fn matching_namespace(&self, fqn: &str) -> Option<&str> {
        self.external_namespaces
            .iter()
            .filter(|ns| {
                fqn == ns.as_str()
                    || (fqn.starts_with(ns.as_str()) && fqn.as_bytes().get(ns.len()) == Some(&b'.'))
            })
            // Longest prefix wins when namespaces nest.
            .max_by_key(|ns| ns.len())
            .map(String::as_str)
    }

    /// True if `fqn` lives under any allow-listed namespace.
    pub fn is_external(&self, fqn: &str) -> bool {
        self.matching_namespace(fqn).is_some()
    }

    /// True if `member` is a known member of the namespace covering
    /// `class_fqn`. Unknown members on external classes are rejected,
    /// never guessed.
    pub fn is_known_external_member(&self, class_fqn: &str, member: &str) -> bool {
        let Some(namespace) = self.matching_namespace(class_fqn) else {
            return false;
        };
        self.external_members
            .get(namespace)
            .is_some_and(|members| members.iter().any(|m| m == member))
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            external_namespaces: Vec::new(),
            external_members: FxHashMap::default(),
            constructor_name: SmolStr::new("init"),
            receiver_name: SmolStr::new("self"),
            kind_classifier: default_name_kind,
        }
    }
}

#[cfg(test)]
mod tests;
