//! Attribute names.
//!
//! Layout attributes arrive namespaced (`app:imageUrl`, `bind:onClick`,
//! `android:text`). Adapters declared in user code are not tied to any one
//! namespace, so every prefix is stripped before lookup, except the
//! framework `android:` namespace: `android:text` and a user-defined `text`
//! are distinct attributes.

use std::fmt;

/// The framework namespace, kept as part of the attribute key.
pub const FRAMEWORK_NAMESPACE: &str = "android";

/// A normalized attribute name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AttributeName(String);

impl AttributeName {
    /// Normalize a raw attribute name.
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.split_once(':') {
            Some((FRAMEWORK_NAMESPACE, _)) | None => AttributeName(raw.to_owned()),
            Some((_, local)) => AttributeName(local.to_owned()),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The retained namespace, if any (only ever `android`).
    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once(':').map(|(ns, _)| ns)
    }

    /// The name with every namespace removed.
    pub fn local_name(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(_, local)| local)
    }

    /// Conventional setter name: `set` + capitalized local name.
    pub fn setter_name(&self) -> String {
        format!("set{}", capitalize(self.local_name()))
    }

    /// Conventional getter names, in lookup order: `name`, `getName`, `isName`.
    pub fn getter_names(&self) -> [String; 3] {
        getter_names(self.local_name())
    }
}

/// Accessor names tried for a property: `name`, `getName`, `isName`.
pub fn getter_names(name: &str) -> [String; 3] {
    let capitalized = capitalize(name);
    [
        name.to_owned(),
        format!("get{capitalized}"),
        format!("is{capitalized}"),
    ]
}

/// Uppercase the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AttributeName {
    fn from(raw: &str) -> Self {
        AttributeName::new(raw)
    }
}

impl AsRef<str> for AttributeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
