use std::fmt;

use serde::{Deserialize, Serialize};

/// A name qualified by the namespace that defines it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: String,
}

impl QualifiedName {
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.namespace_index, self.name)
        }
    }
}

/// Human-readable text with an optional locale.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedText {
    pub locale: Option<String>,
    pub text: String,
}

impl LocalizedText {
    pub fn new(locale: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            locale: locale.map(str::to_string),
            text: text.into(),
        }
    }

    /// Text in the `en` locale.
    pub fn english(text: impl Into<String>) -> Self {
        Self::new(Some("en"), text)
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_display() {
        assert_eq!(QualifiedName::new(0, "Objects").to_string(), "Objects");
        assert_eq!(QualifiedName::new(2, "MyObject").to_string(), "2:MyObject");
    }

    #[test]
    fn english_locale() {
        let text = LocalizedText::english("ScalarTypes");
        assert_eq!(text.locale.as_deref(), Some("en"));
        assert_eq!(text.to_string(), "ScalarTypes");
    }
}
