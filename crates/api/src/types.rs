//! Content types templates can look up by name

use serde::Serialize;

/// A kind of content the site knows how to add and display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentType {
    /// Lookup key, e.g. `Document`
    pub name: String,
    pub title: String,
    /// Whether nodes of this type may hold children
    pub container: bool,
}

impl ContentType {
    pub fn new(name: impl Into<String>, title: impl Into<String>, container: bool) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            container,
        }
    }
}

/// Document, File and Image
#[must_use]
pub fn default_content_types() -> Vec<ContentType> {
    vec![
        ContentType::new("Document", "Document", true),
        ContentType::new("File", "File", false),
        ContentType::new("Image", "Image", false),
    ]
}
