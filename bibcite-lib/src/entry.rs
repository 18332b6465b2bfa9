//! In-memory representation of parsed bibliography records.

/// A single `name = value` pair inside an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One record produced by the parser.
///
/// `citation_key` is `None` for directives that carry no key, such as
/// `@comment` and `@preamble`. Tags keep the order in which they appear in
/// the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub entry_type: String,
    pub citation_key: Option<String>,
    pub tags: Vec<Field>,
}

impl Entry {
    pub fn new(entry_type: impl Into<String>, citation_key: impl Into<String>) -> Self {
        Self {
            entry_type: entry_type.into(),
            citation_key: Some(citation_key.into()),
            tags: Vec::new(),
        }
    }

    /// Adds a tag, or overwrites the value of an existing tag with the same
    /// name while keeping its original position.
    pub fn set_tag(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.tags.iter_mut().find(|field| field.name == name) {
            Some(field) => field.value = value,
            None => self.tags.push(Field { name, value }),
        }
    }

    /// Builder form of [`Entry::set_tag`].
    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_tag(name, value);
        self
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Returns the citation key when it is present and non-empty.
    pub fn key(&self) -> Option<&str> {
        self.citation_key.as_deref().filter(|key| !key.is_empty())
    }

    /// True for `@comment` and `@preamble` records.
    pub fn is_directive(&self) -> bool {
        self.entry_type.eq_ignore_ascii_case("comment")
            || self.entry_type.eq_ignore_ascii_case("preamble")
    }
}
