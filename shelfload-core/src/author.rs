/// A person credited on one or more works.
///
/// # Examples
/// ```
/// use shelfload_core::Author;
///
/// let author = Author::new("OL1A", "Jane Doe", "Jane Doe");
/// assert_eq!(author.id, "OL1A");
/// assert_eq!(author.name, "Jane Doe");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Author {
    /// Open Library author key without the `/authors/` prefix.
    pub id: String,
    /// Display name; empty when the dump omits it.
    pub name: String,
    /// Personal name; empty when the dump omits it.
    pub personal_name: String,
}

impl Author {
    /// Construct an author from its identifier and names.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        personal_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            personal_name: personal_name.into(),
        }
    }
}
