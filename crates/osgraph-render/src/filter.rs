use std::collections::BTreeSet;

/// Set of resource types whose top-level branches are shown.
///
/// An empty filter shows everything. Matching is case-insensitive and only
/// gates top-level branches; nested children always render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    types: BTreeSet<String>,
}

impl TypeFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `"server, Network"`.
    pub fn parse(list: &str) -> Self {
        Self::from_types(list.split(','))
    }

    pub fn from_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let types = types
            .into_iter()
            .map(|t| t.as_ref().trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { types }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn allows(&self, resource_type: &str) -> bool {
        self.types.is_empty() || self.types.contains(&resource_type.to_ascii_lowercase())
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }
}
