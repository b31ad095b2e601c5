/// Addresses one item of a list field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKey {
    /// Match by the item's `id` field (identified lists).
    Id(String),
    /// Match by position (positional lists).
    Index(usize),
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "'{id}'"),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}
