#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
}

impl Category {
    /// Find a category by exact name in a slice. Lookups are case-sensitive,
    /// the same as the store's resolution.
    pub fn find_by_name<'a>(categories: &'a [Category], name: &str) -> Option<&'a Category> {
        categories.iter().find(|c| c.name == name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
