/// Palette handed out to new areas in creation order.
pub const AREA_COLORS: [&str; 8] = [
    "#22c55e", "#3b82f6", "#a855f7", "#ec4899", "#f97316", "#14b8a6", "#eab308", "#ef4444",
];

/// A user-defined budget bucket. Records land in an area when their text
/// contains one of its keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub id: Option<i64>,
    pub name: String,
    pub keywords: Vec<String>,
    pub color: String,
    pub priority: i32,
    pub user_id: String,
}

impl Area {
    pub fn new(name: String, color: String, priority: i32, user_id: String) -> Self {
        Self {
            id: None,
            name,
            keywords: Vec::new(),
            color,
            priority,
            user_id,
        }
    }

    /// Add a keyword unless it is blank or already present (case-insensitive).
    /// Returns whether the keyword was added.
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() || self.has_keyword(keyword) {
            return false;
        }
        self.keywords.push(keyword.to_string());
        true
    }

    pub fn remove_keyword(&mut self, keyword: &str) -> bool {
        let before = self.keywords.len();
        self.keywords.retain(|k| k != keyword);
        self.keywords.len() != before
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        let lower = keyword.to_lowercase();
        self.keywords.iter().any(|k| k.to_lowercase() == lower)
    }

    /// New areas outrank every existing one.
    pub fn next_priority(areas: &[Area]) -> i32 {
        areas.len() as i32 + 1
    }

    pub fn next_color(areas: &[Area]) -> &'static str {
        AREA_COLORS[areas.len() % AREA_COLORS.len()]
    }

    pub fn find_by_name<'a>(areas: &'a [Area], name: &str) -> Option<&'a Area> {
        let lower = name.to_lowercase();
        areas.iter().find(|a| a.name.to_lowercase() == lower)
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
