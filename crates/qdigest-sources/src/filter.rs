/// Decides which namespaces reach the redactor
#[derive(Debug, Clone, Default)]
pub struct NamespaceFilter {
    skip_suffixes: Vec<String>,
    database: Option<String>,
}

impl NamespaceFilter {
    /// Create new filter from skip suffixes (empty entries are ignored)
    pub fn new(skip_suffixes: Vec<String>) -> Self {
        let skip_suffixes = skip_suffixes
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            skip_suffixes,
            database: None,
        }
    }

    /// Only accept namespaces of the given database
    pub fn with_database(mut self, database: Option<String>) -> Self {
        self.database = database.filter(|db| !db.is_empty());
        self
    }

    /// Check if a record with this namespace should be processed
    pub fn accepts(&self, ns: &str) -> bool {
        if self.matching_suffix(ns).is_some() {
            return false;
        }

        match &self.database {
            Some(db) => ns
                .strip_prefix(db.as_str())
                .is_some_and(|rest| rest.starts_with('.')),
            None => true,
        }
    }

    /// Get first matching skip suffix (for log messages)
    pub fn matching_suffix(&self, ns: &str) -> Option<&str> {
        self.skip_suffixes
            .iter()
            .find(|suffix| ns.ends_with(suffix.as_str()))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_suffix() {
        let filter = NamespaceFilter::new(vec!["system.profile".to_string()]);

        assert!(!filter.accepts("shop.system.profile"));
        assert!(filter.accepts("shop.users"));
        assert!(filter.accepts(""));
    }

    #[test]
    fn test_multiple_suffixes() {
        let filter = NamespaceFilter::new(vec![
            "system.profile".to_string(),
            " sessions ".to_string(),
            String::new(),
        ]);

        assert!(!filter.accepts("config.system.sessions"));
        assert!(filter.accepts("shop.orders"));
        assert_eq!(filter.matching_suffix("config.sessions"), Some("sessions"));
        assert_eq!(filter.matching_suffix("shop.orders"), None);
    }

    #[test]
    fn test_database_restriction() {
        let filter = NamespaceFilter::new(vec!["system.profile".to_string()])
            .with_database(Some("shop".to_string()));

        assert!(filter.accepts("shop.users"));
        assert!(!filter.accepts("shopping.users"));
        assert!(!filter.accepts("admin.users"));
        assert!(!filter.accepts("shop.system.profile"));
    }

    #[test]
    fn test_empty_database_means_any() {
        let filter = NamespaceFilter::default().with_database(Some(String::new()));
        assert!(filter.accepts("anything.at.all"));
    }
}
