use std::collections::BTreeMap;

/// Where a [`ConnectionProvider`](crate::ConnectionProvider) connects to.
///
/// `extra` carries provider-specific options keyed as `<provider>.<option>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionConfig {
    pub database: String,
    pub extra: BTreeMap<String, String>,
}

impl ConnectionConfig {
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            extra: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }
}
