use std::collections::HashMap;

/// Checks client credentials.
pub trait LoginSystem: Send + Sync {
    fn authenticate(&self, client_id: &str, password: &str) -> bool;
}

/// Credentials known up front, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticLoginSystem {
    passwords: HashMap<String, String>,
}

impl StaticLoginSystem {
    pub fn new(passwords: HashMap<String, String>) -> Self {
        Self { passwords }
    }
}

impl LoginSystem for StaticLoginSystem {
    fn authenticate(&self, client_id: &str, password: &str) -> bool {
        self.passwords
            .get(client_id)
            .is_some_and(|expected| expected == password)
    }
}
