//! Admin authentication against a single shared bearer token.

use async_trait::async_trait;
use crate::domain::ports::{AdminAuth, AdminUser};

pub struct StaticTokenAuth {
    token: Option<String>,
}

impl StaticTokenAuth {
    /// With no token configured every request is rejected.
    pub fn new(token: Option<String>) -> Self { Self { token } }
}

#[async_trait]
impl AdminAuth for StaticTokenAuth {
    async fn authorize(&self, bearer_token: &str) -> Option<AdminUser> {
        let expected = self.token.as_deref()?;
        if constant_time_eq(expected.as_bytes(), bearer_token.as_bytes()) {
            Some(AdminUser { name: "admin".to_string() })
        } else {
            None
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
