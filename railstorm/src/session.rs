//! Authenticated session state shared by every scenario call.

use crate::client::QueryClient;
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

/// The account identity and request headers carried on every call.
///
/// Established once per loop pass via the login endpoint; never renewed
/// mid-pass.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: String,
    pub headers: HeaderMap,
}

impl Session {
    pub async fn establish(client: &QueryClient) -> Result<Self> {
        let auth = client.login().await?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = format!("Bearer {}", auth.token);
        let value = HeaderValue::from_str(&bearer)
            .map_err(|e| Error::Precondition(format!("unusable auth token: {e}")))?;
        headers.insert(AUTHORIZATION, value);

        debug!(account_id = %auth.user_id, "session established");
        Ok(Self {
            account_id: auth.user_id,
            headers,
        })
    }
}
