//! MyMemory translation provider
//!
//! MyMemory answers `GET /get?q=<text>&langpair=<source>|<target>` with
//!
//! ```text
//! {
//!   "responseData": {"translatedText": "Bonjour", "match": 1},
//!   "responseStatus": 200,
//!   "responseDetails": ""
//! }
//! ```
//!
//! A failing request still comes back as HTTP 200; the real status is in
//! `responseStatus` (sometimes serialized as a string) and the reason in
//! `responseDetails`.

use crate::mt::error::{MtError, MtResult};
use crate::mt::provider::Provider;
use crate::mt::translator::{MachineTranslator, endpoint_url, fetch_json, normalize_locale};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

#[derive(Clone)]
pub struct MyMemoryProvider {
    client: reqwest::Client,
    base_url: String,
}

impl MyMemoryProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.mymemory.translated.net";

    const PATH: &'static str = "get";

    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn response_status(json: &Value) -> Option<u64> {
        match &json["responseStatus"] {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn extract_translation(json: &Value) -> MtResult<String> {
        if Self::response_status(json) != Some(200) {
            let details = json["responseDetails"]
                .as_str()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or("Unknown error");
            return Err(MtError::Service(details.to_string()));
        }

        json["responseData"]["translatedText"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                MtError::InvalidResponse(
                    "missing 'responseData.translatedText' field".to_string(),
                )
            })
    }
}

impl std::fmt::Debug for MyMemoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MyMemoryProvider")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for MyMemoryProvider {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        let langpair = format!(
            "{}|{}",
            normalize_locale(source_locale)?,
            normalize_locale(target_locale)?
        );

        let url = endpoint_url(
            &self.base_url,
            Self::PATH,
            &[("q", text), ("langpair", &langpair)],
        )?;
        debug!(provider = self.provider_name(), %langpair, "sending translation request");

        let json = fetch_json(&self.client, url).await?;
        Self::extract_translation(&json)
    }

    fn provider(&self) -> Provider {
        Provider::MyMemory
    }
}
