//! Providers that answer through another provider
//!
//! Microsoft Translator and DeepL both need authenticated accounts. Until
//! real adapters exist, each is served by delegating to a keyless provider
//! (Microsoft → Google, DeepL → MyMemory) and reporting the result under its
//! own name. Swapping in a real adapter only changes how the `ProviderSet` is
//! built.

use crate::mt::error::MtResult;
use crate::mt::provider::Provider;
use crate::mt::translator::MachineTranslator;
use async_trait::async_trait;
use std::sync::Arc;

pub struct DelegatingTranslator {
    provider: Provider,
    inner: Arc<dyn MachineTranslator>,
}

impl DelegatingTranslator {
    pub fn new(provider: Provider, inner: Arc<dyn MachineTranslator>) -> Self {
        Self { provider, inner }
    }
}

impl std::fmt::Debug for DelegatingTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DelegatingTranslator")
            .field("provider", &self.provider)
            .field("inner", &self.inner.provider())
            .finish()
    }
}

#[async_trait]
impl MachineTranslator for DelegatingTranslator {
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        self.inner.translate(text, source_locale, target_locale).await
    }

    fn provider(&self) -> Provider {
        self.provider
    }
}
