//! Provider wrapper that memoizes responses in a [`ResponseCache`].

use async_trait::async_trait;
use tracing::debug;

use crate::error::ToolwrightError;
use crate::models::capabilities::ModelCapabilities;
use crate::util::cache::ResponseCache;

use super::{ModelProvider, ProviderRequest, ProviderResponse};

/// Wraps any provider; identical requests are answered from the cache.
///
/// The key covers provider, model, messages (without timestamps), settings,
/// tools and response format.
pub struct CachedProvider {
    inner: Box<dyn ModelProvider>,
    cache: ResponseCache,
}

impl CachedProvider {
    pub fn new(inner: Box<dyn ModelProvider>, cache: ResponseCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    fn cache_key(&self, request: &ProviderRequest) -> Result<String, ToolwrightError> {
        let mut request = request.clone();
        for message in &mut request.messages {
            message.timestamp = None;
        }
        let payload = serde_json::json!({
            "provider": self.inner.provider_name(),
            "model": self.inner.model_id(),
            "request": request,
        });
        Ok(ResponseCache::key_for(&serde_json::to_vec(&payload)?))
    }
}

#[async_trait]
impl ModelProvider for CachedProvider {
    fn provider_name(&self) -> &str {
        self.inner.provider_name()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn capabilities(&self) -> &ModelCapabilities {
        self.inner.capabilities()
    }

    async fn generate_text(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, ToolwrightError> {
        let key = self.cache_key(request)?;
        if let Some(hit) = self.cache.get(&key) {
            if let Ok(response) = serde_json::from_str::<ProviderResponse>(&hit) {
                debug!(key = %key, "response cache hit");
                return Ok(response);
            }
        }

        let response = self.inner.generate_text(request).await?;
        self.cache.insert(key, serde_json::to_string(&response)?);
        Ok(response)
    }
}
