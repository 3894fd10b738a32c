use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::errors::LlmError;

/// Generation-provider configuration. Retry count and request timeout are
/// deliberately configuration, not constants: a hung provider call must not
/// hang the request pipeline.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
    pub max_retries: u32,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: 800,
            temperature: 0.8,
            max_retries: 3,
            timeout: Duration::from_secs(30),
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            model: std::env::var("FORTUNE_LLM_MODEL").unwrap_or(defaults.model),
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            max_retries: std::env::var("FORTUNE_LLM_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            timeout: std::env::var("FORTUNE_LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Trait for generation providers. Production uses OpenAI; tests stub this.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate_completion(&self, prompt: String) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Serialize, Clone)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

const SYSTEM_PROMPT: &str = "당신은 전통 사주 명리학에 정통한 운세 상담가입니다. \
항상 한국어로, 공감하는 따뜻한 말투로 답합니다. 의료·법률·투자에 대한 단정적인 \
판단은 하지 않습니다.";

/// OpenAI chat-completions provider with bounded retry and backoff.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
    max_retries: u32,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, config: &LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self {
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            max_retries: config.max_retries,
            client,
        })
    }

    async fn call_with_retry(&self, request: OpenAiRequest) -> Result<OpenAiResponse, LlmError> {
        let mut attempt = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            match self.call_openai(&request).await {
                Ok(response) => return Ok(response),
                // The provider asked us to back off; retrying immediately
                // would only make it worse.
                Err(LlmError::RateLimited) => return Err(LlmError::RateLimited),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.max_retries {
                        error!("provider call failed after {} attempts: {}", attempt, e);
                        return Err(e);
                    }

                    warn!(
                        "provider call failed (attempt {}/{}): {}. retrying in {:?}",
                        attempt, self.max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }

    async fn call_openai(&self, request: &OpenAiRequest) -> Result<OpenAiResponse, LlmError> {
        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 429 {
            return Err(LlmError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LlmError::ApiError(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json::<OpenAiResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn generate_completion(&self, prompt: String) -> Result<String, LlmError> {
        info!("generating fortune completion (model: {})", self.model);

        let request = OpenAiRequest {
            model: self.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                OpenAiMessage {
                    role: "user".to_string(),
                    content: prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.call_with_retry(request).await?;

        let content = response
            .choices
            .first()
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?
            .message
            .content
            .clone();

        if let Some(usage) = response.usage {
            info!(
                "completion generated. tokens: {} prompt + {} completion = {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(content)
    }
}

#[derive(Debug, Clone)]
struct CachedResponse {
    content: String,
    created_at: Instant,
}

/// TTL cache over generated text, keyed by prompt hash. Works because the
/// prompt builder is byte-deterministic for identical input.
pub struct LlmCache {
    cache: Arc<RwLock<HashMap<String, CachedResponse>>>,
    ttl: Duration,
}

impl LlmCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let cache = self.cache.read().await;
        if let Some(cached) = cache.get(key) {
            if cached.created_at.elapsed() < self.ttl {
                return Some(cached.content.clone());
            }
        }
        None
    }

    pub async fn set(&self, key: String, value: String) {
        let mut cache = self.cache.write().await;
        cache.insert(
            key,
            CachedResponse {
                content: value,
                created_at: Instant::now(),
            },
        );
    }
}

#[derive(Debug, Clone)]
struct RateLimitEntry {
    count: usize,
    window_start: Instant,
}

/// Sliding-window rate limiter keyed by opaque session id. Anonymous
/// requests all land in one bucket.
pub struct RateLimiter {
    limits: Arc<RwLock<HashMap<String, RateLimitEntry>>>,
    max_requests_per_hour: usize,
    window_duration: Duration,
}

impl RateLimiter {
    pub fn new(max_requests_per_hour: usize) -> Self {
        Self {
            limits: Arc::new(RwLock::new(HashMap::new())),
            max_requests_per_hour,
            window_duration: Duration::from_secs(3600),
        }
    }

    pub async fn check_and_increment(&self, session_key: &str) -> Result<(), LlmError> {
        let mut limits = self.limits.write().await;
        let now = Instant::now();

        let entry = limits
            .entry(session_key.to_string())
            .or_insert(RateLimitEntry {
                count: 0,
                window_start: now,
            });

        if now.duration_since(entry.window_start) >= self.window_duration {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.max_requests_per_hour {
            warn!("rate limit exceeded for session: {}", session_key);
            return Err(LlmError::RateLimited);
        }

        entry.count += 1;
        Ok(())
    }
}

/// Generation service: provider behind a trait, TTL response cache, and a
/// per-session rate limiter. One logical outbound call per request.
pub struct LlmService {
    provider: Option<Arc<dyn LlmProvider>>,
    cache: LlmCache,
    rate_limiter: RateLimiter,
}

impl LlmService {
    pub fn new(config: LlmConfig) -> Self {
        let provider = match &config.api_key {
            Some(api_key) => match OpenAiProvider::new(api_key.clone(), &config) {
                Ok(provider) => {
                    info!("LLM provider initialized (model: {})", config.model);
                    Some(Arc::new(provider) as Arc<dyn LlmProvider>)
                }
                Err(e) => {
                    warn!("failed to initialize LLM provider: {}. generation disabled.", e);
                    None
                }
            },
            None => {
                warn!("OPENAI_API_KEY not configured. generation disabled.");
                None
            }
        };

        Self::with_provider(provider)
    }

    pub fn with_provider(provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            provider,
            cache: LlmCache::new(Duration::from_secs(3600)),
            rate_limiter: RateLimiter::new(50),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Generate text for a session, with rate limiting and caching.
    pub async fn generate_for_session(
        &self,
        session_key: &str,
        prompt: String,
    ) -> Result<String, LlmError> {
        self.rate_limiter.check_and_increment(session_key).await?;

        let cache_key = format!("fortune:{}", Self::hash_prompt(&prompt));
        if let Some(cached) = self.cache.get(&cache_key).await {
            info!("serving fortune from cache (session: {})", session_key);
            return Ok(cached);
        }

        let provider = self.provider.as_ref().ok_or(LlmError::Disabled)?;
        let result = provider.generate_completion(prompt).await?;

        self.cache.set(cache_key, result.clone()).await;

        Ok(result)
    }

    fn hash_prompt(prompt: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        prompt.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn generate_completion(&self, prompt: String) -> Result<String, LlmError> {
            Ok(format!("echo: {}", prompt))
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_service_without_provider_is_disabled() {
        let service = LlmService::with_provider(None);
        assert!(!service.is_enabled());

        let result = service.generate_for_session("s1", "test".to_string()).await;
        assert!(matches!(result, Err(LlmError::Disabled)));
    }

    #[tokio::test]
    async fn test_identical_prompts_hit_cache() {
        let service = LlmService::with_provider(Some(Arc::new(EchoProvider)));

        let first = service
            .generate_for_session("s1", "오늘의 운세".to_string())
            .await
            .unwrap();
        let second = service
            .generate_for_session("s1", "오늘의 운세".to_string())
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_cache_expires() {
        let cache = LlmCache::new(Duration::from_millis(50));
        cache.set("k".to_string(), "v".to_string()).await;
        assert_eq!(cache.get("k").await, Some("v".to_string()));

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_rate_limiter_allows_within_limit() {
        let limiter = RateLimiter::new(3);
        assert!(limiter.check_and_increment("s1").await.is_ok());
        assert!(limiter.check_and_increment("s1").await.is_ok());
        assert!(limiter.check_and_increment("s1").await.is_ok());
    }

    #[tokio::test]
    async fn test_rate_limiter_blocks_over_limit() {
        let limiter = RateLimiter::new(2);
        assert!(limiter.check_and_increment("s1").await.is_ok());
        assert!(limiter.check_and_increment("s1").await.is_ok());

        let result = limiter.check_and_increment("s1").await;
        assert!(matches!(result, Err(LlmError::RateLimited)));
    }

    #[tokio::test]
    async fn test_rate_limiter_buckets_are_per_session() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.check_and_increment("s1").await.is_ok());
        assert!(limiter.check_and_increment("s2").await.is_ok());
        assert!(limiter.check_and_increment("s1").await.is_err());
    }
}
