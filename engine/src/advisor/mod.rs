//! Advisor resolver
//!
//! Turns a profile and a free-text prompt into one advice string. With an
//! API key configured it asks the live model first; without one, or when the
//! live call fails in any way, it renders the local template. The public
//! operations never return an error.

use crate::config::AdvisorConfig;
use crate::llm::openai::OpenAIProvider;
use crate::llm::{LLMError, LLMProvider};
use sdk::errors::AppError;
use sdk::types::{AdvisorRequest, UserProfile};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub mod prompt;
pub mod template;

/// Where an advice string came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceSource {
    /// Live model answered
    Live,
    /// No credential configured
    Template,
    /// Live call failed and the template was used instead
    Fallback,
}

/// Resolved advice plus its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advice {
    pub text: String,
    pub source: AdviceSource,
}

/// Computes advice strings
#[derive(Clone)]
pub struct AdvisorResolver {
    provider: Option<Arc<dyn LLMProvider>>,
    timeout: Duration,
}

impl AdvisorResolver {
    /// Create a resolver around an optional live provider
    pub fn new(provider: Option<Arc<dyn LLMProvider>>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// A resolver that only ever uses the local template
    pub fn local_only() -> Self {
        Self::new(None, Duration::from_secs(20))
    }

    /// Build from configuration. The API key is the only switch.
    pub fn from_config(config: &AdvisorConfig) -> Self {
        let provider = match OpenAIProvider::from_config(config) {
            Ok(Some(provider)) => {
                tracing::info!(model = %config.model, "Live advisor enabled");
                Some(Arc::new(provider) as Arc<dyn LLMProvider>)
            }
            Ok(None) => {
                tracing::info!("No advisor API key configured, using local template");
                None
            }
            Err(e) => {
                tracing::warn!("Failed to build advisor client, using local template: {}", e);
                None
            }
        };

        Self::new(provider, config.timeout())
    }

    /// Whether a live provider is configured
    pub fn is_live(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolve advice for a profile and optional prompt
    pub async fn resolve_advice(&self, profile: &UserProfile, prompt: Option<&str>) -> String {
        let request = AdvisorRequest::new(profile.clone(), prompt);
        self.resolve(&request).await.text
    }

    /// Resolve advice for a prepared request
    pub async fn resolve(&self, request: &AdvisorRequest) -> Advice {
        let Some(provider) = &self.provider else {
            return Advice {
                text: template::render(&request.profile, &request.prompt),
                source: AdviceSource::Template,
            };
        };

        match self.ask_live(provider.as_ref(), request).await {
            Ok(text) => Advice {
                text,
                source: AdviceSource::Live,
            },
            Err(e) => {
                let e = AppError::from(e);
                tracing::warn!(
                    provider = provider.name(),
                    user_id = %request.profile.id,
                    "Live advisor failed, falling back to template: {}",
                    e
                );
                Advice {
                    text: template::render(&request.profile, &request.prompt),
                    source: AdviceSource::Fallback,
                }
            }
        }
    }

    async fn ask_live(
        &self,
        provider: &dyn LLMProvider,
        request: &AdvisorRequest,
    ) -> Result<String, LLMError> {
        let messages = prompt::build_messages(&request.profile, &request.prompt);

        tokio::time::timeout(self.timeout, provider.complete(&messages))
            .await
            .map_err(|_| LLMError::Timeout)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        reply: fn() -> crate::llm::Result<String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LLMProvider for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, messages: &[Message]) -> crate::llm::Result<String> {
            assert_eq!(messages.len(), 2);
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    struct Stalled;

    #[async_trait]
    impl LLMProvider for Stalled {
        fn name(&self) -> &str {
            "stalled"
        }

        async fn complete(&self, _messages: &[Message]) -> crate::llm::Result<String> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("too late".into())
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            name: "Ana".into(),
            email: "ana@example.com".into(),
            password_hash: String::new(),
            grade: Some("10".into()),
            interests: vec!["biology".into(), "art".into()],
            goals: Some("become a designer".into()),
            created_at: 0,
        }
    }

    fn resolver(reply: fn() -> crate::llm::Result<String>) -> (AdvisorResolver, Arc<Scripted>) {
        let provider = Arc::new(Scripted {
            reply,
            calls: AtomicUsize::new(0),
        });
        let resolver = AdvisorResolver::new(
            Some(Arc::clone(&provider) as Arc<dyn LLMProvider>),
            Duration::from_secs(5),
        );
        (resolver, provider)
    }

    #[tokio::test]
    async fn test_local_only_uses_template() {
        let resolver = AdvisorResolver::local_only();
        assert!(!resolver.is_live());

        let advice = resolver
            .resolve(&AdvisorRequest::new(profile(), Some("What should I study?")))
            .await;

        assert_eq!(advice.source, AdviceSource::Template);
        assert_eq!(
            advice.text,
            template::render(&profile(), "What should I study?")
        );
    }

    #[tokio::test]
    async fn test_default_prompt_applied() {
        let resolver = AdvisorResolver::local_only();
        let text = resolver.resolve_advice(&profile(), Some("")).await;
        assert!(text.contains("\"How should I plan my career?\""));
    }

    #[tokio::test]
    async fn test_live_answer_returned() {
        let (resolver, provider) = resolver(|| Ok("Study design.".into()));

        let advice = resolver
            .resolve(&AdvisorRequest::new(profile(), Some("Q")))
            .await;

        assert_eq!(advice.text, "Study design.");
        assert_eq!(advice.source, AdviceSource::Live);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_every_failure_falls_back() {
        let failures: [fn() -> crate::llm::Result<String>; 5] = [
            || Err(LLMError::NetworkError("dns".into())),
            || Err(LLMError::Timeout),
            || {
                Err(LLMError::HttpStatus {
                    status: 500,
                    body: String::new(),
                })
            },
            || Err(LLMError::ParseError("eof".into())),
            || Err(LLMError::EmptyContent),
        ];

        for failure in failures {
            let (resolver, _) = resolver(failure);
            let advice = resolver
                .resolve(&AdvisorRequest::new(profile(), Some("Q")))
                .await;

            assert_eq!(advice.source, AdviceSource::Fallback);
            assert_eq!(advice.text, template::render(&profile(), "Q"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_provider_times_out() {
        let resolver = AdvisorResolver::new(
            Some(Arc::new(Stalled) as Arc<dyn LLMProvider>),
            Duration::from_secs(20),
        );

        let advice = resolver
            .resolve(&AdvisorRequest::new(profile(), Some("Q")))
            .await;

        assert_eq!(advice.source, AdviceSource::Fallback);
        assert_eq!(advice.text, template::render(&profile(), "Q"));
    }
}
