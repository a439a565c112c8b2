//! Translation client: turns a text blob into translated text.
//!
//! Wraps a [`ChatSender`] with the fixed prompt, temperature and model from
//! the run configuration, and recognises the model's "already translated"
//! answer.

use tracing::{error, info};

use crate::config::HanhuaConfig;
use crate::error::TranslateError;
use crate::llm::{ApiError, ChatMessage, ChatRequest, ChatSender};

/// Reply the model gives when the input is already in Chinese.
pub const ALREADY_TRANSLATED: &str = "已汉化";

/// Result of a successful translate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Text(String),
    /// The model reported the text needs no translation.
    AlreadyTranslated,
}

pub struct Translator<S> {
    sender: S,
    model: String,
    prompt: String,
    temperature: f32,
}

impl<S: ChatSender> Translator<S> {
    pub fn new(sender: S, config: &HanhuaConfig) -> Self {
        Self {
            sender,
            model: config.model.clone(),
            prompt: config.prompt.clone(),
            temperature: config.temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    #[cfg(test)]
    pub fn sender(&self) -> &S {
        &self.sender
    }

    fn build_request(&self, text: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(format!("{}\n\n{}", self.prompt, text))],
            temperature: self.temperature,
        }
    }

    /// Translate `text`. `file_path` is only used to correlate log lines.
    ///
    /// Blank input comes back unchanged without touching the network.
    pub async fn translate(
        &self,
        text: &str,
        file_path: &str,
    ) -> Result<Translation, TranslateError> {
        if text.trim().is_empty() {
            return Ok(Translation::Text(text.to_string()));
        }

        let req = self.build_request(text);
        let result = match self.sender.send_chat(&req).await {
            Ok(resp) => match resp.first_content() {
                Some(content) => Ok(content.trim().to_string()),
                None => Err(ApiError::Malformed(
                    "missing choices[0].message.content".into(),
                )),
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(translated) if translated == ALREADY_TRANSLATED => {
                info!(file = file_path, "already translated, skipping");
                Ok(Translation::AlreadyTranslated)
            }
            Ok(translated) => {
                info!(
                    file = file_path,
                    original_len = text.chars().count(),
                    translated_len = translated.chars().count(),
                    "translation succeeded"
                );
                Ok(Translation::Text(translated))
            }
            Err(e) => {
                error!(file = file_path, "translation failed: {e}");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatClient;
    use crate::llm::types::{ChatResponse, Choice, ChoiceMessage};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct MockSender {
        reply: Result<Option<String>, ApiError>,
        calls: AtomicUsize,
    }

    impl MockSender {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(Some(text.to_string())),
                calls: AtomicUsize::new(0),
            }
        }

        fn no_choices() -> Self {
            Self {
                reply: Ok(None),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl ChatSender for MockSender {
        async fn send_chat(&self, _req: &ChatRequest) -> Result<ChatResponse, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(Some(text)) => Ok(ChatResponse {
                    choices: vec![Choice {
                        message: ChoiceMessage {
                            role: Some("assistant".into()),
                            content: Some(text.clone()),
                        },
                    }],
                }),
                Ok(None) => Ok(ChatResponse { choices: vec![] }),
                Err(e) => Err(e.clone()),
            }
        }
    }

    fn translator(sender: MockSender) -> Translator<MockSender> {
        Translator::new(sender, &HanhuaConfig::default())
    }

    #[tokio::test]
    async fn blank_text_skips_network() {
        let t = translator(MockSender::ok("should not be used"));
        assert_eq!(
            t.translate("", "a.md").await.unwrap(),
            Translation::Text(String::new())
        );
        assert_eq!(
            t.translate("  \n\t", "a.md").await.unwrap(),
            Translation::Text("  \n\t".into())
        );
        assert_eq!(t.sender().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn reply_is_trimmed() {
        let t = translator(MockSender::ok("\n  你好，世界  \n"));
        let out = t.translate("Hello, world", "a.md").await.unwrap();
        assert_eq!(out, Translation::Text("你好，世界".into()));
        assert_eq!(t.sender().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn sentinel_reply_is_already_translated() {
        let t = translator(MockSender::ok(" 已汉化\n"));
        let out = t.translate("已经是中文", "b.md").await.unwrap();
        assert_eq!(out, Translation::AlreadyTranslated);
    }

    #[tokio::test]
    async fn missing_choices_is_malformed() {
        let t = translator(MockSender::no_choices());
        let err = t.translate("Hello", "a.md").await.unwrap_err();
        assert!(matches!(err, TranslateError::Api(ApiError::Malformed(_))));
    }

    #[tokio::test]
    async fn api_error_is_propagated() {
        let t = translator(MockSender {
            reply: Err(ApiError::Timeout { seconds: 120 }),
            calls: AtomicUsize::new(0),
        });
        let err = t.translate("Hello", "a.md").await.unwrap_err();
        assert_eq!(err.to_string(), "request timed out (120s)");
    }

    #[test]
    fn request_prepends_prompt() {
        let t = translator(MockSender::ok(""));
        let req = t.build_request("Hello");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, "user");
        assert_eq!(
            req.messages[0].content,
            format!("{}\n\nHello", crate::config::DEFAULT_PROMPT)
        );
        assert_eq!(req.model, "qwen3-30b-a3b-instruct-2507");
    }

    #[tokio::test]
    async fn end_to_end_against_http_mock() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "qwen3-30b-a3b-instruct-2507"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "# 标题"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            ChatClient::with_base_url("sk".into(), server.uri(), Duration::from_secs(5), 5)
                .unwrap();
        let t = Translator::new(client, &HanhuaConfig::default());
        let out = t.translate("# Title", "doc.md").await.unwrap();
        assert_eq!(out, Translation::Text("# 标题".into()));
    }
}
