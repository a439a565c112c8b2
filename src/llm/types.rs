//! Tipos de dados do endpoint `/chat/completions` compatível com OpenAI.
//!
//! Apenas os campos que o tradutor realmente usa são modelados; campos
//! extras na resposta (como `usage` ou `id`) são ignorados pelo serde.

use serde::{Deserialize, Serialize};

/// Corpo da requisição para `POST {base_url}/chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Identificador do modelo (ex.: "qwen3-30b-a3b-instruct-2507").
    pub model: String,
    /// Mensagens da conversa. O tradutor envia sempre uma única mensagem de usuário.
    pub messages: Vec<ChatMessage>,
    /// Temperatura de amostragem.
    pub temperature: f32,
}

/// Uma mensagem na conversa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "user", "assistant" ou "system".
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// Resposta do endpoint. `choices` ausente desserializa como lista vazia
/// para que o cliente possa reportar o formato inválido com uma mensagem própria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// Mensagem gerada pelo modelo. `content` pode vir nulo em alguns provedores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Conteúdo textual da primeira escolha, se existir.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_openai_shape() {
        let req = ChatRequest {
            model: "qwen3-30b-a3b-instruct-2507".into(),
            messages: vec![ChatMessage::user("hello")],
            temperature: 0.3,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["model"], "qwen3-30b-a3b-instruct-2507");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "hello");
        assert!((value["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn response_deserialize_from_api_format() {
        let api_json = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "你好"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
        }"#;
        let resp: ChatResponse = serde_json::from_str(api_json).unwrap();
        assert_eq!(resp.first_content(), Some("你好"));
        assert_eq!(resp.choices[0].message.role.as_deref(), Some("assistant"));
    }

    #[test]
    fn missing_choices_is_empty() {
        let resp: ChatResponse = serde_json::from_str(r#"{"error": "nope"}"#).unwrap();
        assert!(resp.choices.is_empty());
        assert_eq!(resp.first_content(), None);
    }

    #[test]
    fn null_content_has_no_text() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_content(), None);
    }
}
