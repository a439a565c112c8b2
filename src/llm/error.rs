//! Tipos de erro para o cliente do endpoint de chat.
//!
//! Define [`ApiError`] com uma variante por classe de falha da chamada remota.
//! Usa `thiserror` para derivar `Display` e `Error` a partir dos atributos
//! `#[error(...)]`.

use thiserror::Error;

/// Erros que podem ocorrer numa única chamada a `/chat/completions`.
///
/// - [`Request`](ApiError::Request): o servidor respondeu com status diferente de 200
/// - [`Malformed`](ApiError::Malformed): corpo sem `choices[0].message.content`
/// - [`Timeout`](ApiError::Timeout): o tempo limite do cliente HTTP expirou
/// - [`Transport`](ApiError::Transport): qualquer outra falha de rede
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Status HTTP diferente de 200, com o corpo devolvido pelo servidor.
    #[error("API request failed (status {status}): {body}")]
    Request { status: u16, body: String },

    /// A resposta não tem o formato esperado.
    #[error("malformed API response: {0}")]
    Malformed(String),

    /// A requisição excedeu o tempo limite configurado.
    #[error("request timed out ({seconds}s)")]
    Timeout { seconds: u64 },

    /// Falha de rede subjacente (DNS, conexão recusada, TLS).
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Converte um erro do `reqwest`, separando timeouts das demais falhas.
    pub fn from_reqwest(err: reqwest::Error, timeout_seconds: u64) -> Self {
        if err.is_timeout() {
            ApiError::Timeout {
                seconds: timeout_seconds,
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_display() {
        let err = ApiError::Request {
            status: 401,
            body: "Invalid API key".into(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed (status 401): Invalid API key"
        );
    }

    #[test]
    fn timeout_display() {
        let err = ApiError::Timeout { seconds: 120 };
        assert_eq!(err.to_string(), "request timed out (120s)");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiError>();
    }
}
