//! Configuração do hanhua carregada a partir de `hanhua.toml`.
//!
//! A struct [`HanhuaConfig`] contém todos os parâmetros da execução.
//! Valores não presentes no arquivo usam os defaults abaixo.
//! A variável de ambiente `DASHSCOPE_API_KEY` tem precedência sobre o arquivo.

use anyhow::{Result, bail};
use serde::Deserialize;
use std::path::Path;

/// Nome do arquivo de configuração procurado no diretório atual.
pub const DEFAULT_CONFIG_FILE: &str = "hanhua.toml";

/// Variável de ambiente que sobrescreve `api_key`.
pub const API_KEY_ENV: &str = "DASHSCOPE_API_KEY";

/// Prompt de instrução enviado antes do texto de cada arquivo.
pub const DEFAULT_PROMPT: &str = "请将以下英文内容进行汉化，保持markdown格式或者html代码块不变，只返回汉化后的内容，不要添加任何解释，如果你发现内容已经汉化，可以直接返回'已汉化'：";

/// Estratégia de agendamento dos arquivos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    /// Grupos fixos executados em sequência; concorrência dentro do grupo.
    #[default]
    Groups,
    /// Janela deslizante: um novo arquivo começa assim que outro termina.
    Pool,
}

/// Configuração de nível superior carregada de `hanhua.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HanhuaConfig {
    /// URL base do endpoint compatível com OpenAI.
    pub base_url: String,
    /// Identificador do modelo.
    pub model: String,
    /// Chave da API (token bearer).
    pub api_key: String,
    /// Máximo de arquivos traduzidos simultaneamente.
    pub max_concurrent: usize,
    /// Tempo limite total de cada requisição, em segundos.
    pub timeout_seconds: u64,
    /// Temperatura do modelo.
    pub temperature: f32,
    /// Prompt de instrução.
    pub prompt: String,
    /// Arquivo JSON com a lista de caminhos a traduzir.
    pub files_list: String,
    /// Documento com estatísticas e todos os resultados.
    pub result_file: String,
    /// Documento só com as falhas (escrito apenas se houver falhas).
    pub errors_file: String,
    /// Arquivo de log em texto.
    pub log_file: String,
    pub schedule: ScheduleMode,
}

impl Default for HanhuaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string(),
            model: "qwen3-30b-a3b-instruct-2507".to_string(),
            api_key: String::new(),
            max_concurrent: 5,
            timeout_seconds: 120,
            temperature: 0.3,
            prompt: DEFAULT_PROMPT.to_string(),
            files_list: "files_to_translate.json".to_string(),
            result_file: "translation_result.json".to_string(),
            errors_file: "translation_errors.json".to_string(),
            log_file: "translation_log.txt".to_string(),
            schedule: ScheduleMode::Groups,
        }
    }
}

impl HanhuaConfig {
    /// Carrega a configuração do caminho indicado.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<HanhuaConfig>(&contents)?
        } else {
            Self::default()
        };

        config.override_api_key(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    /// Variável de ambiente tem precedência sobre o arquivo para a chave da API.
    /// Um valor vazio é ignorado.
    fn override_api_key(&mut self, env_key: Option<String>) {
        if let Some(key) = env_key
            && !key.is_empty()
        {
            self.api_key = key;
        }
    }

    /// Rejeita valores que tornariam a execução impossível.
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrent == 0 {
            bail!("max_concurrent must be at least 1");
        }
        if self.timeout_seconds == 0 {
            bail!("timeout_seconds must be at least 1");
        }
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        Ok(())
    }
}
