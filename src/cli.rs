//! Interface de linha de comando do hanhua baseada em clap.
//!
//! Sem subcomando, executa a tradução em lote; `test` executa o autoteste.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

/// hanhua — tradução em lote de documentos do inglês para o chinês.
#[derive(Debug, Parser)]
#[command(name = "hanhua", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Caminho do arquivo de configuração TOML.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Habilita logs de depuração.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Executa o autoteste offline (sem chamadas de rede).
    Test,
}
