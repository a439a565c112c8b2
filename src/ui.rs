//! Interface de terminal do hanhua — barra de progresso e saída colorida.
//!
//! Usa `indicatif` para a barra de progresso da execução e `console` para
//! estilização com cores do resumo final e das verificações do autoteste.

use std::io::{self, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::state_machine::{RunStatistics, TranslationOutcome};

/// Barra visível no momento; os logs de stdout passam por ela.
static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn active_bar() -> Option<ProgressBar> {
    ACTIVE_BAR.lock().ok().and_then(|slot| slot.clone())
}

fn set_active_bar(bar: Option<ProgressBar>) {
    if let Ok(mut slot) = ACTIVE_BAR.lock() {
        *slot = bar;
    }
}

/// Escritor de stdout para o `tracing` que suspende a barra ativa durante a
/// escrita, para que log e barra não se sobreponham.
pub struct LogWriter;

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match active_bar() {
            Some(pb) => pb.suspend(|| io::stdout().write_all(buf))?,
            None => io::stdout().write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

pub fn log_writer() -> LogWriter {
    LogWriter
}

/// Barra de progresso com um passo por arquivo.
///
/// Arquivos traduzidos avançam em silêncio; falhas são impressas acima da
/// barra em vermelho.
pub struct BatchProgress {
    pb: ProgressBar,
    red: Style,
    /// Se a barra está registrada como destino dos logs.
    routes_logs: AtomicBool,
}

impl BatchProgress {
    /// Inicia a barra para `total` arquivos.
    pub fn start(total: usize) -> Self {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        set_active_bar(Some(pb.clone()));
        Self::with_bar(pb, true)
    }

    /// Barra invisível, usada em testes e quando não há terminal.
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden(), false)
    }

    fn with_bar(pb: ProgressBar, routes_logs: bool) -> Self {
        Self {
            pb,
            red: Style::new().red().bold(),
            routes_logs: AtomicBool::new(routes_logs),
        }
    }

    /// Registra um arquivo concluído.
    pub fn advance(&self, outcome: &TranslationOutcome) {
        if outcome.is_failure() {
            self.pb.println(format!(
                "  {} {}: {}",
                self.red.apply_to("✗"),
                outcome.file_path,
                outcome.error
            ));
        }
        self.pb.set_message(outcome.file_path.clone());
        self.pb.inc(1);
    }

    pub fn finish(&self) {
        if self.routes_logs.swap(false, Ordering::SeqCst) {
            set_active_bar(None);
        }
        self.pb.finish_and_clear();
    }
}

impl Drop for BatchProgress {
    // Uma execução interrompida não chega a chamar `finish`.
    fn drop(&mut self) {
        if self.routes_logs.load(Ordering::SeqCst) {
            self.finish();
        }
    }
}

/// Imprime o resumo final da execução.
///
/// `errors_file` só é mencionado quando houve falhas.
pub fn print_summary(stats: &RunStatistics, result_file: &str, errors_file: Option<&str>) {
    let bold = Style::new().bold();
    let green = Style::new().green().bold();
    let yellow = Style::new().yellow();
    let red = Style::new().red().bold();

    println!();
    println!("{}", "=".repeat(50));
    println!("{}", bold.apply_to("Translation finished!"));
    println!("Total files:  {}", stats.total_files);
    println!("Translated:   {}", green.apply_to(stats.successful_count));
    println!("Skipped:      {}", yellow.apply_to(stats.skipped_count));
    println!("Failed:       {}", red.apply_to(stats.failed_count));
    if let Some(secs) = stats.duration_seconds {
        println!("Duration:     {secs:.2}s");
    }

    if let Some(path) = errors_file {
        println!();
        println!("Error details saved to: {path}");
    }
    println!("Full results saved to: {result_file}");
}

/// Linha de verificação do autoteste.
pub fn print_check(index: usize, title: &str, detail: &str) {
    let green = Style::new().green().bold();
    println!("{} Check {index}: {title}", green.apply_to("✓"));
    println!("   {detail}");
}
