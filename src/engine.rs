use crate::error::EngineError;
use crate::proxy::ProxyConfig;
use std::io::Write;
use tracing::{info, warn};

/// The proxy engine that executes a [`ProxyConfig`].
pub trait Engine {
    fn start(&mut self) -> Result<(), EngineError>;
    fn close(&mut self);
}

/// Owns a started engine and closes it when dropped.
pub struct EngineGuard<E: Engine> {
    engine: E,
}

impl<E: Engine> EngineGuard<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }
}

impl<E: Engine> Drop for EngineGuard<E> {
    fn drop(&mut self) {
        self.engine.close();
    }
}

/// Engine that prints the configuration instead of running it.
///
/// Used by the binary when no real proxy engine is linked in.
pub struct DryRunEngine<W: Write> {
    config: ProxyConfig,
    writer: W,
    running: bool,
}

impl DryRunEngine<std::io::Stdout> {
    pub fn stdout(config: ProxyConfig) -> Self {
        Self::new(config, std::io::stdout())
    }
}

impl<W: Write> DryRunEngine<W> {
    pub fn new(config: ProxyConfig, writer: W) -> Self {
        Self {
            config,
            writer,
            running: false,
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: Write> Engine for DryRunEngine<W> {
    fn start(&mut self) -> Result<(), EngineError> {
        if self.running {
            return Err(EngineError::StartFailed("already running".to_string()));
        }
        serde_json::to_writer_pretty(&mut self.writer, &self.config)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        self.running = true;
        info!(
            "Dry-run engine started with {} inbound and {} outbound handlers",
            self.config.inbound.len(),
            self.config.outbound.len()
        );
        Ok(())
    }

    fn close(&mut self) {
        if !self.running {
            warn!("Dry-run engine closed before it was started");
            return;
        }
        self.running = false;
        info!("Dry-run engine closed");
    }
}
