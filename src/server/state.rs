//! Server state and configuration.

use tokio::sync::RwLock;

use crate::error::PrintardError;
use crate::preview::DEFAULT_PREVIEW_DPI;
use crate::sheet::Sheet;
use crate::source::SourceLoader;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Resolution of PNG exports when the request does not ask for one.
    pub preview_dpi: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            preview_dpi: DEFAULT_PREVIEW_DPI,
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// The sheet being designed. Exports render a clone, not the live value.
    pub sheet: RwLock<Sheet>,
    pub loader: SourceLoader,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, PrintardError> {
        Ok(Self::with_sheet(config, Sheet::default(), SourceLoader::new()?))
    }

    pub fn with_sheet(config: ServerConfig, sheet: Sheet, loader: SourceLoader) -> Self {
        Self {
            config,
            sheet: RwLock::new(sheet),
            loader,
        }
    }

    /// Copy of the current sheet. Image buffers are shared, not copied.
    pub async fn snapshot(&self) -> Sheet {
        self.sheet.read().await.clone()
    }
}
