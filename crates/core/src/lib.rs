pub mod config;
pub mod config_loader;
pub mod error;
pub mod table;
pub mod traits;

pub use config::{AppConfig, CacheConfig, ServerConfig, UpstreamConfig};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use error::FetchError;
pub use table::{CellValue, RawRow, RawTable};
pub use traits::IpoTableSource;
