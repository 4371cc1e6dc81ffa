mod config_content_provider;
mod config_serializer;
mod config_store;
mod validate;

pub use config_content_provider::{ConfigContentProvider, FileContentConfigProvider};
pub use config_serializer::{ConfigSerializer, YamlConfigSerializer};
pub use config_store::ConfigStore;
pub use validate::Validate;
