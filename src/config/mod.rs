//! Configuration module

mod content;

pub use content::ContentConfig;
pub use content::HighlightConfig;
pub use content::ProviderConfig;
pub use content::ProviderSource;
pub use content::ProviderSources;
pub use content::DEFAULT_PROVIDER;
