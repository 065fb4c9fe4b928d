//! quire: typed content loading from structured text files
//!
//! This crate turns directories of Markdown, HTML, YAML and JSON files into
//! typed Rust values. Each file goes through a pipeline of decoding,
//! processing and denormalization, and the results are cached per manager
//! and can be listed, fetched by slug, filtered and sorted.
//!
//! ```ignore
//! use quire::{ContentConfig, ContentManagerBuilder, Filter, Model, Sort};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Article {
//!     slug: String,
//!     title: String,
//!     date: chrono::DateTime<chrono::Local>,
//! }
//!
//! impl Model for Article {
//!     const TYPE: &'static str = "article";
//! }
//!
//! let config = ContentConfig::load("content.yml")?;
//! let manager = ContentManagerBuilder::from_config(&config)?
//!     .model::<Article>()
//!     .build();
//!
//! let latest = manager.get_contents::<Article>(Sort::by([("date", false)]), Filter::None)?;
//! let about = manager.get_content::<Article>("about")?;
//! ```

pub mod config;
pub mod content;
pub mod decoder;
pub mod denormalizer;
pub mod error;
pub mod manager;
pub mod model;
pub mod processor;
pub mod provider;
pub mod query;

pub use config::{ContentConfig, ProviderConfig};
pub use content::{Content, Format};
pub use decoder::{Decoder, DecoderRegistry, Mapping};
pub use denormalizer::{DenormalizeContext, Denormalizer, SerdeDenormalizer};
pub use error::{ContentError, Result};
pub use manager::{ContentManager, ContentManagerBuilder};
pub use model::{Instance, Model};
pub use processor::Processor;
pub use provider::{ContentProvider, ContentProviderFactory, LocalFilesystemProvider, ProviderFactory};
pub use query::{Filter, Sort};
