//! tfplug - Terraform provider lifecycle framework for Rust
//!
//! Providers implement [`Provider`], [`DataSource`] and [`Resource`]; the
//! [`harness`] drives them through Metadata, Schema, Configure and the
//! read/CRUD callbacks.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod provider;
pub mod resource;

// Host side
pub mod harness;

// Re-exports for convenience
pub use context::Context;
pub use data_source::DataSource;
pub use error::{Result, TfplugError};
pub use harness::{serve_stdio, ProviderHost};
pub use provider::{Provider, ProviderMetadataRequest, ProviderMetadataResponse};
pub use resource::Resource;
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use types::{AttributePath, Config, Diagnostic, Dynamic, DynamicValue, State};
