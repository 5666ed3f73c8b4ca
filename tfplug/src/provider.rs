//! Provider trait and related types

use crate::context::Context;
use crate::data_source::DataSource;
use crate::resource::Resource;
use crate::schema::Schema;
use crate::types::{Diagnostic, DynamicValue};
use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub type DataSourceFactory = Box<dyn Fn() -> Box<dyn DataSource> + Send + Sync>;
pub type ResourceFactory = Box<dyn Fn() -> Box<dyn Resource> + Send + Sync>;

/// Provider root: owns configuration and builds the data handed to every
/// resource and data source
#[async_trait]
pub trait Provider: Send + Sync {
    async fn metadata(&self, ctx: Context, request: ProviderMetadataRequest)
        -> ProviderMetadataResponse;

    async fn schema(&self, ctx: Context, request: ProviderSchemaRequest) -> ProviderSchemaResponse;

    /// Called once; the returned provider_data is passed to every factory
    /// product through its configure method
    async fn configure(
        &mut self,
        ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse;

    /// Factories keyed by full type name (e.g. "laravelvapor_account")
    fn data_sources(&self) -> HashMap<String, DataSourceFactory>;

    fn resources(&self) -> HashMap<String, ResourceFactory>;
}

pub struct ProviderMetadataRequest;

pub struct ProviderMetadataResponse {
    pub type_name: String,
    pub version: String,
}

pub struct ProviderSchemaRequest;

pub struct ProviderSchemaResponse {
    pub schema: Schema,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ConfigureProviderRequest {
    pub config: DynamicValue,
}

pub struct ConfigureProviderResponse {
    pub diagnostics: Vec<Diagnostic>,
    pub provider_data: Option<Arc<dyn Any + Send + Sync>>,
}
