//! Host harness driving a provider through its lifecycle
//!
//! [`ProviderHost`] plays the role Terraform plays over gRPC: it configures
//! the provider once, then for every operation builds the resource or data
//! source from its factory, hands it the provider data, and runs one
//! callback. [`serve`] exposes the same operations as newline-delimited JSON
//! so the provider binary can be driven from a pipe.

use crate::context::Context;
use crate::data_source::{
    ConfigureDataSourceRequest, DataSource, DataSourceMetadataRequest, DataSourceSchemaRequest,
    ReadDataSourceRequest, ReadDataSourceResponse,
};
use crate::error::{Result, TfplugError};
use crate::provider::{
    ConfigureProviderRequest, Provider, ProviderMetadataRequest, ProviderSchemaRequest,
};
use crate::resource::{
    ConfigureResourceRequest, CreateResourceRequest, CreateResourceResponse,
    DeleteResourceRequest, DeleteResourceResponse, ReadResourceRequest, ReadResourceResponse,
    Resource, ResourceMetadataRequest, ResourceSchemaRequest, UpdateResourceRequest,
    UpdateResourceResponse,
};
use crate::schema::Schema;
use crate::types::{has_errors, Diagnostic, DynamicValue};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::Instrument;

/// Every schema a provider exposes
#[derive(Debug, Serialize)]
pub struct ProviderSchemas {
    pub provider: Schema,
    pub data_sources: BTreeMap<String, Schema>,
    pub resources: BTreeMap<String, Schema>,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct ProviderHost<P: Provider> {
    provider: P,
    provider_data: Option<Arc<dyn Any + Send + Sync>>,
}

impl<P: Provider> ProviderHost<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            provider_data: None,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn is_configured(&self) -> bool {
        self.provider_data.is_some()
    }

    pub async fn provider_type_name(&self) -> String {
        self.provider
            .metadata(Context::for_operation("metadata"), ProviderMetadataRequest)
            .await
            .type_name
    }

    pub async fn schemas(&self) -> ProviderSchemas {
        let ctx = Context::for_operation("get_schemas");
        let provider_type_name = self.provider_type_name().await;
        let provider_schema = self
            .provider
            .schema(ctx.clone(), ProviderSchemaRequest)
            .await;
        let mut diagnostics = provider_schema.diagnostics;

        let mut data_sources = BTreeMap::new();
        for (name, factory) in self.provider.data_sources() {
            let data_source = factory();
            let metadata = data_source
                .metadata(
                    ctx.clone(),
                    DataSourceMetadataRequest {
                        provider_type_name: provider_type_name.clone(),
                    },
                )
                .await;
            if metadata.type_name != name {
                diagnostics.push(Diagnostic::error(
                    "Data source type name mismatch",
                    format!(
                        "factory registered as '{}' reports '{}'",
                        name, metadata.type_name
                    ),
                ));
            }
            let response = data_source
                .schema(ctx.clone(), DataSourceSchemaRequest)
                .await;
            diagnostics.extend(response.diagnostics);
            data_sources.insert(name, response.schema);
        }

        let mut resources = BTreeMap::new();
        for (name, factory) in self.provider.resources() {
            let resource = factory();
            let metadata = resource
                .metadata(
                    ctx.clone(),
                    ResourceMetadataRequest {
                        provider_type_name: provider_type_name.clone(),
                    },
                )
                .await;
            if metadata.type_name != name {
                diagnostics.push(Diagnostic::error(
                    "Resource type name mismatch",
                    format!(
                        "factory registered as '{}' reports '{}'",
                        name, metadata.type_name
                    ),
                ));
            }
            let response = resource.schema(ctx.clone(), ResourceSchemaRequest).await;
            diagnostics.extend(response.diagnostics);
            resources.insert(name, response.schema);
        }

        ProviderSchemas {
            provider: provider_schema.schema,
            data_sources,
            resources,
            diagnostics,
        }
    }

    pub async fn configure(&mut self, config: DynamicValue) -> Vec<Diagnostic> {
        let ctx = Context::for_operation("configure_provider");
        let span = ctx.span();
        let response = self
            .provider
            .configure(ctx, ConfigureProviderRequest { config })
            .instrument(span)
            .await;

        if !has_errors(&response.diagnostics) {
            self.provider_data = response.provider_data;
        }
        response.diagnostics
    }

    pub async fn read_data_source(
        &self,
        type_name: &str,
        config: DynamicValue,
    ) -> ReadDataSourceResponse {
        let ctx = Context::for_operation("read_data_source");
        let span = ctx.span();

        async {
            let data_source = match self.data_source(&ctx, type_name).await {
                Ok(ds) => ds,
                Err(diagnostics) => {
                    return ReadDataSourceResponse {
                        state: DynamicValue::null(),
                        diagnostics,
                    }
                }
            };

            tracing::debug!("reading data source {}", type_name);
            data_source
                .read(
                    ctx.clone(),
                    ReadDataSourceRequest {
                        type_name: type_name.to_string(),
                        config,
                    },
                )
                .await
        }
        .instrument(span)
        .await
    }

    pub async fn create_resource(
        &self,
        type_name: &str,
        config: DynamicValue,
    ) -> CreateResourceResponse {
        let ctx = Context::for_operation("create_resource");
        let span = ctx.span();

        async {
            let resource = match self.resource(&ctx, type_name).await {
                Ok(r) => r,
                Err(diagnostics) => {
                    return CreateResourceResponse {
                        new_state: DynamicValue::null(),
                        diagnostics,
                    }
                }
            };

            let planned_state = self.plan(&ctx, resource.as_ref(), &config).await;
            tracing::debug!("creating resource {}", type_name);
            resource
                .create(
                    ctx.clone(),
                    CreateResourceRequest {
                        type_name: type_name.to_string(),
                        planned_state,
                        config,
                    },
                )
                .await
        }
        .instrument(span)
        .await
    }

    pub async fn read_resource(
        &self,
        type_name: &str,
        current_state: DynamicValue,
    ) -> ReadResourceResponse {
        let ctx = Context::for_operation("read_resource");
        let span = ctx.span();

        async {
            let resource = match self.resource(&ctx, type_name).await {
                Ok(r) => r,
                Err(diagnostics) => {
                    return ReadResourceResponse {
                        new_state: None,
                        diagnostics,
                    }
                }
            };

            resource
                .read(
                    ctx.clone(),
                    ReadResourceRequest {
                        type_name: type_name.to_string(),
                        current_state,
                    },
                )
                .await
        }
        .instrument(span)
        .await
    }

    pub async fn update_resource(
        &self,
        type_name: &str,
        prior_state: DynamicValue,
        config: DynamicValue,
    ) -> UpdateResourceResponse {
        let ctx = Context::for_operation("update_resource");
        let span = ctx.span();

        async {
            let resource = match self.resource(&ctx, type_name).await {
                Ok(r) => r,
                Err(diagnostics) => {
                    return UpdateResourceResponse {
                        new_state: prior_state,
                        diagnostics,
                    }
                }
            };

            let planned_state = self.plan(&ctx, resource.as_ref(), &config).await;
            resource
                .update(
                    ctx.clone(),
                    UpdateResourceRequest {
                        type_name: type_name.to_string(),
                        prior_state,
                        planned_state,
                        config,
                    },
                )
                .await
        }
        .instrument(span)
        .await
    }

    pub async fn delete_resource(
        &self,
        type_name: &str,
        prior_state: DynamicValue,
    ) -> DeleteResourceResponse {
        let ctx = Context::for_operation("delete_resource");
        let span = ctx.span();

        async {
            let resource = match self.resource(&ctx, type_name).await {
                Ok(r) => r,
                Err(diagnostics) => return DeleteResourceResponse { diagnostics },
            };

            resource
                .delete(
                    ctx.clone(),
                    DeleteResourceRequest {
                        type_name: type_name.to_string(),
                        prior_state,
                    },
                )
                .await
        }
        .instrument(span)
        .await
    }

    /// Config with schema defaults filled in
    async fn plan(
        &self,
        ctx: &Context,
        resource: &dyn Resource,
        config: &DynamicValue,
    ) -> DynamicValue {
        let schema = resource
            .schema(ctx.clone(), ResourceSchemaRequest)
            .await
            .schema;
        let mut planned = config.clone();
        schema.apply_defaults(&mut planned);
        planned
    }

    async fn data_source(
        &self,
        ctx: &Context,
        type_name: &str,
    ) -> std::result::Result<Box<dyn DataSource>, Vec<Diagnostic>> {
        let factories = self.provider.data_sources();
        let factory = factories.get(type_name).ok_or_else(|| {
            vec![not_found(TfplugError::DataSourceNotFound(
                type_name.to_string(),
            ))]
        })?;

        let mut data_source = factory();
        let response = data_source
            .configure(
                ctx.clone(),
                ConfigureDataSourceRequest {
                    provider_data: self.provider_data.clone(),
                },
            )
            .await;

        if has_errors(&response.diagnostics) {
            return Err(response.diagnostics);
        }
        Ok(data_source)
    }

    async fn resource(
        &self,
        ctx: &Context,
        type_name: &str,
    ) -> std::result::Result<Box<dyn Resource>, Vec<Diagnostic>> {
        let factories = self.provider.resources();
        let factory = factories.get(type_name).ok_or_else(|| {
            vec![not_found(TfplugError::ResourceNotFound(
                type_name.to_string(),
            ))]
        })?;

        let mut resource = factory();
        let response = resource
            .configure(
                ctx.clone(),
                ConfigureResourceRequest {
                    provider_data: self.provider_data.clone(),
                },
            )
            .await;

        if has_errors(&response.diagnostics) {
            return Err(response.diagnostics);
        }
        Ok(resource)
    }

    /// Runs one decoded invocation
    pub async fn handle(&mut self, invocation: Invocation) -> InvocationResponse {
        match invocation {
            Invocation::GetSchemas => {
                let schemas = self.schemas().await;
                InvocationResponse {
                    diagnostics: schemas.diagnostics.clone(),
                    schemas: Some(schemas),
                    ..InvocationResponse::default()
                }
            }
            Invocation::Configure { config } => InvocationResponse {
                diagnostics: self.configure(config).await,
                ..InvocationResponse::default()
            },
            Invocation::ReadDataSource { type_name, config } => {
                let response = self.read_data_source(&type_name, config).await;
                InvocationResponse {
                    state: Some(response.state),
                    diagnostics: response.diagnostics,
                    ..InvocationResponse::default()
                }
            }
            Invocation::CreateResource { type_name, config } => {
                let response = self.create_resource(&type_name, config).await;
                InvocationResponse {
                    state: Some(response.new_state),
                    diagnostics: response.diagnostics,
                    ..InvocationResponse::default()
                }
            }
            Invocation::ReadResource { type_name, state } => {
                let response = self.read_resource(&type_name, state).await;
                InvocationResponse {
                    state: response.new_state,
                    diagnostics: response.diagnostics,
                    ..InvocationResponse::default()
                }
            }
            Invocation::UpdateResource {
                type_name,
                prior_state,
                config,
            } => {
                let response = self.update_resource(&type_name, prior_state, config).await;
                InvocationResponse {
                    state: Some(response.new_state),
                    diagnostics: response.diagnostics,
                    ..InvocationResponse::default()
                }
            }
            Invocation::DeleteResource { type_name, state } => InvocationResponse {
                diagnostics: self.delete_resource(&type_name, state).await.diagnostics,
                ..InvocationResponse::default()
            },
        }
    }
}

fn not_found(err: TfplugError) -> Diagnostic {
    Diagnostic::error("Unknown type", err.to_string())
}

/// One line of harness input
#[derive(Debug, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Invocation {
    GetSchemas,
    Configure {
        #[serde(default)]
        config: DynamicValue,
    },
    ReadDataSource {
        type_name: String,
        #[serde(default)]
        config: DynamicValue,
    },
    CreateResource {
        type_name: String,
        #[serde(default)]
        config: DynamicValue,
    },
    ReadResource {
        type_name: String,
        state: DynamicValue,
    },
    UpdateResource {
        type_name: String,
        prior_state: DynamicValue,
        #[serde(default)]
        config: DynamicValue,
    },
    DeleteResource {
        type_name: String,
        state: DynamicValue,
    },
}

/// One line of harness output
#[derive(Debug, Default, Serialize)]
pub struct InvocationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<DynamicValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<ProviderSchemas>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Reads invocations line by line until EOF, writing one response per line
pub async fn serve<P, R, W>(host: &mut ProviderHost<P>, reader: R, mut writer: W) -> Result<()>
where
    P: Provider,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Invocation>(&line) {
            Ok(invocation) => host.handle(invocation).await,
            Err(e) => {
                tracing::error!("Failed to decode invocation: {}", e);
                InvocationResponse {
                    diagnostics: vec![Diagnostic::error("Invalid invocation", e.to_string())],
                    ..InvocationResponse::default()
                }
            }
        };

        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Serves a provider over stdin/stdout
pub async fn serve_stdio<P: Provider>(provider: P) -> Result<()> {
    let mut host = ProviderHost::new(provider);
    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    serve(&mut host, reader, tokio::io::stdout()).await
}
