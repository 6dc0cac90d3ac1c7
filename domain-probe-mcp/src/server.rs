//! MCP tool surface: a single `check_domains` tool over stdio.

use domain_probe_lib::{CheckDomainsResponse, DomainChecker, DomainProbeError};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Arguments of the `check_domains` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
#[schemars(crate = "rmcp::schemars")]
pub struct CheckDomainsRequest {
    /// List of domains to check
    pub domains: Vec<String>,
}

#[derive(Clone)]
pub struct DomainProbeServer {
    checker: Arc<DomainChecker>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl DomainProbeServer {
    pub fn new(checker: DomainChecker) -> Self {
        Self {
            checker: Arc::new(checker),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Check if multiple domain names are registered.\n\nInput: A list of domain names to check (e.g. [\"example.com\", \"test.com\"])\nOutput: JSON object containing registration status of each domain:\n{\n  \"results\": {\n    \"example.com\": {\n      \"registered\": true\n    },\n    \"test.com\": {\n      \"registered\": false\n    }\n  }\n}"
    )]
    async fn check_domains(
        &self,
        Parameters(request): Parameters<CheckDomainsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let json = check_domains_json(&self.checker, &request.domains)
            .await
            .map_err(|e| match e {
                DomainProbeError::InvalidRequest { message } => McpError::invalid_params(message, None),
                other => McpError::internal_error(other.to_string(), None),
            })?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for DomainProbeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Checks whether domain names are registered, using WHOIS with DNS fallback."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}

/// Validate, check and project a batch into the tool's JSON text.
#[instrument(skip(checker, domains), fields(count = domains.len()))]
pub async fn check_domains_json(
    checker: &DomainChecker,
    domains: &[String],
) -> Result<String, DomainProbeError> {
    let statuses = checker.check_batch(domains).await?;
    let response = CheckDomainsResponse::from_results(domains, &statuses);
    info!(registered = response.results.values().filter(|s| s.registered).count(), "Batch checked");
    Ok(serde_json::to_string(&response)?)
}
