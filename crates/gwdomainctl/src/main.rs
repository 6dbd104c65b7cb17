// # gwdomainctl - API Gateway custom domain CLI
//
// ⚠️ ARCHITECTURAL CONSTRAINTS ⚠️
//
// - This is a THIN integration layer ONLY
// - DO NOT add generation selection, request building or retry logic here
// - All domain logic MUST be in gwdomain-core
// - Configuration is via environment variables ONLY
//
// The gwdomainctl binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Building the v1/v2 client pair
// 4. Running one lifecycle command and printing the summary
//
// ## Usage
//
// ```text
// gwdomainctl <create|info|delete|deploy|undeploy|list>
// ```
//
// ## Configuration
//
// ### Domain
// - `GWDOMAIN_DOMAIN_NAME`: Custom domain name (required)
// - `GWDOMAIN_ENDPOINT_TYPE`: EDGE or REGIONAL (default EDGE)
// - `GWDOMAIN_SECURITY_POLICY`: TLS_1_0 or TLS_1_2 (default TLS_1_2)
// - `GWDOMAIN_API_VERSION`: v1 or v2, pins the API generation
// - `GWDOMAIN_CERTIFICATE_ARN`: Certificate for the domain
// - `GWDOMAIN_TRUSTSTORE_URI` / `GWDOMAIN_TRUSTSTORE_VERSION`: Mutual TLS
// - `GWDOMAIN_API_TYPE`: REST, HTTP or WEBSOCKET (default REST)
// - `GWDOMAIN_API_ID`: API to map (required for deploy/undeploy/list)
// - `GWDOMAIN_BASE_PATH`: Base path (default `(none)`)
// - `GWDOMAIN_STAGE`: Stage to map
// - `GWDOMAIN_SERVICE_STAGE`: Stage of the deployed service
// - `GWDOMAIN_TAGS`: Comma-separated `key=value` tags for created domains
//
// ### Control plane
// - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`
// - `AWS_REGION` (falls back to `AWS_DEFAULT_REGION`, then us-east-1)
// - `GWDOMAIN_ENDPOINT`: Control plane endpoint override
// - `GWDOMAIN_MAX_RETRIES`: Retries on throttling responses
//
// ### Logging
// - `GWDOMAIN_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export GWDOMAIN_DOMAIN_NAME=api.example.com
// export GWDOMAIN_ENDPOINT_TYPE=REGIONAL
// export GWDOMAIN_CERTIFICATE_ARN=arn:aws:acm:us-east-1:123456789012:certificate/abc
// export GWDOMAIN_API_ID=a1b2c3d4
// export GWDOMAIN_STAGE=prod
//
// gwdomainctl create && gwdomainctl deploy
// ```

use anyhow::Result;
use gwdomain_core::config::{ClientConfig, Credentials, DEFAULT_REGION, DomainConfig, ThrottleConfig};
use gwdomain_core::model::{ApiType, DomainRecord, EndpointType, SecurityPolicy};
use gwdomain_core::operation::Generation;
use gwdomain_core::{
    ClientPair, Command, DispatchContext, Dispatcher, DomainManager, GatewayClientFactory, Outcome,
    summary_lines,
};
use std::collections::BTreeMap;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum CtlExitCode {
    /// Command completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// The command failed against the control plane
    RuntimeError = 2,
}

impl From<CtlExitCode> for ExitCode {
    fn from(code: CtlExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Run(Command),
    /// List every mapping on the domain
    List,
}

impl Action {
    fn parse(arg: &str) -> Result<Self> {
        Ok(match arg {
            "create" => Action::Run(Command::Create),
            "info" => Action::Run(Command::Info),
            "delete" => Action::Run(Command::Delete),
            "deploy" => Action::Run(Command::Deploy),
            "undeploy" => Action::Run(Command::Undeploy),
            "list" => Action::List,
            other => anyhow::bail!(
                "Unknown command '{}'. \
                Valid commands: create, info, delete, deploy, undeploy, list",
                other
            ),
        })
    }
}

/// Application configuration
struct Config {
    action: Action,
    domain: DomainConfig,
    service_stage: Option<String>,
    tags: BTreeMap<String, String>,
    client: ClientConfig,
    throttle: ThrottleConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from the command line and environment variables
    fn from_env() -> Result<Self> {
        let arg = env::args().nth(1).ok_or_else(|| {
            anyhow::anyhow!("Usage: gwdomainctl <create|info|delete|deploy|undeploy|list>")
        })?;
        let action = Action::parse(&arg)?;

        let mut domain = DomainConfig::new(env::var("GWDOMAIN_DOMAIN_NAME").map_err(|_| {
            anyhow::anyhow!(
                "GWDOMAIN_DOMAIN_NAME is required. \
                Set it via: export GWDOMAIN_DOMAIN_NAME=api.example.com"
            )
        })?);
        if let Some(value) = var("GWDOMAIN_ENDPOINT_TYPE") {
            domain.endpoint_type = parse_endpoint_type(&value)?;
        }
        if let Some(value) = var("GWDOMAIN_SECURITY_POLICY") {
            domain.security_policy = SecurityPolicy::parse(&value.to_uppercase()).ok_or_else(|| {
                anyhow::anyhow!(
                    "GWDOMAIN_SECURITY_POLICY '{}' is not valid. Valid values: TLS_1_0, TLS_1_2",
                    value
                )
            })?;
        }
        if let Some(value) = var("GWDOMAIN_API_VERSION") {
            domain.api_gateway_version = Some(parse_generation(&value)?);
        }
        if let Some(value) = var("GWDOMAIN_API_TYPE") {
            domain.api_type = parse_api_type(&value)?;
        }
        domain.certificate_arn = var("GWDOMAIN_CERTIFICATE_ARN");
        domain.tls_truststore_uri = var("GWDOMAIN_TRUSTSTORE_URI");
        domain.tls_truststore_version = var("GWDOMAIN_TRUSTSTORE_VERSION");
        domain.api_id = var("GWDOMAIN_API_ID");
        domain.base_path = var("GWDOMAIN_BASE_PATH");
        domain.stage = var("GWDOMAIN_STAGE");

        let mut client = ClientConfig::new(Credentials {
            access_key_id: env::var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            session_token: var("AWS_SESSION_TOKEN"),
        })
        .with_region(
            var("AWS_REGION")
                .or_else(|| var("AWS_DEFAULT_REGION"))
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        );
        client.endpoint = var("GWDOMAIN_ENDPOINT");

        let mut throttle = ThrottleConfig::default();
        if let Some(value) = var("GWDOMAIN_MAX_RETRIES") {
            throttle.max_retries = value.parse().map_err(|_| {
                anyhow::anyhow!("GWDOMAIN_MAX_RETRIES must be a number. Got: {}", value)
            })?;
        }

        Ok(Self {
            action,
            domain,
            service_stage: var("GWDOMAIN_SERVICE_STAGE"),
            tags: parse_tags(&env::var("GWDOMAIN_TAGS").unwrap_or_default())?,
            client,
            throttle,
            log_level: env::var("GWDOMAIN_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.domain.validate()?;
        self.client.validate()?;
        self.throttle.validate()?;

        let needs_api = matches!(
            self.action,
            Action::Run(Command::Deploy) | Action::Run(Command::Undeploy)
        );
        if needs_api && self.domain.api_id.is_none() {
            anyhow::bail!(
                "GWDOMAIN_API_ID is required for deploy and undeploy. \
                Set it via: export GWDOMAIN_API_ID=a1b2c3d4"
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "GWDOMAIN_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

/// A non-empty environment variable
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_endpoint_type(value: &str) -> Result<EndpointType> {
    match value.to_uppercase().as_str() {
        "EDGE" => Ok(EndpointType::Edge),
        "REGIONAL" => Ok(EndpointType::Regional),
        _ => anyhow::bail!(
            "GWDOMAIN_ENDPOINT_TYPE '{}' is not valid. Valid values: EDGE, REGIONAL",
            value
        ),
    }
}

fn parse_generation(value: &str) -> Result<Generation> {
    match value.to_lowercase().as_str() {
        "v1" => Ok(Generation::V1),
        "v2" => Ok(Generation::V2),
        _ => anyhow::bail!(
            "GWDOMAIN_API_VERSION '{}' is not valid. Valid values: v1, v2",
            value
        ),
    }
}

fn parse_api_type(value: &str) -> Result<ApiType> {
    match value.to_uppercase().as_str() {
        "REST" => Ok(ApiType::Rest),
        "HTTP" => Ok(ApiType::Http),
        "WEBSOCKET" => Ok(ApiType::Websocket),
        _ => anyhow::bail!(
            "GWDOMAIN_API_TYPE '{}' is not valid. Valid values: REST, HTTP, WEBSOCKET",
            value
        ),
    }
}

/// Parse `key=value,key2=value2`
fn parse_tags(value: &str) -> Result<BTreeMap<String, String>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, val)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), val.trim().to_string()))
            }
            _ => anyhow::bail!("GWDOMAIN_TAGS entry '{}' must look like key=value", pair),
        })
        .collect()
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CtlExitCode::ConfigError.into();
    }

    let record = match config.domain.to_record(config.service_stage.as_deref()) {
        Ok(record) => record,
        Err(e) => {
            error!("{}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    let dispatcher = match build_dispatcher(&config) {
        Ok(dispatcher) => dispatcher,
        Err(e) => {
            error!("Failed to build control plane clients: {}", e);
            return CtlExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CtlExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run(config.action, dispatcher, record).await {
            error!("{}", e);
            CtlExitCode::RuntimeError
        } else {
            CtlExitCode::Success
        }
    });

    result.into()
}

#[cfg(feature = "aws")]
fn factory() -> Result<Box<dyn GatewayClientFactory>> {
    Ok(Box::new(gwdomain_provider_aws::AwsClientFactory))
}

#[cfg(not(feature = "aws"))]
fn factory() -> Result<Box<dyn GatewayClientFactory>> {
    anyhow::bail!("gwdomainctl was built without a control plane client (enable the `aws` feature)")
}

fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let factory = factory()?;
    let clients = ClientPair::from_factory(factory.as_ref(), &config.client)?;
    let context = DispatchContext {
        tags: config.tags.clone(),
        ..DispatchContext::default()
    };
    Ok(Dispatcher::with_clients(clients, config.throttle.clone(), context))
}

/// Run one action for the configured domain
async fn run(action: Action, dispatcher: Dispatcher, mut record: DomainRecord) -> Result<()> {
    info!("Running {:?} for '{}'", action, record.given_domain_name());

    match action {
        Action::List => {
            let mappings = dispatcher.get_api_mappings(&record).await?;
            if mappings.is_empty() {
                println!("No API mappings on '{}'", record.given_domain_name());
            }
            for mapping in mappings {
                println!(
                    "{}\t{}\t{}\t{}",
                    mapping.base_path(),
                    mapping.api_id,
                    mapping.stage,
                    mapping.api_mapping_id.as_deref().unwrap_or("-")
                );
            }
        }
        Action::Run(command) => {
            let manager = DomainManager::new(dispatcher);
            let outcome = manager.run(command, &mut record).await?;
            match outcome {
                Outcome::Skipped { ref reason } => {
                    info!("Nothing to do for '{}': {}", record.given_domain_name(), reason)
                }
                ref other => info!("'{}': {:?}", record.given_domain_name(), other),
            }

            // Deleted domains have nothing left to report
            if command != Command::Delete {
                for line in summary_lines(std::slice::from_ref(&record)) {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}
