//! IIIF Inspector - Inspect IIIF Image API services.
//!
//! This binary runs the JSON API server or inspects a single service from
//! the command line.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iiif_inspector::{
    config::{Cli, Command, InspectConfig, ServeConfig},
    descriptor::Descriptor,
    fetch::{inspect, HttpInfoSource, Inspection},
    registry::InspectionRegistry,
    request::{request_url, validate},
    server::{create_router, RouterConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(config) => run_serve(config).await,
        Command::Inspect(config) => run_inspect(config).await,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("IIIF Inspector v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Cache: {} services", config.cache_size);
    info!("  Upstream timeout: {}s", config.timeout);
    match config.cors_origins {
        Some(ref origins) => info!("  CORS origins: {}", origins.join(", ")),
        None => info!("  CORS origins: any"),
    }

    let source = match HttpInfoSource::new(config.timeout()) {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let registry = InspectionRegistry::with_capacity(source, config.cache_size);
    let router = create_router(registry, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!(
        "    curl 'http://{}/inspect?url=https://iiif.io/api/image/3.0/example/reference/918ecd18c2592080851777620de9bcb5-gottingen'",
        addr
    );
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "iiif_inspector=debug,tower_http=debug"
    } else {
        "iiif_inspector=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new();

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

// =============================================================================
// Inspect Command
// =============================================================================

async fn run_inspect(config: InspectConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let source = match HttpInfoSource::new(config.timeout()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let inspection = match inspect(&source, &config.input).await {
        Ok(inspection) => inspection,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&inspection) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_inspection(&inspection);
    }

    if inspection.descriptor.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_inspection(inspection: &Inspection) {
    let http = &inspection.http;
    match http.http_status {
        Some(status) => println!(
            "GET {} → {} ({} ms)",
            http.request_url, status, http.http_duration_ms
        ),
        None => println!("GET {} → no response", http.request_url),
    }

    for err in &http.errors {
        println!();
        println!("✗ {}", err.message);
        for hint in &err.hints {
            println!("  - {}", hint);
        }
        if let Some(ref detail) = err.detail {
            println!("  {}", detail);
        }
    }

    let Some(descriptor) = &inspection.descriptor else {
        return;
    };

    println!();
    print_descriptor(descriptor);

    if let Some(params) = &inspection.params {
        println!();
        println!("Request:");
        println!("  {}", request_url(descriptor, params));
        for warning in validate(params, descriptor) {
            println!("  ! {}", warning);
        }
    }
}

fn print_descriptor(descriptor: &Descriptor) {
    println!("{}", descriptor.service_name());
    println!("  Id:         {}", descriptor.root_id());
    println!(
        "  Compliance: {} ({})",
        descriptor.compliance_name(),
        descriptor.compliance_spec_url()
    );

    for group in descriptor.grouped_terms() {
        let values: Vec<&str> = group.values.iter().map(|v| v.text.as_str()).collect();
        println!("  {:<11} {}", format!("{}:", group.label), values.join(", "));
    }

    println!("  Qualities:  {}", descriptor.supported_qualities().join(", "));
    println!("  Formats:    {}", descriptor.supported_formats().join(", "));

    println!("  Features:");
    for (name, supported) in descriptor.feature_flags() {
        println!("    {} {}", if supported { "✓" } else { "·" }, name);
    }

    if let Some(thumbnail) = descriptor.thumbnail() {
        println!("  Preview:    {}", thumbnail.url);
    }
}
