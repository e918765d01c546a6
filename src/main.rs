//! Binary entry point for skillswap.
//!
//! This binary provides a CLI over the marketplace core: search the catalog,
//! price a booking, polish a listing and walk the storefront's screens.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use skillswap::catalog;
use skillswap::config::SkillswapConfig;
use skillswap::llm::build_provider;
use skillswap::navigation::{NavEvent, Navigator, ViewState};
use skillswap::observability::{self, InitOptions};
use skillswap::search::{SearchOutcome, SearchRequest, search_services};
use skillswap::services::enhance_description;
use skillswap::{FeeSplit, PaymentMethod};
use std::path::PathBuf;
use std::process::ExitCode;

/// `SkillSwap` - Regional services marketplace.
#[derive(Parser)]
#[command(name = "skillswap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "SKILLSWAP_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Search the catalog.
    Search {
        /// Free-text query. Empty lists everything.
        #[arg(default_value = "")]
        query: String,

        /// Ask the LLM for semantic matches, falling back to substring search.
        #[arg(short, long)]
        semantic: bool,

        /// Override the semantic deadline in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List every service in the catalog.
    Catalog {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the checkout breakdown for a service.
    Quote {
        /// Service id, e.g. s2.
        service_id: String,

        /// Payment method: mpesa, airtel, paypal or cash.
        #[arg(short, long, default_value = "mpesa")]
        method: String,
    },

    /// Rewrite rough notes into a listing description.
    Enhance {
        /// Listing title.
        #[arg(short, long)]
        title: String,

        /// Rough notes to polish.
        #[arg(short, long)]
        notes: String,
    },

    /// Replay navigation events from a screen.
    Navigate {
        /// Starting screen, e.g. landing or home.
        from: String,

        /// Events in order, e.g. get-started open:search select-service book.
        #[arg(required = true)]
        events: Vec<String>,
    },

    /// Show the signed-in user and their bookings.
    Profile,

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match SkillswapConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let _observability = match observability::init_from_settings(
        Some(&config.logging),
        InitOptions {
            verbose: cli.verbose,
            metrics_expose: false,
        },
    ) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to initialize observability: {e}");
            return ExitCode::FAILURE;
        },
    };

    match run_command(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &SkillswapConfig) -> anyhow::Result<()> {
    match command {
        Commands::Search {
            query,
            semantic,
            timeout_ms,
            json,
        } => cmd_search(config, query, semantic, timeout_ms, json),
        Commands::Catalog { json } => cmd_catalog(json),
        Commands::Quote { service_id, method } => cmd_quote(&service_id, &method),
        Commands::Enhance { title, notes } => cmd_enhance(config, &title, &notes),
        Commands::Navigate { from, events } => cmd_navigate(&from, &events),
        Commands::Profile => cmd_profile(),
        Commands::Config { show } => cmd_config(config, show),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "skillswap", &mut std::io::stdout());
            Ok(())
        },
    }
}

/// Search command.
fn cmd_search(
    config: &SkillswapConfig,
    query: String,
    semantic: bool,
    timeout_ms: Option<u64>,
    json: bool,
) -> anyhow::Result<()> {
    let use_semantic = config.search.use_semantic(semantic);
    let provider = if use_semantic {
        build_provider(&config.llm)
    } else {
        None
    };

    let mut search_config = config.search.clone();
    if let Some(timeout_ms) = timeout_ms {
        search_config.semantic_timeout_ms = timeout_ms;
    }

    let candidates = catalog::mock_services();
    let request = SearchRequest::new(query, candidates).with_semantic_match(use_semantic);
    let outcome = search_services(provider, &request, &search_config);

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome, &request);
    }
    Ok(())
}

fn print_outcome(outcome: &SearchOutcome, request: &SearchRequest) {
    let records = outcome.records(&request.candidates);
    if records.is_empty() {
        println!("No services found for \"{}\"", request.query);
    }
    for record in records {
        println!(
            "{:<4} {:<40} {:<18} {} {:>6}  ★ {:.1}",
            record.id,
            record.title,
            record.category.label(),
            record.currency,
            record.price,
            record.rating
        );
    }
    match outcome.fallback_reason {
        Some(reason) => println!("\n({} matches, substring fallback: {reason})", outcome.len()),
        None => println!("\n({} matches, {})", outcome.len(), outcome.source),
    }
}

/// Catalog command.
fn cmd_catalog(json: bool) -> anyhow::Result<()> {
    let services = catalog::services();
    if json {
        println!("{}", serde_json::to_string_pretty(services)?);
        return Ok(());
    }
    for service in services {
        println!("{} - {} ({})", service.id, service.title, service.category);
        println!("     {} · {}", service.provider_name, service.location);
        println!(
            "     {} {} · ★ {:.1} ({} reviews)",
            service.currency, service.price, service.rating, service.review_count
        );
    }
    Ok(())
}

/// Quote command.
fn cmd_quote(service_id: &str, method: &str) -> anyhow::Result<()> {
    let service = catalog::find_service(service_id)?;
    let Some(method) = PaymentMethod::parse(method) else {
        bail!("unknown payment method '{method}'");
    };
    let split = FeeSplit::for_price(service.price);

    println!("{} by {}", service.title, service.provider_name);
    println!("  Service price:   {} {:>7}", service.currency, split.total);
    println!("  Platform fee:    {} {:>7}", service.currency, split.platform_fee);
    println!("  Worker receives: {} {:>7}", service.currency, split.worker_earnings);
    println!("  Pay with:        {}", method.label());
    Ok(())
}

/// Enhance command.
fn cmd_enhance(config: &SkillswapConfig, title: &str, notes: &str) -> anyhow::Result<()> {
    let provider = if config.features.description_enhancement {
        build_provider(&config.llm)
    } else {
        tracing::info!("Description enhancement disabled, printing notes unchanged");
        None
    };
    println!("{}", enhance_description(provider.as_deref(), title, notes));
    Ok(())
}

/// Navigate command.
fn cmd_navigate(from: &str, events: &[String]) -> anyhow::Result<()> {
    let start = ViewState::parse(from).with_context(|| format!("unknown screen '{from}'"))?;
    let mut navigator = Navigator::starting_at(start);
    println!("{}", navigator.current().as_str());

    for raw in events {
        let event = NavEvent::parse(raw).with_context(|| format!("unknown event '{raw}'"))?;
        let next = navigator.apply(event)?;
        println!("  --{}--> {}", event.as_str(), next.as_str());
    }
    Ok(())
}

/// Profile command.
fn cmd_profile() -> anyhow::Result<()> {
    let user = catalog::current_user();
    println!("{} ({}) · ★ {:.1} · joined {}", user.name, user.location, user.rating, user.joined);
    println!();
    println!("Bookings:");
    for booking in catalog::bookings() {
        println!(
            "  {}  {:<28} {:<12} {}  KES {}",
            booking.id,
            booking.service_title,
            booking.provider_name,
            booking.date.format("%b %d, %Y"),
            booking.price
        );
        println!("      status: {}", booking.status.as_str());
    }
    Ok(())
}

/// Config command.
fn cmd_config(config: &SkillswapConfig, show: bool) -> anyhow::Result<()> {
    if !show {
        println!("Use --show to display configuration");
        return Ok(());
    }

    println!("Current Configuration");
    println!("=====================");
    println!();
    println!(
        "Config File: {}",
        SkillswapConfig::default_path()
            .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
    );
    println!();
    println!("Feature Flags:");
    println!(
        "  Description Enhancement: {}",
        config.features.description_enhancement
    );
    println!();
    println!("Search:");
    println!("  Semantic Enabled: {}", config.search.semantic_enabled);
    println!("  Semantic Timeout: {}ms", config.search.semantic_timeout_ms);
    println!("  Empty Match Policy: {:?}", config.search.empty_match_policy);
    println!();
    println!("LLM Configuration:");
    println!("  Provider: {}", config.llm.provider.as_str());
    println!(
        "  Model: {}",
        config.llm.model.as_deref().unwrap_or("(default)")
    );
    println!(
        "  Base URL: {}",
        config.llm.base_url.as_deref().unwrap_or("(default)")
    );
    println!(
        "  API Key: {}",
        if config.llm.api_key.is_some() {
            "(set)"
        } else {
            "(from environment)"
        }
    );
    Ok(())
}
