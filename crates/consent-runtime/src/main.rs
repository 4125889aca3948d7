//! # Consent Runtime CLI
//!
//! Drives the consent controller against the on-disk store and, when
//! configured, the remote consent API.
//!
//! ```text
//! consent-runtime status
//! consent-runtime accept-all
//! consent-runtime save --analytics
//! consent-runtime sync
//! consent-runtime --region DE watch
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use consent_runtime::container::parse_jurisdiction;
use consent_runtime::{ConsentRuntime, RuntimeConfig};
use consent_telemetry::{gather_metrics, init_telemetry, TelemetryConfig};
use cs_01_jurisdiction_policy::PrivacySignals;
use cs_04_consent_controller::{ConsentSnapshot, ConsentStateApi};
use shared_bus::EventFilter;
use shared_types::ConsentPreferences;
use tracing::{info, warn};

/// Consent runtime command line.
#[derive(Parser, Debug)]
#[command(name = "consent-runtime")]
#[command(about = "Cross-domain consent state, from the command line")]
#[command(version)]
struct Args {
    /// Remote consent API base URL (enables cross-domain sync)
    #[arg(long, env = "CONSENT_API_ENDPOINT")]
    endpoint: Option<String>,

    /// Directory holding the consent storage file
    #[arg(long, env = "CONSENT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Force a jurisdiction (GDPR, CCPA, DPDP, DEFAULT)
    #[arg(long)]
    jurisdiction: Option<String>,

    /// Act as if the Global Privacy Control signal is present
    #[arg(long)]
    gpc: bool,

    /// Region hint used for jurisdiction detection (e.g. DE, IN, US-CA)
    #[arg(long)]
    region: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current consent state
    Status,
    /// Grant every category
    AcceptAll,
    /// Keep only the necessary category
    RejectAll,
    /// Save an explicit selection; unspecified categories are refused
    Save {
        /// Grant the preferences category
        #[arg(long)]
        preferences: bool,
        /// Grant the analytics category
        #[arg(long)]
        analytics: bool,
        /// Grant the marketing category
        #[arg(long)]
        marketing: bool,
    },
    /// Withdraw consent everywhere
    Revoke,
    /// Re-open the banner with current choices pre-filled
    Review,
    /// Check whether one category is allowed (exit code 1 if not)
    Check {
        /// Category name: necessary, preferences, analytics or marketing
        category: String,
    },
    /// Run one sync pass: deliver undelivered changes, adopt newer decisions
    Sync,
    /// Follow consent changes until Ctrl+C
    Watch,
    /// Print Prometheus metrics after initialization
    Metrics,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let telemetry = TelemetryConfig::from_env().with_log_level(args.log_level.clone());
    let _telemetry = init_telemetry(&telemetry).context("failed to initialize telemetry")?;

    let config = load_config(&args)?;
    let runtime = ConsentRuntime::new(&config).context("failed to assemble consent runtime")?;
    let controller = runtime.controller();

    match args.command {
        Command::Status => {
            let snapshot = controller.initialize().await;
            print_snapshot(&snapshot)?;
            let policy = controller.policy();
            println!("{} / {}", policy.copy.title, policy.copy.description);
        }
        Command::AcceptAll => {
            controller.initialize().await;
            print_snapshot(&controller.accept_all().await)?;
        }
        Command::RejectAll => {
            controller.initialize().await;
            print_snapshot(&controller.reject_all().await)?;
        }
        Command::Save {
            preferences,
            analytics,
            marketing,
        } => {
            controller.initialize().await;
            let selection = ConsentPreferences::new(preferences, analytics, marketing);
            print_snapshot(&controller.save_selection(selection).await)?;
        }
        Command::Revoke => {
            controller.initialize().await;
            let outcome = controller.revoke().await;
            if let Some(error) = &outcome.error {
                warn!(%error, "Remote revoke failed; kept for the next sync pass");
            }
            print_snapshot(&controller.snapshot())?;
        }
        Command::Review => {
            controller.initialize().await;
            print_snapshot(&controller.request_review())?;
        }
        Command::Check { category } => {
            controller.initialize().await;
            let allowed = controller.has_consent_for_name(&category)?;
            println!("{category}: {}", if allowed { "allowed" } else { "denied" });
            if !allowed {
                std::process::exit(1);
            }
        }
        Command::Sync => {
            let Some(sync) = runtime.sync() else {
                anyhow::bail!("remote sync is disabled; set --endpoint or CONSENT_API_ENDPOINT");
            };
            let outcome = sync.sync_consent().await;
            println!("{outcome:?}");
            print_snapshot(&controller.initialize().await)?;
        }
        Command::Watch => watch(&runtime).await?,
        Command::Metrics => {
            controller.initialize().await;
            print!("{}", gather_metrics()?);
        }
    }

    Ok(())
}

/// Environment first, then command line overrides.
fn load_config(args: &Args) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_env().context("invalid CONSENT_* environment")?;

    if let Some(endpoint) = args.endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
        config.sync.endpoint = endpoint.trim().to_string();
        config.remote_sync_enabled = true;
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(code) = &args.jurisdiction {
        config.sync.jurisdiction_override = Some(parse_jurisdiction(code)?);
    }

    let mut signals = if args.gpc {
        PrivacySignals::with_gpc()
    } else {
        PrivacySignals::none()
    };
    if let Some(region) = &args.region {
        signals = signals.in_region(region);
    }
    config.signals = signals;

    Ok(config)
}

async fn watch(runtime: &ConsentRuntime) -> Result<()> {
    let mut events = runtime.bus().subscribe(EventFilter::all());
    runtime.start().await?;
    print_snapshot(&runtime.controller().snapshot())?;
    info!("Watching consent changes. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    println!(
                        "{} ({:?}): {}",
                        event.event_name(),
                        event.origin(),
                        serde_json::to_string(&event.change().preferences)?
                    );
                }
                None => break,
            },
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl+C")?;
                info!("Received shutdown signal");
                break;
            }
        }
    }

    runtime.shutdown().await;
    Ok(())
}

fn print_snapshot(snapshot: &ConsentSnapshot) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(snapshot)?);
    Ok(())
}
