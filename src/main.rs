// rfqflow CLI - procurement RFQ workflow engine and status watcher
//
// The binary wires the core against the bundled in-memory backend so the
// watcher and workflow can be exercised end to end; production deployments
// implement `RfqApi` over their own transport and embed the library.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use rfqflow::api::{InMemoryRfqApi, NotificationSink, RfqApi};
use rfqflow::config::RfqflowConfig;
use rfqflow::model::{QuoteLineInput, Rfq, RfqItem};
use rfqflow::reconcile::{NotificationDedupCache, NotificationEvent};
use rfqflow::watch::{DebouncedPoller, PollerSettings, RfqWatcher};
use rfqflow::workflow::{allowed_actions, WorkflowEngine};

#[derive(Parser)]
#[command(name = "rfqflow", about = "RFQ workflow engine and status watcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default rfqflow.toml next to the binary
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// One-shot fetch: print each RFQ's status and the actions it allows
    Status,
    /// Run the status watcher against the demo backend
    Watch {
        /// Poll interval in seconds
        #[arg(long)]
        interval: Option<u64>,
        /// Drive a scripted RFQ lifecycle in the background so the watcher
        /// has transitions to report
        #[arg(long)]
        simulate: bool,
    },
    /// Walk one RFQ through send -> quote -> approve -> purchase order
    Demo,
}

/// Forwards kept notifications to the log; stands in for the real bus.
struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn emit(&self, event: NotificationEvent) {
        info!(
            rfq = %event.entity_id,
            from = %event.previous_status,
            to = %event.new_status,
            audience = %event.audience,
            "notification dispatched"
        );
    }
}

fn demo_backend() -> Arc<InMemoryRfqApi> {
    let deadline = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap_or_default();
    let api = InMemoryRfqApi::new();
    api.seed(Rfq::draft(
        "rfq-1001",
        "RFQ-2025-001",
        "vendor-acme",
        deadline,
        vec![
            RfqItem {
                product_id: "P-100".to_string(),
                quantity: 10,
                unit: "pcs".to_string(),
            },
            RfqItem {
                product_id: "P-200".to_string(),
                quantity: 4,
                unit: "box".to_string(),
            },
        ],
    ));
    api.seed(Rfq::draft(
        "rfq-1002",
        "RFQ-2025-002",
        "vendor-globex",
        deadline,
        vec![RfqItem {
            product_id: "P-300".to_string(),
            quantity: 25,
            unit: "kg".to_string(),
        }],
    ));
    Arc::new(api)
}

fn demo_quote_lines() -> Vec<QuoteLineInput> {
    let delivery = NaiveDate::from_ymd_opt(2025, 3, 1);
    vec![
        QuoteLineInput {
            product_id: "P-100".to_string(),
            quantity: 10,
            unit_price: Decimal::new(1250, 2),
            expected_delivery_date: delivery,
        },
        QuoteLineInput {
            product_id: "P-200".to_string(),
            quantity: 4,
            unit_price: Decimal::new(899, 2),
            expected_delivery_date: delivery,
        },
    ]
}

async fn run_status(api: Arc<InMemoryRfqApi>) -> Result<()> {
    let collection = api.fetch_rfq_collection().await?;
    println!("{:<14} {:<16} {:<12} ACTIONS", "ID", "NUMBER", "STATUS");
    for rfq in collection {
        let actions: Vec<String> = allowed_actions(rfq.status)
            .into_iter()
            .map(|a| a.to_string())
            .collect();
        println!(
            "{:<14} {:<16} {:<12} {}",
            rfq.id.as_str(),
            rfq.rfq_number,
            rfq.status.to_string(),
            actions.join(", ")
        );
    }
    Ok(())
}

async fn run_watch(cfg: &RfqflowConfig, interval: Option<u64>, simulate: bool) -> Result<()> {
    let api = demo_backend();
    let settings = PollerSettings {
        interval: interval
            .map(std::time::Duration::from_secs)
            .unwrap_or_else(|| cfg.watcher.poll_interval()),
        debounce: cfg.watcher.debounce(),
        purge_interval: cfg.watcher.purge_interval(),
    };
    let watcher = RfqWatcher::new(
        api.clone(),
        Arc::new(LogSink),
        NotificationDedupCache::new(cfg.watcher.dedup_ttl()),
    );
    let handle = DebouncedPoller::new(watcher, settings).spawn();

    if simulate {
        let engine_api: Arc<dyn RfqApi> = api.clone();
        tokio::spawn(async move {
            let engine = WorkflowEngine::new(engine_api.clone());
            let step = std::time::Duration::from_secs(20);
            let Ok(collection) = engine_api.fetch_rfq_collection().await else {
                return;
            };
            let Some(rfq) = collection.into_iter().next() else {
                return;
            };
            tokio::time::sleep(step).await;
            let Ok(sent) = engine.send(&rfq).await else { return };
            tokio::time::sleep(step).await;
            let Ok(quoted) = engine.record_quote(&sent, &demo_quote_lines(), "").await else {
                return;
            };
            tokio::time::sleep(step).await;
            let Ok(approved) = engine.approve(&quoted, "looks good", "demo-manager").await
            else {
                return;
            };
            tokio::time::sleep(step).await;
            let _ = engine.create_purchase_order(&approved).await;
        });
    }

    println!("watching RFQ collection (ctrl-c to stop)");
    tokio::signal::ctrl_c().await?;
    handle.stop().await;
    rfqflow::watcher_metrics().log_stats();
    Ok(())
}

async fn run_demo(api: Arc<InMemoryRfqApi>) -> Result<()> {
    let engine = WorkflowEngine::new(api.clone() as Arc<dyn RfqApi>);
    let collection = api.fetch_rfq_collection().await?;
    let rfq = collection
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("demo backend seeded no RFQs"))?;

    println!("{}: {}", rfq.rfq_number, rfq.status);
    let sent = engine.send(&rfq).await?;
    println!("{}: {}", sent.rfq_number, sent.status);
    let quoted = engine.record_quote(&sent, &demo_quote_lines(), "net 30").await?;
    let vendor_price = quoted
        .vendor_quote
        .as_ref()
        .map(|q| q.vendor_price.to_string())
        .unwrap_or_default();
    println!("{}: {} (vendor price {})", quoted.rfq_number, quoted.status, vendor_price);
    let approved = engine.approve(&quoted, "looks good", "demo-manager").await?;
    println!("{}: {}", approved.rfq_number, approved.status);
    let po_id = engine.create_purchase_order(&approved).await?;
    println!("purchase order created: {po_id}");

    match engine.create_purchase_order(&approved).await {
        Err(err) => println!("second creation attempt rejected: {err}"),
        Ok(_) => println!("unexpected: duplicate purchase order allowed"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    rfqflow::init_telemetry()?;
    let cfg = RfqflowConfig::load()?;

    match cli.command {
        Commands::Init { force } => {
            let path = "rfqflow.toml";
            if std::path::Path::new(path).exists() && !force {
                anyhow::bail!("{path} already exists; pass --force to overwrite");
            }
            RfqflowConfig::default().save_to_file(path)?;
            println!("wrote {path}");
        }
        Commands::Status => run_status(demo_backend()).await?,
        Commands::Watch { interval, simulate } => run_watch(&cfg, interval, simulate).await?,
        Commands::Demo => run_demo(demo_backend()).await?,
    }

    rfqflow::shutdown_telemetry();
    Ok(())
}
