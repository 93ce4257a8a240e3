use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use herald_core::domain::{CampaignRequest, RecipientId, StartError};
use herald_core::impls::{InMemoryDeliveryLog, InMemoryRecipientStore, SimulatedChannel};
use herald_core::{Broadcaster, CampaignGate, DispatchConfig, DispatchEngine, logging};

/// Run one broadcast against an in-memory recipient set and a simulated channel.
#[derive(Debug, Parser)]
#[command(name = "herald", version)]
struct Args {
    /// Number of recipients to register before the campaign starts.
    #[arg(long, default_value_t = 20)]
    recipients: usize,

    /// Message text (caption when --media is given).
    #[arg(long, default_value = "Hello from herald")]
    text: String,

    /// Media reference (video or photo, classified by extension).
    #[arg(long)]
    media: Option<String>,

    #[arg(long)]
    button_label: Option<String>,

    #[arg(long)]
    button_url: Option<String>,

    /// Every n-th recipient has blocked the sender (0 = nobody).
    #[arg(long, default_value_t = 7)]
    blocked_every: usize,

    /// Share of sends answered with a rate-limit error.
    #[arg(long, default_value_t = 0.05)]
    transient_ratio: f64,

    /// JSON config file; overrides $HERALD_CONFIG.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DispatchConfig::from_path(path),
        None => DispatchConfig::load(),
    }
    .context("loading dispatch config")?;

    // (A) recipient を登録し、誰にブロックされているかを知っている channel を用意
    let ids: Vec<RecipientId> = (1..=args.recipients)
        .map(|i| RecipientId::new(format!("{:06}", 100_000 + i)))
        .collect();
    let blocked: Vec<RecipientId> = match args.blocked_every {
        0 => Vec::new(),
        n => ids.iter().skip(n - 1).step_by(n).cloned().collect(),
    };
    let store = Arc::new(InMemoryRecipientStore::seeded(ids));
    let log = Arc::new(InMemoryDeliveryLog::new());
    let channel = Arc::new(
        SimulatedChannel::new(config.classifier())
            .with_blocked(blocked)
            .with_transient_ratio(args.transient_ratio),
    );

    // (B) engine と gate を組み立てる
    let engine = DispatchEngine::new(store.clone(), channel, log.clone()).with_pacing(config.pacing_policy());
    let broadcaster = Broadcaster::new(Arc::new(CampaignGate::new()), Arc::new(engine));

    // (C) 開始。続けて 2 回目の開始が拒否されることを見せる
    let admin = RecipientId::new("admin");
    let request = CampaignRequest {
        text: args.text,
        media_ref: args.media,
        button_label: args.button_label,
        button_url: args.button_url,
    };
    let handle = broadcaster
        .start_campaign(request.clone(), admin.clone())
        .context("starting campaign")?;

    match broadcaster.start_campaign(request, admin) {
        Err(StartError::AlreadyRunning) => info!("second start rejected: already broadcasting"),
        Err(e) => warn!(error = %e, "second start rejected"),
        Ok(_) => warn!("second start was accepted while a campaign was running"),
    }

    // (D) 完了を待って結果を表示
    let summary = handle.wait().await?;
    println!("{summary}");
    println!(
        "recipients left: {}, delivery records: {}",
        store.ids().await.len(),
        log.records().await.len()
    );
    Ok(())
}
