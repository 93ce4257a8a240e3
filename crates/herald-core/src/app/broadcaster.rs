//! Broadcaster - コマンドハンドラがキャンペーンを開始するための入口
//!
//! # フロー
//! 1. リクエストを検証して `Content` にする
//! 2. gate を取る。保持中なら即座に `StartError::AlreadyRunning` で拒否（store には触れない）
//! 3. キャンペーンタスクを spawn: engine 実行 → gate 解放 → 依頼者へ通知
//!
//! gate は `CampaignGuard` としてタスクに渡るので、panic を含むどの終了経路でも解放される。

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::domain::{CampaignRequest, Content, DispatchError, RecipientId, StartError, Summary};
use crate::engine::DispatchEngine;
use crate::gate::CampaignGate;

pub struct Broadcaster {
    gate: Arc<CampaignGate>,
    engine: Arc<DispatchEngine>,
}

impl Broadcaster {
    pub fn new(gate: Arc<CampaignGate>, engine: Arc<DispatchEngine>) -> Self {
        Self { gate, engine }
    }

    /// Whether a campaign is currently in flight.
    pub fn is_running(&self) -> bool {
        self.gate.is_held()
    }

    /// Start a campaign in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_campaign(
        &self,
        request: CampaignRequest,
        requester: RecipientId,
    ) -> Result<CampaignHandle, StartError> {
        let content = Content::try_from(request)?;
        let guard = self.gate.try_guard().ok_or_else(|| {
            info!(requester = %requester, "campaign rejected: already broadcasting");
            StartError::AlreadyRunning
        })?;

        info!(requester = %requester, "campaign accepted");
        let engine = Arc::clone(&self.engine);
        let join = tokio::spawn(async move {
            let summary = engine.run_campaign(content).await;
            drop(guard);
            engine.notify(&requester, &summary).await;
            summary
        });

        Ok(CampaignHandle { join })
    }
}

/// Completion handle of a running campaign.
///
/// Dropping it detaches the campaign; it keeps running.
#[derive(Debug)]
pub struct CampaignHandle {
    join: JoinHandle<Summary>,
}

impl CampaignHandle {
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the campaign to end and return its summary.
    pub async fn wait(self) -> Result<Summary, DispatchError> {
        self.join.await.map_err(|e| {
            warn!(error = %e, "campaign task ended abnormally");
            DispatchError::TaskFailed(e.to_string())
        })
    }
}
