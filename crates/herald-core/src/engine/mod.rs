//! DispatchEngine - 1 つのペイロードを全 recipient に順番に配信する
//!
//! # フロー
//! 1. 開始時刻を決め、`target_count = recipients.count()` でスナップショット
//! 2. カーソルを順に辿る（最大 `target_count` 回の試行）
//!    - 開始時刻より後に登録された recipient はスナップショット外なので飛ばす（送信も計上もしない）
//! 3. recipient ごとに send して
//!    - 成功: 計上し、side channel に `DeliveryRecord` を追記
//!    - 恒久的失敗: 計上し、recipient を削除（best-effort）
//!    - 一時的失敗: 計上して次へ。キャンペーン内でのリトライはしない
//! 4. 試行のたびに pacing policy に従って待つ
//! 5. side channel を締めて `Summary` にまとめる
//!
//! # 並行性
//! send は決して並行しない。逐次の pacing がチャネルのレート制限を守る。
//! recipient 単位の失敗でループは止まらない。止めるのは recipient source の障害だけで、
//! その場合も終了処理は必ず走る。

mod pacing;
mod side_channel;

pub use pacing::PacingPolicy;

use std::sync::Arc;

use tracing::{Instrument, debug, error, info, info_span, warn};

use self::side_channel::SideChannel;
use crate::domain::{
    Campaign, CampaignId, Content, DeliveryRecord, DispatchError, ErrorKind, Recipient,
    RecipientId, Summary,
};
use crate::impls::TokioPacer;
use crate::ports::{
    Clock, DeliveryChannel, DeliveryLog, IdGenerator, Pacer, Pause, RecipientSource, SystemClock,
    UlidGenerator,
};

pub struct DispatchEngine {
    recipients: Arc<dyn RecipientSource>,
    channel: Arc<dyn DeliveryChannel>,
    log: Arc<dyn DeliveryLog>,
    pacer: Arc<dyn Pacer>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    pacing: PacingPolicy,
}

impl DispatchEngine {
    /// Engine with real-time pacing, the system clock and default policy.
    pub fn new(
        recipients: Arc<dyn RecipientSource>,
        channel: Arc<dyn DeliveryChannel>,
        log: Arc<dyn DeliveryLog>,
    ) -> Self {
        Self {
            recipients,
            channel,
            log,
            pacer: Arc::new(TokioPacer),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UlidGenerator::new(SystemClock)),
            pacing: PacingPolicy::default(),
        }
    }

    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// キャンペーンを 1 回、最後まで実行する
    ///
    /// 呼び出し側は呼び出し中ずっと `CampaignGate` を保持していること。
    /// 必ず `Summary` を返し、構造的な障害は `Summary::aborted` に現れる。
    pub async fn run_campaign(&self, content: Content) -> Summary {
        let id = self.ids.generate_campaign_id();
        self.run(id, content)
            .instrument(info_span!("campaign", campaign = %id))
            .await
    }

    async fn run(&self, id: CampaignId, content: Content) -> Summary {
        let started_at = self.clock.now();
        let target_count = match self.recipients.count().await {
            Ok(n) => n,
            Err(e) => {
                error!(error = %e, "could not snapshot recipients, campaign aborted");
                let campaign = Campaign::new(id, content, 0, started_at);
                return campaign.summary(Some(DispatchError::from(e).to_string()));
            }
        };

        let mut campaign = Campaign::new(id, content, target_count, started_at);
        info!(target_count, "campaign started");

        let mut side = SideChannel::new(Arc::clone(&self.log));
        let outcome = self.dispatch_all(&mut campaign, &mut side).await;
        side.drain().await;

        let aborted = outcome.err().map(|e| {
            error!(error = %e, attempts = campaign.attempts(), "campaign aborted");
            e.to_string()
        });
        let summary = campaign.summary(aborted);
        let elapsed = self.clock.now() - campaign.started_at();
        info!(
            success = summary.success_count,
            errors = summary.error_count,
            target = summary.target_count,
            elapsed_ms = elapsed.num_milliseconds(),
            "campaign finished"
        );
        summary
    }

    async fn dispatch_all(&self, campaign: &mut Campaign, side: &mut SideChannel) -> Result<(), DispatchError> {
        let mut cursor = self.recipients.iterate().await?;

        while !campaign.is_exhausted() {
            let Some(recipient) = cursor.next().await? else {
                break;
            };
            if recipient.registered_at > campaign.started_at() {
                debug!(recipient = %recipient.id, "registered after snapshot, skipping");
                continue;
            }
            self.dispatch_one(campaign, side, recipient).await;

            for pause in self.pacing.pauses_after(campaign.attempts()) {
                if let Pause::CoolDown(d) = pause {
                    let cool_down_ms = d.as_millis() as u64;
                    debug!(attempts = campaign.attempts(), cool_down_ms, "batch done, cooling down");
                }
                self.pacer.wait(pause).await;
            }
        }
        Ok(())
    }

    async fn dispatch_one(&self, campaign: &mut Campaign, side: &mut SideChannel, recipient: Recipient) {
        match self.channel.send(&recipient.id, campaign.content()).await {
            Ok(delivered) => {
                campaign.record_success();
                side.append(DeliveryRecord {
                    recipient_id: recipient.id,
                    delivered_unit_id: delivered,
                    sent_at: self.clock.now(),
                });
            }
            Err(err) => {
                campaign.record_failure();
                match err.kind() {
                    ErrorKind::Permanent => {
                        info!(recipient = %recipient.id, error = %err, "recipient unreachable, pruning");
                        self.prune(&recipient.id).await;
                    }
                    ErrorKind::Transient => {
                        debug!(recipient = %recipient.id, error = %err, "delivery failed, skipping");
                    }
                }
            }
        }
    }

    async fn prune(&self, id: &RecipientId) {
        if let Err(e) = self.recipients.remove(id).await {
            warn!(recipient = %id, error = %e, "failed to prune recipient");
        }
    }

    /// キャンペーンを開始した人に結果を返す（best-effort）
    pub async fn notify(&self, requester: &RecipientId, summary: &Summary) {
        let text = Content::text(summary.to_string());
        if let Err(e) = self.channel.send(requester, &text).await {
            warn!(requester = %requester, error = %e, "could not deliver campaign summary");
        }
    }
}
