//! SideChannel - delivery log への best-effort 書き込み
//!
//! append は 1 件ずつ独立したタスクとして走る。結果はログに出るだけで、
//! キャンペーンを失敗させることも `Summary` を変えることもない。
//!
//! # 終了処理
//! `drain` は `FLUSH_GRACE` だけ残りの append を待ち、それでも終わらない
//! タスクは detach して手放す。ログ書き込みがキャンペーン完了（と gate 解放）を
//! 止めることはない。

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinSet};
use tracing::{Instrument, debug, warn};

use crate::domain::DeliveryRecord;
use crate::ports::DeliveryLog;

/// 終了時に残りの append を待つ上限
pub(crate) const FLUSH_GRACE: Duration = Duration::from_secs(2);

pub(crate) struct SideChannel {
    log: Arc<dyn DeliveryLog>,
    tasks: JoinSet<()>,
}

impl SideChannel {
    pub(crate) fn new(log: Arc<dyn DeliveryLog>) -> Self {
        Self {
            log,
            tasks: JoinSet::new(),
        }
    }

    /// Fire-and-forget append.
    ///
    /// 完了済みのタスクはここで回収するので、`JoinSet` に残るのは実行中のものだけ。
    pub(crate) fn append(&mut self, record: DeliveryRecord) {
        while let Some(joined) = self.tasks.try_join_next() {
            report(joined);
        }

        let log = Arc::clone(&self.log);
        self.tasks.spawn(
            async move {
                let recipient = record.recipient_id.clone();
                if let Err(e) = log.append(record).await {
                    warn!(recipient = %recipient, error = %e, "delivery log append failed");
                }
            }
            .in_current_span(),
        );
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// 残りの append を最大 `FLUSH_GRACE` 待つ。結果は捨てる。
    pub(crate) async fn drain(mut self) {
        let tasks = &mut self.tasks;
        let flushed = tokio::time::timeout(FLUSH_GRACE, async {
            while let Some(joined) = tasks.join_next().await {
                report(joined);
            }
        })
        .await;

        if flushed.is_err() {
            warn!(pending = self.in_flight(), "delivery log appends still pending, detaching");
            self.tasks.detach_all();
        } else {
            debug!("delivery log flushed");
        }
    }
}

fn report(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        warn!(error = %e, "delivery log task did not complete");
    }
}
