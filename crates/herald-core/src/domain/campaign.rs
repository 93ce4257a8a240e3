//! Campaign - キャンペーンの集計
//!
//! `Campaign` は配信ループが動いている間だけ存在する。ループが排他的に所有するので
//! カウンタはただの整数。ループが終わると `Summary` に畳まれて破棄される。

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CampaignId, Content};

#[derive(Debug, Clone)]
pub struct Campaign {
    id: CampaignId,
    content: Content,
    target_count: usize,
    success_count: usize,
    error_count: usize,
    started_at: DateTime<Utc>,
}

impl Campaign {
    pub fn new(id: CampaignId, content: Content, target_count: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            content,
            target_count,
            success_count: 0,
            error_count: 0,
            started_at,
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// 累積試行数（成功 + 失敗）。バッチの pacing はこれで決まる
    pub fn attempts(&self) -> usize {
        self.success_count + self.error_count
    }

    /// スナップショット分を全て試行し終えた
    pub fn is_exhausted(&self) -> bool {
        self.attempts() >= self.target_count
    }

    pub fn record_success(&mut self) {
        debug_assert!(!self.is_exhausted());
        self.success_count += 1;
    }

    pub fn record_failure(&mut self) {
        debug_assert!(!self.is_exhausted());
        self.error_count += 1;
    }

    pub fn summary(&self, aborted: Option<String>) -> Summary {
        Summary {
            campaign_id: self.id,
            success_count: self.success_count,
            error_count: self.error_count,
            target_count: self.target_count,
            aborted,
        }
    }
}

/// 1 キャンペーンの集計結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub campaign_id: CampaignId,
    pub success_count: usize,
    pub error_count: usize,
    pub target_count: usize,
    /// 全 recipient を辿る前に走査が壊れたときに理由が入る
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl Summary {
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }
}

/// 依頼者に返す通知テキストを組み立てる
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.aborted {
            None => writeln!(f, "Broadcast finished.")?,
            Some(reason) => writeln!(f, "Broadcast stopped early: {reason}")?,
        }
        writeln!(f, "Delivered: {}", self.success_count)?;
        writeln!(f, "Failed: {}", self.error_count)?;
        write!(f, "Out of: {}", self.target_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ulid::Ulid;

    fn campaign(target: usize) -> Campaign {
        Campaign::new(
            CampaignId::from_ulid(Ulid::new()),
            Content::text("hi"),
            target,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        )
    }

    #[test]
    fn counts_accumulate_until_exhausted() {
        let mut c = campaign(3);
        assert!(!c.is_exhausted());

        c.record_success();
        c.record_failure();
        assert_eq!(c.attempts(), 2);
        assert!(!c.is_exhausted());

        c.record_success();
        assert!(c.is_exhausted());

        let s = c.summary(None);
        assert_eq!((s.success_count, s.error_count, s.target_count), (2, 1, 3));
        assert!(s.is_complete());
    }

    #[test]
    fn empty_target_is_exhausted_immediately() {
        assert!(campaign(0).is_exhausted());
    }

    #[test]
    fn summary_renders_notification_text() {
        let mut c = campaign(2);
        c.record_success();
        c.record_failure();

        assert_eq!(
            c.summary(None).to_string(),
            "Broadcast finished.\nDelivered: 1\nFailed: 1\nOut of: 2"
        );
        assert!(
            c.summary(Some("store offline".into()))
                .to_string()
                .starts_with("Broadcast stopped early: store offline\n")
        );
    }
}
