//! Pacer port - 配信ループが試行の合間に待つ場所
//!
//! 本番は sleep する（`TokioPacer`）。テストでは要求された待ちを記録するだけにして、
//! 実時間を使わずに pacing を検証する。

use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// 毎回の試行後の最低待ち時間
    Interval(Duration),
    /// バッチ完了後の長めの待ち
    CoolDown(Duration),
}

impl Pause {
    pub fn duration(self) -> Duration {
        match self {
            Pause::Interval(d) | Pause::CoolDown(d) => d,
        }
    }
}

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn wait(&self, pause: Pause);
}
