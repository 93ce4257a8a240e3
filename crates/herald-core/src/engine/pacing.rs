//! PacingPolicy - 配信ループがいつ、どれだけ待つか

use std::time::Duration;

use crate::ports::Pause;

/// 固定間隔 + 定期的なクールダウン
///
/// バッチは累積試行数（成功 + 失敗）で数える。時間窓ではなく、キャンペーン中にリセットもしない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    /// 毎回の試行後の最低待ち時間
    pub interval: Duration,

    /// 1 バッチあたりの試行数。バッチが埋まるたびにクールダウン
    pub batch_size: usize,

    /// バッチ完了後に挟む待ち時間
    pub cool_down: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(50),
            batch_size: 150,
            cool_down: Duration::from_secs(3),
        }
    }
}

impl PacingPolicy {
    /// `attempts` 回目（1 始まり、累積）の試行後に待つべきもの
    ///
    /// interval は毎回。バッチ境界では加えて cool-down。
    pub fn pauses_after(&self, attempts: usize) -> impl Iterator<Item = Pause> {
        let batch_done = self.batch_size > 0 && attempts > 0 && attempts % self.batch_size == 0;
        std::iter::once(Pause::Interval(self.interval))
            .chain(batch_done.then_some(Pause::CoolDown(self.cool_down)))
    }
}
