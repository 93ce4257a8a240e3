//! CampaignGate - 「同時に 1 キャンペーンだけ」のプロセス内ロック
//!
//! キューイングはしない。保持中の 2 回目の取得は即座に失敗し、
//! 呼び出し側は "already broadcasting" を返す。
//! gate はグローバルではなく注入されるオブジェクトなので、排他性を単体でテストできる。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct CampaignGate {
    held: AtomicBool,
}

impl CampaignGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// gate が空いていて、呼び出し側が取得できたら `true`
    pub fn try_acquire(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// gate を解放する。いつ呼んでもよく、空いている gate の解放は何もしない
    pub fn release(&self) {
        self.held.store(false, Ordering::Release);
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// 取得して、drop 時（unwind を含む）に解放する guard を返す
    pub fn try_guard(self: &Arc<Self>) -> Option<CampaignGuard> {
        self.try_acquire().then(|| CampaignGuard {
            gate: Arc::clone(self),
        })
    }
}

/// gate を保持している証拠。キャンペーンタスクへ move できる
#[derive(Debug)]
pub struct CampaignGuard {
    gate: Arc<CampaignGate>,
}

impl Drop for CampaignGuard {
    fn drop(&mut self) {
        self.gate.release();
    }
}
