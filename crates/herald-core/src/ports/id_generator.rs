//! IdGenerator port - ID 生成の抽象化（テストで時刻を固定するため）

use ulid::Ulid;

use crate::domain::CampaignId;
use crate::ports::Clock;

pub trait IdGenerator: Send + Sync {
    fn generate_campaign_id(&self) -> CampaignId;
}

/// timestamp 部分を `Clock` から取る ULID 生成器
///
/// `FixedClock` なら全 ID が同じ timestamp になるが、ランダム部で一意性は保たれる。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_campaign_id(&self) -> CampaignId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        CampaignId::from(Ulid::from_parts(timestamp_ms, rand::random()))
    }
}
