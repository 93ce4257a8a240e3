//! DeliveryLog port - 配信成功の追記専用テレメトリ

use async_trait::async_trait;

use crate::domain::{DeliveryRecord, StoreError};

/// 追記のみ。engine が読み返すことはない
#[async_trait]
pub trait DeliveryLog: Send + Sync {
    async fn append(&self, record: DeliveryRecord) -> Result<(), StoreError>;
}
