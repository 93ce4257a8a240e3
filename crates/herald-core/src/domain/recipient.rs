use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DeliveryId, RecipientId};

/// recipient store が知っている登録済み recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub id: RecipientId,
    pub registered_at: DateTime<Utc>,
}

impl Recipient {
    pub fn new(id: RecipientId, registered_at: DateTime<Utc>) -> Self {
        Self { id, registered_at }
    }
}

/// delivery log に追記される 1 件の配信成功
///
/// テレメトリ専用。レコードが無くても送信されていないとは限らない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub recipient_id: RecipientId,
    pub delivered_unit_id: DeliveryId,
    pub sent_at: DateTime<Utc>,
}
