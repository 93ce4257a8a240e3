//! InMemoryRecipientStore / InMemoryDeliveryLog - インメモリ実装
//!
//! # カーソルの意味論
//! カーソルが覚えているのは最後に返したキーだけ。`next()` のたびにロックを取り、
//! そのキーより後ろの最初の要素を探してすぐ手放す。
//! そのため走査中の追加・削除を許容する:
//! - 削除された recipient は単に見つからない
//! - 追加された recipient はソート位置次第で見えることも見えないこともある
//!   （スナップショット後の登録かどうかの判定は engine 側が `registered_at` で行う）

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{DeliveryRecord, Recipient, RecipientId, StoreError};
use crate::ports::{Clock, DeliveryLog, RecipientCursor, RecipientSource, RecipientStore, SystemClock};

type Recipients = Arc<Mutex<BTreeMap<RecipientId, Recipient>>>;

pub struct InMemoryRecipientStore {
    recipients: Recipients,
    clock: Arc<dyn Clock>,
}

impl InMemoryRecipientStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            recipients: Arc::new(Mutex::new(BTreeMap::new())),
            clock,
        }
    }

    /// `ids` を登録済みの store（登録時刻はシステム時計の「今」）
    pub fn seeded(ids: impl IntoIterator<Item = RecipientId>) -> Self {
        Self::new().with_recipients(ids)
    }

    /// `ids` を store 自身の時計の「今」で登録して返す
    pub fn with_recipients(self, ids: impl IntoIterator<Item = RecipientId>) -> Self {
        let now = self.clock.now();
        let map = ids
            .into_iter()
            .map(|id| (id.clone(), Recipient::new(id, now)))
            .collect();
        Self {
            recipients: Arc::new(Mutex::new(map)),
            ..self
        }
    }

    pub async fn contains(&self, id: &RecipientId) -> bool {
        self.recipients.lock().await.contains_key(id)
    }

    pub async fn ids(&self) -> Vec<RecipientId> {
        self.recipients.lock().await.keys().cloned().collect()
    }
}

impl Default for InMemoryRecipientStore {
    fn default() -> Self {
        Self::new()
    }
}

struct KeyCursor {
    recipients: Recipients,
    last: Option<RecipientId>,
}

#[async_trait]
impl RecipientCursor for KeyCursor {
    async fn next(&mut self) -> Result<Option<Recipient>, StoreError> {
        let recipients = self.recipients.lock().await;
        let lower = match &self.last {
            Some(last) => Bound::Excluded(last),
            None => Bound::Unbounded,
        };
        let next = recipients
            .range::<RecipientId, _>((lower, Bound::Unbounded))
            .next()
            .map(|(_, r)| r.clone());
        drop(recipients);

        if let Some(r) = &next {
            self.last = Some(r.id.clone());
        }
        Ok(next)
    }
}

#[async_trait]
impl RecipientSource for InMemoryRecipientStore {
    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.recipients.lock().await.len())
    }

    async fn iterate(&self) -> Result<Box<dyn RecipientCursor>, StoreError> {
        Ok(Box::new(KeyCursor {
            recipients: Arc::clone(&self.recipients),
            last: None,
        }))
    }

    async fn remove(&self, id: &RecipientId) -> Result<(), StoreError> {
        self.recipients.lock().await.remove(id);
        Ok(())
    }
}

#[async_trait]
impl RecipientStore for InMemoryRecipientStore {
    async fn upsert(&self, id: RecipientId) -> Result<bool, StoreError> {
        let now = self.clock.now();
        let mut recipients = self.recipients.lock().await;
        let inserted = recipients
            .insert(id.clone(), Recipient::new(id, now))
            .is_none();
        Ok(inserted)
    }
}

/// `Vec` に追記するだけの delivery log
#[derive(Default)]
pub struct InMemoryDeliveryLog {
    records: Mutex<Vec<DeliveryRecord>>,
}

impl InMemoryDeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<DeliveryRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl DeliveryLog for InMemoryDeliveryLog {
    async fn append(&self, record: DeliveryRecord) -> Result<(), StoreError> {
        self.records.lock().await.push(record);
        Ok(())
    }
}
