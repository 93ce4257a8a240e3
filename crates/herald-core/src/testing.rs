//! testing - engine / broadcaster テスト共通のテストダブル

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::Semaphore;

use crate::domain::{
    Content, DeliveryError, DeliveryId, DeliveryRecord, Recipient, RecipientId, StoreError,
};
use crate::ports::{
    Clock, DeliveryChannel, DeliveryLog, FixedClock, Pacer, Pause, RecipientCursor, RecipientSource,
};

/// engine が行ったこと（送信・待機）を発生順に記録
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Send(RecipientId),
    Pause(Pause),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub(crate) fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn sends(&self) -> Vec<RecipientId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Send(id) => Some(id),
                Event::Pause(_) => None,
            })
            .collect()
    }

    pub(crate) fn cool_downs(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Pause(Pause::CoolDown(_))))
            .count()
    }
}

pub(crate) fn fixed_clock() -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap())
}

/// テスト側で進められる時計。store と engine で共有し、登録時刻の前後関係を作る。
#[derive(Debug, Clone)]
pub(crate) struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self(Arc::new(Mutex::new(fixed_clock().now())))
    }

    pub(crate) fn advance(&self, by: chrono::Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

pub(crate) fn ids(n: usize) -> Vec<RecipientId> {
    (1..=n).map(|i| RecipientId::new(format!("{i:05}"))).collect()
}

/// スクリプト通りに応答する channel
///
/// `fail` で登録した recipient は失敗、それ以外は成功。
/// `gated` を付けると各 send が semaphore の permit を待つ。
#[derive(Default)]
pub(crate) struct ScriptedChannel {
    events: EventLog,
    failures: HashMap<RecipientId, DeliveryError>,
    delivered: AtomicUsize,
    texts: Mutex<Vec<(RecipientId, Content)>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedChannel {
    pub(crate) fn new(events: EventLog) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub(crate) fn fail(mut self, id: &str, error: DeliveryError) -> Self {
        self.failures.insert(RecipientId::new(id), error);
        self
    }

    pub(crate) fn gated(mut self, permits: Arc<Semaphore>) -> Self {
        self.gate = Some(permits);
        self
    }

    pub(crate) fn sent_to(&self, id: &RecipientId) -> Vec<Content> {
        self.texts
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == id)
            .map(|(_, c)| c.clone())
            .collect()
    }
}

#[async_trait]
impl DeliveryChannel for ScriptedChannel {
    async fn send(&self, recipient: &RecipientId, content: &Content) -> Result<DeliveryId, DeliveryError> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("semaphore closed").forget();
        }
        self.events.push(Event::Send(recipient.clone()));
        self.texts
            .lock()
            .unwrap()
            .push((recipient.clone(), content.clone()));

        if let Some(err) = self.failures.get(recipient) {
            return Err(err.clone());
        }
        let n = self.delivered.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(DeliveryId::new(format!("msg-{n}")))
    }
}

/// sleep せずに待機を記録するだけの Pacer
pub(crate) struct RecordingPacer {
    events: EventLog,
}

impl RecordingPacer {
    pub(crate) fn new(events: EventLog) -> Self {
        Self { events }
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn wait(&self, pause: Pause) {
        self.events.push(Event::Pause(pause));
    }
}

/// 書き込みを全て拒否する delivery log
pub(crate) struct FailingLog;

#[async_trait]
impl DeliveryLog for FailingLog {
    async fn append(&self, _record: DeliveryRecord) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("log collection offline".into()))
    }
}

/// append が永遠に完了しない delivery log
pub(crate) struct HangingLog;

#[async_trait]
impl DeliveryLog for HangingLog {
    async fn append(&self, _record: DeliveryRecord) -> Result<(), StoreError> {
        std::future::pending().await
    }
}

/// `healthy` を返し切った後に壊れる source
pub(crate) struct BrokenSource {
    pub(crate) count_fails: bool,
    pub(crate) healthy: Vec<RecipientId>,
    pub(crate) claimed: usize,
}

struct BrokenCursor {
    remaining: std::vec::IntoIter<RecipientId>,
}

#[async_trait]
impl RecipientCursor for BrokenCursor {
    async fn next(&mut self) -> Result<Option<Recipient>, StoreError> {
        match self.remaining.next() {
            Some(id) => Ok(Some(Recipient::new(id, fixed_clock().now()))),
            None => Err(StoreError::Unavailable("cursor lost".into())),
        }
    }
}

#[async_trait]
impl RecipientSource for BrokenSource {
    async fn count(&self) -> Result<usize, StoreError> {
        if self.count_fails {
            return Err(StoreError::Unavailable("count timed out".into()));
        }
        Ok(self.claimed)
    }

    async fn iterate(&self) -> Result<Box<dyn RecipientCursor>, StoreError> {
        Ok(Box::new(BrokenCursor {
            remaining: self.healthy.clone().into_iter(),
        }))
    }

    async fn remove(&self, _id: &RecipientId) -> Result<(), StoreError> {
        Ok(())
    }
}

/// source への呼び出し回数を数えるラッパー
pub(crate) struct CountingSource<S> {
    inner: S,
    touches: AtomicUsize,
}

impl<S> CountingSource<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self {
            inner,
            touches: AtomicUsize::new(0),
        }
    }

    pub(crate) fn touches(&self) -> usize {
        self.touches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: RecipientSource> RecipientSource for CountingSource<S> {
    async fn count(&self) -> Result<usize, StoreError> {
        self.touches.fetch_add(1, Ordering::SeqCst);
        self.inner.count().await
    }

    async fn iterate(&self) -> Result<Box<dyn RecipientCursor>, StoreError> {
        self.touches.fetch_add(1, Ordering::SeqCst);
        self.inner.iterate().await
    }

    async fn remove(&self, id: &RecipientId) -> Result<(), StoreError> {
        self.touches.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(id).await
    }
}
