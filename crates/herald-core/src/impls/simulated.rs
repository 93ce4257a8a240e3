//! SimulatedChannel - ローカル実行用のトランスポート代替
//!
//! bot API と同じように応答する:
//! - ブロックされた recipient には 403
//! - 設定した割合の send には 429
//! - それ以外は新しい ID で配信成功

use std::collections::HashSet;

use async_trait::async_trait;
use rand::Rng;
use tracing::trace;
use ulid::Ulid;

use super::FailureClassifier;
use crate::domain::{Content, DeliveryError, DeliveryId, RecipientId};
use crate::ports::DeliveryChannel;

pub struct SimulatedChannel {
    classifier: FailureClassifier,
    blocked: HashSet<RecipientId>,
    transient_ratio: f64,
}

impl SimulatedChannel {
    pub fn new(classifier: FailureClassifier) -> Self {
        Self {
            classifier,
            blocked: HashSet::new(),
            transient_ratio: 0.0,
        }
    }

    pub fn with_blocked(mut self, blocked: impl IntoIterator<Item = RecipientId>) -> Self {
        self.blocked.extend(blocked);
        self
    }

    /// "too many requests" を返す割合。`0.0..=1.0` に丸める
    pub fn with_transient_ratio(mut self, ratio: f64) -> Self {
        self.transient_ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        self
    }
}

#[async_trait]
impl DeliveryChannel for SimulatedChannel {
    async fn send(&self, recipient: &RecipientId, content: &Content) -> Result<DeliveryId, DeliveryError> {
        if self.blocked.contains(recipient) {
            return Err(self
                .classifier
                .classify(403, "Forbidden: bot was blocked by the user"));
        }
        if rand::thread_rng().gen_bool(self.transient_ratio) {
            return Err(self
                .classifier
                .classify(429, "Too Many Requests: retry later"));
        }

        let id = DeliveryId::new(Ulid::new().to_string());
        trace!(
            recipient = %recipient,
            delivery = %id,
            text = content.visible_text().unwrap_or_default(),
            "simulated send"
        );
        Ok(id)
    }
}
