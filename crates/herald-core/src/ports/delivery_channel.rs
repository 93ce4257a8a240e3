//! DeliveryChannel port - 1 つのペイロードを 1 人の recipient に送る
//!
//! 裏のトランスポート（bot API、push gateway など）はこの crate の範囲外。
//! 失敗の分類は実装側の責任で、engine が見るのは `ErrorKind` だけ（生のステータスコードは見ない）。

use async_trait::async_trait;

use crate::domain::{Content, DeliveryError, DeliveryId, RecipientId};

#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn send(&self, recipient: &RecipientId, content: &Content) -> Result<DeliveryId, DeliveryError>;
}
