//! Impls - ports の実装
//!
//! 開発・テスト用のインメモリ store と模擬 channel、
//! および本番アダプタも再利用する部品（`TokioPacer`, `FailureClassifier`）。
//! DB や API を使うアダプタは別 crate に置く。

pub mod classifier;
pub mod memory_store;
pub mod pacer;
pub mod simulated;

pub use self::classifier::FailureClassifier;
pub use self::memory_store::{InMemoryDeliveryLog, InMemoryRecipientStore};
pub use self::pacer::TokioPacer;
pub use self::simulated::SimulatedChannel;
