//! herald-core
//!
//! 一斉配信エンジン: 1 つのペイロードを、登録済みの全 recipient へ、
//! レート制限のあるチャネル越しに、同時に 1 キャンペーンだけ配る。
//!
//! # モジュール構成
//! - **domain**: ID、コンテンツ、recipient、キャンペーン集計、エラー
//! - **ports**: recipient store / delivery log / channel / pacing / 時刻の trait
//! - **gate**: `CampaignGate`（単一キャンペーンのロック）
//! - **engine**: `DispatchEngine`（pacing 付きの配信ループ）
//! - **app**: `Broadcaster`（トリガーの入口: gate + バックグラウンドタスク）
//! - **impls**: インメモリ store、模擬 channel、tokio pacer、分類器
//! - **config** / **logging**: 設定とログ

pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod gate;
pub mod impls;
pub mod logging;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{Broadcaster, CampaignHandle};
pub use config::{ConfigError, DispatchConfig};
pub use engine::{DispatchEngine, PacingPolicy};
pub use gate::{CampaignGate, CampaignGuard};
