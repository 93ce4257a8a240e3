//! Domain - ドメインモデル（ID、コンテンツ、recipient、キャンペーン集計、エラー）
//!
//! ここでは I/O を一切しない。

pub mod campaign;
pub mod content;
pub mod errors;
pub mod ids;
pub mod recipient;

pub use campaign::{Campaign, Summary};
pub use content::{ActionButton, Body, CampaignRequest, Content, MediaKind};
pub use errors::{ContentError, DeliveryError, DispatchError, ErrorKind, StartError, StoreError};
pub use ids::{CampaignId, DeliveryId, RecipientId};
pub use recipient::{DeliveryRecord, Recipient};
