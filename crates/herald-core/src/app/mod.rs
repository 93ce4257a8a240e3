//! App - gate と engine を束ねてトリガーに公開するアプリケーション層

pub mod broadcaster;

pub use self::broadcaster::{Broadcaster, CampaignHandle};
