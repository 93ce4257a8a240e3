//! Ports - engine と外部世界の境界
//!
//! 各 trait は外部システム（recipient DB、delivery log、メッセージ送信、タイマー）を隠す。
//! テストではインメモリのアダプタで engine を動かせる。

pub mod clock;
pub mod delivery_channel;
pub mod delivery_log;
pub mod id_generator;
pub mod pacer;
pub mod recipient_source;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::delivery_channel::DeliveryChannel;
pub use self::delivery_log::DeliveryLog;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::pacer::{Pacer, Pause};
pub use self::recipient_source::{RecipientCursor, RecipientSource, RecipientStore};
