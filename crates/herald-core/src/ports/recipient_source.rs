//! RecipientSource port - engine から見た recipient コレクション
//!
//! # 分離レベル
//! `iterate()` は *現在の* 集合に対する遅延カーソルを返す。スナップショットではない:
//! カーソルが生きている間の追加・削除は見えることも見えないこともある。
//! `iterate()` を呼び直すと全体の先頭からやり直す。

use async_trait::async_trait;

use crate::domain::{Recipient, RecipientId, StoreError};

/// recipient を前方向にだけ辿る遅延カーソル
#[async_trait]
pub trait RecipientCursor: Send {
    /// 次の recipient。走査が終わったら `None`
    async fn next(&mut self) -> Result<Option<Recipient>, StoreError>;
}

#[async_trait]
pub trait RecipientSource: Send + Sync {
    async fn count(&self) -> Result<usize, StoreError>;

    async fn iterate(&self) -> Result<Box<dyn RecipientCursor>, StoreError>;

    /// recipient を削除する。存在しない ID の削除はエラーではない
    async fn remove(&self, id: &RecipientId) -> Result<(), StoreError>;
}

/// オンボーディング側の書き込みも含めた store の契約
#[async_trait]
pub trait RecipientStore: RecipientSource {
    /// recipient を追加、または既存を更新する。新規なら `true`
    async fn upsert(&self, id: RecipientId) -> Result<bool, StoreError>;
}
