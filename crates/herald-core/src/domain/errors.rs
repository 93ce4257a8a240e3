//! Errors - エラー型と分類
//!
//! 型の分け方は「失敗がどこまで伝わってよいか」に対応する:
//! - `DeliveryError`: 1 recipient の試行の中で閉じる
//! - `StoreError`: best-effort 経路（ログ追記、削除）では握りつぶし、
//!   走査を壊したときは `DispatchError` になる
//! - `DispatchError`: キャンペーンを途中で終わらせるが、外には漏れない
//! - `StartError`: トリガー側が受け取るもの

use thiserror::Error;

/// ErrorKind は配信失敗の運用分類
///
/// # 分類
/// - Permanent: 恒久的なエラー（ブロック、退会）。engine は store から削除する
/// - Transient: それ以外（レート制限を含む）。計上してスキップ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transient,
    Permanent,
}

/// `DeliveryChannel` が 1 回の send について報告する失敗
#[derive(Debug, Clone, Error)]
#[error("{kind:?} delivery failure: {detail}")]
pub struct DeliveryError {
    kind: ErrorKind,
    detail: String,
}

impl DeliveryError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn permanent(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Permanent, detail)
    }

    pub fn transient(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, detail)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn is_permanent(&self) -> bool {
        self.kind == ErrorKind::Permanent
    }
}

/// 永続コレクション（recipient store, delivery log）の障害
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// キャンペーンの残りを打ち切る構造的な障害
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("recipient source failed: {0}")]
    Source(#[from] StoreError),

    #[error("campaign task failed: {0}")]
    TaskFailed(String),
}

/// channel が配信できる形にコンテンツを変換できなかった
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("content has neither text nor media")]
    Empty,

    #[error("unsupported media reference '{0}': expected a video or photo file")]
    UnsupportedMedia(String),

    #[error("button label must not be empty")]
    EmptyButtonLabel,
}

/// キャンペーン開始が拒否された理由
#[derive(Debug, Clone, Error)]
pub enum StartError {
    #[error("already broadcasting")]
    AlreadyRunning,

    #[error("invalid content: {0}")]
    InvalidContent(#[from] ContentError),
}
