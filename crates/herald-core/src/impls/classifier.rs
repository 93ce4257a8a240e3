//! FailureClassifier - トランスポートのステータスコードを ErrorKind に写す

use std::collections::BTreeSet;

use crate::domain::{DeliveryError, ErrorKind};

/// どのステータスコードが「この recipient にはもう届かない」を意味するか
///
/// 一覧にないものは全て一時的エラー（レート制限を含む）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureClassifier {
    permanent: BTreeSet<u16>,
}

impl FailureClassifier {
    pub fn new(permanent_codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            permanent: permanent_codes.into_iter().collect(),
        }
    }

    pub fn kind_of(&self, code: u16) -> ErrorKind {
        if self.permanent.contains(&code) {
            ErrorKind::Permanent
        } else {
            ErrorKind::Transient
        }
    }

    pub fn classify(&self, code: u16, detail: impl AsRef<str>) -> DeliveryError {
        DeliveryError::new(self.kind_of(code), format!("{code}: {}", detail.as_ref()))
    }
}

impl Default for FailureClassifier {
    /// Forbidden（ユーザーにブロックされた / 退会済み）
    fn default() -> Self {
        Self::new([403])
    }
}
