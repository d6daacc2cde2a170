use crate::domain::error::{ConflictReason, DomainError, ValidationError};
use crate::domain::port::RepositoryError;

/// アプリケーション層のエラー型
/// ドメインエラー（利用者に返すもの）とリポジトリエラー（内部障害）をラップする
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// ドメインエラー（入力不備・未検出・業務ルール違反）
    #[error(transparent)]
    DomainError(#[from] DomainError),
    /// リポジトリエラー（永続化の失敗）
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

// From実装でエラー変換を簡潔に
impl From<ValidationError> for ApplicationError {
    fn from(err: ValidationError) -> Self {
        ApplicationError::DomainError(DomainError::Validation(err))
    }
}

impl From<ConflictReason> for ApplicationError {
    fn from(err: ConflictReason) -> Self {
        ApplicationError::DomainError(DomainError::Conflict(err))
    }
}
