// アプリケーション層
// ユースケース（客室照会・空室確認・予約の作成/キャンセル/検索）を実装する

pub mod error;
pub mod service;

pub use error::ApplicationError;
