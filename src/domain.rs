// ドメイン層
// 客室・予約のモデル、業務ルール、外部依存のポートを定義する

pub mod error;
pub mod model;
pub mod port;
pub mod service;
