// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{
    ContactFilter, NewReservation, Reservation, ReservationDetails, ReservationId, Room,
    RoomId, RoomOccupancy, StayPeriod,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// データベース接続に失敗
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// 操作に失敗
    #[error("Operation failed: {0}")]
    OperationFailed(String),
    /// データの取得に失敗
    #[error("Fetch failed: {0}")]
    FetchFailed(String),
}

/// 客室リポジトリトレイト
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// すべての客室を取得する
    /// 1泊料金の昇順（同額はID順）で並べて返す
    async fn find_all(&self) -> Result<Vec<Room>, RepositoryError>;

    /// 客室ごとに、指定期間に重なる有効な予約数を取得する
    /// キャンセル済みの予約は数えない
    ///
    /// # Arguments
    /// * `period` - 照会する宿泊期間
    /// * `room_id` - 指定した場合はその客室のみ（存在しなければ空）
    ///
    /// # Returns
    /// * `Ok(Vec<RoomOccupancy>)` - 1泊料金の昇順
    /// * `Err(RepositoryError)` - 取得失敗
    async fn find_occupancy(
        &self,
        period: &StayPeriod,
        room_id: Option<RoomId>,
    ) -> Result<Vec<RoomOccupancy>, RepositoryError>;
}

/// 予約リポジトリトレイト
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// 書き込み用のトランザクションを開始する
    async fn begin(&self) -> Result<Box<dyn ReservationTransaction>, RepositoryError>;

    /// 連絡先で予約を検索する
    /// 作成日時の降順で並べて返す
    async fn find_by_contact(
        &self,
        filter: &ContactFilter,
    ) -> Result<Vec<ReservationDetails>, RepositoryError>;
}

/// 予約の書き込みトランザクション
///
/// `lock_*` で取得した行はコミットまたはロールバックまで他のトランザクションから
/// 更新されない。同じ客室への予約作成はこのロックで直列化される。
/// どちらも呼ばれずに破棄された場合はロールバックされる。
#[async_trait]
pub trait ReservationTransaction: Send {
    /// 客室を排他ロック付きで取得する
    async fn lock_room(&mut self, room_id: RoomId) -> Result<Option<Room>, RepositoryError>;

    /// 客室の指定期間に重なる有効な予約数を数える
    async fn count_overlapping(
        &mut self,
        room_id: RoomId,
        period: &StayPeriod,
    ) -> Result<u32, RepositoryError>;

    /// 予約を追加し、採番済みの予約を返す
    async fn insert(&mut self, reservation: NewReservation) -> Result<Reservation, RepositoryError>;

    /// 予約を排他ロック付きで取得する
    async fn lock_reservation(
        &mut self,
        reservation_id: ReservationId,
    ) -> Result<Option<Reservation>, RepositoryError>;

    /// 予約のステータスと更新日時を保存する
    async fn update_status(&mut self, reservation: &Reservation) -> Result<(), RepositoryError>;

    async fn commit(&mut self) -> Result<(), RepositoryError>;

    async fn rollback(&mut self) -> Result<(), RepositoryError>;
}

/// 時計トレイト
/// 「本日」はサーバーの時計で日付単位に判定する
pub trait Clock: Send + Sync {
    /// 本日の日付（時刻を含まない）
    fn today(&self) -> NaiveDate;

    /// 現在日時
    fn now(&self) -> DateTime<Utc>;
}
