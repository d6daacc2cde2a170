use crate::application::ApplicationError;
use crate::domain::model::{ContactFilter, ReservationDetails};
use crate::domain::port::ReservationRepository;
use std::sync::Arc;
use tracing::debug;

/// 予約クエリサービス
/// 連絡先による予約検索を提供する
pub struct ReservationQueryService {
    reservation_repository: Arc<dyn ReservationRepository>,
}

impl ReservationQueryService {
    /// 新しい予約クエリサービスを作成
    pub fn new(reservation_repository: Arc<dyn ReservationRepository>) -> Self {
        Self {
            reservation_repository,
        }
    }

    /// メールアドレス・電話番号で予約を検索
    /// キャンセル済みも含め、作成日時の降順で返す
    ///
    /// # Returns
    /// * `Ok(Vec<ReservationDetails>)` - 該当する予約（なければ空）
    /// * `Err(ApplicationError)` - どちらも未指定・取得失敗
    pub async fn find_reservations(
        &self,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<Vec<ReservationDetails>, ApplicationError> {
        let filter = ContactFilter::new(email, phone)?;
        let reservations = self.reservation_repository.find_by_contact(&filter).await?;
        debug!(found = reservations.len(), "reservations looked up");
        Ok(reservations)
    }
}
