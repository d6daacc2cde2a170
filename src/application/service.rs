use crate::application::ApplicationError;
use crate::domain::error::{DomainError, ValidationError};
use crate::domain::model::{
    BookingForm, BookingRequest, ConfirmedBooking, NewReservation, Reservation, ReservationId,
};
use crate::domain::port::{Clock, ReservationRepository, ReservationTransaction};
use crate::domain::service::AvailabilityService;
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

mod reservation_query_service;
mod room_query_service;

pub use reservation_query_service::ReservationQueryService;
pub use room_query_service::{AvailabilityQuery, AvailabilityReport, RoomQueryService};

/// 予約キャンセルの入力（未検証）
#[derive(Debug, Clone, Default)]
pub struct CancellationForm {
    pub reservation_id: Option<u64>,
    /// 指定された場合のみ本人確認に使う
    pub email: Option<String>,
}

/// 予約アプリケーションサービス
/// 予約の作成とキャンセルを1つのトランザクション内で行う
pub struct ReservationApplicationService {
    reservation_repository: Arc<dyn ReservationRepository>,
    clock: Arc<dyn Clock>,
}

impl ReservationApplicationService {
    /// 新しいアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `reservation_repository` - 予約リポジトリ
    /// * `clock` - 本日の判定に使う時計
    pub fn new(reservation_repository: Arc<dyn ReservationRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            reservation_repository,
            clock,
        }
    }

    /// 新しい予約を作成
    ///
    /// 入力検証のあと、客室の行ロックを取った上で
    /// 客室の存在確認 → 定員チェック → 空室チェック → 登録 を行う。
    /// 途中で失敗した場合はロールバックし、予約は一切書き込まれない。
    ///
    /// # Returns
    /// * `Ok(ConfirmedBooking)` - 登録された予約と客室
    /// * `Err(ApplicationError)` - 検証失敗・客室なし・空室なし・永続化の失敗
    pub async fn create_reservation(
        &self,
        form: BookingForm,
    ) -> Result<ConfirmedBooking, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        let span = tracing::info_span!("create_reservation", %correlation_id);

        async move {
            let request = BookingRequest::from_form(form, self.clock.today()).map_err(|e| {
                warn!(field = e.field(), "reservation rejected: {}", e);
                e
            })?;

            let mut tx = self.reservation_repository.begin().await?;
            let result = self.book(tx.as_mut(), request).await;
            let booking = finish(tx, result).await?;

            info!(
                reservation_id = %booking.reservation.id(),
                room_id = %booking.room.id(),
                nights = booking.reservation.nights(),
                total_price = %booking.reservation.total_price(),
                "reservation created"
            );
            Ok(booking)
        }
        .instrument(span)
        .await
    }

    /// トランザクション内での予約登録（手順6〜8と登録）
    async fn book(
        &self,
        tx: &mut dyn ReservationTransaction,
        request: BookingRequest,
    ) -> Result<ConfirmedBooking, ApplicationError> {
        let room = tx
            .lock_room(request.room_id())
            .await?
            .ok_or(DomainError::NotFound("room"))?;

        let new_reservation = NewReservation::for_room(&room, request, self.clock.now())?;

        let booked = tx
            .count_overlapping(room.id(), new_reservation.period())
            .await?;
        AvailabilityService::ensure_vacancy(&room, booked)?;

        let reservation = tx.insert(new_reservation).await?;
        Ok(ConfirmedBooking { reservation, room })
    }

    /// 予約をキャンセル
    ///
    /// メールアドレスが指定された場合は登録済みのものと一致する必要がある。
    /// 一致しない場合は予約の存在を明かさず NotFound とする。
    ///
    /// # Returns
    /// * `Ok(Reservation)` - キャンセル後の予約
    /// * `Err(ApplicationError)` - 予約なし・キャンセル済み・チェックイン日経過・永続化の失敗
    pub async fn cancel_reservation(
        &self,
        form: CancellationForm,
    ) -> Result<Reservation, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        let span = tracing::info_span!("cancel_reservation", %correlation_id);

        async move {
            let reservation_id = form
                .reservation_id
                .filter(|id| *id > 0)
                .map(ReservationId::new)
                .ok_or(ValidationError::MissingField("reservation_id"))?;
            let email = form
                .email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty());

            let mut tx = self.reservation_repository.begin().await?;
            let result = self
                .cancel_in(tx.as_mut(), reservation_id, email.as_deref())
                .await;
            let reservation = finish(tx, result).await?;

            info!(reservation_id = %reservation.id(), "reservation cancelled");
            Ok(reservation)
        }
        .instrument(span)
        .await
    }

    async fn cancel_in(
        &self,
        tx: &mut dyn ReservationTransaction,
        reservation_id: ReservationId,
        email: Option<&str>,
    ) -> Result<Reservation, ApplicationError> {
        let mut reservation = tx
            .lock_reservation(reservation_id)
            .await?
            .filter(|r| email.map_or(true, |email| r.guest().email().matches(email)))
            .ok_or(DomainError::NotFound("reservation"))?;

        reservation.cancel(self.clock.today(), self.clock.now())?;
        tx.update_status(&reservation).await?;
        Ok(reservation)
    }
}

/// 処理結果に応じてコミットまたはロールバックする
/// ロールバック自体の失敗はログに残し、元のエラーを返す
async fn finish<T>(
    mut tx: Box<dyn ReservationTransaction>,
    result: Result<T, ApplicationError>,
) -> Result<T, ApplicationError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                error!("rollback failed: {}", rollback_err);
            }
            match &err {
                ApplicationError::RepositoryError(e) => error!("transaction aborted: {}", e),
                ApplicationError::DomainError(e) => warn!("transaction rolled back: {}", e),
            }
            Err(err)
        }
    }
}
