use crate::domain::error::{ConflictReason, DomainError, ValidationError};
use crate::domain::model::value_objects::{
    ensure_max_length, optional_text, require_text, MAX_FULL_NAME_LENGTH,
};
use crate::domain::model::{
    EmailAddress, GuestContact, Money, PhoneNumber, ReservationId, ReservationStatus, Room,
    RoomId, StayPeriod,
};
use chrono::{DateTime, NaiveDate, Utc};

/// 予約作成フォーム（未検証の入力）
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub room_id: Option<u64>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub guests: Option<u32>,
    pub special_requests: Option<String>,
}

/// 検証済みの予約リクエスト
/// 客室に依存しない検証（必須項目・形式・日付）を通過したもの
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    room_id: RoomId,
    guest: GuestContact,
    period: StayPeriod,
    guests: u32,
    special_requests: Option<String>,
}

impl BookingRequest {
    /// フォームを検証する
    ///
    /// 検証順序:
    /// 1. 必須項目（room_id, full_name, email, phone, check_in_date, check_out_date, guests の順）
    /// 2. 氏名の長さ
    /// 3. メールアドレスの長さと形式
    /// 4. 電話番号の長さと形式
    /// 5. 日付の形式と前後関係
    /// 6. チェックイン日が過去でないこと
    pub fn from_form(form: BookingForm, today: NaiveDate) -> Result<Self, ValidationError> {
        let room_id = form
            .room_id
            .filter(|id| *id > 0)
            .map(RoomId::new)
            .ok_or(ValidationError::MissingField("room_id"))?;
        let full_name = require_text("full_name", form.full_name)?;
        let email = require_text("email", form.email)?;
        let phone = require_text("phone", form.phone)?;
        let check_in = require_text("check_in_date", form.check_in_date)?;
        let check_out = require_text("check_out_date", form.check_out_date)?;
        let guests = form
            .guests
            .filter(|g| *g > 0)
            .ok_or(ValidationError::MissingField("guests"))?;

        ensure_max_length("full_name", &full_name, MAX_FULL_NAME_LENGTH)?;
        let email = EmailAddress::parse(&email)?;
        let phone = PhoneNumber::parse(&phone)?;

        let period = StayPeriod::parse(&check_in, &check_out)?;
        period.ensure_not_before(today)?;

        Ok(Self {
            room_id,
            guest: GuestContact::new(full_name, email, phone),
            period,
            guests,
            special_requests: optional_text(form.special_requests),
        })
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn period(&self) -> &StayPeriod {
        &self.period
    }

    pub fn guests(&self) -> u32 {
        self.guests
    }
}

/// 永続化前の新しい予約
/// 料金と宿泊数は予約時点の客室料金で確定する
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    room_id: RoomId,
    guest: GuestContact,
    period: StayPeriod,
    guests: u32,
    special_requests: Option<String>,
    nights: u32,
    total_price: Money,
    booked_at: DateTime<Utc>,
}

impl NewReservation {
    /// 客室に対する予約を組み立てる（定員チェックと料金計算）
    pub fn for_room(
        room: &Room,
        request: BookingRequest,
        booked_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        room.accommodate(request.guests)?;

        Ok(Self {
            room_id: room.id(),
            nights: request.period.nights(),
            total_price: room.quote(&request.period),
            guest: request.guest,
            period: request.period,
            guests: request.guests,
            special_requests: request.special_requests,
            booked_at,
        })
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn guest(&self) -> &GuestContact {
        &self.guest
    }

    pub fn period(&self) -> &StayPeriod {
        &self.period
    }

    pub fn guests(&self) -> u32 {
        self.guests
    }

    pub fn special_requests(&self) -> Option<&str> {
        self.special_requests.as_deref()
    }

    pub fn nights(&self) -> u32 {
        self.nights
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn booked_at(&self) -> DateTime<Utc> {
        self.booked_at
    }

    /// 採番されたIDで確定済みの予約にする
    pub fn into_reservation(self, id: ReservationId) -> Reservation {
        Reservation {
            id,
            room_id: self.room_id,
            guest: self.guest,
            period: self.period,
            guests: self.guests,
            special_requests: self.special_requests,
            total_price: self.total_price,
            nights: self.nights,
            status: ReservationStatus::Confirmed,
            created_at: self.booked_at,
            updated_at: self.booked_at,
        }
    }
}

/// 予約集約
/// 物理削除はせず、キャンセルはステータス変更で表現する
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    id: ReservationId,
    room_id: RoomId,
    guest: GuestContact,
    period: StayPeriod,
    guests: u32,
    special_requests: Option<String>,
    total_price: Money,
    nights: u32,
    status: ReservationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Reservation {
    /// データベースから取得したデータで予約を再構築
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: ReservationId,
        room_id: RoomId,
        guest: GuestContact,
        period: StayPeriod,
        guests: u32,
        special_requests: Option<String>,
        total_price: Money,
        nights: u32,
        status: ReservationStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            room_id,
            guest,
            period,
            guests,
            special_requests,
            total_price,
            nights,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn guest(&self) -> &GuestContact {
        &self.guest
    }

    pub fn period(&self) -> &StayPeriod {
        &self.period
    }

    pub fn guests(&self) -> u32 {
        self.guests
    }

    pub fn special_requests(&self) -> Option<&str> {
        self.special_requests.as_deref()
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn nights(&self) -> u32 {
        self.nights
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 在庫を占有している予約か（キャンセル済みは数えない）
    pub fn is_active(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }

    /// 指定期間に重なる有効な予約か
    pub fn occupies(&self, room_id: RoomId, period: &StayPeriod) -> bool {
        self.is_active() && self.room_id == room_id && self.period.overlaps(period)
    }

    /// 予約をキャンセル
    ///
    /// # Returns
    /// * `Err(DomainError::Conflict(AlreadyCancelled))` - すでにキャンセル済み
    /// * `Err(DomainError::Conflict(PastCheckIn))` - チェックイン日が過去
    pub fn cancel(&mut self, today: NaiveDate, now: DateTime<Utc>) -> Result<(), DomainError> {
        if self.status == ReservationStatus::Cancelled {
            return Err(ConflictReason::AlreadyCancelled.into());
        }
        if self.period.check_in() < today {
            return Err(ConflictReason::PastCheckIn.into());
        }
        self.status = ReservationStatus::Cancelled;
        self.updated_at = now;
        Ok(())
    }
}

/// 予約検索の結果（客室の表示項目を結合したもの）
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationDetails {
    pub reservation: Reservation,
    pub room_name: String,
    pub room_type: String,
    pub image_url: String,
}

/// 予約作成の結果（確定した予約と対象の客室）
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmedBooking {
    pub reservation: Reservation,
    pub room: Room,
}

/// 連絡先による予約検索条件
/// メール・電話番号の少なくとも一方が必要（両方指定時は AND 条件）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFilter {
    email: Option<String>,
    phone: Option<String>,
}

impl ContactFilter {
    pub fn new(email: Option<String>, phone: Option<String>) -> Result<Self, ValidationError> {
        let email = optional_text(email);
        let phone = optional_text(phone);
        if email.is_none() && phone.is_none() {
            return Err(ValidationError::MissingContact);
        }
        Ok(Self { email, phone })
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// 予約が検索条件に一致するか
    pub fn matches(&self, reservation: &Reservation) -> bool {
        let guest = reservation.guest();
        let email_ok = self
            .email
            .as_deref()
            .map_or(true, |email| guest.email().matches(email));
        let phone_ok = self
            .phone
            .as_deref()
            .map_or(true, |phone| guest.phone().as_str() == phone);
        email_ok && phone_ok
    }
}
