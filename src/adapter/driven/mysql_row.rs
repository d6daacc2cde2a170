// MySQLの行データからドメインオブジェクトを再構築する

use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{
    EmailAddress, FeatureList, GuestContact, Money, PhoneNumber, Reservation, ReservationId,
    ReservationStatus, Room, RoomId, StayPeriod,
};
use crate::domain::port::RepositoryError;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Row};

/// roomsテーブルの列（別名 rm）
pub(super) const ROOM_COLUMNS: &str = "rm.id, rm.room_name, rm.room_type, rm.price_per_night_amount, \
     rm.description, rm.image_url, rm.total_rooms, rm.max_guests, rm.features, rm.created_at";

/// reservationsテーブルの列（別名 res）
pub(super) const RESERVATION_COLUMNS: &str = "res.id, res.room_id, res.full_name, res.email, res.phone, \
     res.check_in_date, res.check_out_date, res.guests, res.special_requests, \
     res.total_price_amount, res.nights, res.status, res.created_at, res.updated_at";

/// 列を型付きで取得する
pub(super) fn column<'r, T>(row: &'r MySqlRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get(name)
        .map_err(|e| DatabaseError::DecodeError(format!("列 {} の取得に失敗しました: {}", name, e)))
        .map_err(RepositoryError::from)
}

pub(super) fn room_from_row(row: &MySqlRow) -> Result<Room, RepositoryError> {
    let features: Option<String> = column(row, "features")?;
    Ok(Room::reconstruct(
        RoomId::new(column(row, "id")?),
        column(row, "room_name")?,
        column(row, "room_type")?,
        Money::from_cents(column(row, "price_per_night_amount")?),
        column(row, "total_rooms")?,
        column(row, "max_guests")?,
        column(row, "description")?,
        column(row, "image_url")?,
        FeatureList::decode(features.as_deref()),
        column(row, "created_at")?,
    ))
}

pub(super) fn reservation_from_row(row: &MySqlRow) -> Result<Reservation, RepositoryError> {
    let status: String = column(row, "status")?;
    let status = ReservationStatus::from_string(&status).ok_or_else(|| {
        RepositoryError::from(DatabaseError::DecodeError(format!(
            "予約ステータスの解析に失敗しました: {}",
            status
        )))
    })?;

    let check_in: NaiveDate = column(row, "check_in_date")?;
    let check_out: NaiveDate = column(row, "check_out_date")?;
    let period = StayPeriod::new(check_in, check_out).map_err(|e| {
        RepositoryError::from(DatabaseError::DecodeError(format!(
            "宿泊期間の構築に失敗しました: {}",
            e
        )))
    })?;

    let guest = GuestContact::new(
        column(row, "full_name")?,
        EmailAddress::from_stored(column(row, "email")?),
        PhoneNumber::from_stored(column(row, "phone")?),
    );
    let created_at: DateTime<Utc> = column(row, "created_at")?;
    let updated_at: DateTime<Utc> = column(row, "updated_at")?;

    Ok(Reservation::reconstruct(
        ReservationId::new(column(row, "id")?),
        RoomId::new(column(row, "room_id")?),
        guest,
        period,
        column(row, "guests")?,
        column(row, "special_requests")?,
        Money::from_cents(column(row, "total_price_amount")?),
        column(row, "nights")?,
        status,
        created_at,
        updated_at,
    ))
}
