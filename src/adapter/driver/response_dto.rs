use crate::domain::model::{ConfirmedBooking, Reservation, ReservationDetails, Room};
use crate::domain::service::RoomAvailability;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// すべてのレスポンスに共通のエンベロープ
/// `{success, message, data, count?}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T> ApiResponse<T> {
    /// 成功レスポンス（単一オブジェクト）
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            count: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// 成功レスポンス（件数付きのリスト）
    pub fn list(message: impl Into<String>, data: Vec<T>) -> Self {
        let count = data.len();
        Self {
            success: true,
            message: message.into(),
            data,
            count: Some(count),
        }
    }
}

/// 空室照会のレスポンス（照会した日付を併せて返す）
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<AvailableRoomResponse>,
    pub count: usize,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

/// 客室用のレスポンスDTO
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: u64,
    pub room_name: String,
    pub room_type: String,
    pub price_per_night: f64,
    pub description: String,
    pub image_url: String,
    pub total_rooms: u32,
    pub max_guests: u32,
    pub features: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// 空室のある客室用のレスポンスDTO
#[derive(Debug, Serialize)]
pub struct AvailableRoomResponse {
    pub id: u64,
    pub room_name: String,
    pub room_type: String,
    pub price_per_night: f64,
    pub description: String,
    pub image_url: String,
    pub total_rooms: u32,
    pub available_rooms: u32,
    pub max_guests: u32,
    pub features: Vec<String>,
}

/// 作成した予約用のレスポンスDTO
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub reservation_id: u64,
    pub room_id: u64,
    pub room_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: u32,
    pub nights: u32,
    pub price_per_night: f64,
    pub total_price: f64,
    pub status: String,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// キャンセル結果用のレスポンスDTO
#[derive(Debug, Serialize)]
pub struct CancellationResponse {
    pub reservation_id: u64,
    pub guest_name: String,
    pub email: String,
    pub status: String,
}

/// 予約検索結果用のレスポンスDTO
#[derive(Debug, Serialize)]
pub struct ReservationDetailsResponse {
    pub id: u64,
    pub room_id: u64,
    pub room_name: String,
    pub room_type: String,
    pub image_url: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guests: u32,
    pub special_requests: Option<String>,
    pub total_price: f64,
    pub nights: u32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl RoomResponse {
    /// ドメインオブジェクトからRoomResponseを作成
    pub fn from_room(room: &Room) -> Self {
        Self {
            id: room.id().value(),
            room_name: room.name().to_string(),
            room_type: room.room_type().to_string(),
            price_per_night: room.price_per_night().as_decimal(),
            description: room.description().to_string(),
            image_url: room.image_url().to_string(),
            total_rooms: room.total_rooms(),
            max_guests: room.max_guests(),
            features: room.features().as_slice().to_vec(),
            created_at: room.created_at(),
        }
    }
}

impl AvailableRoomResponse {
    pub fn from_availability(availability: &RoomAvailability) -> Self {
        let room = &availability.room;
        Self {
            id: room.id().value(),
            room_name: room.name().to_string(),
            room_type: room.room_type().to_string(),
            price_per_night: room.price_per_night().as_decimal(),
            description: room.description().to_string(),
            image_url: room.image_url().to_string(),
            total_rooms: room.total_rooms(),
            available_rooms: availability.available_rooms,
            max_guests: room.max_guests(),
            features: room.features().as_slice().to_vec(),
        }
    }
}

impl ReservationResponse {
    pub fn from_booking(booking: &ConfirmedBooking) -> Self {
        let reservation = &booking.reservation;
        let guest = reservation.guest();
        Self {
            reservation_id: reservation.id().value(),
            room_id: reservation.room_id().value(),
            room_name: booking.room.name().to_string(),
            full_name: guest.full_name().to_string(),
            email: guest.email().as_str().to_string(),
            phone: guest.phone().as_str().to_string(),
            check_in_date: reservation.period().check_in(),
            check_out_date: reservation.period().check_out(),
            guests: reservation.guests(),
            nights: reservation.nights(),
            price_per_night: booking.room.price_per_night().as_decimal(),
            total_price: reservation.total_price().as_decimal(),
            status: reservation.status().to_string(),
            special_requests: reservation.special_requests().map(str::to_string),
            created_at: reservation.created_at(),
        }
    }
}

impl CancellationResponse {
    pub fn from_reservation(reservation: &Reservation) -> Self {
        Self {
            reservation_id: reservation.id().value(),
            guest_name: reservation.guest().full_name().to_string(),
            email: reservation.guest().email().as_str().to_string(),
            status: reservation.status().to_string(),
        }
    }
}

impl ReservationDetailsResponse {
    pub fn from_details(details: &ReservationDetails) -> Self {
        let reservation = &details.reservation;
        let guest = reservation.guest();
        Self {
            id: reservation.id().value(),
            room_id: reservation.room_id().value(),
            room_name: details.room_name.clone(),
            room_type: details.room_type.clone(),
            image_url: details.image_url.clone(),
            full_name: guest.full_name().to_string(),
            email: guest.email().as_str().to_string(),
            phone: guest.phone().as_str().to_string(),
            check_in_date: reservation.period().check_in(),
            check_out_date: reservation.period().check_out(),
            guests: reservation.guests(),
            special_requests: reservation.special_requests().map(str::to_string),
            total_price: reservation.total_price().as_decimal(),
            nights: reservation.nights(),
            status: reservation.status().to_string(),
            created_at: reservation.created_at(),
        }
    }
}
