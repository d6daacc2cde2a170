use crate::application::service::{AvailabilityQuery, CancellationForm};
use crate::domain::model::BookingForm;
use serde::{Deserialize, Serialize};

/// 空室照会用のリクエストDTO
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub room_id: Option<u64>,
}

/// 予約作成用のリクエストDTO
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub room_id: Option<u64>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub guests: Option<u32>,
    pub special_requests: Option<String>,
}

/// 予約キャンセル用のリクエストDTO
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CancelReservationRequest {
    pub reservation_id: Option<u64>,
    pub email: Option<String>,
}

/// 予約検索用のリクエストDTO（クエリパラメータ・JSONボディ共通）
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LookupReservationsRequest {
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<AvailabilityRequest> for AvailabilityQuery {
    fn from(request: AvailabilityRequest) -> Self {
        Self {
            check_in_date: request.check_in_date,
            check_out_date: request.check_out_date,
            room_id: request.room_id,
        }
    }
}

impl From<CreateReservationRequest> for BookingForm {
    fn from(request: CreateReservationRequest) -> Self {
        Self {
            room_id: request.room_id,
            full_name: request.full_name,
            email: request.email,
            phone: request.phone,
            check_in_date: request.check_in_date,
            check_out_date: request.check_out_date,
            guests: request.guests,
            special_requests: request.special_requests,
        }
    }
}

impl From<CancelReservationRequest> for CancellationForm {
    fn from(request: CancelReservationRequest) -> Self {
        Self {
            reservation_id: request.reservation_id,
            email: request.email,
        }
    }
}
