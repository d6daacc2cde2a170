use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

use crate::adapter::driver::request_dto::{
    AvailabilityRequest, CancelReservationRequest, CreateReservationRequest,
    LookupReservationsRequest,
};
use crate::adapter::driver::response_dto::{
    ApiResponse, AvailabilityResponse, AvailableRoomResponse, CancellationResponse,
    ReservationDetailsResponse, ReservationResponse, RoomResponse,
};
use crate::application::service::{
    ReservationApplicationService, ReservationQueryService, RoomQueryService,
};
use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::port::{Clock, ReservationRepository, RoomRepository};

/// 永続化の失敗時に返す汎用メッセージ（内部の詳細は含めない）
const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred. Please try again later.";

// アプリケーションサービスを含む状態
#[derive(Clone)]
pub struct AppState {
    pub room_query_service: Arc<RoomQueryService>,
    pub reservation_service: Arc<ReservationApplicationService>,
    pub reservation_query_service: Arc<ReservationQueryService>,
}

impl AppState {
    /// リポジトリと時計からサービス一式を組み立てる
    pub fn new(
        room_repository: Arc<dyn RoomRepository>,
        reservation_repository: Arc<dyn ReservationRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            room_query_service: Arc::new(RoomQueryService::new(room_repository, clock.clone())),
            reservation_service: Arc::new(ReservationApplicationService::new(
                reservation_repository.clone(),
                clock,
            )),
            reservation_query_service: Arc::new(ReservationQueryService::new(
                reservation_repository,
            )),
        }
    }
}

/// 失敗レスポンスの `data` の形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// 単一オブジェクトを返すエンドポイント（data: null）
    Object,
    /// リストを返すエンドポイント（data: []）
    List,
}

/// 失敗レスポンス
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub shape: PayloadShape,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>, shape: PayloadShape) -> Self {
        Self {
            status,
            message: message.into(),
            shape,
        }
    }

    fn invalid_payload(shape: PayloadShape) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid request payload", shape)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let data = match self.shape {
            PayloadShape::Object => Value::Null,
            PayloadShape::List => Value::Array(Vec::new()),
        };
        let body = ApiResponse {
            success: false,
            message: self.message,
            data,
            count: None,
        };
        (self.status, Json(body)).into_response()
    }
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/rooms", get(list_rooms))
        .route("/rooms/availability", post(check_availability))
        .route(
            "/reservations",
            post(create_reservation).get(lookup_reservations_by_query),
        )
        .route("/reservations/lookup", post(lookup_reservations_by_body))
        .route("/reservations/cancel", post(cancel_reservation))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "hotel-reservation",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// 客室一覧取得エンドポイント
async fn list_rooms(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RoomResponse>>>, ApiError> {
    let rooms = state
        .room_query_service
        .list_rooms()
        .await
        .map_err(|err| map_application_error(err, PayloadShape::List))?;

    let data = rooms.iter().map(RoomResponse::from_room).collect();
    Ok(Json(ApiResponse::list("Rooms retrieved successfully", data)))
}

// 空室照会エンドポイント
async fn check_availability(
    State(state): State<AppState>,
    payload: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("invalid availability payload: {}", rejection);
        ApiError::invalid_payload(PayloadShape::List)
    })?;

    let report = state
        .room_query_service
        .check_availability(request.into())
        .await
        .map_err(|err| map_application_error(err, PayloadShape::List))?;

    let data: Vec<AvailableRoomResponse> = report
        .rooms
        .iter()
        .map(AvailableRoomResponse::from_availability)
        .collect();
    let message = if data.is_empty() {
        "No rooms available for selected dates"
    } else {
        "Available rooms found"
    };

    Ok(Json(AvailabilityResponse {
        success: true,
        message: message.to_string(),
        count: data.len(),
        data,
        check_in_date: report.period.check_in(),
        check_out_date: report.period.check_out(),
    }))
}

// 予約作成エンドポイント
async fn create_reservation(
    State(state): State<AppState>,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationResponse>>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("invalid reservation payload: {}", rejection);
        ApiError::invalid_payload(PayloadShape::Object)
    })?;

    let booking = state
        .reservation_service
        .create_reservation(request.into())
        .await
        .map_err(|err| map_application_error(err, PayloadShape::Object))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Reservation created successfully!",
            ReservationResponse::from_booking(&booking),
        )),
    ))
}

// 予約キャンセルエンドポイント
async fn cancel_reservation(
    State(state): State<AppState>,
    payload: Result<Json<CancelReservationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CancellationResponse>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("invalid cancellation payload: {}", rejection);
        ApiError::invalid_payload(PayloadShape::Object)
    })?;

    let reservation = state
        .reservation_service
        .cancel_reservation(request.into())
        .await
        .map_err(|err| map_application_error(err, PayloadShape::Object))?;

    Ok(Json(ApiResponse::success(
        "Reservation cancelled successfully",
        CancellationResponse::from_reservation(&reservation),
    )))
}

// 予約検索エンドポイント（クエリパラメータ）
async fn lookup_reservations_by_query(
    State(state): State<AppState>,
    query: Result<Query<LookupReservationsRequest>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ReservationDetailsResponse>>>, ApiError> {
    let Query(request) = query.map_err(|rejection| {
        warn!("invalid lookup query: {}", rejection);
        ApiError::invalid_payload(PayloadShape::List)
    })?;
    lookup_reservations(&state, request).await
}

// 予約検索エンドポイント（JSONボディ）
async fn lookup_reservations_by_body(
    State(state): State<AppState>,
    payload: Result<Json<LookupReservationsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<ReservationDetailsResponse>>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("invalid lookup payload: {}", rejection);
        ApiError::invalid_payload(PayloadShape::List)
    })?;
    lookup_reservations(&state, request).await
}

async fn lookup_reservations(
    state: &AppState,
    request: LookupReservationsRequest,
) -> Result<Json<ApiResponse<Vec<ReservationDetailsResponse>>>, ApiError> {
    let reservations = state
        .reservation_query_service
        .find_reservations(request.email, request.phone)
        .await
        .map_err(|err| map_application_error(err, PayloadShape::List))?;

    let data: Vec<ReservationDetailsResponse> = reservations
        .iter()
        .map(ReservationDetailsResponse::from_details)
        .collect();
    let message = if data.is_empty() {
        "No reservations found"
    } else {
        "Reservations retrieved successfully"
    };
    Ok(Json(ApiResponse::list(message, data)))
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError, shape: PayloadShape) -> ApiError {
    match err {
        ApplicationError::DomainError(domain_err) => {
            let status = match &domain_err {
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                DomainError::Conflict(reason) => {
                    warn!(reason = reason.code(), "request conflicts with current state");
                    StatusCode::CONFLICT
                }
            };
            ApiError::new(status, domain_err.to_string(), shape)
        }
        ApplicationError::RepositoryError(repo_err) => {
            error!("request failed on storage: {}", repo_err);
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE,
                shape,
            )
        }
    }
}
