use crate::application::ApplicationError;
use crate::domain::model::{require_text, Room, RoomId, StayPeriod};
use crate::domain::port::{Clock, RoomRepository};
use crate::domain::service::{AvailabilityService, RoomAvailability};
use std::sync::Arc;
use tracing::debug;

/// 空室照会の入力（未検証）
#[derive(Debug, Clone, Default)]
pub struct AvailabilityQuery {
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    /// 0 は未指定として扱う
    pub room_id: Option<u64>,
}

/// 空室照会の結果
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityReport {
    pub period: StayPeriod,
    pub rooms: Vec<RoomAvailability>,
}

/// 客室クエリサービス
/// 読み取り専用の客室操作を提供する
pub struct RoomQueryService {
    room_repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl RoomQueryService {
    /// 新しい客室クエリサービスを作成
    ///
    /// # Arguments
    /// * `room_repository` - 客室リポジトリ
    /// * `clock` - 本日の判定に使う時計
    pub fn new(room_repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            room_repository,
            clock,
        }
    }

    /// すべての客室を取得
    /// 1泊料金の昇順で並べて返す
    pub async fn list_rooms(&self) -> Result<Vec<Room>, ApplicationError> {
        self.room_repository
            .find_all()
            .await
            .map_err(ApplicationError::from)
    }

    /// 指定期間に空きのある客室を取得
    ///
    /// 検証順序: 日付の未入力 → 日付の形式 → 前後関係 → 過去日
    ///
    /// # Returns
    /// * `Ok(AvailabilityReport)` - 残り部屋数が1以上の客室（該当なしなら空）
    /// * `Err(ApplicationError)` - 検証失敗・取得失敗
    pub async fn check_availability(
        &self,
        query: AvailabilityQuery,
    ) -> Result<AvailabilityReport, ApplicationError> {
        let check_in = require_text("check_in_date", query.check_in_date)?;
        let check_out = require_text("check_out_date", query.check_out_date)?;
        let period = StayPeriod::parse(&check_in, &check_out)?;
        period.ensure_not_before(self.clock.today())?;

        let room_id = query.room_id.filter(|id| *id > 0).map(RoomId::new);
        let occupancies = self.room_repository.find_occupancy(&period, room_id).await?;
        let rooms = AvailabilityService::available_rooms(occupancies);

        debug!(
            check_in = %period.check_in(),
            check_out = %period.check_out(),
            available = rooms.len(),
            "availability checked"
        );
        Ok(AvailabilityReport { period, rooms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::driven::{FixedClock, InMemoryStore};
    use crate::domain::error::{DomainError, ValidationError};
    use crate::domain::model::{FeatureList, Money};
    use chrono::{NaiveDate, Utc};

    fn room(id: u64, price: i64, total_rooms: u32) -> Room {
        Room::reconstruct(
            RoomId::new(id),
            format!("Room {}", id),
            "Standard".to_string(),
            Money::from_major(price),
            total_rooms,
            2,
            String::new(),
            String::new(),
            FeatureList::default(),
            Utc::now(),
        )
    }

    fn service(rooms: Vec<Room>) -> RoomQueryService {
        RoomQueryService::new(
            Arc::new(InMemoryStore::with_rooms(rooms)),
            Arc::new(FixedClock::on(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())),
        )
    }

    fn query(check_in: &str, check_out: &str, room_id: Option<u64>) -> AvailabilityQuery {
        AvailabilityQuery {
            check_in_date: Some(check_in.to_string()),
            check_out_date: Some(check_out.to_string()),
            room_id,
        }
    }

    fn validation_error(result: Result<AvailabilityReport, ApplicationError>) -> ValidationError {
        match result {
            Err(ApplicationError::DomainError(DomainError::Validation(err))) => err,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_rooms_sorted_by_price() {
        let service = service(vec![room(1, 300, 1), room(2, 100, 1), room(3, 200, 1)]);
        let ids: Vec<u64> = service
            .list_rooms()
            .await
            .unwrap()
            .iter()
            .map(|r| r.id().value())
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_check_availability_returns_all_free_rooms() {
        let service = service(vec![room(1, 300, 2), room(2, 100, 1)]);
        let report = service
            .check_availability(query("2025-06-01", "2025-06-04", None))
            .await
            .unwrap();

        let summary: Vec<(u64, u32)> = report
            .rooms
            .iter()
            .map(|a| (a.room.id().value(), a.available_rooms))
            .collect();
        assert_eq!(summary, vec![(2, 1), (1, 2)]);
        assert_eq!(report.period.nights(), 3);
    }

    #[tokio::test]
    async fn test_check_availability_with_room_filter() {
        let service = service(vec![room(1, 300, 2), room(2, 100, 1)]);

        let report = service
            .check_availability(query("2025-06-01", "2025-06-04", Some(1)))
            .await
            .unwrap();
        assert_eq!(report.rooms.len(), 1);
        assert_eq!(report.rooms[0].room.id(), RoomId::new(1));

        // 0 は未指定扱い
        let report = service
            .check_availability(query("2025-06-01", "2025-06-04", Some(0)))
            .await
            .unwrap();
        assert_eq!(report.rooms.len(), 2);

        let report = service
            .check_availability(query("2025-06-01", "2025-06-04", Some(42)))
            .await
            .unwrap();
        assert!(report.rooms.is_empty());
    }

    #[tokio::test]
    async fn test_check_availability_validation_order() {
        let service = service(vec![room(1, 100, 1)]);

        let err = validation_error(
            service
                .check_availability(AvailabilityQuery {
                    check_in_date: None,
                    check_out_date: Some("bad".to_string()),
                    room_id: None,
                })
                .await,
        );
        assert_eq!(err, ValidationError::MissingField("check_in_date"));

        let err = validation_error(
            service
                .check_availability(query("2025/06/01", "2025-06-04", None))
                .await,
        );
        assert_eq!(err, ValidationError::InvalidDate("check_in_date"));

        let err = validation_error(
            service
                .check_availability(query("2025-06-04", "2025-06-04", None))
                .await,
        );
        assert_eq!(err, ValidationError::DateOrder);

        let err = validation_error(
            service
                .check_availability(query("2025-04-30", "2025-05-02", None))
                .await,
        );
        assert_eq!(err, ValidationError::DateInPast);
    }

    #[tokio::test]
    async fn test_check_in_today_is_allowed() {
        let service = service(vec![room(1, 100, 1)]);
        let report = service
            .check_availability(query("2025-05-01", "2025-05-02", None))
            .await
            .unwrap();
        assert_eq!(report.rooms.len(), 1);
    }
}
