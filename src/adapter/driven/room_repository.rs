use super::mysql_row::{column, room_from_row, ROOM_COLUMNS};
use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Room, RoomId, RoomOccupancy, StayPeriod};
use crate::domain::port::{RepositoryError, RoomRepository};
use async_trait::async_trait;
use sqlx::{MySql, Pool};

/// MySQL客室リポジトリ
/// 客室は読み取り専用（マイグレーションで投入する）
#[derive(Clone)]
pub struct MySqlRoomRepository {
    pool: Pool<MySql>,
}

impl MySqlRoomRepository {
    /// 新しいMySQL客室リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for MySqlRoomRepository {
    async fn find_all(&self) -> Result<Vec<Room>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM rooms rm ORDER BY rm.price_per_night_amount ASC, rm.id ASC",
            ROOM_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("客室一覧の取得に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        rows.iter().map(room_from_row).collect()
    }

    async fn find_occupancy(
        &self,
        period: &StayPeriod,
        room_id: Option<RoomId>,
    ) -> Result<Vec<RoomOccupancy>, RepositoryError> {
        // 半開区間の重なり: 既存.check_in < 照会.check_out かつ 既存.check_out > 照会.check_in
        let sql = format!(
            r#"
            SELECT {},
                (SELECT COUNT(*) FROM reservations res
                  WHERE res.room_id = rm.id
                    AND res.status <> 'cancelled'
                    AND res.check_in_date < ?
                    AND res.check_out_date > ?) AS booked
            FROM rooms rm
            WHERE (? IS NULL OR rm.id = ?)
            ORDER BY rm.price_per_night_amount ASC, rm.id ASC
            "#,
            ROOM_COLUMNS
        );
        let room_id = room_id.map(|id| id.value());
        let rows = sqlx::query(&sql)
            .bind(period.check_out())
            .bind(period.check_in())
            .bind(room_id)
            .bind(room_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("空室状況の取得に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        rows.iter()
            .map(|row| {
                let booked: i64 = column(row, "booked")?;
                Ok(RoomOccupancy {
                    room: room_from_row(row)?,
                    booked: u32::try_from(booked).unwrap_or(u32::MAX),
                })
            })
            .collect()
    }
}
