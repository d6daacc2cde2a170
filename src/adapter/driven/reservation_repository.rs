use super::mysql_row::{column, reservation_from_row, room_from_row, RESERVATION_COLUMNS, ROOM_COLUMNS};
use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{
    ContactFilter, NewReservation, Reservation, ReservationDetails, ReservationId, Room, RoomId,
    StayPeriod,
};
use crate::domain::port::{RepositoryError, ReservationRepository, ReservationTransaction};
use async_trait::async_trait;
use sqlx::{MySql, Pool, Transaction};

/// MySQL予約リポジトリ
#[derive(Clone)]
pub struct MySqlReservationRepository {
    pool: Pool<MySql>,
}

impl MySqlReservationRepository {
    /// 新しいMySQL予約リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for MySqlReservationRepository {
    async fn begin(&self) -> Result<Box<dyn ReservationTransaction>, RepositoryError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        Ok(Box::new(MySqlReservationTransaction { tx: Some(tx) }))
    }

    async fn find_by_contact(
        &self,
        filter: &ContactFilter,
    ) -> Result<Vec<ReservationDetails>, RepositoryError> {
        let sql = contact_lookup_sql(filter);
        let mut query = sqlx::query(&sql);
        if let Some(email) = filter.email() {
            query = query.bind(email);
        }
        if let Some(phone) = filter.phone() {
            query = query.bind(phone);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("予約の検索に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        rows.iter()
            .map(|row| {
                Ok(ReservationDetails {
                    reservation: reservation_from_row(row)?,
                    room_name: column(row, "room_name")?,
                    room_type: column(row, "room_type")?,
                    image_url: column(row, "image_url")?,
                })
            })
            .collect()
    }
}

/// 連絡先検索のSQLを組み立てる
/// 指定された条件だけを列の直接比較で並べ、インデックスを使えるようにする
/// （メールの大文字小文字は列の照合順序 utf8mb4_unicode_ci で無視される）
fn contact_lookup_sql(filter: &ContactFilter) -> String {
    let mut conditions = Vec::new();
    if filter.email().is_some() {
        conditions.push("res.email = ?");
    }
    if filter.phone().is_some() {
        conditions.push("res.phone = ?");
    }
    format!(
        r#"
        SELECT {}, rm.room_name, rm.room_type, rm.image_url
        FROM reservations res
        JOIN rooms rm ON rm.id = res.room_id
        WHERE {}
        ORDER BY res.created_at DESC, res.id DESC
        "#,
        RESERVATION_COLUMNS,
        conditions.join(" AND ")
    )
}

/// MySQLの書き込みトランザクション
/// 行ロックには SELECT ... FOR UPDATE を使う
pub struct MySqlReservationTransaction {
    tx: Option<Transaction<'static, MySql>>,
}

impl MySqlReservationTransaction {
    fn open(&mut self) -> Result<&mut Transaction<'static, MySql>, RepositoryError> {
        self.tx.as_mut().ok_or_else(|| {
            RepositoryError::OperationFailed("トランザクションは既に終了しています".to_string())
        })
    }
}

#[async_trait]
impl ReservationTransaction for MySqlReservationTransaction {
    async fn lock_room(&mut self, room_id: RoomId) -> Result<Option<Room>, RepositoryError> {
        let sql = format!("SELECT {} FROM rooms rm WHERE rm.id = ? FOR UPDATE", ROOM_COLUMNS);
        let tx = self.open()?;
        let row = sqlx::query(&sql)
            .bind(room_id.value())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("客室のロックに失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        row.as_ref().map(room_from_row).transpose()
    }

    async fn count_overlapping(
        &mut self,
        room_id: RoomId,
        period: &StayPeriod,
    ) -> Result<u32, RepositoryError> {
        let tx = self.open()?;
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS booked FROM reservations
            WHERE room_id = ?
              AND status <> 'cancelled'
              AND check_in_date < ?
              AND check_out_date > ?
            "#,
        )
        .bind(room_id.value())
        .bind(period.check_out())
        .bind(period.check_in())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("重複予約の集計に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let booked: i64 = column(&row, "booked")?;
        Ok(u32::try_from(booked).unwrap_or(u32::MAX))
    }

    async fn insert(&mut self, reservation: NewReservation) -> Result<Reservation, RepositoryError> {
        let tx = self.open()?;
        let result = sqlx::query(
            r#"
            INSERT INTO reservations
                (room_id, full_name, email, phone, check_in_date, check_out_date, guests,
                 special_requests, total_price_amount, nights, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'confirmed', ?, ?)
            "#,
        )
        .bind(reservation.room_id().value())
        .bind(reservation.guest().full_name())
        .bind(reservation.guest().email().as_str())
        .bind(reservation.guest().phone().as_str())
        .bind(reservation.period().check_in())
        .bind(reservation.period().check_out())
        .bind(reservation.guests())
        .bind(reservation.special_requests())
        .bind(reservation.total_price().cents())
        .bind(reservation.nights())
        .bind(reservation.booked_at())
        .bind(reservation.booked_at())
        .execute(&mut **tx)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("予約の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(reservation.into_reservation(ReservationId::new(result.last_insert_id())))
    }

    async fn lock_reservation(
        &mut self,
        reservation_id: ReservationId,
    ) -> Result<Option<Reservation>, RepositoryError> {
        let sql = format!(
            "SELECT {} FROM reservations res WHERE res.id = ? FOR UPDATE",
            RESERVATION_COLUMNS
        );
        let tx = self.open()?;
        let row = sqlx::query(&sql)
            .bind(reservation_id.value())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("予約のロックに失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        row.as_ref().map(reservation_from_row).transpose()
    }

    async fn update_status(&mut self, reservation: &Reservation) -> Result<(), RepositoryError> {
        let tx = self.open()?;
        sqlx::query("UPDATE reservations SET status = ?, updated_at = ? WHERE id = ?")
            .bind(reservation.status().as_str())
            .bind(reservation.updated_at())
            .bind(reservation.id().value())
            .execute(&mut **tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("予約の更新に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn commit(&mut self) -> Result<(), RepositoryError> {
        let tx = self.tx.take().ok_or_else(|| {
            RepositoryError::OperationFailed("トランザクションは既に終了しています".to_string())
        })?;
        tx.commit()
            .await
            .map_err(|e| DatabaseError::QueryError(format!("コミットに失敗しました: {}", e)))
            .map_err(RepositoryError::from)
    }

    async fn rollback(&mut self) -> Result<(), RepositoryError> {
        match self.tx.take() {
            Some(tx) => tx
                .rollback()
                .await
                .map_err(|e| DatabaseError::QueryError(format!("ロールバックに失敗しました: {}", e)))
                .map_err(RepositoryError::from),
            None => Ok(()),
        }
    }
}
