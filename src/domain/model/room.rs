use crate::domain::error::ValidationError;
use crate::domain::model::{FeatureList, Money, RoomId, StayPeriod};
use chrono::{DateTime, Utc};

/// 客室タイプ
/// 同一タイプの物理的な部屋数（在庫）を total_rooms として保持する
/// 作成後は変更しない（シードデータとして投入される）
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    id: RoomId,
    name: String,
    room_type: String,
    price_per_night: Money,
    total_rooms: u32,
    max_guests: u32,
    description: String,
    image_url: String,
    features: FeatureList,
    created_at: DateTime<Utc>,
}

impl Room {
    /// データベースから取得したデータで客室を再構築
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: RoomId,
        name: String,
        room_type: String,
        price_per_night: Money,
        total_rooms: u32,
        max_guests: u32,
        description: String,
        image_url: String,
        features: FeatureList,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            room_type,
            price_per_night,
            total_rooms,
            max_guests,
            description,
            image_url,
            features,
            created_at,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn room_type(&self) -> &str {
        &self.room_type
    }

    /// 1泊あたりの料金
    pub fn price_per_night(&self) -> Money {
        self.price_per_night
    }

    /// 在庫数（同タイプの部屋数）
    pub fn total_rooms(&self) -> u32 {
        self.total_rooms
    }

    /// 最大宿泊人数
    pub fn max_guests(&self) -> u32 {
        self.max_guests
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn features(&self) -> &FeatureList {
        &self.features
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 宿泊人数が定員内か確認
    pub fn accommodate(&self, guests: u32) -> Result<(), ValidationError> {
        if guests > self.max_guests {
            return Err(ValidationError::Capacity {
                max_guests: self.max_guests,
            });
        }
        Ok(())
    }

    /// 既存予約数を差し引いた残り部屋数（0未満にはならない）
    pub fn remaining_after(&self, booked: u32) -> u32 {
        self.total_rooms.saturating_sub(booked)
    }

    /// 宿泊期間の料金（宿泊数 × 1泊料金）
    pub fn quote(&self, period: &StayPeriod) -> Money {
        self.price_per_night.multiply(period.nights())
    }
}

/// 客室と、指定期間に重なる有効な予約数の組
#[derive(Debug, Clone, PartialEq)]
pub struct RoomOccupancy {
    pub room: Room,
    pub booked: u32,
}
