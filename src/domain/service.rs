// ドメインサービス
// 空室計算（在庫数 − 期間が重なる有効な予約数）を実装

use crate::domain::error::{ConflictReason, DomainError};
use crate::domain::model::{Reservation, Room, RoomId, RoomOccupancy, StayPeriod};

/// 空室のある客室
#[derive(Debug, Clone, PartialEq)]
pub struct RoomAvailability {
    pub room: Room,
    /// 残り部屋数（常に1以上）
    pub available_rooms: u32,
}

/// 空室サービス
pub struct AvailabilityService;

impl AvailabilityService {
    /// 期間が重なる有効な予約数を数える
    pub fn count_overlapping<'a, I>(room_id: RoomId, period: &StayPeriod, reservations: I) -> u32
    where
        I: IntoIterator<Item = &'a Reservation>,
    {
        let count = reservations
            .into_iter()
            .filter(|reservation| reservation.occupies(room_id, period))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// 残り部屋数が1以上の客室だけを残り部屋数付きで返す
    /// 1泊料金の昇順（同額はID順）に並べる
    pub fn available_rooms(occupancies: Vec<RoomOccupancy>) -> Vec<RoomAvailability> {
        let mut available: Vec<RoomAvailability> = occupancies
            .into_iter()
            .filter_map(|occupancy| {
                let remaining = occupancy.room.remaining_after(occupancy.booked);
                (remaining > 0).then_some(RoomAvailability {
                    room: occupancy.room,
                    available_rooms: remaining,
                })
            })
            .collect();
        available.sort_by_key(|a| (a.room.price_per_night(), a.room.id()));
        available
    }

    /// 予約を1件追加できるだけの空きがあるか確認
    ///
    /// # Returns
    /// * `Ok(u32)` - 追加前の残り部屋数
    /// * `Err(DomainError::Conflict(NoAvailability))` - 空きなし
    pub fn ensure_vacancy(room: &Room, booked: u32) -> Result<u32, DomainError> {
        match room.remaining_after(booked) {
            0 => Err(ConflictReason::NoAvailability.into()),
            remaining => Ok(remaining),
        }
    }
}
