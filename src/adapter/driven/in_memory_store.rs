use crate::domain::model::{
    ContactFilter, FeatureList, Money, NewReservation, Reservation, ReservationDetails,
    ReservationId, Room, RoomId, RoomOccupancy, StayPeriod,
};
use crate::domain::port::{
    RepositoryError, ReservationRepository, ReservationTransaction, RoomRepository,
};
use crate::domain::service::AvailabilityService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

/// デモ用のサンプル客室
/// (名称, 種別, 1泊料金, 説明, 画像, 部屋数, 最大人数, 設備)
const SAMPLE_ROOMS: [(&str, &str, i64, &str, &str, u32, u32, &str); 6] = [
    (
        "Deluxe King Suite",
        "Suite",
        299,
        "Spacious suite with king-sized bed, city views, and luxury amenities. Perfect for couples seeking ultimate comfort.",
        "assets/imgs/francesca-saraco-_dS27XGgRyQ-unsplash.jpg",
        5,
        2,
        "King Bed,City View,Mini Bar,WiFi",
    ),
    (
        "Executive Ocean View",
        "Deluxe",
        399,
        "Premium ocean-facing room with private balcony, perfect for romantic getaways and special occasions.",
        "assets/imgs/juliana-morales-ramirez-GmW4hfTX0ns-unsplash.jpg",
        4,
        2,
        "Ocean View,Balcony,Jacuzzi,WiFi",
    ),
    (
        "Presidential Suite",
        "Presidential",
        799,
        "The ultimate luxury experience with separate living area, dining room, and panoramic city views.",
        "assets/imgs/linus-mimietz-p3UWyaujtQo-unsplash.jpg",
        1,
        4,
        "2 Bedrooms,Living Room,Dining Area,Butler Service",
    ),
    (
        "Garden Villa",
        "Villa",
        349,
        "Private villa surrounded by lush gardens, featuring an outdoor seating area and modern amenities.",
        "assets/imgs/runnyrem-LfqmND-hym8-unsplash.jpg",
        3,
        3,
        "Garden Access,Queen Bed,Patio,WiFi",
    ),
    (
        "Modern Twin Room",
        "Standard",
        249,
        "Contemporary room with twin beds, ideal for friends or business travelers seeking comfort.",
        "assets/imgs/sara-dubler-Koei_7yYtIo-unsplash.jpg",
        8,
        2,
        "Twin Beds,Work Desk,Coffee Maker,WiFi",
    ),
    (
        "Family Penthouse",
        "Penthouse",
        599,
        "Spacious penthouse perfect for families, with multiple bedrooms and a fully equipped kitchenette.",
        "assets/imgs/sidath-vimukthi-60S1280_2i8-unsplash.jpg",
        2,
        6,
        "3 Bedrooms,Kitchenette,Living Area,Terrace",
    ),
];

#[derive(Debug, Clone, Default)]
struct StoreState {
    rooms: BTreeMap<RoomId, Room>,
    reservations: BTreeMap<ReservationId, Reservation>,
    last_reservation_id: u64,
}

impl StoreState {
    fn count_overlapping(&self, room_id: RoomId, period: &StayPeriod) -> u32 {
        AvailabilityService::count_overlapping(room_id, period, self.reservations.values())
    }
}

/// インメモリストア
/// 客室と予約をプロセス内に保持する（MySQLを使わないデモ・テスト用）
///
/// 読み取りは共有ロックで並行に実行できる。
/// 書き込みトランザクションはストア全体の排他ロックを保持するため、
/// 予約の作成・キャンセルは完全に直列化される。
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    /// 客室を指定してストアを作成
    pub fn with_rooms(rooms: Vec<Room>) -> Self {
        let state = StoreState {
            rooms: rooms.into_iter().map(|room| (room.id(), room)).collect(),
            ..StoreState::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// サンプル客室を投入したストアを作成（IDは1から順に採番）
    pub fn seeded(created_at: DateTime<Utc>) -> Self {
        let rooms = SAMPLE_ROOMS
            .iter()
            .zip(1u64..)
            .map(
                |(&(name, room_type, price, description, image_url, total, max_guests, features), id)| {
                    Room::reconstruct(
                        RoomId::new(id),
                        name.to_string(),
                        room_type.to_string(),
                        Money::from_major(price),
                        total,
                        max_guests,
                        description.to_string(),
                        image_url.to_string(),
                        FeatureList::decode(Some(features)),
                        created_at,
                    )
                },
            )
            .collect();
        Self::with_rooms(rooms)
    }

    /// 保存されている予約の件数（キャンセル済みを含む）
    pub async fn reservation_count(&self) -> usize {
        self.state.read().await.reservations.len()
    }

    /// 連絡先に一致する予約をID順に取得
    pub async fn reservations_matching(&self, filter: &ContactFilter) -> Vec<Reservation> {
        self.state
            .read()
            .await
            .reservations
            .values()
            .filter(|reservation| filter.matches(reservation))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RoomRepository for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Room>, RepositoryError> {
        let state = self.state.read().await;
        let mut rooms: Vec<Room> = state.rooms.values().cloned().collect();
        rooms.sort_by_key(|room| (room.price_per_night(), room.id()));
        Ok(rooms)
    }

    async fn find_occupancy(
        &self,
        period: &StayPeriod,
        room_id: Option<RoomId>,
    ) -> Result<Vec<RoomOccupancy>, RepositoryError> {
        let state = self.state.read().await;
        let mut occupancies: Vec<RoomOccupancy> = state
            .rooms
            .values()
            .filter(|room| room_id.map_or(true, |id| room.id() == id))
            .map(|room| RoomOccupancy {
                booked: state.count_overlapping(room.id(), period),
                room: room.clone(),
            })
            .collect();
        occupancies.sort_by_key(|o| (o.room.price_per_night(), o.room.id()));
        Ok(occupancies)
    }
}

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn ReservationTransaction>, RepositoryError> {
        let guard = self.state.clone().write_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryTransaction {
            guard: Some(guard),
            working,
        }))
    }

    async fn find_by_contact(
        &self,
        filter: &ContactFilter,
    ) -> Result<Vec<ReservationDetails>, RepositoryError> {
        let state = self.state.read().await;
        let mut details: Vec<ReservationDetails> = state
            .reservations
            .values()
            .filter(|reservation| filter.matches(reservation))
            .map(|reservation| {
                let room = state.rooms.get(&reservation.room_id());
                ReservationDetails {
                    reservation: reservation.clone(),
                    room_name: room.map(|r| r.name().to_string()).unwrap_or_default(),
                    room_type: room.map(|r| r.room_type().to_string()).unwrap_or_default(),
                    image_url: room.map(|r| r.image_url().to_string()).unwrap_or_default(),
                }
            })
            .collect();
        details.sort_by(|a, b| {
            (b.reservation.created_at(), b.reservation.id())
                .cmp(&(a.reservation.created_at(), a.reservation.id()))
        });
        Ok(details)
    }
}

/// インメモリストアの書き込みトランザクション
/// 作業用コピーに変更を加え、コミット時にまとめて反映する
pub struct InMemoryTransaction {
    guard: Option<OwnedRwLockWriteGuard<StoreState>>,
    working: StoreState,
}

impl InMemoryTransaction {
    fn ensure_open(&self) -> Result<(), RepositoryError> {
        match self.guard {
            Some(_) => Ok(()),
            None => Err(RepositoryError::OperationFailed(
                "トランザクションは既に終了しています".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ReservationTransaction for InMemoryTransaction {
    async fn lock_room(&mut self, room_id: RoomId) -> Result<Option<Room>, RepositoryError> {
        self.ensure_open()?;
        Ok(self.working.rooms.get(&room_id).cloned())
    }

    async fn count_overlapping(
        &mut self,
        room_id: RoomId,
        period: &StayPeriod,
    ) -> Result<u32, RepositoryError> {
        self.ensure_open()?;
        Ok(self.working.count_overlapping(room_id, period))
    }

    async fn insert(&mut self, reservation: NewReservation) -> Result<Reservation, RepositoryError> {
        self.ensure_open()?;
        self.working.last_reservation_id += 1;
        let reservation =
            reservation.into_reservation(ReservationId::new(self.working.last_reservation_id));
        self.working
            .reservations
            .insert(reservation.id(), reservation.clone());
        Ok(reservation)
    }

    async fn lock_reservation(
        &mut self,
        reservation_id: ReservationId,
    ) -> Result<Option<Reservation>, RepositoryError> {
        self.ensure_open()?;
        Ok(self.working.reservations.get(&reservation_id).cloned())
    }

    async fn update_status(&mut self, reservation: &Reservation) -> Result<(), RepositoryError> {
        self.ensure_open()?;
        match self.working.reservations.get_mut(&reservation.id()) {
            Some(stored) => {
                *stored = reservation.clone();
                Ok(())
            }
            None => Err(RepositoryError::OperationFailed(format!(
                "予約が見つかりません: {}",
                reservation.id()
            ))),
        }
    }

    async fn commit(&mut self) -> Result<(), RepositoryError> {
        self.ensure_open()?;
        if let Some(mut guard) = self.guard.take() {
            *guard = std::mem::take(&mut self.working);
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), RepositoryError> {
        self.guard = None;
        self.working = StoreState::default();
        Ok(())
    }
}
