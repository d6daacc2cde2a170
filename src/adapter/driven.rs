// 駆動される側アダプター（リポジトリ実装・時計）

mod in_memory_store;
mod mysql_row;
mod reservation_repository;
mod room_repository;
mod system_clock;

pub use in_memory_store::{InMemoryStore, InMemoryTransaction};
pub use reservation_repository::{MySqlReservationRepository, MySqlReservationTransaction};
pub use room_repository::MySqlRoomRepository;
pub use system_clock::{FixedClock, SystemClock};
