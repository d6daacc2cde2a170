// ドメインモデル（エンティティと値オブジェクト）

mod value_objects;
mod room;
mod reservation;

pub use value_objects::{
    RoomId, ReservationId,
    Money,
    StayPeriod,
    EmailAddress, PhoneNumber, GuestContact,
    FeatureList,
    ReservationStatus,
};
pub use value_objects::require_text;

pub use room::{Room, RoomOccupancy};
pub use reservation::{
    BookingForm, BookingRequest, ConfirmedBooking, ContactFilter, NewReservation, Reservation,
    ReservationDetails,
};
