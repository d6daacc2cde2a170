/// 入力検証エラー
/// 利用者が修正できる入力の誤りを表現する（メッセージはそのまま返却される）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// 必須項目が未入力
    #[error("{} is required", field_label(.0))]
    MissingField(&'static str),
    /// メールアドレスの形式が不正
    #[error("Invalid email format")]
    InvalidEmail,
    /// 電話番号の形式が不正
    #[error("Invalid phone number format")]
    InvalidPhone,
    /// 保存できる長さを超えている
    #[error("{} must be at most {max} characters", field_label(.field))]
    TooLong { field: &'static str, max: usize },
    /// 日付を解釈できない（YYYY-MM-DD 以外）
    #[error("{} must be a valid date (YYYY-MM-DD)", field_label(.0))]
    InvalidDate(&'static str),
    /// チェックアウト日がチェックイン日以前
    #[error("Check-out date must be after check-in date")]
    DateOrder,
    /// チェックイン日が過去
    #[error("Check-in date cannot be in the past")]
    DateInPast,
    /// 宿泊人数が客室の定員を超過
    #[error("Number of guests exceeds room capacity (max: {max_guests})")]
    Capacity { max_guests: u32 },
    /// 予約検索でメールも電話番号も指定されていない
    #[error("Email or phone number is required to retrieve reservations")]
    MissingContact,
}

impl ValidationError {
    /// 失敗した項目・規則を示す機械可読なキー
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field)
            | ValidationError::InvalidDate(field)
            | ValidationError::TooLong { field, .. } => field,
            ValidationError::InvalidEmail => "email",
            ValidationError::InvalidPhone => "phone",
            ValidationError::DateOrder => "date_order",
            ValidationError::DateInPast => "date_in_past",
            ValidationError::Capacity { .. } => "capacity",
            ValidationError::MissingContact => "email_or_phone",
        }
    }
}

fn field_label(field: &str) -> &str {
    match field {
        "room_id" => "Room ID",
        "full_name" => "Full name",
        "email" => "Email",
        "phone" => "Phone number",
        "check_in_date" => "Check-in date",
        "check_out_date" => "Check-out date",
        "guests" => "Number of guests",
        "reservation_id" => "Reservation ID",
        other => other,
    }
}

/// 業務ルール違反の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConflictReason {
    #[error("No rooms available for selected dates. Please choose different dates.")]
    NoAvailability,
    #[error("This reservation has already been cancelled")]
    AlreadyCancelled,
    #[error("Cannot cancel a reservation with a past check-in date")]
    PastCheckIn,
}

impl ConflictReason {
    pub fn code(&self) -> &'static str {
        match self {
            ConflictReason::NoAvailability => "no_availability",
            ConflictReason::AlreadyCancelled => "already_cancelled",
            ConflictReason::PastCheckIn => "past_check_in",
        }
    }
}

/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// 入力検証の失敗
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// 参照先（客室・予約）が存在しない
    #[error("{} not found", resource_label(.0))]
    NotFound(&'static str),
    /// 業務ルール違反（空室なし、キャンセル済みなど）
    #[error(transparent)]
    Conflict(#[from] ConflictReason),
}

fn resource_label(resource: &str) -> &str {
    match resource {
        "room" => "Room",
        "reservation" => "Reservation",
        other => other,
    }
}
