use crate::domain::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use std::fmt;

/// 電話番号として受け付ける最小の文字数
const MIN_PHONE_LENGTH: usize = 10;

/// 保存列の長さ（reservations テーブルの VARCHAR 定義と一致させる）
pub const MAX_FULL_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 100;
pub const MAX_PHONE_LENGTH: usize = 20;

/// 日付の入力フォーマット
const DATE_FORMAT: &str = "%Y-%m-%d";

/// 客室タイプの一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u64);

impl RoomId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// 内部の値を取得
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 予約の一意識別子（作成時に採番される）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReservationId(u64);

impl ReservationId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// 内部の値を取得
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 金額を表す値オブジェクト
/// 小数点以下2桁の金額を最小通貨単位（セント）の整数で保持する
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    cents: i64,
}

impl Money {
    /// 最小通貨単位から作成
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// 整数金額から作成（例: 299 → 299.00）
    pub fn from_major(amount: i64) -> Self {
        Self {
            cents: amount * 100,
        }
    }

    /// 最小通貨単位の金額を取得
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// JSON出力用の小数表現
    pub fn as_decimal(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// 金額を乗算
    pub fn multiply(&self, factor: u32) -> Money {
        Money {
            cents: self.cents * factor as i64,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// 宿泊期間を表す値オブジェクト
/// チェックイン日を含み、チェックアウト日を含まない半開区間 [check_in, check_out)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayPeriod {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayPeriod {
    /// 新しい宿泊期間を作成
    /// チェックアウト日はチェックイン日より後である必要がある
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, ValidationError> {
        if check_in >= check_out {
            return Err(ValidationError::DateOrder);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// 文字列（YYYY-MM-DD）から宿泊期間を作成
    pub fn parse(check_in: &str, check_out: &str) -> Result<Self, ValidationError> {
        let check_in = parse_date("check_in_date", check_in)?;
        let check_out = parse_date("check_out_date", check_out)?;
        Self::new(check_in, check_out)
    }

    /// チェックイン日を取得
    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// チェックアウト日を取得
    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// 宿泊数（日単位の差）
    pub fn nights(&self) -> u32 {
        let days = (self.check_out - self.check_in).num_days();
        u32::try_from(days).unwrap_or(u32::MAX)
    }

    /// 2つの半開区間が1日以上重なるか
    /// [a, b) と [x, y) は a < y かつ b > x のとき重なる
    pub fn overlaps(&self, other: &StayPeriod) -> bool {
        self.check_in < other.check_out && self.check_out > other.check_in
    }

    /// チェックイン日が指定日（通常は本日）より前でないことを確認
    pub fn ensure_not_before(&self, today: NaiveDate) -> Result<(), ValidationError> {
        if self.check_in < today {
            return Err(ValidationError::DateInPast);
        }
        Ok(())
    }
}

/// 日付文字列を解釈する
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(field))
}

/// 必須の文字列項目を取り出す（前後の空白を除去し、空なら未入力扱い）
pub fn require_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    optional_text(value).ok_or(ValidationError::MissingField(field))
}

/// 任意の文字列項目を正規化する（空文字列は未指定として扱う）
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 文字数（バイト数ではない）が上限以内か確認
pub fn ensure_max_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// メールアドレス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// 形式を検証してメールアドレスを作成
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        ensure_max_length("email", trimmed, MAX_EMAIL_LENGTH)?;
        if !validator::validate_email(trimmed) {
            return Err(ValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 保存済みの値から再構築（検証済みとみなす）
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 大文字小文字を区別せずに比較
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 電話番号
/// 数字・空白・+・-・括弧のみで構成され、10文字以上20文字以下である必要がある
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        ensure_max_length("phone", trimmed, MAX_PHONE_LENGTH)?;
        if !Self::is_valid(trimmed) {
            return Err(ValidationError::InvalidPhone);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// 保存済みの値から再構築（検証済みとみなす）
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    fn is_valid(phone: &str) -> bool {
        phone.chars().count() >= MIN_PHONE_LENGTH
            && phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 宿泊者の連絡先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestContact {
    full_name: String,
    email: EmailAddress,
    phone: PhoneNumber,
}

impl GuestContact {
    pub fn new(full_name: String, email: EmailAddress, phone: PhoneNumber) -> Self {
        Self {
            full_name,
            email,
            phone,
        }
    }

    /// 氏名を取得
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// メールアドレスを取得
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// 電話番号を取得
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }
}

/// 客室の設備リスト
/// データベースではカンマ区切りの文字列として保存する
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureList(Vec<String>);

impl FeatureList {
    const DELIMITER: char = ',';

    pub fn new(features: Vec<String>) -> Self {
        Self(
            features
                .into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect(),
        )
    }

    /// 保存形式（カンマ区切り）から復元する
    /// 空文字列・NULL は空のリストになる
    pub fn decode(raw: Option<&str>) -> Self {
        match raw {
            Some(raw) => Self::new(raw.split(Self::DELIMITER).map(str::to_string).collect()),
            None => Self::default(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 予約のステータス
/// confirmed → cancelled の一方向のみ遷移する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// 確定済み
    Confirmed,
    /// キャンセル済み（終端状態）
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }

    /// 文字列からReservationStatusを作成
    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "confirmed" => Some(ReservationStatus::Confirmed),
            "cancelled" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
