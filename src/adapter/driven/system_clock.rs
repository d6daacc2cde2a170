use crate::domain::port::Clock;
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// サーバーのシステム時計
/// 「本日」はサーバーのローカルタイムゾーンの日付
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定時刻の時計
/// 「本日」は固定した時刻（UTC）の日付になる
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// 指定日の 00:00 (UTC) に固定
    pub fn on(date: NaiveDate) -> Self {
        Self::new(Utc.from_utc_datetime(&date.and_time(NaiveTime::default())))
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_today_follows_fixed_time() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 5, 1, 23, 59, 0).unwrap());
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());

        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let clock = FixedClock::on(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.now(), Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap());
    }
}
