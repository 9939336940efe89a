//! 时间工具函数
//!
//! 数据库只存 `i64` Unix millis，对外统一输出 RFC 3339 (UTC)。

use chrono::{DateTime, SecondsFormat, Utc};

/// 当前时间 (Unix millis)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix millis → RFC 3339 (UTC, 毫秒精度)
pub fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 当前时间 RFC 3339
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_to_rfc3339() {
        assert_eq!(millis_to_rfc3339(0), "1970-01-01T00:00:00.000Z");
        assert_eq!(millis_to_rfc3339(1_700_000_000_123), "2023-11-14T22:13:20.123Z");
    }

    #[test]
    fn test_now_round_trip() {
        let now = now_millis();
        let parsed = DateTime::parse_from_rfc3339(&millis_to_rfc3339(now)).unwrap();
        assert_eq!(parsed.timestamp_millis(), now);
    }
}
