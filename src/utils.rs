use chrono::{DateTime, FixedOffset, Utc};

/// Vietnam runs a constant UTC+7 with no DST, so a fixed offset is enough.
const VN_OFFSET_SECS: i32 = 7 * 3600;

pub fn vn_offset() -> FixedOffset {
    FixedOffset::east_opt(VN_OFFSET_SECS).expect("valid fixed offset")
}

pub fn vn_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&vn_offset())
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
