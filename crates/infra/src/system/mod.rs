use chrono::Utc;

/// Clock seam. The due-set math compares instants against `now`, so every
/// consumer reads time through this trait and tests pin it to a fixed tick.
pub trait ISys: Send + Sync {
    /// Current instant as UTC millis
    fn get_timestamp_millis(&self) -> i64;
}

/// Wall clock, wired into every non-test context
pub struct RealSys {}
impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}
