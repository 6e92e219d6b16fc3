//! Timestamp helpers. NeoFS tracks liveness in whole milliseconds since
//! the Unix epoch.

use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_msec() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("system clock is before the Unix epoch")
		.as_millis() as u64
}

pub fn msec_to_rfc3339(msec: u64) -> String {
	let secs = (msec / 1000) as i64;
	let nanos = ((msec % 1000) * 1_000_000) as u32;
	chrono::DateTime::<chrono::Utc>::from(
		std::time::UNIX_EPOCH + std::time::Duration::new(secs.max(0) as u64, nanos),
	)
	.to_rfc3339()
}
