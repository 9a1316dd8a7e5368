pub const SECS_PER_MINUTE: u64 = 60;
pub const SECS_PER_HOUR: u64 = 3600;

/// Render a second count as `HH:MM:SS`.
///
/// The hour field is zero-padded to two digits and grows past that instead of
/// wrapping, so `360000` renders as `100:00:00`.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / SECS_PER_HOUR;
    let minutes = (total_seconds % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total_seconds % SECS_PER_MINUTE;

    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Shift `value` by `delta`, keeping the result inside `min..=max`.
pub fn step_clamped(value: u32, delta: i32, min: u32, max: u32) -> u32 {
    let shifted = i64::from(value) + i64::from(delta);
    shifted.clamp(i64::from(min), i64::from(max)) as u32
}
