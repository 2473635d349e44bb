use std::sync::OnceLock;
use chrono_tz::Tz;

/// Timezone used when printing timestamps. The platform operates in
/// Turkey, so Europe/Istanbul is the fallback.
static APP_TIMEZONE: OnceLock<Tz> = OnceLock::new();

/// Initialize the timezone from the given string
pub fn init_timezone(tz_str: &str) {
    let timezone: Tz = tz_str.parse().unwrap_or_else(|_| {
        eprintln!("Warning: Invalid timezone '{}', falling back to Europe/Istanbul", tz_str);
        chrono_tz::Europe::Istanbul
    });

    if APP_TIMEZONE.set(timezone).is_err() {
        eprintln!("Warning: Timezone already initialized");
    }
}

/// Get the configured timezone
pub fn get_timezone() -> Tz {
    *APP_TIMEZONE.get().unwrap_or(&chrono_tz::Europe::Istanbul)
}

/// Current time formatted for log lines, in the configured timezone.
pub fn log_timestamp() -> String {
    chrono::Utc::now()
        .with_timezone(&get_timezone())
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
