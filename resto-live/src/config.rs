use std::str::FromStr;

/// Live order view configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ORDER_PAGE_SIZE | 50 | Maximum orders held by the live view |
/// | EVENT_BUFFER | 256 | Channel capacity between store feed and view worker |
/// | LATE_AFTER_MINUTES | 20 | Kitchen tickets older than this are flagged late |
/// | LOG_LEVEL | info | Default log level (RUST_LOG overrides) |
/// | LOG_JSON | false | JSON log output |
/// | LOG_DIR | (unset) | Directory for daily rotating log files |
///
/// # Example
///
/// ```ignore
/// ORDER_PAGE_SIZE=100 LOG_LEVEL=debug cargo run -p resto-live
/// ```
#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// Live query limit
    pub page_size: usize,
    pub event_buffer: usize,
    pub late_after_minutes: i64,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
}

impl LiveConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            page_size: parse_var(&lookup, "ORDER_PAGE_SIZE")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(50),
            event_buffer: parse_var(&lookup, "EVENT_BUFFER")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(256),
            late_after_minutes: parse_var(&lookup, "LATE_AFTER_MINUTES").unwrap_or(20),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parse_var(&lookup, "LOG_JSON").unwrap_or(false),
            log_dir: lookup("LOG_DIR").filter(|d| !d.is_empty()),
        }
    }

    /// Override the live query limit
    ///
    /// Mostly used by tests.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
