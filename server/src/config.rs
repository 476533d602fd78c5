use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_ROSTER_PATH: &str = "data/roster.json";
pub const DEFAULT_ROSTER_REFRESH_SECS: u64 = 60;
pub const DEFAULT_PAGE_SIZE: u32 = 15;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_CACHE_TTL_SECS: i64 = 30;
pub const DEFAULT_MAX_PAGE_CACHE_ENTRIES: usize = 512;
pub const PAGE_CACHE_EVICTION_SECS: u64 = 60;
pub const MAX_SEARCH_LEN: usize = 32;

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn roster_path() -> PathBuf {
    std::env::var("ROSTER_PATH")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROSTER_PATH))
}

pub fn roster_refresh_interval() -> Duration {
    std::env::var("ROSTER_REFRESH_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_ROSTER_REFRESH_SECS))
}

pub fn page_size() -> u32 {
    std::env::var("RANKINGS_PAGE_SIZE")
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .map(|value| value.min(MAX_PAGE_SIZE))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

pub fn page_cache_ttl_secs() -> i64 {
    std::env::var("PAGE_CACHE_TTL_SECS")
        .ok()
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_PAGE_CACHE_TTL_SECS)
}

pub fn max_page_cache_entries() -> usize {
    std::env::var("MAX_PAGE_CACHE_ENTRIES")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_MAX_PAGE_CACHE_ENTRIES)
}
