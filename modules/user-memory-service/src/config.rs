use std::env;

const DEFAULT_DB_PATH: &str = "./user_memory.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_POOL_SIZE: u32 = 8;

#[derive(Clone, Debug)]
pub struct Config {
    pub db_path: String,
    pub host: String,
    pub port: u16,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            db_path: lookup("USER_MEMORY_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            host: lookup("USER_MEMORY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("USER_MEMORY_PORT", lookup("USER_MEMORY_PORT"), DEFAULT_PORT),
            pool_size: parse_or(
                "USER_MEMORY_POOL_SIZE",
                lookup("USER_MEMORY_POOL_SIZE"),
                DEFAULT_POOL_SIZE,
            ),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(
    key: &str,
    raw: Option<String>,
    default: T,
) -> T {
    match raw {
        None => default,
        Some(s) => s.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}, using {}", key, s, default);
            default
        }),
    }
}
