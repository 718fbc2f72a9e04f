use crate::browse;

#[derive(Debug)]
pub struct Config {
    pub catalog_base_url: String,
    pub covers_base_url: String,
    pub db_connection_string: String,
    pub page_size: i64,
    pub max_random_offset: i64,
}

const DEFAULT_CATALOG_BASE_URL: &str = "https://openlibrary.org";
const DEFAULT_COVERS_BASE_URL: &str = "https://covers.openlibrary.org";
const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://books.sqlite?mode=rwc";

impl Config {
    pub fn load() -> Self {
        let catalog_base_url =
            std::env::var("CATALOG_BASE_URL").unwrap_or(DEFAULT_CATALOG_BASE_URL.into());
        let covers_base_url =
            std::env::var("COVERS_BASE_URL").unwrap_or(DEFAULT_COVERS_BASE_URL.into());
        let db_connection_string =
            std::env::var("DB_CONNECTION_STRING").unwrap_or(DEFAULT_DB_CONNECTION_STRING.into());
        let page_size = env_i64("PAGE_SIZE", browse::DEFAULT_PAGE_SIZE);
        let max_random_offset = env_i64("MAX_RANDOM_OFFSET", browse::DEFAULT_MAX_RANDOM_OFFSET);
        Config {
            catalog_base_url,
            covers_base_url,
            db_connection_string,
            page_size,
            max_random_offset,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.catalog_base_url.is_empty() {
            return Err("CATALOG_BASE_URL is missing".into());
        }
        if self.page_size <= 0 {
            return Err("PAGE_SIZE must be positive".into());
        }
        if self.max_random_offset < 0 {
            return Err("MAX_RANDOM_OFFSET must not be negative".into());
        }
        Ok(())
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
