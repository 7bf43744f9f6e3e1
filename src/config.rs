use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        api_base_url: get_env_or_default(
            "GLEANER_API_URL",
            "https://api.patentsview.org/patents/query",
        ),
        default_per_page: get_env_or_default("GLEANER_PER_PAGE", "25")
            .parse()
            .unwrap_or(25),
    }
});

pub struct Config {
    pub api_base_url: String,
    pub default_per_page: u64,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
