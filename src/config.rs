use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub port: u16,
    pub static_dir: String,
}

pub fn load() -> Result<Config> {
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string());

    Ok(Config { port, static_dir })
}
