pub mod calculator;
pub mod commands;
pub mod error;
pub mod models;
pub mod parser;
pub mod rates;

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct CalcConfig {
    pub supported_symbol: String,
    pub lot_match_window_days: i64,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            supported_symbol: "U".to_string(),
            lot_match_window_days: 7,
        }
    }
}

pub fn load_calc_config() -> CalcConfig {
    dotenv().ok();
    let config = CalcConfig {
        supported_symbol: env::var("SUPPORTED_SYMBOL").unwrap_or_else(|_| "U".to_string()),
        lot_match_window_days: env::var("LOT_MATCH_WINDOW_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(7),
    };

    if config.supported_symbol.is_empty() {
        panic!("SUPPORTED_SYMBOL must not be empty");
    }
    if config.lot_match_window_days < 0 {
        panic!(
            "Unsupported LOT_MATCH_WINDOW_DAYS '{}'. Must be zero or positive.",
            config.lot_match_window_days
        );
    }

    config
}
