//! logging - tracing subscriber の初期化

use std::str::FromStr;

use tracing::metadata::LevelFilter;
use tracing_subscriber::{Layer, filter::FilterFn, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// `herald*` ターゲット向けに compact な fmt subscriber を設定する
///
/// レベルは `LOG_LEVEL` から取る（未設定時: debug ビルドは TRACE、release は INFO）。
/// 2 回呼んでも害はない。
pub fn init() {
    let default = if cfg!(debug_assertions) {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };
    let level = level_from_env(default);

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_ansi(true)
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_filter(level)
                .with_filter(FilterFn::new(|metadata| metadata.target().starts_with("herald"))),
        )
        .try_init();
}

fn level_from_env(default: LevelFilter) -> LevelFilter {
    std::env::var(LOG_LEVEL_ENV).map_or(default, |level| parse_level(&level, default))
}

fn parse_level(level: &str, default: LevelFilter) -> LevelFilter {
    LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level specified {level}, defaulting to {default}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("debug", LevelFilter::DEBUG)]
    #[case("WARN", LevelFilter::WARN)]
    #[case("off", LevelFilter::OFF)]
    #[case("loud", LevelFilter::INFO)]
    fn parses_levels_with_fallback(#[case] raw: &str, #[case] expected: LevelFilter) {
        assert_eq!(parse_level(raw, LevelFilter::INFO), expected);
    }
}
