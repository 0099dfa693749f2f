use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::shared::config::LoggingConfig;

const LOG_FILE_NAME: &str = "backend.log";

/// Инициализация системы трассировки (tracing)
///
/// Логи пишутся в:
/// - stdout (с цветами)
/// - `<dir>/backend.log` (без цветов), если каталог задан в конфигурации
pub fn initialize(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::new(resolve_filter(config));

    let file_layer = match &config.dir {
        Some(dir) => {
            let log_dir = std::path::Path::new(dir);
            std::fs::create_dir_all(log_dir)
                .with_context(|| format!("Cannot create log directory {}", log_dir.display()))?;

            let log_file_path = log_dir.join(LOG_FILE_NAME);
            let log_file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file_path)
                .with_context(|| format!("Cannot open log file {}", log_file_path.display()))?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Arc::new(log_file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init()
        .context("Tracing subscriber is already initialized")?;

    tracing::info!("Tracing initialized, level: {}", config.level);
    Ok(())
}

/// `RUST_LOG` важнее уровня из конфигурации
fn resolve_filter(config: &LoggingConfig) -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_filter_uses_config_or_env() {
        let config = LoggingConfig {
            level: "debug".into(),
            dir: None,
        };
        let expected = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".into());
        assert_eq!(resolve_filter(&config), expected);
    }

    #[test]
    fn test_initialize_twice_fails() {
        let dir = std::env::temp_dir().join("sizing-backend-tracing-test");
        let config = LoggingConfig {
            level: "warn".into(),
            dir: Some(dir.to_string_lossy().into_owned()),
        };
        // глобальный subscriber мог уже установить другой тест
        let _ = initialize(&config);
        assert!(initialize(&config).is_err());
        assert!(dir.join(LOG_FILE_NAME).exists());
    }
}
