use simplelog::*;

/// Tuning of the flux engine.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationSettings {
    /// a numeric surface-element coefficient below this magnitude is treated as zero
    pub zero_tolerance: f64,
    /// "debug", "info", "warn", "error" or "off"; None leaves logging untouched
    pub loglevel: Option<String>,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        IntegrationSettings {
            zero_tolerance: 1e-12,
            loglevel: None,
        }
    }
}

impl IntegrationSettings {
    pub fn new(zero_tolerance: f64, loglevel: Option<String>) -> Self {
        IntegrationSettings {
            zero_tolerance,
            loglevel,
        }
    }
}

/// `Ok(None)` means logging is switched off, `Err` describes an unknown level
pub fn level_filter(loglevel: &str) -> Result<Option<LevelFilter>, String> {
    match loglevel {
        "debug" => Ok(Some(LevelFilter::Debug)),
        "info" => Ok(Some(LevelFilter::Info)),
        "warn" => Ok(Some(LevelFilter::Warn)),
        "error" => Ok(Some(LevelFilter::Error)),
        "off" | "none" => Ok(None),
        other => Err(format!("unknown loglevel '{}', falling back to info", other)),
    }
}

/// Installs a terminal logger. Returns false when logging is off or a
/// logger is already installed. An unknown level installs `info` and is
/// reported through the log itself.
pub fn init_logger(loglevel: &str) -> bool {
    let (log_option, unknown) = match level_filter(loglevel) {
        Ok(None) => return false,
        Ok(Some(level)) => (level, None),
        Err(message) => (LevelFilter::Info, Some(message)),
    };
    let installed = CombinedLogger::init(vec![TermLogger::new(
        log_option,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .is_ok();
    if let Some(message) = unknown {
        log::warn!("{}", message);
    }
    if installed {
        log::info!("logger started with loglevel: {}", log_option);
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = IntegrationSettings::default();
        assert_eq!(settings.zero_tolerance, 1e-12);
        assert!(settings.loglevel.is_none());
    }

    #[test]
    fn test_level_filter() {
        assert_eq!(level_filter("warn"), Ok(Some(LevelFilter::Warn)));
        assert_eq!(level_filter("debug"), Ok(Some(LevelFilter::Debug)));
        assert_eq!(level_filter("off"), Ok(None));
        let unknown = level_filter("loud").unwrap_err();
        assert!(unknown.contains("'loud'"));
        assert!(!init_logger("off"));
    }
}
