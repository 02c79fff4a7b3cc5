use std::path::PathBuf;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "REGION_DASHBOARD_DATA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding `budget.csv`, `housing.csv` and `investments.csv`.
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// First CLI argument, then [`DATA_DIR_ENV`], then the working directory.
    pub fn from_env() -> Self {
        Self::from_sources(std::env::args().nth(1), std::env::var(DATA_DIR_ENV).ok())
    }

    fn from_sources(arg: Option<String>, env: Option<String>) -> Self {
        let non_blank = |s: &String| !s.trim().is_empty();
        let data_dir = arg
            .filter(non_blank)
            .or(env.filter(non_blank))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        AppConfig { data_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_wins_over_environment() {
        let cfg = AppConfig::from_sources(Some("cli".into()), Some("env".into()));
        assert_eq!(cfg.data_dir, PathBuf::from("cli"));
    }

    #[test]
    fn environment_then_default() {
        let cfg = AppConfig::from_sources(None, Some("env".into()));
        assert_eq!(cfg.data_dir, PathBuf::from("env"));

        let cfg = AppConfig::from_sources(None, None);
        assert_eq!(cfg.data_dir, PathBuf::from("."));

        let cfg = AppConfig::from_sources(None, Some("  ".into()));
        assert_eq!(cfg.data_dir, PathBuf::from("."));
    }

    #[test]
    fn blank_argument_does_not_hide_environment() {
        let cfg = AppConfig::from_sources(Some(" ".into()), Some("env".into()));
        assert_eq!(cfg.data_dir, PathBuf::from("env"));
    }
}
