use atlas::{load_catalog, resolve_atlas_paths, CatalogStore, ViewMode};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const VIEW_ENV_VAR: &str = "CAMP_VIEW";
const THEME_ENV_VAR: &str = "CAMP_THEME";
const WATERMARK_ENV_VAR: &str = "CAMP_WATERMARK";
const PORT_ENV_VAR: &str = "CAMP_PORT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Theme {
    Light,
    Dark,
}

impl Theme {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Ambient preferences, read once at startup. Invalid values fall back to
/// defaults with a warning rather than failing startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CampSettings {
    pub(crate) view_mode: ViewMode,
    pub(crate) theme: Theme,
    pub(crate) show_watermark: bool,
    pub(crate) port: u16,
}

impl Default for CampSettings {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Grid,
            theme: Theme::Dark,
            show_watermark: true,
            port: teleport_cli::DEFAULT_PORT,
        }
    }
}

impl CampSettings {
    pub(crate) fn from_env() -> Self {
        Self::from_values(
            std::env::var(VIEW_ENV_VAR).ok().as_deref(),
            std::env::var(THEME_ENV_VAR).ok().as_deref(),
            std::env::var(WATERMARK_ENV_VAR).ok().as_deref(),
            std::env::var(PORT_ENV_VAR).ok().as_deref(),
        )
    }

    // Value-level so it is testable without touching the process environment.
    fn from_values(
        view: Option<&str>,
        theme: Option<&str>,
        watermark: Option<&str>,
        port: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            view_mode: parse_view(view, defaults.view_mode),
            theme: parse_theme(theme, defaults.theme),
            show_watermark: parse_watermark(watermark, defaults.show_watermark),
            port: parse_port(port, defaults.port),
        }
    }
}

fn parse_view(raw: Option<&str>, default: ViewMode) -> ViewMode {
    match raw {
        Some(value) => ViewMode::parse(value).unwrap_or_else(|| {
            warn!(value, "camp_invalid_view_using_default");
            default
        }),
        None => default,
    }
}

fn parse_theme(raw: Option<&str>, default: Theme) -> Theme {
    match raw {
        Some(value) => Theme::parse(value).unwrap_or_else(|| {
            warn!(value, "camp_invalid_theme_using_default");
            default
        }),
        None => default,
    }
}

fn parse_watermark(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some("0") | Some("false") | Some("off") => false,
        Some("1") | Some("true") | Some("on") => true,
        Some(value) => {
            warn!(value, "camp_invalid_watermark_using_default");
            default
        }
        None => default,
    }
}

fn parse_port(raw: Option<&str>, default: u16) -> u16 {
    match raw {
        Some(value) => match value.parse::<u16>() {
            Ok(parsed_port) => parsed_port,
            Err(_) => {
                warn!(
                    value,
                    fallback_port = default,
                    "camp_invalid_port_using_default"
                );
                default
            }
        },
        None => default,
    }
}

pub(crate) struct AppWiring {
    pub(crate) store: CatalogStore,
    pub(crate) settings: CampSettings,
}

pub(crate) fn build_app() -> Result<AppWiring, String> {
    init_tracing();
    info!("=== Camp Startup ===");

    let settings = CampSettings::from_env();
    let paths = resolve_atlas_paths().map_err(|error| error.to_string())?;
    let store = load_catalog(&paths.catalog_path).map_err(|error| error.to_string())?;
    info!(
        catalog = %paths.catalog_path.display(),
        area_count = store.areas().len(),
        theme = settings.theme.as_str(),
        view = settings.view_mode.as_str(),
        watermark = settings.show_watermark,
        port = settings.port,
        "catalog_loaded"
    );

    Ok(AppWiring { store, settings })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_yield_defaults() {
        let settings = CampSettings::from_values(None, None, None, None);
        assert_eq!(settings, CampSettings::default());
    }

    #[test]
    fn valid_values_are_applied() {
        let settings =
            CampSettings::from_values(Some("list"), Some("light"), Some("off"), Some("9000"));
        assert_eq!(settings.view_mode, ViewMode::List);
        assert_eq!(settings.theme, Theme::Light);
        assert!(!settings.show_watermark);
        assert_eq!(settings.port, 9000);
    }

    #[test]
    fn each_invalid_value_falls_back_independently() {
        let settings = CampSettings::from_values(
            Some("diagonal"),
            Some("sepia"),
            Some("maybe"),
            Some("99999"),
        );
        assert_eq!(settings, CampSettings::default());

        // One bad field does not drag down the others.
        let settings =
            CampSettings::from_values(Some("list"), Some("sepia"), Some("1"), Some("not-a-port"));
        assert_eq!(settings.view_mode, ViewMode::List);
        assert_eq!(settings.theme, Theme::Dark);
        assert!(settings.show_watermark);
        assert_eq!(settings.port, teleport_cli::DEFAULT_PORT);
    }

    #[test]
    fn watermark_accepts_the_documented_spellings() {
        for value in ["1", "true", "on"] {
            assert!(parse_watermark(Some(value), false));
        }
        for value in ["0", "false", "off"] {
            assert!(!parse_watermark(Some(value), true));
        }
    }
}
