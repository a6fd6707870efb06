use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use cross_xdg::BaseDirs;

use crate::engine::{BracketStrategy, EngineOptions};
use crate::error::EngineError;
use crate::tape::CellRange;
use crate::theme::{parse_color, Colors};

/// User settings for hosts driving the engine.
///
/// Read once from `bf.toml` in the XDG config home, then overridden by
/// `BF_BITS`, `BF_SIGNED` and `BF_SPEED_MS`. Command-line flags override both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bits: u32,
    pub signed: bool,
    pub brackets: BracketStrategy,
    /// Delay between host ticks, in milliseconds.
    pub speed_ms: u64,
    /// Radius of the tape window shown by traces.
    pub window: usize,
    pub colors: Colors,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bits: 8,
            signed: false,
            brackets: BracketStrategy::Scan,
            speed_ms: 50,
            window: 8,
            colors: Colors::default(),
        }
    }
}

impl Settings {
    /// Parse the contents of a `bf.toml`.
    ///
    /// Only the handful of keys below are understood. Unknown keys are
    /// ignored; bad values are logged and leave the default in place.
    ///
    /// ```toml
    /// [tape]
    /// bits = 16
    /// signed = true
    ///
    /// [engine]
    /// brackets = "table"
    ///
    /// [host]
    /// speed_ms = 20
    /// window = 6
    ///
    /// [colors]
    /// cell_pointer = "#f9e2af"
    /// ```
    pub fn from_toml_str(content: &str) -> Self {
        let map = parse_sections(content);
        let mut cfg = Settings::default();

        for ((section, key), value) in &map {
            let applied = match (section.as_str(), key.as_str()) {
                ("tape", "bits") => parse_setting(key, value).map(|v| cfg.bits = v),
                ("tape", "signed") => parse_bool(key, value).map(|v| cfg.signed = v),
                ("engine", "brackets") => parse_brackets(value).map(|v| cfg.brackets = v),
                ("host", "speed_ms") => parse_setting(key, value).map(|v| cfg.speed_ms = v),
                ("host", "window") => parse_setting(key, value).map(|v| cfg.window = v),
                ("colors", name) => set_color(&mut cfg.colors, name, value),
                _ => Ok(()),
            };
            if let Err(e) = applied {
                tracing::warn!(section = %section, error = %e, "ignoring setting");
            }
        }

        cfg
    }

    /// Apply `BF_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        let overrides = [
            env_override("BF_BITS", |v| parse_setting("BF_BITS", v).map(|bits| self.bits = bits)),
            env_override("BF_SIGNED", |v| parse_bool("BF_SIGNED", v).map(|signed| self.signed = signed)),
            env_override("BF_SPEED_MS", |v| parse_setting("BF_SPEED_MS", v).map(|ms| self.speed_ms = ms)),
        ];
        for e in overrides.into_iter().filter_map(Result::err) {
            tracing::warn!(error = %e, "ignoring environment override");
        }
        self
    }

    /// Engine shape described by these settings.
    pub fn engine_options(&self) -> Result<EngineOptions, EngineError> {
        Ok(EngineOptions {
            range: CellRange::new(self.bits, self.signed)?,
            brackets: self.brackets,
        })
    }
}

fn env_override(
    name: &str,
    mut apply: impl FnMut(&str) -> Result<(), EngineError>,
) -> Result<(), EngineError> {
    match env::var(name) {
        Ok(v) => apply(v.trim()),
        Err(_) => Ok(()),
    }
}

fn invalid(key: &str, value: &str) -> EngineError {
    EngineError::InvalidSetting { key: key.to_string(), value: value.to_string() }
}

/// Parse a plain setting value, naming `key` in the error.
pub fn parse_setting<T: FromStr>(key: &str, value: &str) -> Result<T, EngineError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

/// Booleans as people write them in files and environments.
pub fn parse_bool(key: &str, value: &str) -> Result<bool, EngineError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| load_from_toml().unwrap_or_default().with_env_overrides())
}

pub fn parse_brackets(value: &str) -> Result<BracketStrategy, EngineError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "scan" => Ok(BracketStrategy::Scan),
        "table" => Ok(BracketStrategy::Table),
        _ => Err(invalid("brackets", value)),
    }
}

fn set_color(colors: &mut Colors, name: &str, value: &str) -> Result<(), EngineError> {
    let color = parse_color(value).ok_or_else(|| invalid(name, value))?;
    let slot = match name {
        "cell_zero" => &mut colors.cell_zero,
        "cell_nonzero" => &mut colors.cell_nonzero,
        "cell_pointer" => &mut colors.cell_pointer,
        "action" => &mut colors.action,
        "waiting" => &mut colors.waiting,
        "error" => &mut colors.error,
        _ => return Err(invalid(name, value)),
    };
    *slot = color;
    Ok(())
}

fn config_path() -> Option<PathBuf> {
    // Linux: ~/.config, macOS: ~/.config, Windows: C:\Users\<user>\.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

fn load_from_toml() -> Option<Settings> {
    let path = config_path()?;
    let content = fs::read_to_string(&path).ok()?;
    tracing::debug!(path = %path.display(), "loaded settings");
    Some(Settings::from_toml_str(&content))
}

/// Very small hand-rolled parser: `[section]` headers and `key = value`
/// pairs. Values may be quoted; trailing `# comments` are dropped.
fn parse_sections(content: &str) -> HashMap<(String, String), String> {
    let mut section = String::new();
    let mut map = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len() - 1].trim().to_string();
            continue;
        }
        let Some(eq) = line.find('=') else { continue };
        let key = line[..eq].trim().to_string();
        let mut val_raw = line[eq + 1..].trim();
        let val = if val_raw.starts_with('"') {
            let inner = &val_raw[1..];
            match inner.find('"') {
                Some(end) => inner[..end].to_string(),
                None => inner.to_string(),
            }
        } else {
            if let Some(hash) = val_raw.find(" #") {
                val_raw = val_raw[..hash].trim_end();
            }
            val_raw.to_string()
        };
        map.insert((section.clone(), key), val);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::from_toml_str(""), Settings::default());
    }

    #[test]
    fn reads_all_sections() {
        let cfg = Settings::from_toml_str(
            r##"
# bf settings
[tape]
bits = 16
signed = true

[engine]
brackets = "table"

[host]
speed_ms = 5   # fast
window = 3

[colors]
cell_pointer = "#010203"
"##,
        );
        assert_eq!(cfg.bits, 16);
        assert!(cfg.signed);
        assert_eq!(cfg.brackets, BracketStrategy::Table);
        assert_eq!(cfg.speed_ms, 5);
        assert_eq!(cfg.window, 3);
        assert_eq!(cfg.colors.cell_pointer, nu_ansi_term::Color::Rgb(1, 2, 3));
    }

    #[test]
    fn bad_values_keep_defaults() {
        let cfg = Settings::from_toml_str("[tape]\nbits = lots\nsigned = maybe\n[engine]\nbrackets = psychic\n");
        assert_eq!(cfg, Settings::default());
    }

    #[test]
    fn keys_outside_their_section_are_ignored() {
        let cfg = Settings::from_toml_str("bits = 16\n[host]\nbits = 4\n");
        assert_eq!(cfg.bits, 8);
    }

    #[test]
    fn engine_options_validate_width() {
        let cfg = Settings { bits: 0, ..Settings::default() };
        assert!(matches!(cfg.engine_options(), Err(EngineError::InvalidBitWidth { bits: 0 })));

        let cfg = Settings { bits: 8, signed: true, ..Settings::default() };
        let opts = cfg.engine_options().unwrap();
        assert_eq!(opts.range.min(), -128);
    }

    #[test]
    fn rejected_values_name_their_key() {
        let err = parse_setting::<u32>("BF_BITS", "eight").unwrap_err();
        assert!(matches!(
            &err,
            EngineError::InvalidSetting { key, value } if key == "BF_BITS" && value == "eight"
        ));
        assert_eq!(err.to_string(), "Invalid setting BF_BITS = 'eight'");

        assert!(matches!(parse_bool("signed", "maybe"), Err(EngineError::InvalidSetting { .. })));
        assert!(matches!(parse_brackets("psychic"), Err(EngineError::InvalidSetting { .. })));
        let mut colors = Colors::default();
        assert!(matches!(
            set_color(&mut colors, "cell_zero", "chartreuse"),
            Err(EngineError::InvalidSetting { .. })
        ));
        assert!(matches!(set_color(&mut colors, "border", "red"), Err(EngineError::InvalidSetting { .. })));
    }

    #[test]
    fn booleans_accept_common_spellings() {
        for yes in ["1", "true", "Yes", " on "] {
            assert_eq!(parse_bool("k", yes).ok(), Some(true));
        }
        for no in ["0", "FALSE", "no", "off"] {
            assert_eq!(parse_bool("k", no).ok(), Some(false));
        }
    }
}
