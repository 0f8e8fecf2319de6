use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_HOUSE_SYSTEM: char = 'P';
const SEARCH_PATHS: [&str; 2] = ["configs/sibyl.toml", "../../configs/sibyl.toml"];

/// Engine settings as read from `sibyl.toml`.
///
/// Body, tier and aspect names are kept as strings; the engine parses them.
#[derive(Debug, Clone, PartialEq)]
pub struct SibylSettings {
    pub ephemeris_path: Option<PathBuf>,
    pub house_system: char,
    /// `None` means every supported body
    pub bodies: Option<Vec<String>>,
    /// `None` means the standard calibration table
    pub calibration_bodies: Option<Vec<String>>,
    /// tier -> aspect -> orb in degrees
    pub orbs: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Default for SibylSettings {
    fn default() -> Self {
        Self {
            ephemeris_path: None,
            house_system: DEFAULT_HOUSE_SYSTEM,
            bodies: None,
            calibration_bodies: None,
            orbs: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EphemerisToml {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    house_system: Option<String>,
    #[serde(default)]
    bodies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CalibrationToml {
    #[serde(default)]
    override_bodies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    ephemeris: EphemerisToml,
    #[serde(default)]
    calibration: CalibrationToml,
    #[serde(default)]
    orbs: BTreeMap<String, BTreeMap<String, f64>>,
}

/// Text of `configs/sibyl.toml`, trying the usual relative locations.
///
/// `Ok(None)` when no file exists; an explicit path must exist.
pub fn read_config_text(explicit: Option<&Path>) -> anyhow::Result<Option<String>> {
    if let Some(path) = explicit {
        let text = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Could not read config {}: {e}", path.display()))?;
        return Ok(Some(text));
    }
    for p in &SEARCH_PATHS {
        if let Ok(text) = fs::read_to_string(p) {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

pub fn parse_settings(text: &str) -> anyhow::Result<SibylSettings> {
    let root: RootConfigToml = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse sibyl.toml: {e}"))?;
    let RootConfigToml {
        ephemeris,
        calibration,
        orbs,
    } = root;

    let house_system = match ephemeris.house_system.as_deref() {
        None => DEFAULT_HOUSE_SYSTEM,
        Some(code) => parse_house_system(code)?,
    };

    for (tier, aspects) in &orbs {
        for (aspect, orb) in aspects {
            if !orb.is_finite() || *orb < 0.0 {
                anyhow::bail!("orbs.{tier}.{aspect} must be a non-negative number, got {orb}");
            }
        }
    }

    Ok(SibylSettings {
        ephemeris_path: ephemeris.path,
        house_system,
        bodies: ephemeris.bodies,
        calibration_bodies: calibration.override_bodies,
        orbs,
    })
}

/// Load settings from `explicit` or the default locations; defaults when nothing is found
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<SibylSettings> {
    match read_config_text(explicit)? {
        Some(text) => parse_settings(&text),
        None => Ok(SibylSettings::default()),
    }
}

fn parse_house_system(code: &str) -> anyhow::Result<char> {
    let mut chars = code.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c),
        _ => anyhow::bail!(
            "ephemeris.house_system must be a single letter such as \"P\", got {code:?}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(parse_settings("").unwrap(), SibylSettings::default());
    }

    #[test]
    fn test_full_config() {
        let text = r#"
            [ephemeris]
            path = "/usr/local/share/swisseph"
            house_system = "K"
            bodies = ["sun", "moon", "chiron"]

            [calibration]
            override_bodies = ["sun"]

            [orbs.luminary]
            conjunction = 12.0

            [orbs.personal]
            quadrature = 4.5
        "#;
        let settings = parse_settings(text).unwrap();
        assert_eq!(
            settings.ephemeris_path.as_deref(),
            Some(Path::new("/usr/local/share/swisseph"))
        );
        assert_eq!(settings.house_system, 'K');
        assert_eq!(settings.bodies.unwrap().len(), 3);
        assert_eq!(settings.calibration_bodies, Some(vec!["sun".to_string()]));
        assert_eq!(settings.orbs["luminary"]["conjunction"], 12.0);
        assert_eq!(settings.orbs["personal"]["quadrature"], 4.5);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_settings("[ephemeris]\nhouse_system = \"PP\"").is_err());
        assert!(parse_settings("[orbs.social]\ntrigone = -1.0").is_err());
        assert!(parse_settings("[ephemeris]\nzodiac = \"sidereal\"").is_err());
    }

    #[test]
    fn test_shipped_config_parses() {
        let settings = parse_settings(include_str!("../../../configs/sibyl.toml")).unwrap();
        assert_eq!(settings.house_system, 'P');
        assert_eq!(settings.bodies.map(|b| b.len()), Some(14));
        assert_eq!(settings.calibration_bodies.map(|b| b.len()), Some(10));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        assert!(load_settings(Some(Path::new("/no/such/sibyl.toml"))).is_err());
    }
}
