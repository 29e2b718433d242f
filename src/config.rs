use std::path::PathBuf;

use url::Url;

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    pub api: Api,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(default)]
    pub calendar: Calendar,
}

#[derive(Debug, serde::Deserialize)]
pub struct Api {
    pub url: Url,
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Thumbnails {
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for Thumbnails {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            max_age_secs: default_max_age_secs(),
        }
    }
}

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Calendar {
    #[serde(default = "default_sample_fallback")]
    pub sample_fallback: bool,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            sample_fallback: default_sample_fallback(),
        }
    }
}

pub fn init(path: PathBuf) -> Result<Config, Box<dyn std::error::Error>> {
    let string = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&string)?;

    Ok(config)
}

const fn default_max_concurrent() -> usize {
    3
}

const fn default_max_age_secs() -> u64 {
    300
}

const fn default_sample_fallback() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            url = "https://api.example.test/"
            "#,
        )
        .unwrap();

        assert_eq!(config.thumbnails.max_concurrent, 3);
        assert_eq!(config.thumbnails.max_age_secs, 300);
        assert!(config.calendar.sample_fallback);
    }

    #[test]
    fn sections_override_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            url = "https://api.example.test/"

            [thumbnails]
            max_concurrent = 5
            max_age_secs = 60

            [calendar]
            sample_fallback = false
            "#,
        )
        .unwrap();

        assert_eq!(config.thumbnails.max_concurrent, 5);
        assert_eq!(config.thumbnails.max_age_secs, 60);
        assert!(!config.calendar.sample_fallback);
    }
}
