// config.rs
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::models::polaroidmodel::{ImageHostKind, ResultMime};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{key} has an invalid value '{value}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    // Image hosting
    pub image_host: ImageHostKind,
    pub tmpfiles_upload_url: String,
    pub postimages_upload_url: String,
    // Compositing API
    pub compositor_url: String,
    // Outbound call bounds
    pub upload_timeout: Duration,
    pub compose_timeout: Duration,
    pub parallel_uploads: bool,
    // Response and request shaping
    pub result_mime: ResultMime,
    pub max_image_bytes: usize,
    pub body_limit_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8000,
            image_host: ImageHostKind::TmpFiles,
            tmpfiles_upload_url: "https://tmpfiles.org/api/v1/upload".to_string(),
            postimages_upload_url: "https://postimages.org/json/rr".to_string(),
            compositor_url: "https://api.zenzxz.my.id/api/maker/polaroid".to_string(),
            upload_timeout: Duration::from_secs(20),
            compose_timeout: Duration::from_secs(30),
            parallel_uploads: false,
            result_mime: ResultMime::Png,
            max_image_bytes: 10 * 1024 * 1024,
            body_limit_bytes: 30 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    /// for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let port = parse_or(&lookup, "PORT", defaults.port)?;
        let image_host = parse_or(&lookup, "IMAGE_HOST", defaults.image_host)?;
        let tmpfiles_upload_url = lookup("TMPFILES_UPLOAD_URL")
            .unwrap_or(defaults.tmpfiles_upload_url);
        let postimages_upload_url = lookup("POSTIMAGES_UPLOAD_URL")
            .unwrap_or(defaults.postimages_upload_url);
        let compositor_url = lookup("COMPOSITOR_URL")
            .unwrap_or(defaults.compositor_url);

        let upload_timeout_secs = parse_or(&lookup, "UPLOAD_TIMEOUT_SECS", defaults.upload_timeout.as_secs())?;
        let compose_timeout_secs = parse_or(&lookup, "COMPOSE_TIMEOUT_SECS", defaults.compose_timeout.as_secs())?;
        let parallel_uploads = parse_or(&lookup, "PARALLEL_UPLOADS", defaults.parallel_uploads)?;

        let result_mime = parse_or(&lookup, "RESULT_MIME", defaults.result_mime)?;
        let max_image_bytes = parse_or(&lookup, "MAX_IMAGE_BYTES", defaults.max_image_bytes)?;
        let body_limit_bytes = parse_or(&lookup, "BODY_LIMIT_BYTES", defaults.body_limit_bytes)?;

        Ok(Config {
            port,
            image_host,
            tmpfiles_upload_url,
            postimages_upload_url,
            compositor_url,
            upload_timeout: Duration::from_secs(upload_timeout_secs),
            compose_timeout: Duration::from_secs(compose_timeout_secs),
            parallel_uploads,
            result_mime,
            max_image_bytes,
            body_limit_bytes,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.image_host, ImageHostKind::TmpFiles);
        assert_eq!(config.upload_timeout, Duration::from_secs(20));
        assert_eq!(config.compose_timeout, Duration::from_secs(30));
        assert_eq!(config.result_mime, ResultMime::Png);
        assert!(!config.parallel_uploads);
        assert_eq!(config.max_image_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "3000"),
            ("IMAGE_HOST", "postimages"),
            ("RESULT_MIME", "image/jpeg"),
            ("UPLOAD_TIMEOUT_SECS", "5"),
            ("PARALLEL_UPLOADS", "true"),
            ("COMPOSITOR_URL", "http://localhost:9000/polaroid"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.image_host, ImageHostKind::PostImages);
        assert_eq!(config.result_mime, ResultMime::Jpeg);
        assert_eq!(config.upload_timeout, Duration::from_secs(5));
        assert!(config.parallel_uploads);
        assert_eq!(config.compositor_url, "http://localhost:9000/polaroid");
    }

    #[test]
    fn test_blank_value_falls_back_to_default() {
        let config = Config::from_lookup(lookup_from(&[("PORT", "  ")])).unwrap();
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_invalid_value_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("COMPOSE_TIMEOUT_SECS", "soon")])).unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "COMPOSE_TIMEOUT_SECS");
                assert_eq!(value, "soon");
            }
        }

        assert!(Config::from_lookup(lookup_from(&[("IMAGE_HOST", "imgur")])).is_err());
    }
}
