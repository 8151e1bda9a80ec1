use std::path::PathBuf;

/// Session secret used when `SESSION_SECRET` is not set. Fine for local
/// development only.
pub const DEFAULT_SESSION_SECRET: &str = "notagoodsecret";

/// An environment variable held a value of the wrong shape.
#[derive(Debug, thiserror::Error)]
#[error("{name} must be a valid {expected}, got '{value}'")]
pub struct ConfigError {
    pub name: &'static str,
    pub expected: &'static str,
    pub value: String,
}

/// Credentials for the Cloudinary image CDN.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Secret the session cookie signing key is derived from.
    pub session_secret: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory locally stored images are written to and served from.
    pub upload_dir: PathBuf,
    /// Remote image storage; `None` stores uploads on local disk.
    pub cloudinary: Option<CloudinaryConfig>,
    /// Key for the map embed on listing pages.
    pub google_maps_api_key: Option<String>,
    /// Restrict listing edits and deletes to the listing's host.
    pub enforce_listing_ownership: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                           |
    /// |-----------------------------|-----------------------------------|
    /// | `HOST`                      | `0.0.0.0`                         |
    /// | `PORT`                      | `8080`                            |
    /// | `DATABASE_URL`              | `postgres://localhost/wanderlust` |
    /// | `SESSION_SECRET`            | `notagoodsecret`                  |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                              |
    /// | `UPLOAD_DIR`                | `uploads`                         |
    /// | `CLOUDINARY_CLOUD_NAME`     | unset                             |
    /// | `CLOUDINARY_KEY`            | unset                             |
    /// | `CLOUDINARY_SECRET`         | unset                             |
    /// | `GOOGLE_MAPS_API_KEY`       | unset                             |
    /// | `ENFORCE_LISTING_OWNERSHIP` | `false`                           |
    ///
    /// Cloudinary is only used when all three of its variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let or = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let port = parse_number("PORT", &or("PORT", "8080"))?;
        let request_timeout_secs =
            parse_number("REQUEST_TIMEOUT_SECS", &or("REQUEST_TIMEOUT_SECS", "30"))?;
        let enforce_listing_ownership = parse_bool(
            "ENFORCE_LISTING_OWNERSHIP",
            &or("ENFORCE_LISTING_OWNERSHIP", "false"),
        )?;

        let cloudinary = match (
            var("CLOUDINARY_CLOUD_NAME"),
            var("CLOUDINARY_KEY"),
            var("CLOUDINARY_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Ok(Self {
            host: or("HOST", "0.0.0.0"),
            port,
            database_url: or("DATABASE_URL", "postgres://localhost/wanderlust"),
            session_secret: or("SESSION_SECRET", DEFAULT_SESSION_SECRET),
            request_timeout_secs,
            upload_dir: PathBuf::from(or("UPLOAD_DIR", "uploads")),
            cloudinary,
            google_maps_api_key: var("GOOGLE_MAPS_API_KEY"),
            enforce_listing_ownership,
        })
    }

    /// True when running with the built-in development secret.
    pub fn uses_default_session_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError {
        name,
        expected: "number",
        value: raw.to_string(),
    })
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            name,
            expected: "boolean",
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.upload_dir, PathBuf::from("uploads"));
        assert!(cfg.cloudinary.is_none());
        assert!(cfg.google_maps_api_key.is_none());
        assert!(!cfg.enforce_listing_ownership);
        assert!(cfg.uses_default_session_secret());
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config(&[
            ("PORT", "3000"),
            ("SESSION_SECRET", "s3cret"),
            ("ENFORCE_LISTING_OWNERSHIP", "yes"),
            ("GOOGLE_MAPS_API_KEY", "maps-key"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 3000);
        assert!(!cfg.uses_default_session_secret());
        assert!(cfg.enforce_listing_ownership);
        assert_eq!(cfg.google_maps_api_key.as_deref(), Some("maps-key"));
    }

    #[test]
    fn cloudinary_needs_all_three_variables() {
        let partial = config(&[("CLOUDINARY_CLOUD_NAME", "demo"), ("CLOUDINARY_KEY", "k")]).unwrap();
        assert!(partial.cloudinary.is_none());

        let full = config(&[
            ("CLOUDINARY_CLOUD_NAME", "demo"),
            ("CLOUDINARY_KEY", "k"),
            ("CLOUDINARY_SECRET", "s"),
        ])
        .unwrap();
        assert_eq!(full.cloudinary.unwrap().cloud_name, "demo");
    }

    #[test]
    fn malformed_values_are_errors() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert_eq!(err.name, "PORT");

        let err = config(&[("ENFORCE_LISTING_OWNERSHIP", "maybe")]).unwrap_err();
        assert_eq!(err.expected, "boolean");
    }
}
