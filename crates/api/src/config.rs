use crate::auth::jwt::JwtConfig;

/// Default path prefix every route is nested under.
pub const DEFAULT_ROUTE_PREFIX: &str = "/make-server";

/// Default lifetime of locally issued access tokens.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60;

/// Upper bound on `JWT_ACCESS_EXPIRY_MINS` (30 days).
const MAX_ACCESS_EXPIRY_MINS: i64 = 30 * 24 * 60;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Where initiative and profile records are persisted.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// `kv_store` table in PostgreSQL.
    Postgres { database_url: String },
    /// In-process map; contents are lost on restart.
    Memory,
}

/// Which identity provider issues and validates bearer tokens.
#[derive(Debug, Clone)]
pub enum AuthBackend {
    /// Hosted Supabase Auth (GoTrue) reached over HTTP.
    Supabase {
        url: String,
        service_role_key: String,
    },
    /// In-process accounts with locally signed JWTs.
    Local { jwt: JwtConfig },
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the
/// credentials of whichever store and auth backends are selected.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Path prefix for every route, without trailing slash. Empty means root.
    pub route_prefix: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub log_format: LogFormat,
    pub store: StoreBackend,
    pub auth: AuthBackend,
    /// When set, `POST /signup` must carry this value as its bearer token.
    pub public_anon_key: Option<String>,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                     | Default          |
    /// |-----------------------------|------------------|
    /// | `HOST`                      | `0.0.0.0`        |
    /// | `PORT`                      | `3000`           |
    /// | `ROUTE_PREFIX`              | `/make-server`   |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`             |
    /// | `LOG_FORMAT`                | `pretty`         |
    /// | `STORE_BACKEND`             | `postgres`       |
    /// | `DATABASE_URL`              | required for `postgres` |
    /// | `AUTH_BACKEND`              | `supabase`       |
    /// | `SUPABASE_URL`              | required for `supabase` |
    /// | `SUPABASE_SERVICE_ROLE_KEY` | required for `supabase` |
    /// | `JWT_SECRET`                | required for `local`    |
    /// | `JWT_ACCESS_EXPIRY_MINS`    | `60` (1..=43200) |
    /// | `PUBLIC_ANON_KEY`           | unset            |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", var("PORT"), 3000u16)?;
        let route_prefix =
            normalize_prefix(&var("ROUTE_PREFIX").unwrap_or_else(|| DEFAULT_ROUTE_PREFIX.into()));
        let request_timeout_secs =
            parse_or("REQUEST_TIMEOUT_SECS", var("REQUEST_TIMEOUT_SECS"), 30u64)?;

        let log_format = match var("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "LOG_FORMAT",
                    message: format!("expected 'pretty' or 'json', got '{other}'"),
                })
            }
        };

        let store = match var("STORE_BACKEND").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres {
                database_url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "STORE_BACKEND",
                    message: format!("expected 'postgres' or 'memory', got '{other}'"),
                })
            }
        };

        let auth = match var("AUTH_BACKEND").as_deref() {
            None | Some("supabase") => {
                let url = var("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
                reqwest::Url::parse(&url).map_err(|e| ConfigError::Invalid {
                    var: "SUPABASE_URL",
                    message: e.to_string(),
                })?;
                AuthBackend::Supabase {
                    url: url.trim_end_matches('/').to_string(),
                    service_role_key: var("SUPABASE_SERVICE_ROLE_KEY")
                        .ok_or(ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))?,
                }
            }
            Some("local") => AuthBackend::Local {
                jwt: JwtConfig {
                    secret: var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?,
                    access_token_expiry_mins: access_expiry_mins(var("JWT_ACCESS_EXPIRY_MINS"))?,
                },
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "AUTH_BACKEND",
                    message: format!("expected 'supabase' or 'local', got '{other}'"),
                })
            }
        };

        Ok(Self {
            host,
            port,
            route_prefix,
            request_timeout_secs,
            log_format,
            store,
            auth,
            public_anon_key: var("PUBLIC_ANON_KEY"),
        })
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: name,
            message: e.to_string(),
        }),
    }
}

fn access_expiry_mins(raw: Option<String>) -> Result<i64, ConfigError> {
    let mins = parse_or("JWT_ACCESS_EXPIRY_MINS", raw, DEFAULT_ACCESS_EXPIRY_MINS)?;
    if !(1..=MAX_ACCESS_EXPIRY_MINS).contains(&mins) {
        return Err(ConfigError::Invalid {
            var: "JWT_ACCESS_EXPIRY_MINS",
            message: format!("must be between 1 and {MAX_ACCESS_EXPIRY_MINS}, got {mins}"),
        });
    }
    Ok(mins)
}

/// `"api/"` -> `"/api"`, `"/"` -> `""`.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}
