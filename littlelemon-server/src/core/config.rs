use crate::auth::{JwtConfig, JwtError};

/// Credentials of the staff account created at startup
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | HTTP_PORT | 8000 | HTTP listen port |
/// | DATABASE_URL | sqlite://littlelemon.db | SQLite database |
/// | ENVIRONMENT | development | development, staging or production |
/// | LOG_LEVEL | info | default level when RUST_LOG is unset (read by `setup_environment`) |
/// | LOG_DIR | (unset) | daily rolling log files go here when set (read by `setup_environment`) |
/// | PAGE_SIZE | (unset) | page size of list responses; unset disables pagination |
/// | LOGIN_DELAY_MS | 500 | fixed delay applied to every token login |
/// | JWT_SECRET etc. | see [`JwtConfig::from_env`] | token signing |
/// | ADMIN_USERNAME, ADMIN_PASSWORD, ADMIN_EMAIL | (unset) | bootstrap staff account |
/// | GROUPS | (unset) | comma-separated group names created at startup |
///
/// # Example
///
/// ```ignore
/// HTTP_PORT=8080 PAGE_SIZE=10 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub database_url: String,
    /// development | staging | production
    pub environment: String,
    pub page_size: Option<u32>,
    pub login_delay_ms: u64,
    pub jwt: JwtConfig,
    pub admin: Option<AdminAccount>,
    /// Groups users may be assigned to (by id)
    pub groups: Vec<String>,
}

impl Config {
    /// Defaults for everything except the JWT settings
    pub fn new(jwt: JwtConfig) -> Self {
        Self {
            http_port: 8000,
            database_url: "sqlite://littlelemon.db".into(),
            environment: "development".into(),
            page_size: None,
            login_delay_ms: 500,
            jwt,
            admin: None,
            groups: Vec::new(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables take their defaults.
    pub fn from_env() -> Result<Self, JwtError> {
        let defaults = Self::new(JwtConfig::from_env()?);

        let admin = match (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(AdminAccount {
                    username,
                    password,
                    email: std::env::var("ADMIN_EMAIL").unwrap_or_default(),
                })
            }
            _ => None,
        };

        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.http_port),
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            page_size: std::env::var("PAGE_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|size| *size > 0),
            login_delay_ms: std::env::var("LOGIN_DELAY_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.login_delay_ms),
            admin,
            groups: std::env::var("GROUPS")
                .map(|raw| parse_groups(&raw))
                .unwrap_or_default(),
            ..defaults
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// `"Manager, Delivery crew,,"` -> `["Manager", "Delivery crew"]`
fn parse_groups(raw: &str) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !groups.iter().any(|g| g == name) {
            groups.push(name.to_string());
        }
    }
    groups
}
