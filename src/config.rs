use sea_orm::{Database, DatabaseConnection, DbErr};

/// Immutable snapshot of the environment the server was started with.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub fallback_database_path: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            fallback_database_path: std::env::var("FALLBACK_DATABASE_PATH")
                .unwrap_or_else(|_| "vetclinic.db".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
        }
    }

    /// Local file-backed store, created on first use.
    pub fn fallback_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.fallback_database_path)
    }
}

/// Human-readable description of the connection the server ended up with.
/// Produced once at startup and injected into the router as an Extension;
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub description: String,
}

pub fn describe_url(url: &str) -> &'static str {
    if url.starts_with("postgres") {
        "PostgreSQL (remote)"
    } else if url.starts_with("mysql") {
        "MySQL (remote)"
    } else {
        "SQLite (local)"
    }
}

/// Connect to the configured database, falling back to the local SQLite
/// file when the primary connection cannot be established or pinged.
pub async fn connect_with_fallback(
    config: &AppConfig,
) -> Result<(DatabaseConnection, ConnectionInfo), DbErr> {
    if let Some(url) = &config.database_url {
        match try_connect(url).await {
            Ok(db) => {
                let info = ConnectionInfo {
                    description: describe_url(url).to_string(),
                };
                tracing::info!("database connected: {}", info.description);
                return Ok((db, info));
            }
            Err(err) => {
                tracing::warn!("primary database connection failed: {err}");
                tracing::warn!("falling back to the local SQLite store");
            }
        }
    }

    let db = try_connect(&config.fallback_url()).await?;
    let description = if config.database_url.is_some() {
        "SQLite (local fallback)"
    } else {
        "SQLite (local)"
    };
    let info = ConnectionInfo {
        description: description.to_string(),
    };
    tracing::info!("database connected: {}", info.description);
    Ok((db, info))
}

async fn try_connect(url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(url).await?;
    db.ping().await?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_url_by_scheme() {
        assert_eq!(
            describe_url("postgres://user:pw@host/db"),
            "PostgreSQL (remote)"
        );
        assert_eq!(describe_url("mysql://host/db"), "MySQL (remote)");
        assert_eq!(describe_url("sqlite://clinic.db"), "SQLite (local)");
    }

    #[test]
    fn fallback_url_creates_file_backed_store() {
        let config = AppConfig {
            database_url: None,
            fallback_database_path: "clinic.db".to_string(),
            port: 8000,
        };
        assert_eq!(config.fallback_url(), "sqlite://clinic.db?mode=rwc");
    }
}
