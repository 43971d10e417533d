use sea_orm::{Database, DatabaseConnection, DbErr};
use std::env;

/// Hides the password section of a connection URL so the full string can be
/// logged at startup.
fn redact_db_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    let Some(at) = rest.find('@') else {
        return url.to_string();
    };
    let userinfo = &rest[..at];
    match userinfo.find(':') {
        Some(colon) => format!(
            "{}{}:***@{}",
            &url[..scheme_end + 3],
            &userinfo[..colon],
            &rest[at + 1..]
        ),
        None => url.to_string(),
    }
}

pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let url = env::var("DATABASE_URL")
        .map_err(|_| DbErr::Custom("DATABASE_URL is not set".to_string()))?;
    tracing::info!(url = %redact_db_url(&url), "connecting to database");
    Database::connect(url).await
}

#[cfg(test)]
mod tests {
    use super::redact_db_url;

    #[test]
    fn redacts_password_in_url() {
        assert_eq!(
            redact_db_url("postgres://ems:s3cret@db:5432/ems"),
            "postgres://ems:***@db:5432/ems"
        );
    }

    #[test]
    fn leaves_urls_without_credentials_alone() {
        assert_eq!(
            redact_db_url("postgres://db:5432/ems"),
            "postgres://db:5432/ems"
        );
    }
}
