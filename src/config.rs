#[derive(Clone)]
pub struct Config {
    pub port: u16,
    // Shared secret for token signing. Absent means logins fail with a
    // server misconfiguration error rather than a panic at startup.
    pub jwt_secret: Option<String>,
    pub token_ttl_seconds: u64,
}
