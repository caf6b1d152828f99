#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub telegram: Telegram,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Telegram {
    pub bot_token: String,
}

/// Shared-secret access control for the trusted messaging layer plus
/// the list of chat ids allowed to call admin operations.
#[derive(Debug, Clone)]
pub struct Access {
    pub service_token: String,
    pub admin_ids: Vec<i64>,
}
