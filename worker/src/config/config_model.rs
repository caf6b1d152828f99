#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub worker_server: WorkerServer,
    pub database: Database,
    pub telegram: Telegram,
    pub sweeps: SweepSchedule,
    pub access: ServiceAccess,
}

#[derive(Debug, Clone)]
pub struct WorkerServer {
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

#[derive(Debug, Clone)]
pub struct SweepSchedule {
    /// Cadence of the revoke sweep.
    pub revoke_interval_secs: u64,
    /// Hour of day (UTC) at which the daily reminder sweep runs.
    pub reminder_hour_utc: u32,
}

#[derive(Debug, Clone)]
pub struct ServiceAccess {
    pub service_token: String,
}
