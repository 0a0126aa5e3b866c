use clap::Parser;
use std::path::PathBuf;

/// Local HTTP API for checklist templates and checks.
#[derive(Debug, Clone, Parser)]
#[command(name = "checklist_server")]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "CHECKLIST_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "CHECKLIST_PORT", default_value_t = 51789)]
    pub port: u16,

    /// Path to the host document (SQLite file)
    #[arg(long, env = "CHECKLIST_DOCUMENT", default_value = "checklist.sqlite")]
    pub document: PathBuf,

    /// Operator name recorded in audit fields, instead of the OS user
    #[arg(long, env = "CHECKLIST_USER")]
    pub user: Option<String>,

    /// Maximum number of host actions waiting to run
    #[arg(long, env = "CHECKLIST_QUEUE_CAPACITY", default_value_t = 100)]
    pub queue_capacity: usize,

    /// Maximum JSON request body size in bytes
    #[arg(long, env = "CHECKLIST_BODY_LIMIT", default_value_t = 10 * 1024 * 1024)]
    pub body_limit: usize,
}

impl ServerConfig {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
