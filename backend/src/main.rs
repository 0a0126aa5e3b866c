use checklist_server::config::ServerConfig;
use checklist_server::server;
use clap::Parser;
use env_logger::Env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let config = ServerConfig::parse();
    server::run(config).await
}
