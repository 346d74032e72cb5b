//! # Static Server - Entry Point
//! src/main.rs
//!
//! Carga la configuración, abre el socket y atiende conexiones hasta que
//! el proceso termine.

use clap::Parser;
use static_server::config::{Cli, ServerConfig};
use static_server::server::Server;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match ServerConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    config.print_summary();

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        log::error!("server stopped: {}", e);
        std::process::exit(1);
    }
}
