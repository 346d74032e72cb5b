//! # Static Server
//! src/lib.rs
//!
//! Servidor HTTP mínimo de archivos estáticos. Atiende un request por
//! conexión, solo `GET`, con páginas de error propias para 400, 404 y 501,
//! compresión gzip opcional y un access log de una línea por request.
//!
//! ## Módulos
//!
//! - `config`: `server.properties` + línea de comandos
//! - `http`: parsing de requests, armado de respuestas, MIME y fechas
//! - `files`: resolución de paths y elección del archivo a servir
//! - `access_log`: líneas del access log
//! - `server`: socket, threads y manejo de cada conexión
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use static_server::config::ServerConfig;
//! use static_server::server::Server;
//!
//! let server = Server::bind(ServerConfig::default()).unwrap();
//! server.run().unwrap();
//! ```

pub mod access_log;
pub mod config;
pub mod files;
pub mod http;
pub mod server;
