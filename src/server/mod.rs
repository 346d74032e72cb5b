//! # Servidor
//! src/server/mod.rs
//!
//! - `tcp`: accept loop, un thread por conexión
//! - `limiter`: tope de conexiones simultáneas
//! - `connection`: request → archivo → respuesta → access log

pub mod connection;
pub mod limiter;
pub mod tcp;

pub use connection::{ConnectionError, ConnectionHandler};
pub use limiter::{ConnectionLimiter, ConnectionPermit};
pub use tcp::{Server, ServerError};
