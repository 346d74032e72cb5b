//! # Access log
//! src/access_log.rs
//!
//! Una línea por conexión atendida:
//!
//! ```text
//! 127.0.0.1 [Fri, 08 Mar 2019 14:05:09 GMT] "GET" 200 OK curl/7.61.1 /
//! ```
//!
//! El sink se comparte entre todos los threads de conexión; cada línea se
//! formatea y escribe con el lock tomado para que no se mezclen.

use crate::http::StatusCode;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::net::IpAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Datos de una línea del access log
#[derive(Debug, Clone)]
pub struct AccessLogEntry<'a> {
    pub remote: Option<IpAddr>,
    pub date: &'a str,
    pub method: &'a str,
    pub status: StatusCode,
    pub user_agent: &'a str,
    pub resource: &'a str,
}

impl std::fmt::Display for AccessLogEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.remote {
            Some(ip) => write!(f, "{}", ip)?,
            None => f.write_str("-")?,
        }
        write!(
            f,
            " [{}] \"{}\" {} {} {}",
            self.date, self.method, self.status, self.user_agent, self.resource
        )
    }
}

/// Logger thread-safe de requests atendidos
#[derive(Clone)]
pub struct AccessLogger {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl AccessLogger {
    /// Logger sobre cualquier destino
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
        }
    }

    /// Logger sobre la salida estándar
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Logger que agrega líneas al final de un archivo
    pub fn append_to(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Escribe una línea; las fallas solo se reportan, nunca se propagan
    pub fn log(&self, entry: &AccessLogEntry<'_>) {
        let line = entry.to_string();
        let mut sink = self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Err(e) = writeln!(sink, "{}", line).and_then(|_| sink.flush()) {
            log::warn!("failed to write access log line: {}", e);
        }
    }
}

impl std::fmt::Debug for AccessLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessLogger").finish_non_exhaustive()
    }
}
