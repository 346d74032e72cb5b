//! # Manejo de una conexión
//! src/server/connection.rs
//!
//! Una conexión = un request = una respuesta:
//!
//! ```text
//! leer request → elegir archivo → armar respuesta → escribir headers + body
//!             → access log → cerrar
//! ```
//!
//! Ningún error sale de [`ConnectionHandler::handle`]: se reportan con `log`
//! y la conexión se cierra igual. Si la request line no se puede parsear se
//! responde 400 con la página de error (si la conexión llega vacía no se
//! responde nada).

use crate::access_log::{AccessLogEntry, AccessLogger};
use crate::config::ServerConfig;
use crate::files::{StaticFiles, TargetError};
use crate::http::{date, ContentEncoding, MimeMap, ParseError, Request, StatusCode};
use std::io::{self, BufReader, Read, Write};
use std::net::IpAddr;

/// Versión usada cuando no hay request del cual copiarla
const FALLBACK_VERSION: &str = "HTTP/1.1";

/// Errores que abortan una conexión
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Target(#[from] TargetError),
}

/// Estado de solo lectura compartido por todos los threads de conexión
#[derive(Debug)]
pub struct ConnectionHandler {
    files: StaticFiles,
    server_identity: String,
    access_log: AccessLogger,
}

impl ConnectionHandler {
    pub fn new(files: StaticFiles, server_identity: impl Into<String>, access_log: AccessLogger) -> Self {
        Self {
            files,
            server_identity: server_identity.into(),
            access_log,
        }
    }

    /// Arma el handler con la tabla MIME y el access log configurados
    pub fn from_config(config: &ServerConfig) -> io::Result<Self> {
        let mut mime = MimeMap::default();
        if let Some(path) = &config.mime_types {
            mime.load_file(path)?;
            log::info!("loaded mime types from {}", path.display());
        }

        let access_log = match &config.access_log {
            Some(path) => AccessLogger::append_to(path)?,
            None => AccessLogger::stdout(),
        };

        let files = StaticFiles::new(&config.document_root, &config.error_root, mime);
        Ok(Self::new(files, config.server_identity.clone(), access_log))
    }

    /// Atiende una conexión completa; los errores solo se registran
    pub fn handle<S: Read + Write>(&self, stream: S, remote: Option<IpAddr>) {
        if let Err(e) = self.process(stream, remote) {
            match remote {
                Some(ip) => log::error!("connection from {} aborted: {}", ip, e),
                None => log::error!("connection aborted: {}", e),
            }
        }
    }

    fn process<S: Read + Write>(&self, stream: S, remote: Option<IpAddr>) -> Result<(), ConnectionError> {
        let mut reader = BufReader::new(stream);

        let request = match Request::read_from(&mut reader) {
            Ok(request) => Some(request),
            Err(ParseError::EmptyRequest) => {
                log::debug!("connection closed before sending a request");
                return Ok(());
            }
            Err(ParseError::InvalidRequestLine(line)) => {
                log::warn!("unparsable request line {:?}, answering 400", line);
                None
            }
            Err(ParseError::HeadTooLarge) => {
                log::warn!("request head too large, answering 400");
                None
            }
            Err(ParseError::Io(e)) => return Err(e.into()),
        };

        let target = match &request {
            Some(request) => self.files.select(request)?,
            None => self.files.error_target(StatusCode::BadRequest)?,
        };

        let version = request.as_ref().map_or(FALLBACK_VERSION, |r| r.version());
        let encoding = ContentEncoding::negotiate(request.as_ref().is_some_and(|r| r.accepts_gzip()));
        let date = date::now();

        let response = target.build_response(version, &self.server_identity, &date, encoding)?;
        response.write_to(reader.get_mut())?;

        log::debug!(
            "{} {} -> {}",
            response.status(),
            target.file_path.display(),
            response.header("Content-Length").unwrap_or("0")
        );

        self.access_log.log(&AccessLogEntry {
            remote,
            date: &date,
            method: request.as_ref().map_or("-", |r| r.method().as_str()),
            status: target.status,
            user_agent: request.as_ref().map_or("", |r| r.user_agent()),
            resource: request.as_ref().map_or("-", |r| r.path()),
        });

        Ok(())
    }
}
