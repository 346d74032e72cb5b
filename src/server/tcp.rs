//! # Servidor TCP concurrente
//! src/server/tcp.rs
//!
//! Un thread por conexión. Antes de lanzar el thread el accept loop pide un
//! permiso al [`ConnectionLimiter`]; con `server.max.connections` conexiones
//! activas la conexión nueva se cierra sin respuesta y el accept loop sigue.
//!
//! `server.read.timeout.ms` es un plazo total para recibir el request, no
//! por cada `read`. El socket se cierra al terminar el thread, pase lo que
//! pase con el request.

use super::connection::ConnectionHandler;
use super::limiter::ConnectionLimiter;
use crate::config::ServerConfig;
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Errores fatales del servidor
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("cannot bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
}

/// Servidor HTTP de archivos estáticos
pub struct Server {
    config: ServerConfig,
    handler: Arc<ConnectionHandler>,
    limiter: ConnectionLimiter,
    listener: TcpListener,
}

impl Server {
    /// Abre el socket y prepara el handler según la configuración
    pub fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let handler = ConnectionHandler::from_config(&config)?;
        Self::bind_with(config, handler)
    }

    /// Igual que [`Server::bind`] pero con un handler ya armado
    pub fn bind_with(config: ServerConfig, handler: ConnectionHandler) -> Result<Self, ServerError> {
        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        Ok(Self {
            limiter: ConnectionLimiter::new(config.max_connections),
            config,
            handler: Arc::new(handler),
            listener,
        })
    }

    /// Dirección real del socket (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop; solo retorna si el listener deja de existir
    pub fn run(&self) -> Result<(), ServerError> {
        log::info!("listening on {}", self.local_addr()?);

        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    log::warn!("failed to accept connection: {}", e);
                    continue;
                }
            };

            let Some(permit) = self.limiter.try_acquire() else {
                log::warn!(
                    "connection limit ({}) reached, closing connection from {:?}",
                    self.config.max_connections,
                    stream.peer_addr().ok()
                );
                continue;
            };
            let handler = Arc::clone(&self.handler);
            let timeout = self.config.read_timeout;

            let spawned = thread::Builder::new()
                .name("connection".to_string())
                .spawn(move || {
                    Self::serve_connection(&handler, stream, timeout);
                    drop(permit);
                });

            if let Err(e) = spawned {
                log::error!("failed to spawn connection thread: {}", e);
            }
        }

        Ok(())
    }

    /// Atiende una conexión aceptada y la cierra
    pub fn serve_connection(handler: &ConnectionHandler, stream: TcpStream, timeout: Option<Duration>) {
        let remote = stream.peer_addr().ok().map(|addr| addr.ip());
        log::debug!("connection from {:?}", remote);

        handler.handle(DeadlineStream::new(&stream, timeout), remote);

        // El peer puede haber cerrado primero
        if let Err(e) = stream.shutdown(Shutdown::Write) {
            log::debug!("shutdown after response failed: {}", e);
        }
    }
}

/// Socket con un plazo total para las lecturas
///
/// Antes de cada `read` el timeout del socket se ajusta a lo que queda del
/// plazo, así un cliente que manda de a un byte no retiene el thread.
struct DeadlineStream<'a> {
    stream: &'a TcpStream,
    deadline: Option<Instant>,
}

impl<'a> DeadlineStream<'a> {
    fn new(stream: &'a TcpStream, timeout: Option<Duration>) -> Self {
        Self {
            stream,
            deadline: timeout.map(|timeout| Instant::now() + timeout),
        }
    }
}

impl Read for DeadlineStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(deadline) = self.deadline {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "request read deadline exceeded",
                ));
            }
            self.stream.set_read_timeout(Some(remaining))?;
        }

        let mut stream = self.stream;
        stream.read(buf)
    }
}

impl Write for DeadlineStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut stream = self.stream;
        stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut stream = self.stream;
        stream.flush()
    }
}
