//! # Parsing de Requests HTTP/1.x
//! src/http/request.rs
//!
//! Lee la request line y los headers de una conexión. El body nunca se lee:
//! el servidor solo sirve GET y cierra después de una respuesta.
//!
//! ## Formato aceptado
//!
//! ```text
//! GET /css/main.css HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! Accept-Encoding: gzip, deflate\r\n
//! \r\n
//! ```
//!
//! Se aceptan finales de línea `\r\n` y `\n`. Las líneas de header sin `:`
//! se ignoran en silencio.

use std::collections::HashMap;
use std::io::{BufRead, Read};

/// Máximo de bytes que se leen para request line + headers
pub const MAX_HEAD_BYTES: u64 = 64 * 1024;

/// Método HTTP de la petición
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - El único método que el servidor implementa
    GET,

    /// Cualquier otro método, guardado en mayúsculas para el access log
    Other(String),
}

impl Method {
    /// Normaliza el token del request line a mayúsculas
    fn from_token(token: &str) -> Self {
        let upper = token.to_ascii_uppercase();
        if upper == "GET" {
            Method::GET
        } else {
            Method::Other(upper)
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP (normalizado a mayúsculas)
    method: Method,

    /// Path tal como llegó, en minúsculas (ej: "/css/main.css")
    path: String,

    /// Versión HTTP, se devuelve tal cual en el status line
    version: String,

    /// Headers con el nombre en minúsculas; el último duplicado gana
    headers: HashMap<String, String>,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// La conexión se cerró antes de enviar un solo byte
    #[error("empty request")]
    EmptyRequest,

    /// La request line no tiene método, path y versión
    #[error("invalid request line: {0:?}")]
    InvalidRequestLine(String),

    /// Request line + headers superan [`MAX_HEAD_BYTES`] sin línea vacía
    #[error("request head exceeds {} bytes", MAX_HEAD_BYTES)]
    HeadTooLarge,

    /// Falla de lectura en el socket (incluye timeouts)
    #[error("failed to read request: {0}")]
    Io(#[from] std::io::Error),
}

impl Request {
    /// Parsea un request desde un buffer completo en memoria
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_server::http::{Method, Request};
    ///
    /// let raw = b"get /Index.HTML HTTP/1.1\r\nUser-Agent: curl/8.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), &Method::GET);
    /// assert_eq!(request.path(), "/index.html");
    /// assert_eq!(request.header("User-Agent"), Some("curl/8.0"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let mut reader = buffer;
        Self::read_from(&mut reader)
    }

    /// Lee request line y headers desde un stream con buffer
    ///
    /// Se detiene en la primera línea vacía o al fin del stream; nunca
    /// consume más de [`MAX_HEAD_BYTES`]. Si se llega al límite sin ver la
    /// línea vacía el request se rechaza entero con
    /// [`ParseError::HeadTooLarge`].
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self, ParseError> {
        let mut limited = reader.take(MAX_HEAD_BYTES);

        // 1. Request line
        let first = match read_line(&mut limited)? {
            Some(line) => line,
            None => return Err(ParseError::EmptyRequest),
        };
        let (method, path, version) = Self::parse_request_line(&first)?;

        // 2. Headers hasta la línea vacía
        let mut headers = HashMap::new();
        loop {
            match read_line(&mut limited)? {
                // Una línea que llega al límite puede estar cortada
                Some(_) if limited.limit() == 0 => return Err(ParseError::HeadTooLarge),
                Some(line) if line.is_empty() => break,
                Some(line) => Self::parse_header_line(&line, &mut headers),
                None if limited.limit() == 0 => return Err(ParseError::HeadTooLarge),
                None => break,
            }
        }

        Ok(Request {
            method,
            path,
            version,
            headers,
        })
    }

    /// Formato: `METHOD PATH VERSION`; tokens adicionales se ignoran
    fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
        let mut parts = line.split_whitespace();

        match (parts.next(), parts.next(), parts.next()) {
            (Some(method), Some(path), Some(version)) => Ok((
                Method::from_token(method),
                path.to_lowercase(),
                version.to_string(),
            )),
            _ => Err(ParseError::InvalidRequestLine(line.to_string())),
        }
    }

    fn parse_header_line(line: &str, headers: &mut HashMap<String, String>) {
        match line.find(':') {
            Some(colon_pos) if colon_pos > 0 => {
                let name = line[..colon_pos].trim().to_ascii_lowercase();
                let value = line[colon_pos + 1..].trim().to_string();
                headers.insert(name, value);
            }
            // Header sin nombre o sin ':' -> se ignora
            _ => {}
        }
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Obtiene el path del request (en minúsculas, sin decodificar)
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión HTTP tal como llegó
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene un header; el nombre no distingue mayúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// User-Agent o cadena vacía si no vino
    pub fn user_agent(&self) -> &str {
        self.header("user-agent").unwrap_or("")
    }

    /// `true` si `Accept-Encoding` incluye el token `gzip`
    pub fn accepts_gzip(&self) -> bool {
        self.header("accept-encoding")
            .map(|value| {
                value.split(',').any(|coding| {
                    let name = coding.split(';').next().unwrap_or("");
                    name.trim().eq_ignore_ascii_case("gzip")
                })
            })
            .unwrap_or(false)
    }
}

/// Lee una línea sin el terminador. `None` al fin del stream.
///
/// Los bytes no UTF-8 se reemplazan en vez de abortar el request.
fn read_line<R: BufRead>(reader: &mut R) -> std::io::Result<Option<String>> {
    let mut raw = Vec::new();
    if reader.read_until(b'\n', &mut raw)? == 0 {
        return Ok(None);
    }

    let line = String::from_utf8_lossy(&raw);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
