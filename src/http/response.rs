//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Serializa la respuesta de un archivo estático. Los headers salen siempre
//! en este orden:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Server: static_server/0.1\r\n
//! Date: Fri, 08 Mar 2019 14:05:09 GMT\r\n
//! Content-Encoding: gzip\r\n            (solo si se negoció gzip)
//! Content-Type: text/html;charset="utf-8"\r\n
//! Content-Length: 1234\r\n
//! Connection: close\r\n
//! \r\n
//! <body>
//! ```
//!
//! `Content-Length` es el largo de los bytes que realmente van al socket: con
//! gzip el body se comprime completo en memoria antes de armar los headers.

use super::StatusCode;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{self, Write};

/// Codificación del body elegida una vez por respuesta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    /// Bytes del archivo tal cual
    Identity,

    /// Body comprimido con gzip
    Gzip,
}

impl ContentEncoding {
    /// Elige gzip si el cliente lo acepta
    pub fn negotiate(accepts_gzip: bool) -> Self {
        if accepts_gzip {
            ContentEncoding::Gzip
        } else {
            ContentEncoding::Identity
        }
    }

    /// Valor para `Content-Encoding`, `None` si no se codifica
    pub fn header_value(&self) -> Option<&'static str> {
        match self {
            ContentEncoding::Identity => None,
            ContentEncoding::Gzip => Some("gzip"),
        }
    }

    /// Codifica el body completo en memoria
    pub fn encode(&self, data: Vec<u8>) -> io::Result<Vec<u8>> {
        match self {
            ContentEncoding::Identity => Ok(data),
            ContentEncoding::Gzip => {
                let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&data)?;
                encoder.finish()
            }
        }
    }
}

/// Respuesta HTTP completa, lista para escribir en el socket
#[derive(Debug, Clone)]
pub struct Response {
    /// Versión que se devuelve en el status line (la del request)
    version: String,

    /// Código de estado HTTP
    status: StatusCode,

    /// Headers en orden de envío
    headers: Vec<(String, String)>,

    /// Cuerpo ya codificado
    body: Vec<u8>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new("HTTP/1.1", StatusCode::NotFound);
    /// assert_eq!(response.status(), StatusCode::NotFound);
    /// ```
    pub fn new(version: &str, status: StatusCode) -> Self {
        Self {
            version: version.to_string(),
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header; si ya existe se reemplaza en su posición
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Versión mutable de [`Response::with_header`]
    pub fn add_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, existing_value)) => *existing_value = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el body y su `Content-Length`
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        let length = self.body.len().to_string();
        self.add_header("Content-Length", &length);
        self
    }

    /// Arma la respuesta de un archivo estático con el orden de headers fijo
    ///
    /// `data` son los bytes del archivo sin codificar; si `encoding` es gzip
    /// se comprimen antes de calcular `Content-Length`.
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::{ContentEncoding, Response, StatusCode};
    ///
    /// let response = Response::static_file(
    ///     "HTTP/1.1",
    ///     StatusCode::Ok,
    ///     "static_server/0.1",
    ///     "Fri, 08 Mar 2019 14:05:09 GMT",
    ///     "text/plain",
    ///     b"hola".to_vec(),
    ///     ContentEncoding::Identity,
    /// ).unwrap();
    ///
    /// assert_eq!(response.header("Content-Length"), Some("4"));
    /// ```
    pub fn static_file(
        version: &str,
        status: StatusCode,
        server: &str,
        date: &str,
        mime_type: &str,
        data: Vec<u8>,
        encoding: ContentEncoding,
    ) -> io::Result<Self> {
        let body = encoding.encode(data)?;

        let mut response = Self::new(version, status)
            .with_header("Server", server)
            .with_header("Date", date);
        if let Some(coding) = encoding.header_value() {
            response.add_header("Content-Encoding", coding);
        }

        let content_type = format!("{};charset=\"utf-8\"", mime_type);
        Ok(response
            .with_header("Content-Type", &content_type)
            .with_body_bytes(body)
            .with_header("Connection", "close"))
    }

    /// Status line y headers, terminados con la línea vacía
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut head = format!("{} {}\r\n", self.version, self.status);
        for (name, value) in &self.headers {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");
        head.into_bytes()
    }

    /// Escribe headers y después el body
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.head_bytes())?;
        writer.write_all(&self.body)?;
        writer.flush()
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene un header por nombre (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
