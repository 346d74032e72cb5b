//! # Módulo HTTP
//!
//! Lo mínimo de HTTP/1.x que necesita un servidor de archivos estáticos:
//!
//! - Parsing de la request line y headers (el body nunca se lee)
//! - Códigos de estado 200 / 400 / 404 / 501
//! - Tabla de MIME types configurable
//! - Serialización de la respuesta con gzip opcional
//!
//! ### Formato de Request
//!
//! ```text
//! GET /css/main.css HTTP/1.1\r\n
//! User-Agent: curl/7.61.1\r\n
//! Accept-Encoding: gzip,deflate,br\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Server: static_server/0.1\r\n
//! Date: Fri, 08 Mar 2019 14:05:09 GMT\r\n
//! Content-Encoding: gzip\r\n
//! Content-Type: text/css;charset="utf-8"\r\n
//! Content-Length: 312\r\n
//! Connection: close\r\n
//! \r\n
//! ```

pub mod date;
pub mod mime;
pub mod request;
pub mod response;
pub mod status;

// Re-exportamos los tipos principales para facilitar su uso
pub use mime::MimeMap;
pub use request::{Method, ParseError, Request};
pub use response::{ContentEncoding, Response};
pub use status::StatusCode;
