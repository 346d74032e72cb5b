//! # Selección del archivo a servir
//! src/files/target.rs
//!
//! Decide el status y el archivo que se envía para un request. Tabla de
//! decisión, evaluada en orden:
//!
//! ```text
//! path con traversal            -> 400, error_root/400.html
//! método distinto de GET        -> 501, error_root/501.html
//! archivo inexistente           -> 404, error_root/404.html
//! directorio                    -> se reintenta con <dir>/index.html
//! archivo regular               -> 200, el archivo
//! ```
//!
//! El archivo elegido siempre existe: si la página de error tampoco existe
//! se devuelve [`TargetError::ErrorPageMissing`] y la conexión se aborta.

use super::path::{PathError, PathResolver, INDEX_HTML};
use crate::http::{ContentEncoding, Method, MimeMap, Request, Response, StatusCode};
use std::fs;
use std::io;
use std::path::PathBuf;

/// Archivo elegido para responder un request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Status de la respuesta
    pub status: StatusCode,

    /// Path absoluto de un archivo regular que existe
    pub file_path: PathBuf,

    /// MIME type según la extensión del archivo final
    pub mime_type: String,
}

/// Errores al elegir el archivo
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// La página de error configurada no existe o no es un archivo
    #[error("error page {} is missing", path.display())]
    ErrorPageMissing { path: PathBuf },
}

impl ResolvedTarget {
    /// Lee el archivo y arma la respuesta completa
    ///
    /// El archivo se lee entero; con gzip se comprime antes de calcular
    /// `Content-Length`.
    pub fn build_response(
        &self,
        version: &str,
        server: &str,
        date: &str,
        encoding: ContentEncoding,
    ) -> io::Result<Response> {
        let data = fs::read(&self.file_path)?;
        Response::static_file(
            version,
            self.status,
            server,
            date,
            &self.mime_type,
            data,
            encoding,
        )
    }
}

/// Document root + páginas de error + tabla MIME
#[derive(Debug, Clone)]
pub struct StaticFiles {
    documents: PathResolver,
    error_root: PathBuf,
    mime: MimeMap,
}

impl StaticFiles {
    pub fn new(document_root: impl Into<PathBuf>, error_root: impl Into<PathBuf>, mime: MimeMap) -> Self {
        Self {
            documents: PathResolver::new(document_root),
            error_root: error_root.into(),
            mime,
        }
    }

    /// Aplica la tabla de decisión a un request
    pub fn select(&self, request: &Request) -> Result<ResolvedTarget, TargetError> {
        let candidate = match self.candidate(request.path()) {
            Ok(path) => path,
            Err(e) => {
                log::debug!("{}", e);
                return self.error_target(StatusCode::BadRequest);
            }
        };

        if request.method() != &Method::GET {
            return self.error_target(StatusCode::NotImplemented);
        }

        if candidate.is_file() {
            Ok(self.target(StatusCode::Ok, candidate))
        } else {
            self.error_target(StatusCode::NotFound)
        }
    }

    /// Target para una página de error
    ///
    /// También se usa cuando el request ni siquiera se pudo parsear.
    pub fn error_target(&self, status: StatusCode) -> Result<ResolvedTarget, TargetError> {
        let path = match status.error_page() {
            Some(page) => self.error_root.join(page),
            None => self.error_root.clone(),
        };

        if path.is_file() {
            Ok(self.target(status, path))
        } else {
            Err(TargetError::ErrorPageMissing { path })
        }
    }

    /// Archivo que se serviría para el path, con fallback a `index.html`
    ///
    /// El index de un directorio pasa por el mismo control de contención que
    /// el path pedido: un `index.html` que apunta fuera del root es traversal.
    fn candidate(&self, raw_path: &str) -> Result<PathBuf, PathError> {
        let resolved = self.documents.resolve(raw_path)?;
        if resolved.is_dir() {
            self.documents.contain(&resolved.join(INDEX_HTML))
        } else {
            Ok(resolved)
        }
    }

    fn target(&self, status: StatusCode, file_path: PathBuf) -> ResolvedTarget {
        let mime_type = self.mime.lookup(&file_path).to_string();
        ResolvedTarget {
            status,
            file_path,
            mime_type,
        }
    }
}
