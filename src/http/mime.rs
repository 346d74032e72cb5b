//! # Tabla de MIME types
//! src/http/mime.rs
//!
//! Mapea la extensión del archivo servido a un Content-Type. La tabla es
//! configuración: se arma desde líneas estilo `mime.types`
//! (`tipo ext ext ...`) y se puede ampliar con un archivo externo.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Tipo para extensiones desconocidas
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Tabla incorporada, mismo formato que `/etc/mime.types`
const DEFAULT_EXTENSIONS_MAP: &[&str] = &[
    "application/javascript  js mjs",
    "application/json        json map",
    "application/pdf         pdf",
    "application/wasm        wasm",
    "application/xml         xml",
    "application/zip         zip",
    "application/gzip        gz",
    "audio/mpeg              mp3",
    "audio/ogg               ogg",
    "font/woff               woff",
    "font/woff2              woff2",
    "font/ttf                ttf",
    "image/gif               gif",
    "image/jpeg              jpeg jpe jpg",
    "image/png               png",
    "image/svg+xml           svg",
    "image/webp              webp",
    "image/x-icon            ico",
    "text/css                css",
    "text/csv                csv",
    "text/html               html htm",
    "text/markdown           md",
    "text/plain              txt asc text",
    "video/mp4               mp4",
    "video/webm              webm",
];

/// Tabla extensión -> MIME type
#[derive(Debug, Clone)]
pub struct MimeMap {
    types: HashMap<String, String>,
    default_type: String,
}

impl MimeMap {
    /// Tabla vacía: todo resuelve al tipo por defecto
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
            default_type: DEFAULT_MIME_TYPE.to_string(),
        }
    }

    /// Agrega las entradas de un archivo `mime.types`
    ///
    /// Las entradas del archivo reemplazan a las existentes.
    pub fn load_file(&mut self, path: &Path) -> std::io::Result<()> {
        let contents = fs::read_to_string(path)?;
        for line in contents.lines() {
            self.add_line(line);
        }
        Ok(())
    }

    /// Agrega una línea `tipo ext ext ...`; comentarios y vacías se ignoran
    pub fn add_line(&mut self, line: &str) {
        let mut fields = line.split_whitespace();
        let mime_type = match fields.next() {
            Some(mime_type) if !mime_type.starts_with('#') => mime_type,
            _ => return,
        };

        for extension in fields {
            self.types
                .insert(extension.to_ascii_lowercase(), mime_type.to_string());
        }
    }

    /// MIME type para un path según su extensión
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::MimeMap;
    /// use std::path::Path;
    ///
    /// let mime = MimeMap::default();
    /// assert_eq!(mime.lookup(Path::new("/srv/www/index.html")), "text/html");
    /// assert_eq!(mime.lookup(Path::new("/srv/www/blob.bin")), "application/octet-stream");
    /// ```
    pub fn lookup(&self, path: &Path) -> &str {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.types.get(&ext.to_ascii_lowercase()))
            .unwrap_or(&self.default_type)
    }
}

impl Default for MimeMap {
    /// Tabla con las extensiones incorporadas
    fn default() -> Self {
        let mut map = Self::empty();
        for line in DEFAULT_EXTENSIONS_MAP {
            map.add_line(line);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_types() {
        let mime = MimeMap::default();
        assert_eq!(mime.lookup(Path::new("main.css")), "text/css");
        assert_eq!(mime.lookup(Path::new("app.js")), "application/javascript");
        assert_eq!(mime.lookup(Path::new("favicon.ico")), "image/x-icon");
        assert_eq!(mime.lookup(Path::new("photo.JPG")), "image/jpeg");
    }

    #[test]
    fn test_unknown_and_missing_extension() {
        let mime = MimeMap::default();
        assert_eq!(mime.lookup(Path::new("archive.xyz")), DEFAULT_MIME_TYPE);
        assert_eq!(mime.lookup(Path::new("README")), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_add_line_skips_comments() {
        let mut mime = MimeMap::empty();
        mime.add_line("# text/x-nope nope");
        mime.add_line("");
        mime.add_line("text/x-rust\trs");

        assert_eq!(mime.types.len(), 1);
        assert_eq!(mime.lookup(Path::new("lib.rs")), "text/x-rust");
    }

    #[test]
    fn test_load_file_overrides_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# custom table").unwrap();
        writeln!(file, "text/x-custom   css custom").unwrap();

        let mut mime = MimeMap::default();
        mime.load_file(file.path()).unwrap();

        assert_eq!(mime.lookup(Path::new("main.css")), "text/x-custom");
        assert_eq!(mime.lookup(Path::new("a.custom")), "text/x-custom");
        assert_eq!(mime.lookup(Path::new("index.html")), "text/html");
    }
}
