//! # Resolución de paths
//! src/files/path.rs
//!
//! Convierte el path del request en un path absoluto dentro del document
//! root. Pasos:
//!
//! 1. Rechazo directo (400) si el path recibido contiene `./` o `../`
//! 2. Se descartan query string y fragmento, y se decodifican los `%XX`
//! 3. Se arma el path solo con los segmentos que no son vacíos, `.` ni `..`
//!    (path vacío -> `index.html`)
//! 4. Si el resultado existe se canonicaliza y tiene que seguir debajo del
//!    root canónico; si escapa (ej: por un symlink) también es traversal

use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Archivo que se sirve para el root y para directorios
pub const INDEX_HTML: &str = "index.html";

/// Errores de resolución
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// El path intenta salir del document root
    #[error("path traversal attempt: {0:?}")]
    Traversal(String),
}

/// Resuelve paths de requests debajo de un document root
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Crea un resolver; el root se canonicaliza si existe
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = root.canonicalize().unwrap_or(root);
        Self { root }
    }

    /// Resuelve el path de un request a un path absoluto bajo el root
    ///
    /// El path devuelto puede no existir; decidir 404 es tarea del llamador.
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::files::{PathError, PathResolver};
    ///
    /// let resolver = PathResolver::new("/srv/www");
    /// assert!(resolver.resolve("/css/main.css").unwrap().ends_with("css/main.css"));
    /// assert!(matches!(resolver.resolve("../etc/passwd"), Err(PathError::Traversal(_))));
    /// ```
    pub fn resolve(&self, raw_path: &str) -> Result<PathBuf, PathError> {
        let relative = relative_path(raw_path)?;
        self.contain(&self.root.join(relative))
    }

    /// Verifica que un path ya anclado siga debajo del root
    ///
    /// Si existe se devuelve canónico; si al seguir symlinks queda fuera del
    /// root es [`PathError::Traversal`]. Un path que no existe se devuelve
    /// tal cual.
    pub fn contain(&self, candidate: &Path) -> Result<PathBuf, PathError> {
        match candidate.canonicalize() {
            Ok(canonical) if canonical.starts_with(&self.root) => Ok(canonical),
            Ok(canonical) => {
                log::warn!(
                    "{} resolves outside the document root to {}",
                    candidate.display(),
                    canonical.display()
                );
                Err(PathError::Traversal(candidate.display().to_string()))
            }
            // No existe: sin segmentos `..` no puede escapar del root
            Err(_) => Ok(candidate.to_path_buf()),
        }
    }
}

/// Path relativo (sin anclar) para un path de request
///
/// # Ejemplo
/// ```
/// use static_server::files::path::relative_path;
/// use std::path::PathBuf;
///
/// assert_eq!(relative_path("/").unwrap(), PathBuf::from("index.html"));
/// assert_eq!(relative_path("/a//b/.").unwrap(), PathBuf::from("a/b"));
/// assert!(relative_path("/a/./b").is_err());
/// ```
pub fn relative_path(raw_path: &str) -> Result<PathBuf, PathError> {
    // `../` también contiene `./`
    if raw_path.contains("./") {
        return Err(PathError::Traversal(raw_path.to_string()));
    }

    let without_query = raw_path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let decoded = percent_decode_str(without_query).decode_utf8_lossy();

    let mut resolved = PathBuf::new();
    for segment in decoded.split(['/', '\\']) {
        if segment.is_empty() || segment == "." || segment == ".." {
            continue;
        }
        resolved.push(segment);
    }

    if resolved.as_os_str().is_empty() {
        resolved.push(INDEX_HTML);
    }

    Ok(resolved)
}
