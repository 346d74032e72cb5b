//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! El servidor de archivos estáticos solo produce cuatro códigos:
//!
//! - **200**: el archivo pedido existe y se envía
//! - **400**: intento de traversal o request line ilegible
//! - **404**: el recurso no existe (o es un directorio sin `index.html`)
//! - **501**: cualquier método distinto de GET

/// Códigos de estado que puede devolver el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK - Se sirve el archivo pedido
    Ok = 200,

    /// 400 Bad Request - Path con `./` o `../`, o request malformado
    BadRequest = 400,

    /// 404 Not Found - Recurso inexistente
    NotFound = 404,

    /// 501 Not Implemented - Método distinto de GET
    NotImplemented = 501,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::StatusCode;
    /// assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }

    /// Nombre de la página de error asociada dentro del error root.
    ///
    /// `None` para 200, que nunca usa página de error.
    pub fn error_page(&self) -> Option<&'static str> {
        match self {
            StatusCode::Ok => None,
            StatusCode::BadRequest => Some("400.html"),
            StatusCode::NotFound => Some("404.html"),
            StatusCode::NotImplemented => Some("501.html"),
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
