//! # Configuración del Servidor
//! src/config.rs
//!
//! La configuración es un mapa de propiedades `clave=valor` armado en capas,
//! de menor a mayor precedencia:
//!
//! 1. `server.properties` incluido en el binario
//! 2. Archivo pasado con `--config` (o `STATIC_SERVER_CONFIG`)
//! 3. Overrides `-D clave=valor` de la línea de comandos
//!
//! ## Ejemplos de uso
//!
//! ```bash
//! ./static_server -D server.port=9090 -D web.root=/srv/www
//! STATIC_SERVER_CONFIG=/etc/static_server.properties ./static_server
//! ```

use clap::Parser;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Propiedades por defecto incluidas en el binario
pub const DEFAULT_PROPERTIES: &str = include_str!("../server.properties");

// === Claves de propiedades ===

/// Directorio con 400.html, 404.html y 501.html
pub const SERVER_ROOT: &str = "server.root";
/// Directorio con el contenido servido
pub const WEB_ROOT: &str = "web.root";
/// Host/IP de bind
pub const SERVER_NAME: &str = "server.name";
pub const SERVER_PORT: &str = "server.port";
/// Valor del header `Server:`
pub const SERVER_VERSION: &str = "server.response.version";
pub const READ_TIMEOUT_MS: &str = "server.read.timeout.ms";
pub const MAX_CONNECTIONS: &str = "server.max.connections";
pub const MIME_TYPES: &str = "server.mime.types";
pub const ACCESS_LOG: &str = "server.access.log";

/// Errores al cargar o validar la configuración
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing property {0}")]
    MissingKey(&'static str),

    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid override {0:?}, expected KEY=VALUE")]
    InvalidOverride(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{key} directory {} does not exist", path.display())]
    RootNotFound { key: &'static str, path: PathBuf },
}

/// Argumentos de línea de comandos
#[derive(Debug, Clone, Parser)]
#[command(name = "static_server")]
#[command(about = "Servidor HTTP/1.x de archivos estáticos")]
#[command(version)]
pub struct Cli {
    /// Archivo de propiedades que se aplica sobre los valores por defecto
    #[arg(short, long, env = "STATIC_SERVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override de una propiedad, ej: -D server.port=9090 (se puede repetir)
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, String)>,
}

/// Parsea un override `clave=valor`
fn parse_override(raw: &str) -> Result<(String, String), ConfigError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ConfigError::InvalidOverride(raw.to_string())),
    }
}

/// Mapa de propiedades al estilo `.properties`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Parsea texto `.properties`
    ///
    /// Acepta `clave=valor` y `clave: valor`; `#` y `!` inician comentarios.
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::config::Properties;
    ///
    /// let props = Properties::parse("# comentario\nserver.port = 9090\nserver.name: localhost\n");
    /// assert_eq!(props.get("server.port"), Some("9090"));
    /// assert_eq!(props.get("server.name"), Some("localhost"));
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut values = HashMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let separator = line.find(['=', ':']);
            let (key, value) = match separator {
                Some(pos) => (&line[..pos], &line[pos + 1..]),
                None => (line, ""),
            };
            values.insert(key.trim().to_string(), value.trim().to_string());
        }

        Self { values }
    }

    /// Lee y parsea un archivo de propiedades
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Propiedades incluidas en el binario
    pub fn bundled() -> Self {
        Self::parse(DEFAULT_PROPERTIES)
    }

    /// Aplica otra capa encima; sus valores ganan
    pub fn merge(&mut self, other: Properties) {
        self.values.extend(other.values);
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Valor obligatorio y no vacío
    fn require(&self, key: &'static str) -> Result<&str, ConfigError> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingKey(key))
    }

    /// Valor opcional; vacío cuenta como ausente
    fn optional(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    fn parse_number<T: std::str::FromStr>(&self, key: &'static str) -> Result<T, ConfigError> {
        let raw = self.require(key)?;
        raw.parse().map_err(|_| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        })
    }
}

/// Configuración inmutable del servidor, compartida por todas las conexiones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Contenido servido (`web.root`)
    pub document_root: PathBuf,

    /// Páginas de error (`server.root`)
    pub error_root: PathBuf,

    /// Host/IP de bind (`server.name`)
    pub bind_address: String,

    /// Puerto de bind (`server.port`)
    pub bind_port: u16,

    /// Valor del header `Server:` (`server.response.version`)
    pub server_identity: String,

    /// Timeout de lectura del request; `None` espera indefinidamente
    pub read_timeout: Option<Duration>,

    /// Máximo de conexiones atendidas a la vez
    pub max_connections: usize,

    /// Tabla `mime.types` adicional
    pub mime_types: Option<PathBuf>,

    /// Archivo de access log; `None` escribe a stdout
    pub access_log: Option<PathBuf>,
}

impl ServerConfig {
    /// Arma la configuración completa a partir de la línea de comandos
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut properties = Properties::bundled();

        if let Some(path) = &cli.config {
            properties.merge(Properties::load(path)?);
        }
        for (key, value) in &cli.overrides {
            properties.set(key, value);
        }

        let config = Self::from_properties(&properties)?;
        config.validate()?;
        Ok(config)
    }

    /// Convierte propiedades en configuración tipada
    pub fn from_properties(properties: &Properties) -> Result<Self, ConfigError> {
        let read_timeout_ms: u64 = properties.parse_number(READ_TIMEOUT_MS)?;
        let max_connections: usize = properties.parse_number(MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: MAX_CONNECTIONS,
                value: "0".to_string(),
            });
        }

        Ok(Self {
            document_root: PathBuf::from(properties.require(WEB_ROOT)?),
            error_root: PathBuf::from(properties.require(SERVER_ROOT)?),
            bind_address: properties.require(SERVER_NAME)?.to_string(),
            bind_port: properties.parse_number(SERVER_PORT)?,
            server_identity: properties.require(SERVER_VERSION)?.to_string(),
            read_timeout: (read_timeout_ms > 0).then(|| Duration::from_millis(read_timeout_ms)),
            max_connections,
            mime_types: properties.optional(MIME_TYPES).map(PathBuf::from),
            access_log: properties.optional(ACCESS_LOG).map(PathBuf::from),
        })
    }

    /// Verifica que los directorios configurados existan
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.document_root.is_dir() {
            return Err(ConfigError::RootNotFound {
                key: WEB_ROOT,
                path: self.document_root.clone(),
            });
        }
        if !self.error_root.is_dir() {
            return Err(ConfigError::RootNotFound {
                key: SERVER_ROOT,
                path: self.error_root.clone(),
            });
        }
        Ok(())
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use static_server::config::ServerConfig;
    ///
    /// let config = ServerConfig::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Registra un resumen de la configuración efectiva
    pub fn print_summary(&self) {
        log::info!("address:         {}", self.address());
        log::info!("web root:        {}", self.document_root.display());
        log::info!("error pages:     {}", self.error_root.display());
        log::info!("server header:   {}", self.server_identity);
        match self.read_timeout {
            Some(timeout) => log::info!("read timeout:    {} ms", timeout.as_millis()),
            None => log::info!("read timeout:    disabled"),
        }
        log::info!("max connections: {}", self.max_connections);
        if let Some(path) = &self.mime_types {
            log::info!("mime types:      {}", path.display());
        }
        match &self.access_log {
            Some(path) => log::info!("access log:      {}", path.display()),
            None => log::info!("access log:      stdout"),
        }
    }
}

impl Default for ServerConfig {
    /// Configuración equivalente a `server.properties`
    fn default() -> Self {
        Self {
            document_root: PathBuf::from("resources/web"),
            error_root: PathBuf::from("resources/server"),
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            server_identity: format!("static_server/{}", env!("CARGO_PKG_VERSION")),
            read_timeout: Some(Duration::from_secs(30)),
            max_connections: 256,
            mime_types: None,
            access_log: None,
        }
    }
}
