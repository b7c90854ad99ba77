//! Carga de la configuración de conexión desde el archivo `.env` de la raíz
//! del proyecto.
//!
//! La carga ocurre como mucho una vez por `EnvironmentLoader`; el loader global
//! (`ENVIRONMENT`) garantiza lo mismo para todo el proceso. Si el archivo no
//! existe se usan los valores por defecto (`localhost` / `clinica` / `root` /
//! contraseña vacía).

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use once_cell::sync::{Lazy, OnceCell};

use crate::env_file::{parse_entries, ConfigKey};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_DATABASE: &str = "clinica";
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_PASSWORD: &str = "";

/// Variable de entorno que reemplaza la ruta por defecto del `.env`.
pub const ENV_FILE_VAR: &str = "CLINICA_ENV_FILE";

/// Credenciales de la base de datos. Inmutable una vez cargada.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Construye la configuración a partir del contenido de un `.env`.
    /// Las claves ausentes conservan su valor por defecto.
    pub fn from_env_str(content: &str) -> Self {
        let mut cfg = Self::default();
        for (key, value) in parse_entries(content) {
            debug!("env key {} applied", key.name());
            cfg.set(key, value);
        }
        cfg
    }

    fn set(&mut self, key: ConfigKey, value: String) {
        match key {
            ConfigKey::Host => self.host = value,
            ConfigKey::Database => self.database = value,
            ConfigKey::User => self.user = value,
            ConfigKey::Password => self.password = value,
        }
    }

    /// Resumen imprimible sin la contraseña.
    pub fn redacted(&self) -> String {
        let pass = if self.password.is_empty() { "<empty>" } else { "***" };
        format!("host={} database={} user={} password={pass}", self.host, self.database, self.user)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// Origen de la configuración cargada.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(p) => write!(f, "{}", p.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// Ruta por defecto: `.env` en la raíz del workspace (dos niveles sobre este
/// crate), salvo que `CLINICA_ENV_FILE` indique otra.
///
/// La ruta del workspace se fija al compilar (`CARGO_MANIFEST_DIR`): un binario
/// instalado fuera del árbol de fuentes necesita `CLINICA_ENV_FILE` o
/// `--env-file` para encontrar su `.env`.
pub fn default_env_path() -> PathBuf {
    if let Some(path) = env::var_os(ENV_FILE_VAR).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..").join(".env")
}

/// Cargador perezoso de `ConnectionConfig` ligado a una ruta.
pub struct EnvironmentLoader {
    path: PathBuf,
    loaded: OnceCell<(ConnectionConfig, ConfigSource)>,
}

impl EnvironmentLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), loaded: OnceCell::new() }
    }

    pub fn from_default_location() -> Self {
        Self::new(default_env_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Devuelve la configuración, leyendo el archivo sólo en la primera
    /// llamada. Nunca falla: cualquier problema de lectura cae a los defaults.
    pub fn load(&self) -> &ConnectionConfig {
        &self.entry().0
    }

    /// Origen de la configuración (fuerza la carga si aún no ocurrió).
    pub fn source(&self) -> &ConfigSource {
        &self.entry().1
    }

    fn entry(&self) -> &(ConnectionConfig, ConfigSource) {
        self.loaded.get_or_init(|| read_config(&self.path))
    }
}

fn read_config(path: &Path) -> (ConnectionConfig, ConfigSource) {
    if !path.exists() {
        info!("no env file at {}; using default connection settings", path.display());
        return (ConnectionConfig::default(), ConfigSource::Defaults);
    }
    // Bytes inválidos en UTF-8 (p. ej. un comentario Latin-1) sólo afectan a su línea.
    match fs::read(path) {
        Ok(bytes) => {
            let cfg = ConnectionConfig::from_env_str(&String::from_utf8_lossy(&bytes));
            debug!("env file {} loaded: {}", path.display(), cfg.redacted());
            (cfg, ConfigSource::File(path.to_path_buf()))
        }
        Err(e) => {
            warn!("env file {} unreadable ({e}); using default connection settings", path.display());
            (ConnectionConfig::default(), ConfigSource::Defaults)
        }
    }
}

/// Loader global del proceso, evaluado una sola vez.
pub static ENVIRONMENT: Lazy<EnvironmentLoader> = Lazy::new(EnvironmentLoader::from_default_location);

/// Configuración del proceso (carga el `.env` en el primer uso).
pub fn load_config() -> &'static ConnectionConfig {
    ENVIRONMENT.load()
}
