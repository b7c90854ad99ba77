//! clinica-persistence
//!
//! Configuración y conexión a la base de datos MySQL de la clínica.
//!
//! Módulos:
//! - `env_file`: parser del archivo `.env` (claves `DB_HOST`, `DB_NAME`,
//!   `DB_USER`, `DB_PASS`).
//! - `config`: `ConnectionConfig` y `EnvironmentLoader` (carga única, con
//!   fallback a valores por defecto).
//! - `connection`: fábrica de conexiones Diesel y `get_connection`.
//! - `error`: `PersistenceError::ConnectionFailure` con mensaje fijo.

pub mod config;
pub mod connection;
pub mod env_file;
pub mod error;

pub use config::{load_config, ConfigSource, ConnectionConfig, EnvironmentLoader};
pub use connection::{get_connection, ConnectionProvider, MysqlConnectionFactory};
pub use error::{PersistenceError, CONNECTION_FAILURE_MESSAGE};
