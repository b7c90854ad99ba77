//! Fábrica de conexiones MySQL (Diesel).
//!
//! Flujo de `get_connection`:
//! 1. Carga (idempotente) de la configuración del proceso.
//! 2. `MysqlConnection::establish` con la URL armada desde host/base/usuario.
//! 3. `SET NAMES utf8mb4` para fijar el charset de la sesión.
//!
//! Cualquier fallo en 2 o 3 se reporta como `PersistenceError::ConnectionFailure`;
//! no hay reintentos. Diesel reporta todo error como `Result`, que es el
//! equivalente al modo "lanzar excepción" del driver.

use diesel::connection::SimpleConnection;
use diesel::mysql::MysqlConnection;
use diesel::Connection;
use log::{debug, error};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::config::{load_config, ConnectionConfig, EnvironmentLoader};
use crate::error::PersistenceError;

/// Comando que fija el charset de la sesión.
pub const SESSION_CHARSET_SQL: &str = "SET NAMES utf8mb4";

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar la fábrica real o un doble en tests sin acoplar al driver.
///
/// Contrato:
/// - Devuelve una conexión lista para consultas o
///   `PersistenceError::ConnectionFailure`.
pub trait ConnectionProvider {
    type Connection: SimpleConnection;

    fn connection(&self) -> Result<Self::Connection, PersistenceError>;
}

/// URL `mysql://` para Diesel. Usuario, contraseña y base van percent-encoded;
/// el host se usa tal cual (admite `host:puerto`).
pub fn database_url(cfg: &ConnectionConfig) -> String {
    let user = utf8_percent_encode(&cfg.user, NON_ALPHANUMERIC);
    let database = utf8_percent_encode(&cfg.database, NON_ALPHANUMERIC);
    if cfg.password.is_empty() {
        format!("mysql://{user}@{}/{database}", cfg.host)
    } else {
        let pass = utf8_percent_encode(&cfg.password, NON_ALPHANUMERIC);
        format!("mysql://{user}:{pass}@{}/{database}", cfg.host)
    }
}

/// Prepara la sesión recién abierta: charset `utf8mb4`.
pub fn configure_session<C: SimpleConnection>(conn: &mut C) -> Result<(), PersistenceError> {
    conn.batch_execute(SESSION_CHARSET_SQL)?;
    Ok(())
}

/// Fábrica de conexiones MySQL a partir de una `ConnectionConfig` fija.
#[derive(Debug, Clone)]
pub struct MysqlConnectionFactory {
    config: ConnectionConfig,
}

impl MysqlConnectionFactory {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    /// Usa la configuración del loader dado (lo carga si hace falta).
    pub fn from_loader(loader: &EnvironmentLoader) -> Self {
        Self::new(loader.load().clone())
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}

impl ConnectionProvider for MysqlConnectionFactory {
    type Connection = MysqlConnection;

    fn connection(&self) -> Result<MysqlConnection, PersistenceError> {
        debug!("connect:start host={} database={} user={}", self.config.host, self.config.database, self.config.user);
        let result = MysqlConnection::establish(&database_url(&self.config))
            .map_err(PersistenceError::from)
            .and_then(|mut conn| {
                configure_session(&mut conn)?;
                Ok(conn)
            });
        match &result {
            Ok(_) => debug!("connect:done host={} database={}", self.config.host, self.config.database),
            Err(e) => error!("connect:failed host={} database={}: {}", self.config.host, self.config.database, e.detail()),
        }
        result
    }
}

/// Conexión con la configuración del proceso (`.env` de la raíz o defaults).
pub fn get_connection() -> Result<MysqlConnection, PersistenceError> {
    MysqlConnectionFactory::new(load_config().clone()).connection()
}
