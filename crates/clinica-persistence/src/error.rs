//! Errores de conexión.
//!
//! Hacia afuera existe una sola clase de fallo (`ConnectionFailure`) con un
//! mensaje fijo que no revela detalles del driver. La causa real viaja en la
//! cadena `source()` para los logs de operación.

use thiserror::Error;

/// Mensaje visible para el usuario final ante cualquier fallo de conexión.
pub const CONNECTION_FAILURE_MESSAGE: &str = "critical database connection error; check configuration";

#[derive(Debug, Error)]
pub enum PersistenceError {
    // Debe coincidir con CONNECTION_FAILURE_MESSAGE.
    #[error("critical database connection error; check configuration")]
    ConnectionFailure(#[source] FailureCause),
}

/// Causa interna del fallo; no se muestra al usuario.
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error("establish: {0}")]
    Establish(#[from] diesel::ConnectionError),
    #[error("session setup: {0}")]
    Session(#[from] diesel::result::Error),
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::ConnectionFailure(err.into())
    }
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        Self::ConnectionFailure(err.into())
    }
}

impl PersistenceError {
    /// Texto completo de la cadena de causas, sólo para logs internos.
    pub fn detail(&self) -> String {
        let mut out = self.to_string();
        let mut cur = std::error::Error::source(self);
        while let Some(cause) = cur {
            out.push_str(": ");
            out.push_str(&cause.to_string());
            cur = cause.source();
        }
        out
    }
}
