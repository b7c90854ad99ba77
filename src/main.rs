//! `clinica-db`: utilidades de operación sobre la conexión a la base de datos.
//!
//! - `clinica-db show`: imprime la configuración resuelta (sin contraseña).
//! - `clinica-db check`: abre una conexión y ejecuta `SELECT 1`.
//!
//! Ante un fallo de conexión el proceso termina con código 1 mostrando sólo el
//! mensaje fijo; el detalle del driver va al log (`RUST_LOG=error`).

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use clinica_persistence::config::ENVIRONMENT;
use clinica_persistence::{get_connection, ConnectionProvider, EnvironmentLoader, MysqlConnectionFactory,
                          PersistenceError};
use diesel::connection::SimpleConnection;
use log::{error, info};

#[derive(Parser, Debug)]
#[command(name = "clinica-db", version, about = "Clinic database configuration and connectivity check")]
struct Cli {
    /// Path to the .env file. Defaults to $CLINICA_ENV_FILE, then to the .env at
    /// the root of the source tree this binary was built from
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved connection settings (password redacted)
    Show,
    /// Open a connection and run a trivial query
    Check,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
    let cli = Cli::parse();

    let custom = cli.env_file.map(EnvironmentLoader::new);
    let loader: &EnvironmentLoader = custom.as_ref().unwrap_or(&*ENVIRONMENT);

    match cli.command {
        Command::Show => {
            println!("source: {}", loader.source());
            println!("{}", loader.load().redacted());
        }
        Command::Check => {
            let result = if custom.is_some() {
                check(&MysqlConnectionFactory::from_loader(loader))
            } else {
                get_connection().and_then(|mut conn| ping(&mut conn))
            };
            if let Err(e) = result {
                terminate(&e);
            }
            info!("database reachable ({})", loader.load().redacted());
            println!("ok");
        }
    }
}

fn check<P: ConnectionProvider>(provider: &P) -> Result<(), PersistenceError> {
    let mut conn = provider.connection()?;
    ping(&mut conn)
}

fn ping<C: SimpleConnection>(conn: &mut C) -> Result<(), PersistenceError> {
    conn.batch_execute("SELECT 1")?;
    Ok(())
}

/// Frontera fatal: detalle al log de operación, mensaje fijo al usuario.
fn terminate(err: &PersistenceError) -> ! {
    error!("{}", err.detail());
    eprintln!("{err}");
    process::exit(1)
}
