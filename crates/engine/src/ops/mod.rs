use sea_orm::{DatabaseConnection, DbErr};

use crate::ResultEngine;

mod consolidacion;
mod documentos;
mod modificaciones;
mod reportes;
mod rubros;
mod tenants;

/// Attempts per operation before a lock conflict is surfaced.
pub(crate) const MAX_INTENTOS: u8 = 3;

/// Whether a database error is a transient lock or serialization conflict
/// worth rerunning the operation for.
pub(crate) fn es_conflicto(err: &DbErr) -> bool {
    let texto = err.to_string().to_ascii_lowercase();
    texto.contains("locked") || texto.contains("busy") || texto.contains("serialization")
}

/// Run a block inside a DB transaction, committing on success and rolling
/// back on error. Transient lock conflicts rerun the whole block with fresh
/// reads, up to [`MAX_INTENTOS`] attempts, so the block must evaluate to its
/// result instead of early-returning.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let mut intentos = 0u8;
        loop {
            intentos += 1;
            let $tx = $self.database.begin().await?;
            let result = match $body {
                Ok(value) => match $tx.commit().await {
                    Ok(()) => Ok(value),
                    Err(err) => Err(crate::EngineError::Database(err)),
                },
                Err(err) => Err(err),
            };
            match result {
                Err(crate::EngineError::Database(err)) if crate::ops::es_conflicto(&err) => {
                    if intentos >= crate::ops::MAX_INTENTOS {
                        break Err(crate::EngineError::ConcurrencyConflict(err.to_string()));
                    }
                }
                other => break other,
            }
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
