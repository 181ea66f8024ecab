//! The errors the engine can return.
//!
//! Validation failures carry enough context to explain the rejected request:
//! [`InsufficientBalance`] reports both sides of the failed availability
//! check and [`BelowConsumed`] names the rubro whose consumed floor was hit.
//!
//! [`InsufficientBalance`]: EngineError::InsufficientBalance
//! [`BelowConsumed`]: EngineError::BelowConsumed
use sea_orm::DbErr;
use thiserror::Error;

use crate::Money;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found")]
    NotFound(String),
    #[error("\"{0}\" already present")]
    ExistingKey(String),
    #[error("rubro \"{0}\" is not a leaf; documents post to leaf rubros only")]
    RubroNoImputable(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("insufficient balance: available {disponible}, requested {solicitado}")]
    InsufficientBalance { disponible: Money, solicitado: Money },
    #[error(
        "rubro \"{codigo}\" cannot drop below its consumed balance: definitiva would be {definitiva}, consumed is {consumido}"
    )]
    BelowConsumed {
        codigo: String,
        definitiva: Money,
        consumido: Money,
    },
    #[error("fiscal equilibrium violation: {0}")]
    EquilibriumViolation(String),
    #[error("vigencia {vigencia} is already at month 12; open the next vigencia instead")]
    AlreadyAtYearEnd { vigencia: i32 },
    #[error("concurrent update conflict: {0}")]
    ConcurrencyConflict(String),
    #[error("catalog corruption: {0}")]
    Corruption(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::RubroNoImputable(a), Self::RubroNoImputable(b)) => a == b,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (
                Self::InsufficientBalance {
                    disponible: a,
                    solicitado: b,
                },
                Self::InsufficientBalance {
                    disponible: c,
                    solicitado: d,
                },
            ) => a == c && b == d,
            (
                Self::BelowConsumed {
                    codigo: a,
                    definitiva: b,
                    consumido: c,
                },
                Self::BelowConsumed {
                    codigo: d,
                    definitiva: e,
                    consumido: f,
                },
            ) => a == d && b == e && c == f,
            (Self::EquilibriumViolation(a), Self::EquilibriumViolation(b)) => a == b,
            (Self::AlreadyAtYearEnd { vigencia: a }, Self::AlreadyAtYearEnd { vigencia: b }) => {
                a == b
            }
            (Self::ConcurrencyConflict(a), Self::ConcurrencyConflict(b)) => a == b,
            (Self::Corruption(a), Self::Corruption(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
