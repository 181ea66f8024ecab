//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use chrono::{Datelike, NaiveDate};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, Money, ResultEngine};

/// NFC-normalize and collapse whitespace; rejects empty values.
pub(crate) fn texto_requerido(value: &str, label: &str) -> ResultEngine<String> {
    match texto_opcional(Some(value)) {
        Some(limpio) => Ok(limpio),
        None => Err(EngineError::InvalidState(format!(
            "{label} must not be empty"
        ))),
    }
}

/// Same normalization as [`texto_requerido`], but empty input becomes `None`.
pub(crate) fn texto_opcional(value: Option<&str>) -> Option<String> {
    let limpio = value?
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .nfc()
        .collect::<String>();
    if limpio.is_empty() { None } else { Some(limpio) }
}

/// Case- and diacritic-insensitive key for uniqueness comparisons, so
/// "Alcaldía de Pasto" and "alcaldia de  pasto" collide.
pub(crate) fn clave_nombre(value: &str) -> String {
    value
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Positive-amount guard shared by every monetary write.
pub(crate) fn valor_positivo(valor: Money, label: &str) -> ResultEngine<()> {
    if valor.is_positive() {
        Ok(())
    } else {
        Err(EngineError::InvalidAmount(format!(
            "{label} must be > 0, got {valor}"
        )))
    }
}

/// Documents and modifications must be dated inside the open vigencia.
pub(crate) fn fecha_en_vigencia(fecha: NaiveDate, vigencia: i32) -> ResultEngine<()> {
    if fecha.year() == vigencia {
        Ok(())
    } else {
        Err(EngineError::InvalidState(format!(
            "fecha {fecha} is outside vigencia {vigencia}"
        )))
    }
}

/// Month number of a date, 1 to 12.
pub(crate) fn mes_de(fecha: NaiveDate) -> i32 {
    fecha.month() as i32
}

/// First day of a month.
pub(crate) fn primer_dia(vigencia: i32, mes: i32) -> ResultEngine<NaiveDate> {
    u32::try_from(mes)
        .ok()
        .and_then(|mes| NaiveDate::from_ymd_opt(vigencia, mes, 1))
        .ok_or_else(|| EngineError::InvalidAmount(format!("invalid month {mes}")))
}

/// First day of the month after, the upper bound for half-open date ranges.
pub(crate) fn primer_dia_siguiente(vigencia: i32, mes: i32) -> ResultEngine<NaiveDate> {
    if mes >= 12 {
        primer_dia(vigencia + 1, 1)
    } else {
        primer_dia(vigencia, mes + 1)
    }
}
