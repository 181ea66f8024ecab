use std::{cmp::Ordering, fmt, str::FromStr};

use serde::Serialize;

use crate::EngineError;

/// Position of a rubro inside the budget classifier, e.g. `"2.1.3"`.
///
/// A code is one or more dot-separated segments of ASCII digits. The parent
/// of `"2.1.3"` is `"2.1"` and single-segment codes are roots. Ordering is
/// hierarchical: segments compare numerically and a parent always sorts
/// before its descendants, so a flat sort yields classifier order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Codigo(String);

impl Codigo {
    /// Validates and normalizes a dotted code.
    pub fn nuevo(valor: &str) -> Result<Self, EngineError> {
        let limpio = valor.trim();
        let valido = !limpio.is_empty()
            && limpio
                .split('.')
                .all(|segmento| !segmento.is_empty() && segmento.bytes().all(|b| b.is_ascii_digit()));
        if valido {
            Ok(Self(limpio.to_string()))
        } else {
            Err(EngineError::InvalidState(format!(
                "\"{valor}\" is not a valid rubro code"
            )))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segmentos(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Number of segments; roots have depth 1.
    #[must_use]
    pub fn profundidad(&self) -> usize {
        self.segmentos().count()
    }

    /// The code one level up, or `None` for roots.
    #[must_use]
    pub fn padre(&self) -> Option<Codigo> {
        self.0
            .rsplit_once('.')
            .map(|(prefijo, _)| Codigo(prefijo.to_string()))
    }

    #[must_use]
    pub fn es_raiz(&self) -> bool {
        !self.0.contains('.')
    }
}

impl fmt::Display for Codigo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Codigo {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Codigo {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codigo::nuevo(s)
    }
}

impl Ord for Codigo {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut propios = self.segmentos();
        let mut ajenos = other.segmentos();
        loop {
            match (propios.next(), ajenos.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => {
                    // Digit strings compare numerically as (length, lexicographic),
                    // which keeps "2.10" after "2.9" without parsing.
                    let orden = a.len().cmp(&b.len()).then_with(|| a.cmp(b));
                    if orden != Ordering::Equal {
                        return orden;
                    }
                }
            }
        }
    }
}

impl PartialOrd for Codigo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codigo(valor: &str) -> Codigo {
        Codigo::nuevo(valor).unwrap()
    }

    #[test]
    fn accepts_dotted_digit_codes() {
        assert_eq!(codigo("2").as_str(), "2");
        assert_eq!(codigo(" 2.1.10 ").as_str(), "2.1.10");
        assert_eq!(codigo("2.1.10").profundidad(), 3);
    }

    #[test]
    fn rejects_malformed_codes() {
        for malo in ["", " ", ".", "2.", ".2", "2..1", "2.a", "2-1"] {
            assert!(Codigo::nuevo(malo).is_err(), "accepted {malo:?}");
        }
    }

    #[test]
    fn parent_walks_up_one_level() {
        assert_eq!(codigo("2.1.3").padre(), Some(codigo("2.1")));
        assert_eq!(codigo("2.1").padre(), Some(codigo("2")));
        assert_eq!(codigo("2").padre(), None);
        assert!(codigo("2").es_raiz());
    }

    #[test]
    fn orders_segments_numerically() {
        let mut codigos = vec![
            codigo("2.10"),
            codigo("2.9"),
            codigo("10"),
            codigo("2"),
            codigo("2.9.1"),
        ];
        codigos.sort();
        let orden: Vec<&str> = codigos.iter().map(Codigo::as_str).collect();
        assert_eq!(orden, ["2", "2.9", "2.9.1", "2.10", "10"]);
    }

    #[test]
    fn parent_sorts_before_child() {
        assert!(codigo("2.1") < codigo("2.1.1"));
        assert!(codigo("2.1.1") < codigo("2.2"));
    }
}
