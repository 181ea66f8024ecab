//! Execution report rows.
//!
//! Rows follow the layout of the printed ejecución presupuestal: one line
//! per rubro in classifier order, appropriation columns first, then the
//! movement of each document stage split around the cutoff month.

use std::ops::Add;

use serde::Serialize;

use crate::{Codigo, Money, rubros::Apropiacion};

/// Movement of one document stage: before the cutoff month, inside it, and
/// the running total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Triplete {
    pub anterior: Money,
    pub mes: Money,
}

impl Triplete {
    #[must_use]
    pub fn acumulado(&self) -> Money {
        self.anterior + self.mes
    }

    pub(crate) fn sumar(&mut self, valor: Money, en_mes: bool) {
        if en_mes {
            self.mes += valor;
        } else {
            self.anterior += valor;
        }
    }
}

impl Add for Triplete {
    type Output = Triplete;

    fn add(self, rhs: Triplete) -> Self::Output {
        Triplete {
            anterior: self.anterior + rhs.anterior,
            mes: self.mes + rhs.mes,
        }
    }
}

/// One row of the expense execution report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilaGasto {
    pub codigo: Codigo,
    pub cuenta: String,
    pub es_hoja: bool,
    pub apropiacion: Apropiacion,
    pub cdp: Triplete,
    pub rp: Triplete,
    pub obligaciones: Triplete,
    pub pagos: Triplete,
}

impl FilaGasto {
    #[must_use]
    pub fn definitiva(&self) -> Money {
        self.apropiacion.definitiva()
    }

    /// Appropriation not yet committed by CDPs.
    #[must_use]
    pub fn saldo_disponible(&self) -> Money {
        self.definitiva() - self.cdp.acumulado()
    }

    /// Committed by RP but not yet obligated.
    #[must_use]
    pub fn saldo_por_obligar(&self) -> Money {
        self.rp.acumulado() - self.obligaciones.acumulado()
    }

    /// Obligated but not yet paid.
    #[must_use]
    pub fn saldo_por_pagar(&self) -> Money {
        self.obligaciones.acumulado() - self.pagos.acumulado()
    }
}

/// One row of the revenue execution report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FilaIngreso {
    pub codigo: Codigo,
    pub cuenta: String,
    pub es_hoja: bool,
    pub apropiacion: Apropiacion,
    pub reconocimientos: Triplete,
    pub recaudos: Triplete,
}

impl FilaIngreso {
    #[must_use]
    pub fn definitiva(&self) -> Money {
        self.apropiacion.definitiva()
    }

    /// Recognized-or-budgeted revenue not yet collected.
    #[must_use]
    pub fn saldo_por_recaudar(&self) -> Money {
        self.definitiva() - self.recaudos.acumulado()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triplete_accumulates_both_buckets() {
        let mut triplete = Triplete::default();
        triplete.sumar(Money::new(300), false);
        triplete.sumar(Money::new(200), true);
        assert_eq!(triplete.anterior, Money::new(300));
        assert_eq!(triplete.mes, Money::new(200));
        assert_eq!(triplete.acumulado(), Money::new(500));
    }

    #[test]
    fn expense_row_balances() {
        let fila = FilaGasto {
            codigo: Codigo::nuevo("2.1").unwrap(),
            cuenta: "Gastos de personal".to_string(),
            es_hoja: true,
            apropiacion: Apropiacion::con_inicial(Money::new(10_000)),
            cdp: Triplete {
                anterior: Money::new(4_000),
                mes: Money::new(1_000),
            },
            rp: Triplete {
                anterior: Money::new(3_000),
                mes: Money::new(500),
            },
            obligaciones: Triplete {
                anterior: Money::new(2_000),
                mes: Money::new(0),
            },
            pagos: Triplete {
                anterior: Money::new(1_500),
                mes: Money::new(0),
            },
        };
        assert_eq!(fila.saldo_disponible(), Money::new(5_000));
        assert_eq!(fila.saldo_por_obligar(), Money::new(1_500));
        assert_eq!(fila.saldo_por_pagar(), Money::new(500));
    }
}
