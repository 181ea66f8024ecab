//! In-memory rubro tree.
//!
//! Structure comes entirely from the dotted codes: "2.1.3" hangs under
//! "2.1" and single-segment codes are roots. The arena is rebuilt from the
//! stored rows on every operation that needs it and is never persisted.

use std::collections::HashMap;

use crate::{Codigo, EngineError};

/// Flat arena over one side of the classifier.
#[derive(Debug)]
pub(crate) struct Arbol {
    nodos: HashMap<Codigo, Nodo>,
    raices: Vec<Codigo>,
}

#[derive(Debug)]
struct Nodo {
    es_hoja: bool,
    hijos: Vec<Codigo>,
}

impl Arbol {
    /// Builds the arena. Every non-root code must have its parent in the
    /// catalog and leaves must not have children; both violations are
    /// reported as [`EngineError::Corruption`].
    pub(crate) fn construir(rubros: &[(Codigo, bool)]) -> Result<Arbol, EngineError> {
        let mut nodos: HashMap<Codigo, Nodo> = rubros
            .iter()
            .map(|(codigo, es_hoja)| {
                (
                    codigo.clone(),
                    Nodo {
                        es_hoja: *es_hoja,
                        hijos: Vec::new(),
                    },
                )
            })
            .collect();

        let mut raices = Vec::new();
        for (codigo, _) in rubros {
            match codigo.padre() {
                None => raices.push(codigo.clone()),
                Some(padre) => match nodos.get_mut(&padre) {
                    Some(nodo) => nodo.hijos.push(codigo.clone()),
                    None => {
                        return Err(EngineError::Corruption(format!(
                            "rubro \"{codigo}\" has no parent \"{padre}\" in the catalog"
                        )));
                    }
                },
            }
        }

        for (codigo, nodo) in &nodos {
            if nodo.es_hoja && !nodo.hijos.is_empty() {
                return Err(EngineError::Corruption(format!(
                    "leaf rubro \"{codigo}\" has child codes"
                )));
            }
        }

        raices.sort();
        for nodo in nodos.values_mut() {
            nodo.hijos.sort();
        }
        Ok(Arbol { nodos, raices })
    }

    /// Codes in children-before-parent order, classifier-sorted per level.
    pub(crate) fn post_orden(&self) -> Vec<&Codigo> {
        let mut orden = Vec::with_capacity(self.nodos.len());
        for raiz in &self.raices {
            self.visitar(raiz, &mut orden);
        }
        orden
    }

    fn visitar<'a>(&'a self, codigo: &'a Codigo, orden: &mut Vec<&'a Codigo>) {
        if let Some(nodo) = self.nodos.get(codigo) {
            for hijo in &nodo.hijos {
                self.visitar(hijo, orden);
            }
        }
        orden.push(codigo);
    }

    pub(crate) fn hijos(&self, codigo: &Codigo) -> &[Codigo] {
        self.nodos
            .get(codigo)
            .map(|nodo| nodo.hijos.as_slice())
            .unwrap_or(&[])
    }
}
