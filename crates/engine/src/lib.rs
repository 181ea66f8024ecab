pub use codigo::Codigo;
pub use commands::{
    ActualizarDocumentoCmd, AdicionCmd, CdpCmd, CreditoCmd, NuevoRubro, ObligacionCmd, PagoCmd,
    RecaudoCmd, ReconocimientoCmd, ReduccionCmd, RpCmd, RubroCmd,
};
pub use consolidados::{ConsolidacionMes, RubroConsolidado};
pub use documentos::{Documento, Estado, SaldoDocumento, TipoDocumento};
pub use error::EngineError;
pub use modificaciones::{Equilibrio, Modificacion, TipoModificacion};
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use periodos::{CierreMes, Periodo};
pub use reportes::{FilaGasto, FilaIngreso, Triplete};
pub use rubros::{Apropiacion, Rubro, Saldo, TipoRubro};
pub use tenants::Tenant;

mod arbol;
mod codigo;
mod commands;
mod consolidados;
mod documentos;
mod error;
mod modificaciones;
mod money;
mod ops;
mod periodos;
mod reportes;
mod rubros;
mod tenants;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
