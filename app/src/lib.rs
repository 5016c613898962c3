pub mod api;
pub mod cnpj;
pub mod config;
pub mod consulta;
pub mod errors;
pub mod fontes;
pub mod http;
pub mod mapeamento;
pub mod models;
pub mod payload;
pub mod ui;
pub mod utils;

pub use cnpj::Cnpj;
pub use config::Config;
pub use consulta::Agregador;
pub use errors::{CnpjError, ConsultaError, FonteError};
pub use models::DadosCnpj;
