// Configuração do servidor, validada uma vez antes do bootstrap

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::fontes::{self, Fonte};
use crate::http::TIMEOUT_PADRAO;

pub const PORTA_PADRAO: u16 = 3000;
pub const HOST_PADRAO: &str = "0.0.0.0";
pub const RETRY_AFTER_PADRAO: u64 = 60;
const TIMEOUT_MAXIMO: Duration = Duration::from_secs(120);
/// Um dia
pub const RETRY_AFTER_MAXIMO: u64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ambiente {
    #[default]
    Desenvolvimento,
    Producao,
}

impl FromStr for Ambiente {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "desenvolvimento" | "test" => Ok(Self::Desenvolvimento),
            "production" | "prod" | "producao" | "produção" => Ok(Self::Producao),
            outro => Err(ConfigError::AmbienteInvalido(outro.to_string())),
        }
    }
}

impl fmt::Display for Ambiente {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Desenvolvimento => write!(f, "development"),
            Self::Producao => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Ambiente desconhecido: {0} (use development ou production)")]
    AmbienteInvalido(String),

    #[error("Host não pode ser vazio")]
    HostVazio,

    #[error("Porta 0 não é permitida")]
    PortaInvalida,

    #[error("Timeout deve estar entre 1 e {max} segundos (recebido {recebido}s)", max = TIMEOUT_MAXIMO.as_secs())]
    TimeoutInvalido { recebido: u64 },

    #[error("Retry-After deve ser maior que zero quando o contato é exigido")]
    RetryAfterInvalido,

    #[error("Retry-After deve ser no máximo {max} segundos (recebido {recebido}s)", max = RETRY_AFTER_MAXIMO)]
    RetryAfterExcessivo { recebido: u64 },

    #[error("Nenhuma API de CNPJ configurada")]
    SemFontes,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub ambiente: Ambiente,
    /// Limite por chamada a cada API externa
    pub timeout: Duration,
    /// Descarta respostas sem telefone nem e-mail e responde 429 ao esgotar
    pub exigir_contato: bool,
    /// Espera sugerida ao cliente quando todas as APIs falham (variante com contato)
    pub retry_after_secs: u64,
    pub fontes: Vec<Fonte>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: HOST_PADRAO.to_string(),
            port: PORTA_PADRAO,
            ambiente: Ambiente::default(),
            timeout: TIMEOUT_PADRAO,
            exigir_contato: false,
            retry_after_secs: RETRY_AFTER_PADRAO,
            fontes: fontes::fontes_padrao(),
        }
    }
}

impl Config {
    pub fn validar(self) -> Result<Self, ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::HostVazio);
        }
        if self.port == 0 {
            return Err(ConfigError::PortaInvalida);
        }
        if self.timeout.is_zero() || self.timeout > TIMEOUT_MAXIMO {
            return Err(ConfigError::TimeoutInvalido {
                recebido: self.timeout.as_secs(),
            });
        }
        if self.exigir_contato && self.retry_after_secs == 0 {
            return Err(ConfigError::RetryAfterInvalido);
        }
        if self.retry_after_secs > RETRY_AFTER_MAXIMO {
            return Err(ConfigError::RetryAfterExcessivo {
                recebido: self.retry_after_secs,
            });
        }
        if self.fontes.is_empty() {
            return Err(ConfigError::SemFontes);
        }
        Ok(self)
    }

    pub fn endereco(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Filtro de log quando RUST_LOG não está definido.
    pub fn filtro_log_padrao(&self) -> &'static str {
        match self.ambiente {
            Ambiente::Desenvolvimento => "consulta_cnpj=debug,actix_web=info",
            Ambiente::Producao => "consulta_cnpj=info,actix_web=warn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padrao_e_valido() {
        let config = Config::default().validar().unwrap();
        assert_eq!(config.endereco(), "0.0.0.0:3000");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.fontes.len(), 4);
    }

    #[test]
    fn rejeita_valores_invalidos() {
        let err = Config { port: 0, ..Config::default() }.validar().unwrap_err();
        assert_eq!(err, ConfigError::PortaInvalida);

        let err = Config { host: " ".into(), ..Config::default() }.validar().unwrap_err();
        assert_eq!(err, ConfigError::HostVazio);

        let err = Config { timeout: Duration::ZERO, ..Config::default() }.validar().unwrap_err();
        assert_eq!(err, ConfigError::TimeoutInvalido { recebido: 0 });

        let err = Config {
            exigir_contato: true,
            retry_after_secs: 0,
            ..Config::default()
        }
        .validar()
        .unwrap_err();
        assert_eq!(err, ConfigError::RetryAfterInvalido);

        let err = Config {
            retry_after_secs: RETRY_AFTER_MAXIMO + 1,
            ..Config::default()
        }
        .validar()
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::RetryAfterExcessivo {
                recebido: RETRY_AFTER_MAXIMO + 1
            }
        );
        assert!(Config {
            retry_after_secs: RETRY_AFTER_MAXIMO,
            ..Config::default()
        }
        .validar()
        .is_ok());

        let err = Config { fontes: vec![], ..Config::default() }.validar().unwrap_err();
        assert_eq!(err, ConfigError::SemFontes);
    }

    #[test]
    fn ambiente_por_nome() {
        assert_eq!("production".parse::<Ambiente>().unwrap(), Ambiente::Producao);
        assert_eq!("DEV".parse::<Ambiente>().unwrap(), Ambiente::Desenvolvimento);
        assert!("staging".parse::<Ambiente>().is_err());
    }
}
