// Tipos de erro da consulta de CNPJ

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CnpjError {
    #[error("CNPJ não fornecido")]
    Ausente,

    #[error("CNPJ inválido. Deve conter 14 dígitos (recebidos {recebido}).")]
    TamanhoInvalido { recebido: usize },
}

/// Falha de uma única API. Nunca é fatal: o agregador passa para a próxima.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FonteError {
    #[error("CNPJ não encontrado em {fonte}")]
    NaoEncontrado { fonte: String },

    #[error("Rate limit excedido em {fonte}")]
    RateLimit { fonte: String },

    #[error("Erro {status} em {fonte}")]
    Status { fonte: String, status: u16 },

    #[error("Timeout ao consultar {fonte}")]
    Timeout { fonte: String },

    #[error("Falha ao conectar com {fonte}: {mensagem}")]
    Transporte { fonte: String, mensagem: String },

    #[error("Resposta inválida de {fonte}: {mensagem}")]
    Decodificacao { fonte: String, mensagem: String },

    #[error("{fonte} não retornou telefone nem e-mail")]
    DadosInsuficientes { fonte: String },
}

impl FonteError {
    pub fn fonte(&self) -> &str {
        match self {
            Self::NaoEncontrado { fonte }
            | Self::RateLimit { fonte }
            | Self::Status { fonte, .. }
            | Self::Timeout { fonte }
            | Self::Transporte { fonte, .. }
            | Self::Decodificacao { fonte, .. }
            | Self::DadosInsuficientes { fonte } => fonte,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ConsultaError {
    #[error(transparent)]
    Cnpj(#[from] CnpjError),

    /// Todas as APIs foram tentadas e nenhuma serviu.
    #[error("Todas as APIs de CNPJ estão indisponíveis no momento. Tente novamente em alguns minutos.")]
    Esgotado {
        falhas: Vec<FonteError>,
        tentadas: Vec<String>,
    },
}

impl ConsultaError {
    /// Último erro registrado antes de desistir.
    pub fn ultima_falha(&self) -> Option<&FonteError> {
        match self {
            Self::Esgotado { falhas, .. } => falhas.last(),
            Self::Cnpj(_) => None,
        }
    }
}
