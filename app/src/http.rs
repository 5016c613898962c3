// Transporte das consultas às APIs externas

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::cnpj::Cnpj;
use crate::errors::FonteError;
use crate::fontes::Fonte;
use crate::utils;

pub const TIMEOUT_PADRAO: Duration = Duration::from_secs(10);

/// Busca o JSON bruto de uma API. Qualquer falha vira `FonteError`.
#[async_trait]
pub trait Transporte: Send + Sync {
    async fn buscar(&self, fonte: &Fonte, cnpj: &Cnpj) -> Result<Value, FonteError>;
}

/// Implementação com `reqwest`: um GET por API, sem retry.
#[derive(Clone)]
pub struct ClienteHttp {
    client: reqwest::Client,
}

impl ClienteHttp {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .context("Falha ao criar cliente HTTP")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transporte for ClienteHttp {
    async fn buscar(&self, fonte: &Fonte, cnpj: &Cnpj) -> Result<Value, FonteError> {
        let url = fonte.url(cnpj);
        let mut request = self.client.get(&url);
        for (nome, valor) in fonte.headers() {
            request = request.header(nome, valor);
        }

        let response = request.send().await.map_err(|e| erro_transporte(fonte, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(erro_status(fonte, status));
        }

        let corpo = response
            .text()
            .await
            .map_err(|e| erro_transporte(fonte, e))?;
        debug!(fonte = %fonte.nome, corpo = %utils::resumo(&corpo, 200), "Resposta recebida");

        serde_json::from_str(&corpo).map_err(|e| FonteError::Decodificacao {
            fonte: fonte.nome.clone(),
            mensagem: e.to_string(),
        })
    }
}

fn erro_status(fonte: &Fonte, status: StatusCode) -> FonteError {
    let fonte = fonte.nome.clone();
    match status {
        StatusCode::NOT_FOUND => FonteError::NaoEncontrado { fonte },
        StatusCode::TOO_MANY_REQUESTS => FonteError::RateLimit { fonte },
        _ => FonteError::Status {
            fonte,
            status: status.as_u16(),
        },
    }
}

fn erro_transporte(fonte: &Fonte, e: reqwest::Error) -> FonteError {
    if e.is_timeout() {
        FonteError::Timeout {
            fonte: fonte.nome.clone(),
        }
    } else {
        FonteError::Transporte {
            fonte: fonte.nome.clone(),
            mensagem: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fontes::TipoFonte;

    fn fonte() -> Fonte {
        Fonte::new("Teste", TipoFonte::CnpjWs, "http://localhost/{cnpj}", "test/1.0")
    }

    #[test]
    fn classifica_status() {
        assert_eq!(
            erro_status(&fonte(), StatusCode::NOT_FOUND),
            FonteError::NaoEncontrado { fonte: "Teste".into() }
        );
        assert_eq!(
            erro_status(&fonte(), StatusCode::TOO_MANY_REQUESTS),
            FonteError::RateLimit { fonte: "Teste".into() }
        );
        assert_eq!(
            erro_status(&fonte(), StatusCode::BAD_GATEWAY),
            FonteError::Status { fonte: "Teste".into(), status: 502 }
        );
    }
}
