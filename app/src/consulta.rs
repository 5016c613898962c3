// Agregador: tenta cada API em ordem até uma responder com dados úteis
//
// Fluxo: Idle -> Tentando[i] -> { Aceito | próxima API | Esgotado }.
// As APIs são consultadas em sequência, nunca em paralelo, e a primeira
// resposta aceita encerra o laço.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use crate::cnpj::Cnpj;
use crate::errors::{ConsultaError, FonteError};
use crate::fontes::{self, Fonte};
use crate::http::Transporte;
use crate::mapeamento;
use crate::models::DadosCnpj;

pub struct Agregador {
    fontes: Vec<Fonte>,
    transporte: Arc<dyn Transporte>,
    exigir_contato: bool,
}

impl Agregador {
    pub fn new(fontes: Vec<Fonte>, transporte: Arc<dyn Transporte>) -> Self {
        Self {
            fontes,
            transporte,
            exigir_contato: false,
        }
    }

    /// Só aceita respostas com pelo menos um telefone ou e-mail.
    pub fn com_exigencia_de_contato(mut self, exigir: bool) -> Self {
        self.exigir_contato = exigir;
        self
    }

    pub fn exige_contato(&self) -> bool {
        self.exigir_contato
    }

    /// Valida o parâmetro bruto e consulta. Nenhuma API é chamada se o CNPJ
    /// for inválido.
    pub async fn consultar_bruto(&self, bruto: Option<&str>) -> Result<DadosCnpj, ConsultaError> {
        let cnpj = Cnpj::from_query(bruto)?;
        self.consultar(&cnpj).await
    }

    pub async fn consultar(&self, cnpj: &Cnpj) -> Result<DadosCnpj, ConsultaError> {
        let mut falhas: Vec<FonteError> = Vec::new();

        for fonte in &self.fontes {
            let url = fonte.url(cnpj);
            info!(fonte = %fonte.nome, url = %url, "Tentando API");

            match self.tentar(fonte, cnpj).await {
                Ok(mut dados) => {
                    info!(fonte = %fonte.nome, tentativas = falhas.len() + 1, "Sucesso");
                    dados.api_info.falhas_anteriores =
                        falhas.iter().map(ToString::to_string).collect();
                    return Ok(dados);
                }
                Err(erro) => {
                    warn!(fonte = %fonte.nome, url = %url, erro = %erro, "API falhou, tentando próxima");
                    falhas.push(erro);
                }
            }
        }

        warn!(cnpj = %cnpj, tentativas = falhas.len(), "Todas as APIs falharam");
        Err(ConsultaError::Esgotado {
            falhas,
            tentadas: fontes::nomes(&self.fontes),
        })
    }

    /// Uma tentativa numa única API: busca, decodifica, mapeia e filtra.
    async fn tentar(&self, fonte: &Fonte, cnpj: &Cnpj) -> Result<DadosCnpj, FonteError> {
        let corpo = self.transporte.buscar(fonte, cnpj).await?;
        let dados = mapeamento::mapear_json(corpo, fonte, cnpj, &agora())?;

        if self.exigir_contato && !dados.tem_contato() {
            return Err(FonteError::DadosInsuficientes {
                fonte: fonte.nome.clone(),
            });
        }

        Ok(dados)
    }
}

fn agora() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
