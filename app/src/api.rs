use std::sync::Arc;

use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::{middleware, web, HttpResponse, ResponseError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;
use crate::consulta::Agregador;
use crate::errors::ConsultaError;
use crate::http::ClienteHttp;
use crate::ui;

pub const ROTA_CONSULTA: &str = "/api/cnpj-multi";

pub struct AppState {
    pub agregador: Agregador,
    pub retry_after_secs: u64,
}

impl AppState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transporte = ClienteHttp::new(config.timeout)?;
        let agregador = Agregador::new(config.fontes.clone(), Arc::new(transporte))
            .com_exigencia_de_contato(config.exigir_contato);
        Ok(Self {
            agregador,
            retry_after_secs: config.retry_after_secs,
        })
    }
}

/// Primeiro valor de `cnpj` na query string; repetições são ignoradas.
fn parametro_cnpj(pares: &[(String, String)]) -> Option<&str> {
    pares
        .iter()
        .find(|(chave, _)| chave == "cnpj")
        .map(|(_, valor)| valor.as_str())
}

/// Corpo de erro devolvido quando todas as APIs falham.
#[derive(Debug, Serialize, Deserialize)]
pub struct RespostaEsgotado {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detalhes: Option<String>,
    pub alternativas: Vec<String>,
    pub falhas: Vec<String>,
    /// Espera sugerida em segundos (somente na variante com contato)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<u64>,
    /// A mesma espera em milissegundos
    #[serde(rename = "waitTime", skip_serializing_if = "Option::is_none")]
    pub wait_time: Option<u64>,
}

/// Erro da rota de consulta, já com o que é preciso para montar a resposta.
#[derive(Debug)]
pub struct ApiError {
    erro: ConsultaError,
    exigir_contato: bool,
    retry_after_secs: u64,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.erro)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.erro {
            ConsultaError::Cnpj(_) => StatusCode::BAD_REQUEST,
            ConsultaError::Esgotado { .. } if self.exigir_contato => StatusCode::TOO_MANY_REQUESTS,
            ConsultaError::Esgotado { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match &self.erro {
            ConsultaError::Cnpj(erro) => response.json(json!({ "error": erro.to_string() })),
            ConsultaError::Esgotado { falhas, tentadas } => {
                let espera = self.exigir_contato.then_some(self.retry_after_secs);
                if let Some(segundos) = espera {
                    response.insert_header((header::RETRY_AFTER, segundos.to_string()));
                }
                response.json(RespostaEsgotado {
                    error: self.erro.to_string(),
                    detalhes: self.erro.ultima_falha().map(ToString::to_string),
                    alternativas: tentadas.clone(),
                    falhas: falhas.iter().map(ToString::to_string).collect(),
                    timer: espera,
                    wait_time: espera.map(|s| s.saturating_mul(1000)),
                })
            }
        }
    }
}

pub async fn consultar_cnpj(
    query: web::Query<Vec<(String, String)>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let dados = state
        .agregador
        .consultar_bruto(parametro_cnpj(&query))
        .await
        .map_err(|erro| ApiError {
            erro,
            exigir_contato: state.agregador.exige_contato(),
            retry_after_secs: state.retry_after_secs,
        })?;

    Ok(HttpResponse::Ok().json(dados))
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "mensagem": "API CNPJ está funcionando"
    }))
}

/// Rotas da aplicação; o estado é registrado por quem monta o `App`.
pub fn configurar(cfg: &mut web::ServiceConfig) {
    cfg.route(ROTA_CONSULTA, web::get().to(consultar_cnpj))
        .route("/health", web::get().to(health_check))
        .route("/", web::get().to(health_check));
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let state = web::Data::new(AppState::from_config(&config)?);
    let address = config.endereco();

    ui::print_header("🌐 Servidor de consulta de CNPJ");
    ui::print_success(&format!("Servidor iniciando em http://{}", address));
    ui::print_info(&format!("Ambiente: {}", config.ambiente));
    ui::print_info(&format!(
        "APIs (em ordem): {}",
        config.fontes.iter().map(|f| f.nome.as_str()).collect::<Vec<_>>().join(", ")
    ));
    if config.exigir_contato {
        ui::print_warning("Somente respostas com telefone ou e-mail serão aceitas");
    }
    ui::print_info("Endpoints disponíveis:");
    ui::print_item(&format!("GET {}?cnpj={{cnpj}}  - Consulta dados de um CNPJ", ROTA_CONSULTA));
    ui::print_item("GET /health                 - Verifica status do servidor");
    ui::print_verbose(&format!(
        "Exemplo: curl 'http://{}{}?cnpj=00000000000191'",
        address, ROTA_CONSULTA
    ));
    ui::print_separator();

    actix_web::HttpServer::new(move || {
        actix_web::App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(configurar)
    })
    .bind(&address)
    .with_context(|| format!("Falha ao abrir {}", address))?
    .workers(num_cpus::get())
    .run()
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FonteError;
    use actix_web::body::to_bytes;
    use serde_json::Value;

    fn esgotado() -> ConsultaError {
        ConsultaError::Esgotado {
            falhas: vec![FonteError::RateLimit { fonte: "A".into() }],
            tentadas: vec!["A".into()],
        }
    }

    #[test]
    fn primeiro_cnpj_da_query() {
        let pares = vec![
            ("outro".to_string(), "x".to_string()),
            ("cnpj".to_string(), "1".to_string()),
            ("cnpj".to_string(), "2".to_string()),
        ];
        assert_eq!(parametro_cnpj(&pares), Some("1"));
        assert_eq!(parametro_cnpj(&[]), None);
    }

    #[actix_web::test]
    async fn espera_enorme_nao_estoura() {
        let erro = ApiError {
            erro: esgotado(),
            exigir_contato: true,
            retry_after_secs: u64::MAX / 100,
        };
        let resp = erro.error_response();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

        let corpo = to_bytes(resp.into_body()).await.unwrap();
        let corpo: Value = serde_json::from_slice(&corpo).unwrap();
        assert_eq!(corpo["timer"], serde_json::json!(u64::MAX / 100));
        assert_eq!(corpo["waitTime"], serde_json::json!(u64::MAX));
    }
}
