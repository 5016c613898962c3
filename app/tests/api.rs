// Rota /api/cnpj-multi contra APIs simuladas com wiremock

use std::time::Duration;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use wiremock::matchers::{any, header as cabecalho, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use consulta_cnpj::api::{self, AppState};
use consulta_cnpj::config::Config;
use consulta_cnpj::fontes::{Fonte, TipoFonte};

const CNPJ: &str = "45259906000163";

/// Um MockServer por API, na ordem CNPJ.ws, MinhaReceita, OpenCNPJ.
struct Apis {
    cnpjws: MockServer,
    minhareceita: MockServer,
    opencnpj: MockServer,
}

impl Apis {
    async fn subir() -> Self {
        Self {
            cnpjws: MockServer::start().await,
            minhareceita: MockServer::start().await,
            opencnpj: MockServer::start().await,
        }
    }

    fn fontes(&self) -> Vec<Fonte> {
        vec![
            Fonte::new("CNPJ.ws", TipoFonte::CnpjWs, "", "Mozilla/5.0").com_base(&self.cnpjws.uri()),
            Fonte::new("MinhaReceita", TipoFonte::MinhaReceita, "", "curl/7.68.0")
                .com_base(&self.minhareceita.uri()),
            Fonte::new("OpenCNPJ", TipoFonte::OpenCnpj, "", "Java/11.0.1").com_base(&self.opencnpj.uri()),
        ]
    }

    fn config(&self) -> Config {
        Config {
            fontes: self.fontes(),
            timeout: Duration::from_secs(2),
            ..Config::default()
        }
    }
}

fn state(config: &Config) -> web::Data<AppState> {
    web::Data::new(AppState::from_config(config).unwrap())
}

async fn responder(server: &MockServer, caminho: &str, resposta: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(caminho))
        .respond_with(resposta)
        .expect(1)
        .mount(server)
        .await;
}

async fn nunca_chamado(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

macro_rules! app {
    ($config:expr) => {
        test::init_service(
            App::new()
                .app_data(state(&$config))
                .configure(api::configurar),
        )
        .await
    };
}

#[actix_web::test]
async fn cnpj_invalido_retorna_400_sem_chamar_apis() {
    let apis = Apis::subir().await;
    nunca_chamado(&apis.cnpjws).await;
    nunca_chamado(&apis.minhareceita).await;
    nunca_chamado(&apis.opencnpj).await;
    let app = app!(apis.config());

    for uri in [
        "/api/cnpj-multi",
        "/api/cnpj-multi?cnpj=",
        "/api/cnpj-multi?cnpj=1234567890123",
        "/api/cnpj-multi?cnpj=452599060001630",
        "/api/cnpj-multi?cnpj=45.259.906%2F0001-6",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let corpo: Value = test::read_body_json(resp).await;
        assert!(corpo["error"].as_str().unwrap().starts_with("CNPJ"), "{uri}");
    }
}

#[actix_web::test]
async fn cnpj_repetido_usa_o_primeiro_valor() {
    let apis = Apis::subir().await;
    responder(
        &apis.cnpjws,
        &format!("/cnpj/{CNPJ}"),
        ResponseTemplate::new(200).set_body_json(json!({"razao_social": "ACME LTDA"})),
    )
    .await;
    nunca_chamado(&apis.minhareceita).await;
    nunca_chamado(&apis.opencnpj).await;
    let app = app!(apis.config());

    let req = test::TestRequest::get()
        .uri(&format!("/api/cnpj-multi?cnpj={CNPJ}&cnpj=123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let corpo: Value = test::read_body_json(resp).await;
    assert_eq!(corpo["cnpj"], json!(CNPJ));
}

#[actix_web::test]
async fn cnpj_repetido_invalido_retorna_400_em_json() {
    let apis = Apis::subir().await;
    nunca_chamado(&apis.cnpjws).await;
    let app = app!(apis.config());

    let req = test::TestRequest::get()
        .uri("/api/cnpj-multi?cnpj=1&cnpj=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let corpo: Value = test::read_body_json(resp).await;
    assert!(corpo["error"].as_str().unwrap().starts_with("CNPJ"));
}

#[actix_web::test]
async fn exemplo_completo_com_primeira_api() {
    let apis = Apis::subir().await;
    Mock::given(method("GET"))
        .and(path(format!("/cnpj/{CNPJ}")))
        .and(cabecalho("Accept", "application/json"))
        .and(cabecalho("User-Agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "razao_social": "ACME LTDA",
            "estabelecimento": {"telefone1": "912345678", "ddd1": "38"}
        })))
        .expect(1)
        .mount(&apis.cnpjws)
        .await;
    nunca_chamado(&apis.minhareceita).await;
    nunca_chamado(&apis.opencnpj).await;
    let app = app!(apis.config());

    let req = test::TestRequest::get()
        .uri("/api/cnpj-multi?cnpj=45.259.906/0001-63")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let corpo: Value = test::read_body_json(resp).await;
    assert_eq!(corpo["cnpj"], json!(CNPJ));
    assert_eq!(corpo["razao_social"], json!("ACME LTDA"));
    assert_eq!(
        corpo["telefones"],
        json!([{"ddd": "38", "numero": "912345678", "is_fax": false}])
    );
    assert_eq!(corpo["capital_social"], json!(0.0));
    assert_eq!(corpo["_api_info"]["fonte"], json!("CNPJ.ws"));
    assert!(corpo["_api_info"].get("falhas_anteriores").is_none());
}

#[actix_web::test]
async fn fallback_para_segunda_api_apos_404() {
    let apis = Apis::subir().await;
    responder(&apis.cnpjws, &format!("/cnpj/{CNPJ}"), ResponseTemplate::new(404)).await;
    responder(
        &apis.minhareceita,
        &format!("/{CNPJ}"),
        ResponseTemplate::new(200).set_body_json(json!({
            "cnpj": CNPJ,
            "razao_social": "ACME LTDA",
            "ddd_telefone_1": "3898566015"
        })),
    )
    .await;
    nunca_chamado(&apis.opencnpj).await;
    let app = app!(apis.config());

    let req = test::TestRequest::get()
        .uri(&format!("/api/cnpj-multi?cnpj={CNPJ}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let corpo: Value = test::read_body_json(resp).await;
    assert_eq!(corpo["_api_info"]["fonte"], json!("MinhaReceita"));
    assert_eq!(
        corpo["_api_info"]["falhas_anteriores"],
        json!(["CNPJ não encontrado em CNPJ.ws"])
    );
    assert_eq!(corpo["telefones"][0]["ddd"], json!("38"));
    assert_eq!(corpo["telefones"][0]["numero"], json!("98566015"));
}

#[actix_web::test]
async fn todas_falham_retorna_500_com_falhas_em_ordem() {
    let apis = Apis::subir().await;
    responder(&apis.cnpjws, &format!("/cnpj/{CNPJ}"), ResponseTemplate::new(429)).await;
    responder(&apis.minhareceita, &format!("/{CNPJ}"), ResponseTemplate::new(503)).await;
    responder(
        &apis.opencnpj,
        &format!("/cnpj/{CNPJ}"),
        ResponseTemplate::new(200).set_body_string("<html>manutenção</html>"),
    )
    .await;
    let app = app!(apis.config());

    let req = test::TestRequest::get()
        .uri(&format!("/api/cnpj-multi?cnpj={CNPJ}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.headers().get(header::RETRY_AFTER).is_none());

    let corpo: Value = test::read_body_json(resp).await;
    assert!(corpo["error"].as_str().unwrap().starts_with("Todas as APIs"));
    assert_eq!(corpo["alternativas"], json!(["CNPJ.ws", "MinhaReceita", "OpenCNPJ"]));

    let falhas = corpo["falhas"].as_array().unwrap();
    assert_eq!(falhas.len(), 3);
    assert_eq!(falhas[0], json!("Rate limit excedido em CNPJ.ws"));
    assert_eq!(falhas[1], json!("Erro 503 em MinhaReceita"));
    assert!(falhas[2].as_str().unwrap().starts_with("Resposta inválida de OpenCNPJ"));
    assert_eq!(corpo["detalhes"], falhas[2]);
    assert!(corpo.get("timer").is_none());
}

#[actix_web::test]
async fn variante_com_contato_retorna_429_com_espera() {
    let apis = Apis::subir().await;
    // Dados válidos, mas sem telefone nem e-mail
    responder(
        &apis.cnpjws,
        &format!("/cnpj/{CNPJ}"),
        ResponseTemplate::new(200).set_body_json(json!({"razao_social": "ACME LTDA"})),
    )
    .await;
    responder(&apis.minhareceita, &format!("/{CNPJ}"), ResponseTemplate::new(404)).await;
    responder(&apis.opencnpj, &format!("/cnpj/{CNPJ}"), ResponseTemplate::new(500)).await;

    let config = Config {
        exigir_contato: true,
        retry_after_secs: 30,
        ..apis.config()
    };
    let app = app!(config);

    let req = test::TestRequest::get()
        .uri(&format!("/api/cnpj-multi?cnpj={CNPJ}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers().get(header::RETRY_AFTER).unwrap(), "30");

    let corpo: Value = test::read_body_json(resp).await;
    assert_eq!(corpo["timer"], json!(30));
    assert_eq!(corpo["waitTime"], json!(30_000));
    assert_eq!(
        corpo["falhas"],
        json!([
            "CNPJ.ws não retornou telefone nem e-mail",
            "CNPJ não encontrado em MinhaReceita",
            "Erro 500 em OpenCNPJ"
        ])
    );
}

#[actix_web::test]
async fn timeout_conta_como_falha_da_api() {
    let apis = Apis::subir().await;
    responder(
        &apis.cnpjws,
        &format!("/cnpj/{CNPJ}"),
        ResponseTemplate::new(200)
            .set_body_json(json!({"razao_social": "LENTA"}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    responder(
        &apis.minhareceita,
        &format!("/{CNPJ}"),
        ResponseTemplate::new(200).set_body_json(json!({"razao_social": "RAPIDA"})),
    )
    .await;
    nunca_chamado(&apis.opencnpj).await;

    let config = Config {
        timeout: Duration::from_millis(300),
        ..apis.config()
    };
    let app = app!(config);

    let req = test::TestRequest::get()
        .uri(&format!("/api/cnpj-multi?cnpj={CNPJ}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let corpo: Value = test::read_body_json(resp).await;
    assert_eq!(corpo["razao_social"], json!("RAPIDA"));
    assert_eq!(
        corpo["_api_info"]["falhas_anteriores"],
        json!(["Timeout ao consultar CNPJ.ws"])
    );
}

#[actix_web::test]
async fn health_check() {
    let apis = Apis::subir().await;
    let app = app!(apis.config());

    for uri in ["/health", "/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let corpo: Value = test::read_body_json(resp).await;
        assert_eq!(corpo["status"], json!("ok"));
    }
}
