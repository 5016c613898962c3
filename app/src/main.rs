use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use consulta_cnpj::config::{self, Ambiente, Config};
use consulta_cnpj::errors::ConsultaError;
use consulta_cnpj::http::ClienteHttp;
use consulta_cnpj::models::{DadosCnpj, SimNao, TipoSocio};
use consulta_cnpj::{api, ui, Agregador, Cnpj};

#[derive(Parser)]
#[command(name = "consulta-cnpj")]
#[command(about = "Consulta de CNPJ em múltiplas APIs públicas com fallback", long_about = None)]
struct Cli {
    /// Modo silencioso (menos saída)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Modo verboso (mais detalhes)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inicia o servidor HTTP com a rota de consulta
    Server {
        /// Endereço do servidor
        #[arg(long, env = "HOSTNAME", default_value = config::HOST_PADRAO)]
        host: String,
        /// Porta do servidor
        #[arg(short, long, env = "PORT", default_value_t = config::PORTA_PADRAO)]
        port: u16,
        /// Ambiente (development ou production)
        #[arg(short, long, env = "APP_ENV", default_value = "development")]
        env: Ambiente,
        /// Timeout de cada API externa, em segundos
        #[arg(short, long, env = "CNPJ_TIMEOUT_SECS", default_value_t = 10)]
        timeout: u64,
        /// Só aceita respostas com telefone ou e-mail
        #[arg(long, env = "CNPJ_EXIGIR_CONTATO")]
        exigir_contato: bool,
        /// Espera sugerida (segundos) quando todas as APIs falham
        #[arg(long, env = "CNPJ_RETRY_AFTER_SECS", default_value_t = config::RETRY_AFTER_PADRAO)]
        retry_after: u64,
    },
    /// Consulta um CNPJ direto pelo terminal
    Consultar {
        /// CNPJ com ou sem máscara
        cnpj: String,
        /// Só aceita respostas com telefone ou e-mail
        #[arg(long)]
        exigir_contato: bool,
        /// Imprime o JSON unificado em vez do resumo
        #[arg(long)]
        json: bool,
        /// Timeout de cada API externa, em segundos
        #[arg(short, long, default_value_t = 10)]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    ui::init(cli.quiet, cli.verbose);

    match cli.command {
        Commands::Server {
            host,
            port,
            env,
            timeout,
            exigir_contato,
            retry_after,
        } => {
            let config = Config {
                host,
                port,
                ambiente: env,
                timeout: Duration::from_secs(timeout),
                exigir_contato,
                retry_after_secs: retry_after,
                ..Config::default()
            }
            .validar()?;
            init_tracing(filtro_log(cli.quiet, cli.verbose, config.filtro_log_padrao()));
            api::start_server(config).await?;
        }
        Commands::Consultar {
            cnpj,
            exigir_contato,
            json,
            timeout,
        } => {
            init_tracing(filtro_log(cli.quiet, cli.verbose, "consulta_cnpj=warn"));
            consultar(&cnpj, exigir_contato, json, Duration::from_secs(timeout)).await?;
        }
    }

    Ok(())
}

fn filtro_log(quiet: bool, verbose: bool, padrao: &'static str) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "consulta_cnpj=debug,actix_web=info"
    } else {
        padrao
    }
}

// RUST_LOG, quando definido, tem precedência
fn init_tracing(padrao: &str) {
    let filtro = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(padrao));
    tracing_subscriber::fmt()
        .with_env_filter(filtro)
        .with_writer(std::io::stderr)
        .init();
}

async fn consultar(bruto: &str, exigir_contato: bool, json: bool, timeout: Duration) -> Result<()> {
    let cnpj = Cnpj::parse(bruto)?;
    let config = Config {
        timeout,
        ..Config::default()
    }
    .validar()?;

    let agregador = Agregador::new(config.fontes.clone(), Arc::new(ClienteHttp::new(config.timeout)?))
        .com_exigencia_de_contato(exigir_contato);

    let pb = ui::spinner(&format!("Consultando {}...", cnpj.formatado()));
    let resultado = agregador.consultar(&cnpj).await;
    pb.finish_and_clear();

    match resultado {
        Ok(dados) if json => {
            println!("{}", serde_json::to_string_pretty(&dados)?);
        }
        Ok(dados) => exibir(&cnpj, &dados),
        Err(erro) => {
            ui::print_error(&erro.to_string());
            if let ConsultaError::Esgotado { falhas, .. } = &erro {
                for falha in falhas {
                    ui::print_error(&format!("  - {}", falha));
                }
            }
            return Err(erro.into());
        }
    }

    Ok(())
}

fn exibir(cnpj: &Cnpj, dados: &DadosCnpj) {
    ui::print_header(&format!("🏢 {}", cnpj.formatado()));
    ui::print_campo("Razão social", dados.razao_social.as_deref());
    ui::print_campo("Nome fantasia", dados.nome_fantasia.as_deref());
    ui::print_campo("Situação", dados.situacao_cadastral.situacao.as_deref());
    ui::print_campo("Data da situação", dados.situacao_cadastral.data_situacao.as_deref());
    ui::print_campo(
        "Natureza jurídica",
        dados.natureza_juridica.as_ref().and_then(|n| n.descricao.as_deref()),
    );
    ui::print_campo("Porte", dados.porte.as_deref());
    ui::print_campo("Capital social", Some(format!("R$ {:.2}", dados.capital_social).as_str()));
    ui::print_campo("Início das atividades", dados.data_inicio_atividade.as_deref());
    ui::print_campo("Matriz/filial", dados.matriz_filial.as_deref());
    if let Some(cnae) = &dados.cnae_principal {
        let texto = format!(
            "{} {}",
            cnae.codigo.as_deref().unwrap_or("-"),
            cnae.descricao.as_deref().unwrap_or("")
        );
        ui::print_campo("CNAE principal", Some(texto.trim()));
    }

    let e = &dados.endereco;
    let endereco: Vec<&str> = [
        e.logradouro.as_deref(),
        e.numero.as_deref(),
        e.complemento.as_deref(),
        e.bairro.as_deref(),
        e.municipio.as_deref(),
        e.uf.as_deref(),
        e.cep.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !endereco.is_empty() {
        ui::print_campo("Endereço", Some(endereco.join(", ").as_str()));
    }

    for tel in &dados.telefones {
        let label = if tel.is_fax { "Fax" } else { "Telefone" };
        ui::print_campo(label, Some(format!("({}) {}", tel.ddd, tel.numero).as_str()));
    }
    ui::print_campo("E-mail", dados.email.as_deref());
    ui::print_campo("Simples", Some(sim_nao(dados.opcao_simples)));
    ui::print_campo("MEI", Some(sim_nao(dados.opcao_mei)));

    if !dados.quadro_societario.is_empty() {
        ui::print_info("Quadro societário:");
        for socio in &dados.quadro_societario {
            let tipo = match socio.tipo {
                TipoSocio::PessoaFisica => "PF",
                TipoSocio::PessoaJuridica => "PJ",
            };
            ui::print_item(&format!(
                "{} ({}) - {}",
                socio.nome.as_deref().unwrap_or("?"),
                tipo,
                socio.qualificacao.as_deref().unwrap_or("-")
            ));
        }
    }

    ui::print_separator();
    ui::print_verbose(&format!(
        "Fonte: {} ({}) em {}",
        dados.api_info.fonte, dados.api_info.url, dados.api_info.timestamp
    ));
    for falha in &dados.api_info.falhas_anteriores {
        ui::print_verbose(&format!("Falha anterior: {}", falha));
    }
}

fn sim_nao(valor: SimNao) -> &'static str {
    match valor {
        SimNao::Sim => "Sim",
        SimNao::Nao => "Não",
    }
}
