// Conversão da resposta de uma API para o formato unificado

use serde_json::Value;
use tracing::info;

use crate::cnpj::Cnpj;
use crate::errors::FonteError;
use crate::fontes::Fonte;
use crate::models::{
    ApiInfo, CodigoDescricao, DadosCnpj, Endereco, SimNao, SituacaoCadastral, Socio, Telefone,
    TipoSocio,
};
use crate::payload::{Payload, Registro, SocioBruto, TelefoneBruto};
use crate::utils::{nao_vazio, primeiro, somente_digitos};

/// Decodifica o JSON no formato da fonte e mapeia para `DadosCnpj`.
///
/// Corpo fora do formato esperado vira `Decodificacao`; erro reportado pela
/// própria API (ReceitaWS `status: ERROR`) vira `NaoEncontrado`.
pub fn mapear_json(
    corpo: Value,
    fonte: &Fonte,
    cnpj: &Cnpj,
    timestamp: &str,
) -> Result<DadosCnpj, FonteError> {
    let payload = Payload::decode(fonte.tipo, corpo).map_err(|e| FonteError::Decodificacao {
        fonte: fonte.nome.clone(),
        mensagem: e.to_string(),
    })?;

    if let Some(mensagem) = payload.erro_reportado() {
        info!(fonte = %fonte.nome, mensagem = %mensagem, "API respondeu com erro");
        return Err(FonteError::NaoEncontrado {
            fonte: fonte.nome.clone(),
        });
    }

    Ok(mapear(&payload, fonte, cnpj, timestamp))
}

/// Função pura: o mesmo payload sempre gera o mesmo resultado.
fn mapear(payload: &Payload, fonte: &Fonte, cnpj: &Cnpj, timestamp: &str) -> DadosCnpj {
    let r = payload.registro();

    DadosCnpj {
        cnpj: primeiro([r.cnpj.as_deref().map(somente_digitos), Some(cnpj.to_string())])
            .unwrap_or_else(|| cnpj.to_string()),
        razao_social: r.razao_social.clone(),
        nome_fantasia: r.nome_fantasia.clone(),
        situacao_cadastral: SituacaoCadastral {
            situacao: r.situacao.clone(),
            data_situacao: r.data_situacao.clone(),
            motivo: r.motivo_situacao.clone(),
            situacao_especial: r.situacao_especial.clone(),
            data_situacao_especial: r.data_situacao_especial.clone(),
        },
        natureza_juridica: CodigoDescricao::montar(
            r.natureza_juridica.codigo.clone(),
            r.natureza_juridica.descricao.clone(),
        ),
        porte: r.porte.clone(),
        capital_social: parse_capital(r.capital_social.as_deref()),
        data_inicio_atividade: r.data_inicio_atividade.clone(),
        matriz_filial: r.matriz_filial.clone(),
        cnae_principal: CodigoDescricao::montar(
            r.cnae_principal.codigo.clone(),
            r.cnae_principal.descricao.clone(),
        ),
        cnaes_secundarios: r
            .cnaes_secundarios
            .iter()
            .filter(|c| !c.vazio() && !c.marcador_vazio())
            .map(|c| CodigoDescricao {
                codigo: c.codigo.clone(),
                descricao: c.descricao.clone(),
            })
            .collect(),
        endereco: endereco(&r),
        telefones: normalizar_telefones(&r.telefones),
        email: r.email.as_deref().map(str::to_lowercase),
        opcao_simples: sim_nao(r.opcao_simples.as_deref()),
        data_opcao_simples: r.data_opcao_simples.clone(),
        opcao_mei: sim_nao(r.opcao_mei.as_deref()),
        data_opcao_mei: r.data_opcao_mei.clone(),
        quadro_societario: r.socios.iter().map(socio).collect(),
        api_info: ApiInfo {
            fonte: fonte.nome.clone(),
            url: fonte.url(cnpj),
            timestamp: timestamp.to_string(),
            falhas_anteriores: Vec::new(),
        },
    }
}

fn endereco(r: &Registro) -> Endereco {
    // Algumas APIs mandam o tipo ("Rua", "Avenida") separado do nome
    let logradouro = match (r.tipo_logradouro.as_deref(), r.logradouro.as_deref()) {
        (Some(tipo), Some(nome)) if !nome.to_lowercase().starts_with(&tipo.to_lowercase()) => {
            Some(format!("{} {}", tipo, nome))
        }
        (_, Some(nome)) => Some(nome.to_string()),
        (_, None) => None,
    };

    Endereco {
        logradouro,
        numero: r.numero.clone(),
        complemento: r.complemento.clone(),
        bairro: r.bairro.clone(),
        municipio: r.municipio.clone(),
        uf: r.uf.clone(),
        cep: r.cep.as_deref().map(somente_digitos).and_then(|c| nao_vazio(Some(c))),
        codigo_ibge: r.codigo_ibge.clone(),
    }
}

/// Capital social em qualquer um dos formatos das APIs.
///
/// Com vírgula, o ponto é separador de milhar: "1.500,50" → 1500.50.
/// Sem vírgula, o ponto é o separador decimal: "1500.50" → 1500.50.
/// Ausente ou ilegível vira 0.
pub fn parse_capital(valor: Option<&str>) -> f64 {
    let Some(valor) = valor.map(str::trim).filter(|v| !v.is_empty()) else {
        return 0.0;
    };
    let normalizado = if valor.contains(',') {
        valor.replace('.', "").replace(',', ".")
    } else {
        valor.to_string()
    };
    let normalizado: String = normalizado
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    normalizado
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Junta todos os formatos de telefone numa lista única, na ordem em que
/// aparecem. Entradas sem DDD ou sem número são descartadas.
pub fn normalizar_telefones(brutos: &[TelefoneBruto]) -> Vec<Telefone> {
    brutos
        .iter()
        .filter_map(|bruto| match bruto {
            TelefoneBruto::Par { ddd, numero, is_fax } => {
                let ddd = ddd.as_deref().map(somente_digitos).unwrap_or_default();
                let numero = numero.as_deref().map(somente_digitos).unwrap_or_default();
                if ddd.is_empty() {
                    // Número sem DDD separado: pode ser DDD + número juntos
                    return separar_ddd(&numero, *is_fax);
                }
                if numero.is_empty() {
                    return None;
                }
                Some(Telefone {
                    ddd,
                    numero,
                    is_fax: *is_fax,
                })
            }
            TelefoneBruto::Junto { texto, is_fax } => {
                separar_ddd(&somente_digitos(texto.as_deref()?), *is_fax)
            }
        })
        .collect()
}

/// "38912345678" → DDD "38" e número "912345678". Exige ao menos 10 dígitos.
fn separar_ddd(digitos: &str, is_fax: bool) -> Option<Telefone> {
    if digitos.len() < 10 {
        return None;
    }
    Some(Telefone {
        ddd: digitos[..2].to_string(),
        numero: digitos[2..].to_string(),
        is_fax,
    })
}

/// Pessoa física quando o rótulo ou o código dizem isso; qualquer outro
/// caso (inclusive ausente) é pessoa jurídica.
pub fn tipo_socio(tipo: Option<&str>) -> TipoSocio {
    let Some(tipo) = tipo.map(|t| t.trim().to_lowercase()) else {
        return TipoSocio::PessoaJuridica;
    };
    let pessoa_fisica = tipo == "2"
        || tipo == "pf"
        || tipo.contains("física")
        || tipo.contains("fisica");
    if pessoa_fisica {
        TipoSocio::PessoaFisica
    } else {
        TipoSocio::PessoaJuridica
    }
}

fn socio(bruto: &SocioBruto) -> Socio {
    Socio {
        nome: bruto.nome.clone(),
        documento: bruto.documento.clone(),
        tipo: tipo_socio(bruto.tipo.as_deref()),
        qualificacao: bruto.qualificacao.clone(),
        data_entrada: bruto.data_entrada.clone(),
        faixa_etaria: bruto.faixa_etaria.clone(),
    }
}

/// Opção pelo Simples/MEI: `true`, "S" ou "Sim" contam como sim.
pub fn sim_nao(valor: Option<&str>) -> SimNao {
    let sim = valor
        .map(|v| v.trim().to_lowercase())
        .is_some_and(|v| matches!(v.as_str(), "true" | "s" | "sim"));
    SimNao::from(sim)
}
