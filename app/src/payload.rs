// Formatos de resposta de cada API e a representação interna comum.
//
// Cada API tem o seu struct; todos são convertidos em `Registro` antes do
// mapeamento para o formato final. Os escalares são lidos de forma tolerante
// (texto, número ou booleano viram texto) porque as APIs não são consistentes.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::fontes::TipoFonte;
use crate::utils::{nao_vazio, primeiro};

/// Escalar tolerante: aceita texto, número ou booleano.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Texto(Option<String>);

impl<'de> Deserialize<'de> for Texto {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let valor = Value::deserialize(deserializer)?;
        Ok(Self(texto_de(&valor)))
    }
}

fn texto_de(valor: &Value) -> Option<String> {
    match valor {
        Value::String(s) => nao_vazio(Some(s.clone())),
        Value::Number(n) => Some(numero_como_texto(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// `Number::to_string` usa expoente a partir de 1e16 ("2.5e16"); o Display de
// f64 sempre escreve a forma decimal.
fn numero_como_texto(n: &serde_json::Number) -> String {
    match (n.as_i64(), n.as_u64(), n.as_f64()) {
        (Some(i), _, _) => i.to_string(),
        (_, Some(u), _) => u.to_string(),
        (_, _, Some(f)) => f.to_string(),
        _ => n.to_string(),
    }
}

/// Campo opcional tolerante já convertido.
fn t(campo: &Option<Texto>) -> Option<String> {
    campo.as_ref().and_then(|Texto(v)| v.clone())
}

/// Par código/descrição em qualquer um dos formatos usados pelas APIs:
/// objeto (`{id, descricao}`, `{code, text}`...), texto ou número.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rotulo {
    pub codigo: Option<String>,
    pub descricao: Option<String>,
}

impl<'de> Deserialize<'de> for Rotulo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let valor = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&valor))
    }
}

impl Rotulo {
    fn from_value(valor: &Value) -> Self {
        match valor {
            Value::Object(mapa) => {
                let campo = |chaves: &[&str]| {
                    primeiro(chaves.iter().map(|c| mapa.get(*c).and_then(texto_de)))
                };
                Self {
                    codigo: campo(&["subclasse", "codigo", "code", "id"]),
                    descricao: campo(&["descricao", "text", "nome"]),
                }
            }
            Value::Number(n) => Self {
                codigo: Some(n.to_string()),
                descricao: None,
            },
            Value::String(s) => Self::from_texto(s),
            _ => Self::default(),
        }
    }

    /// "206-2 - Sociedade Empresária Limitada" vira código + descrição;
    /// texto só com dígitos e pontuação é tratado como código.
    fn from_texto(texto: &str) -> Self {
        let texto = texto.trim();
        if let Some((esquerda, direita)) = texto.split_once(" - ") {
            if parece_codigo(esquerda) {
                return Self {
                    codigo: nao_vazio(Some(esquerda.to_string())),
                    descricao: nao_vazio(Some(direita.to_string())),
                };
            }
        }
        if parece_codigo(texto) {
            Self {
                codigo: nao_vazio(Some(texto.to_string())),
                descricao: None,
            }
        } else {
            Self {
                codigo: None,
                descricao: nao_vazio(Some(texto.to_string())),
            }
        }
    }

    pub fn vazio(&self) -> bool {
        self.codigo.is_none() && self.descricao.is_none()
    }

    /// `{codigo: 0, descricao: ""}`, usado pela MinhaReceita quando não há
    /// CNAE secundário.
    pub fn marcador_vazio(&self) -> bool {
        self.codigo.as_deref() == Some("0") && self.descricao.is_none()
    }
}

fn parece_codigo(texto: &str) -> bool {
    !texto.is_empty()
        && texto.chars().any(|c| c.is_ascii_digit())
        && texto
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '-' | '.' | '/'))
}

fn rotulo(campo: &Option<Rotulo>) -> Rotulo {
    campo.clone().unwrap_or_default()
}

fn lista<T: Clone>(campo: &Option<Vec<T>>) -> Vec<T> {
    campo.clone().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Representação interna
// ---------------------------------------------------------------------------

/// Telefone como veio da API, antes da normalização.
#[derive(Debug, Clone, PartialEq)]
pub enum TelefoneBruto {
    /// DDD e número em campos separados
    Par {
        ddd: Option<String>,
        numero: Option<String>,
        is_fax: bool,
    },
    /// DDD e número juntos ("38912345678", "(38) 9123-4567")
    Junto { texto: Option<String>, is_fax: bool },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocioBruto {
    pub nome: Option<String>,
    pub documento: Option<String>,
    /// Rótulo ("Pessoa Física") ou código (1, 2, 3) do tipo de sócio
    pub tipo: Option<String>,
    pub qualificacao: Option<String>,
    pub data_entrada: Option<String>,
    pub faixa_etaria: Option<String>,
}

/// Todos os campos que alguma API fornece, já em nomes comuns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registro {
    pub cnpj: Option<String>,
    pub razao_social: Option<String>,
    pub nome_fantasia: Option<String>,

    pub situacao: Option<String>,
    pub data_situacao: Option<String>,
    pub motivo_situacao: Option<String>,
    pub situacao_especial: Option<String>,
    pub data_situacao_especial: Option<String>,

    pub natureza_juridica: Rotulo,
    pub porte: Option<String>,
    pub capital_social: Option<String>,
    pub data_inicio_atividade: Option<String>,
    pub matriz_filial: Option<String>,

    pub cnae_principal: Rotulo,
    pub cnaes_secundarios: Vec<Rotulo>,

    pub tipo_logradouro: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub municipio: Option<String>,
    pub uf: Option<String>,
    pub cep: Option<String>,
    pub codigo_ibge: Option<String>,

    pub telefones: Vec<TelefoneBruto>,
    pub email: Option<String>,

    pub opcao_simples: Option<String>,
    pub data_opcao_simples: Option<String>,
    pub opcao_mei: Option<String>,
    pub data_opcao_mei: Option<String>,

    pub socios: Vec<SocioBruto>,
}

// ---------------------------------------------------------------------------
// CNPJ.ws: dados do estabelecimento aninhados em `estabelecimento`
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CnpjWs {
    cnpj: Option<Texto>,
    razao_social: Option<Texto>,
    nome_fantasia: Option<Texto>,
    situacao_cadastral: Option<Texto>,
    data_situacao_cadastral: Option<Texto>,
    email: Option<Texto>,
    capital_social: Option<Texto>,
    porte: Option<Rotulo>,
    natureza_juridica: Option<Rotulo>,
    simples: Option<SimplesCnpjWs>,
    socios: Option<Vec<SocioCnpjWs>>,
    estabelecimento: Option<EstabelecimentoCnpjWs>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SimplesCnpjWs {
    simples: Option<Texto>,
    data_opcao_simples: Option<Texto>,
    mei: Option<Texto>,
    data_opcao_mei: Option<Texto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SocioCnpjWs {
    nome: Option<Texto>,
    cpf_cnpj_socio: Option<Texto>,
    tipo: Option<Texto>,
    qualificacao_socio: Option<Rotulo>,
    data_entrada: Option<Texto>,
    faixa_etaria: Option<Texto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EstabelecimentoCnpjWs {
    cnpj: Option<Texto>,
    tipo: Option<Texto>,
    nome_fantasia: Option<Texto>,
    situacao_cadastral: Option<Texto>,
    data_situacao_cadastral: Option<Texto>,
    motivo_situacao_cadastral: Option<Rotulo>,
    situacao_especial: Option<Texto>,
    data_situacao_especial: Option<Texto>,
    data_inicio_atividade: Option<Texto>,
    atividade_principal: Option<Rotulo>,
    atividades_secundarias: Option<Vec<Rotulo>>,
    tipo_logradouro: Option<Texto>,
    logradouro: Option<Texto>,
    numero: Option<Texto>,
    complemento: Option<Texto>,
    bairro: Option<Texto>,
    cep: Option<Texto>,
    estado: Option<SiglaCnpjWs>,
    cidade: Option<CidadeCnpjWs>,
    ddd1: Option<Texto>,
    telefone1: Option<Texto>,
    ddd2: Option<Texto>,
    telefone2: Option<Texto>,
    ddd_fax: Option<Texto>,
    fax: Option<Texto>,
    email: Option<Texto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CidadeCnpjWs {
    nome: Option<Texto>,
    ibge_id: Option<Texto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SiglaCnpjWs {
    sigla: Option<Texto>,
}

impl CnpjWs {
    fn registro(&self) -> Registro {
        let est = self.estabelecimento.clone().unwrap_or_default();
        let simples = self.simples.clone().unwrap_or_default();
        let cidade = est.cidade.clone().unwrap_or_default();

        Registro {
            cnpj: primeiro([t(&self.cnpj), t(&est.cnpj)]),
            razao_social: t(&self.razao_social),
            nome_fantasia: primeiro([t(&self.nome_fantasia), t(&est.nome_fantasia)]),
            situacao: primeiro([t(&self.situacao_cadastral), t(&est.situacao_cadastral)]),
            data_situacao: primeiro([
                t(&self.data_situacao_cadastral),
                t(&est.data_situacao_cadastral),
            ]),
            motivo_situacao: {
                let motivo = rotulo(&est.motivo_situacao_cadastral);
                primeiro([motivo.descricao, motivo.codigo])
            },
            situacao_especial: t(&est.situacao_especial),
            data_situacao_especial: t(&est.data_situacao_especial),
            natureza_juridica: rotulo(&self.natureza_juridica),
            porte: rotulo(&self.porte).descricao,
            capital_social: t(&self.capital_social),
            data_inicio_atividade: t(&est.data_inicio_atividade),
            matriz_filial: t(&est.tipo),
            cnae_principal: rotulo(&est.atividade_principal),
            cnaes_secundarios: lista(&est.atividades_secundarias),
            tipo_logradouro: t(&est.tipo_logradouro),
            logradouro: t(&est.logradouro),
            numero: t(&est.numero),
            complemento: t(&est.complemento),
            bairro: t(&est.bairro),
            municipio: t(&cidade.nome),
            uf: sigla_estado(&est.estado),
            cep: t(&est.cep),
            codigo_ibge: t(&cidade.ibge_id),
            telefones: vec![
                par(&est.ddd1, &est.telefone1, false),
                par(&est.ddd2, &est.telefone2, false),
                par(&est.ddd_fax, &est.fax, true),
            ],
            email: primeiro([t(&self.email), t(&est.email)]),
            opcao_simples: t(&simples.simples),
            data_opcao_simples: t(&simples.data_opcao_simples),
            opcao_mei: t(&simples.mei),
            data_opcao_mei: t(&simples.data_opcao_mei),
            socios: lista(&self.socios)
                .iter()
                .map(|s| SocioBruto {
                    nome: t(&s.nome),
                    documento: t(&s.cpf_cnpj_socio),
                    tipo: t(&s.tipo),
                    qualificacao: rotulo(&s.qualificacao_socio).descricao,
                    data_entrada: t(&s.data_entrada),
                    faixa_etaria: t(&s.faixa_etaria),
                })
                .collect(),
        }
    }
}

// `estado` chega como objeto `{id, sigla, nome}`; só a sigla interessa.
fn sigla_estado(estado: &Option<SiglaCnpjWs>) -> Option<String> {
    estado.as_ref().and_then(|e| t(&e.sigla))
}

fn par(ddd: &Option<Texto>, numero: &Option<Texto>, is_fax: bool) -> TelefoneBruto {
    TelefoneBruto::Par {
        ddd: t(ddd),
        numero: t(numero),
        is_fax,
    }
}

// ---------------------------------------------------------------------------
// MinhaReceita: formato plano, espelhando os arquivos da Receita Federal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinhaReceita {
    cnpj: Option<Texto>,
    razao_social: Option<Texto>,
    nome_fantasia: Option<Texto>,
    situacao_cadastral: Option<Texto>,
    descricao_situacao_cadastral: Option<Texto>,
    data_situacao_cadastral: Option<Texto>,
    motivo_situacao_cadastral: Option<Texto>,
    descricao_motivo_situacao_cadastral: Option<Texto>,
    situacao_especial: Option<Texto>,
    data_situacao_especial: Option<Texto>,
    codigo_natureza_juridica: Option<Texto>,
    natureza_juridica: Option<Texto>,
    porte: Option<Texto>,
    descricao_porte: Option<Texto>,
    capital_social: Option<Texto>,
    data_inicio_atividade: Option<Texto>,
    descricao_identificador_matriz_filial: Option<Texto>,
    identificador_matriz_filial: Option<Texto>,
    cnae_fiscal: Option<Texto>,
    cnae_fiscal_descricao: Option<Texto>,
    cnaes_secundarios: Option<Vec<Rotulo>>,
    descricao_tipo_de_logradouro: Option<Texto>,
    logradouro: Option<Texto>,
    numero: Option<Texto>,
    complemento: Option<Texto>,
    bairro: Option<Texto>,
    municipio: Option<Texto>,
    codigo_municipio_ibge: Option<Texto>,
    uf: Option<Texto>,
    cep: Option<Texto>,
    ddd_telefone_1: Option<Texto>,
    telefone_1: Option<Texto>,
    ddd_telefone_2: Option<Texto>,
    telefone_2: Option<Texto>,
    ddd_fax: Option<Texto>,
    fax: Option<Texto>,
    email: Option<Texto>,
    opcao_pelo_simples: Option<Texto>,
    data_opcao_pelo_simples: Option<Texto>,
    opcao_pelo_mei: Option<Texto>,
    data_opcao_pelo_mei: Option<Texto>,
    qsa: Option<Vec<SocioMinhaReceita>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SocioMinhaReceita {
    nome_socio: Option<Texto>,
    cnpj_cpf_do_socio: Option<Texto>,
    identificador_de_socio: Option<Texto>,
    qualificacao_socio: Option<Texto>,
    data_entrada_sociedade: Option<Texto>,
    faixa_etaria: Option<Texto>,
}

impl MinhaReceita {
    fn registro(&self) -> Registro {
        Registro {
            cnpj: t(&self.cnpj),
            razao_social: t(&self.razao_social),
            nome_fantasia: t(&self.nome_fantasia),
            situacao: primeiro([
                t(&self.descricao_situacao_cadastral),
                t(&self.situacao_cadastral),
            ]),
            data_situacao: t(&self.data_situacao_cadastral),
            motivo_situacao: primeiro([
                t(&self.descricao_motivo_situacao_cadastral),
                t(&self.motivo_situacao_cadastral),
            ]),
            situacao_especial: t(&self.situacao_especial),
            data_situacao_especial: t(&self.data_situacao_especial),
            natureza_juridica: Rotulo {
                codigo: t(&self.codigo_natureza_juridica),
                descricao: t(&self.natureza_juridica),
            },
            porte: primeiro([t(&self.porte), t(&self.descricao_porte)]),
            capital_social: t(&self.capital_social),
            data_inicio_atividade: t(&self.data_inicio_atividade),
            matriz_filial: primeiro([
                t(&self.descricao_identificador_matriz_filial),
                t(&self.identificador_matriz_filial),
            ]),
            cnae_principal: Rotulo {
                codigo: t(&self.cnae_fiscal),
                descricao: t(&self.cnae_fiscal_descricao),
            },
            cnaes_secundarios: lista(&self.cnaes_secundarios),
            tipo_logradouro: t(&self.descricao_tipo_de_logradouro),
            logradouro: t(&self.logradouro),
            numero: t(&self.numero),
            complemento: t(&self.complemento),
            bairro: t(&self.bairro),
            municipio: t(&self.municipio),
            uf: t(&self.uf),
            cep: t(&self.cep),
            codigo_ibge: t(&self.codigo_municipio_ibge),
            telefones: vec![
                par_ou_junto(&self.ddd_telefone_1, &self.telefone_1, false),
                par_ou_junto(&self.ddd_telefone_2, &self.telefone_2, false),
                par_ou_junto(&self.ddd_fax, &self.fax, true),
            ],
            email: t(&self.email),
            opcao_simples: t(&self.opcao_pelo_simples),
            data_opcao_simples: t(&self.data_opcao_pelo_simples),
            opcao_mei: t(&self.opcao_pelo_mei),
            data_opcao_mei: t(&self.data_opcao_pelo_mei),
            socios: lista(&self.qsa)
                .iter()
                .map(|s| SocioBruto {
                    nome: t(&s.nome_socio),
                    documento: t(&s.cnpj_cpf_do_socio),
                    tipo: t(&s.identificador_de_socio),
                    qualificacao: t(&s.qualificacao_socio),
                    data_entrada: t(&s.data_entrada_sociedade),
                    faixa_etaria: t(&s.faixa_etaria),
                })
                .collect(),
        }
    }
}

// A MinhaReceita costuma mandar DDD e número juntos no campo `ddd_*`.
fn par_ou_junto(ddd: &Option<Texto>, numero: &Option<Texto>, is_fax: bool) -> TelefoneBruto {
    match (t(ddd), t(numero)) {
        (ddd, Some(numero)) => TelefoneBruto::Par {
            ddd,
            numero: Some(numero),
            is_fax,
        },
        (texto, None) => TelefoneBruto::Junto { texto, is_fax },
    }
}

// ---------------------------------------------------------------------------
// OpenCNPJ: formato plano com lista de telefones já separada
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenCnpj {
    cnpj: Option<Texto>,
    razao_social: Option<Texto>,
    nome_fantasia: Option<Texto>,
    situacao_cadastral: Option<Texto>,
    data_situacao_cadastral: Option<Texto>,
    motivo_situacao_cadastral: Option<Texto>,
    situacao_especial: Option<Texto>,
    data_situacao_especial: Option<Texto>,
    natureza_juridica: Option<Rotulo>,
    porte_empresa: Option<Texto>,
    porte: Option<Texto>,
    capital_social: Option<Texto>,
    data_inicio_atividade: Option<Texto>,
    matriz_filial: Option<Texto>,
    cnae_principal: Option<Rotulo>,
    cnaes_secundarios: Option<Vec<Rotulo>>,
    tipo_logradouro: Option<Texto>,
    logradouro: Option<Texto>,
    numero: Option<Texto>,
    complemento: Option<Texto>,
    bairro: Option<Texto>,
    municipio: Option<Texto>,
    uf: Option<Texto>,
    cep: Option<Texto>,
    codigo_ibge: Option<Texto>,
    telefones: Option<Vec<TelefoneOpenCnpj>>,
    ddd1: Option<Texto>,
    telefone1: Option<Texto>,
    email: Option<Texto>,
    opcao_simples: Option<Texto>,
    data_opcao_simples: Option<Texto>,
    opcao_mei: Option<Texto>,
    data_opcao_mei: Option<Texto>,
    #[serde(rename = "QSA", alias = "qsa", alias = "socios")]
    qsa: Option<Vec<SocioOpenCnpj>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TelefoneOpenCnpj {
    ddd: Option<Texto>,
    numero: Option<Texto>,
    is_fax: Option<Texto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SocioOpenCnpj {
    nome_socio: Option<Texto>,
    nome: Option<Texto>,
    cnpj_cpf_socio: Option<Texto>,
    documento: Option<Texto>,
    identificador_socio: Option<Texto>,
    tipo: Option<Texto>,
    qualificacao_socio: Option<Rotulo>,
    data_entrada_sociedade: Option<Texto>,
    faixa_etaria: Option<Texto>,
}

impl OpenCnpj {
    fn registro(&self) -> Registro {
        let mut telefones: Vec<TelefoneBruto> = lista(&self.telefones)
            .iter()
            .map(|tel| par(&tel.ddd, &tel.numero, t(&tel.is_fax).as_deref() == Some("true")))
            .collect();
        telefones.push(par_ou_junto(&self.ddd1, &self.telefone1, false));

        Registro {
            cnpj: t(&self.cnpj),
            razao_social: t(&self.razao_social),
            nome_fantasia: t(&self.nome_fantasia),
            situacao: t(&self.situacao_cadastral),
            data_situacao: t(&self.data_situacao_cadastral),
            motivo_situacao: t(&self.motivo_situacao_cadastral),
            situacao_especial: t(&self.situacao_especial),
            data_situacao_especial: t(&self.data_situacao_especial),
            natureza_juridica: rotulo(&self.natureza_juridica),
            porte: primeiro([t(&self.porte_empresa), t(&self.porte)]),
            capital_social: t(&self.capital_social),
            data_inicio_atividade: t(&self.data_inicio_atividade),
            matriz_filial: t(&self.matriz_filial),
            cnae_principal: rotulo(&self.cnae_principal),
            cnaes_secundarios: lista(&self.cnaes_secundarios),
            tipo_logradouro: t(&self.tipo_logradouro),
            logradouro: t(&self.logradouro),
            numero: t(&self.numero),
            complemento: t(&self.complemento),
            bairro: t(&self.bairro),
            municipio: t(&self.municipio),
            uf: t(&self.uf),
            cep: t(&self.cep),
            codigo_ibge: t(&self.codigo_ibge),
            telefones,
            email: t(&self.email),
            opcao_simples: t(&self.opcao_simples),
            data_opcao_simples: t(&self.data_opcao_simples),
            opcao_mei: t(&self.opcao_mei),
            data_opcao_mei: t(&self.data_opcao_mei),
            socios: lista(&self.qsa)
                .iter()
                .map(|s| SocioBruto {
                    nome: primeiro([t(&s.nome_socio), t(&s.nome)]),
                    documento: primeiro([t(&s.cnpj_cpf_socio), t(&s.documento)]),
                    tipo: primeiro([t(&s.identificador_socio), t(&s.tipo)]),
                    qualificacao: rotulo(&s.qualificacao_socio).descricao,
                    data_entrada: t(&s.data_entrada_sociedade),
                    faixa_etaria: t(&s.faixa_etaria),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ReceitaWS: nomes curtos, telefone em texto livre, erros com status 200
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReceitaWs {
    status: Option<Texto>,
    message: Option<Texto>,
    cnpj: Option<Texto>,
    nome: Option<Texto>,
    fantasia: Option<Texto>,
    situacao: Option<Texto>,
    data_situacao: Option<Texto>,
    motivo_situacao: Option<Texto>,
    situacao_especial: Option<Texto>,
    data_situacao_especial: Option<Texto>,
    natureza_juridica: Option<Rotulo>,
    porte: Option<Texto>,
    capital_social: Option<Texto>,
    abertura: Option<Texto>,
    tipo: Option<Texto>,
    atividade_principal: Option<Vec<Rotulo>>,
    atividades_secundarias: Option<Vec<Rotulo>>,
    logradouro: Option<Texto>,
    numero: Option<Texto>,
    complemento: Option<Texto>,
    bairro: Option<Texto>,
    municipio: Option<Texto>,
    uf: Option<Texto>,
    cep: Option<Texto>,
    telefone: Option<Texto>,
    email: Option<Texto>,
    simples: Option<OptanteReceitaWs>,
    simei: Option<OptanteReceitaWs>,
    qsa: Option<Vec<SocioReceitaWs>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OptanteReceitaWs {
    optante: Option<Texto>,
    data_opcao: Option<Texto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SocioReceitaWs {
    nome: Option<Texto>,
    qual: Option<Texto>,
}

impl ReceitaWs {
    /// A ReceitaWS responde 200 com `"status": "ERROR"` para CNPJ inexistente.
    fn erro_reportado(&self) -> Option<String> {
        let status = t(&self.status)?;
        if status.eq_ignore_ascii_case("ERROR") {
            Some(t(&self.message).unwrap_or(status))
        } else {
            None
        }
    }

    fn registro(&self) -> Registro {
        let simples = self.simples.clone().unwrap_or_default();
        let simei = self.simei.clone().unwrap_or_default();

        // "(38) 9856-6015 / (38) 3333-4444"
        let telefones = t(&self.telefone)
            .map(|texto| {
                texto
                    .split('/')
                    .map(|parte| TelefoneBruto::Junto {
                        texto: Some(parte.to_string()),
                        is_fax: false,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Registro {
            cnpj: t(&self.cnpj),
            razao_social: t(&self.nome),
            nome_fantasia: t(&self.fantasia),
            situacao: t(&self.situacao),
            data_situacao: t(&self.data_situacao),
            motivo_situacao: t(&self.motivo_situacao),
            situacao_especial: t(&self.situacao_especial),
            data_situacao_especial: t(&self.data_situacao_especial),
            natureza_juridica: rotulo(&self.natureza_juridica),
            porte: t(&self.porte),
            capital_social: t(&self.capital_social),
            data_inicio_atividade: t(&self.abertura),
            matriz_filial: t(&self.tipo),
            cnae_principal: lista(&self.atividade_principal)
                .into_iter()
                .next()
                .unwrap_or_default(),
            cnaes_secundarios: lista(&self.atividades_secundarias),
            tipo_logradouro: None,
            logradouro: t(&self.logradouro),
            numero: t(&self.numero),
            complemento: t(&self.complemento),
            bairro: t(&self.bairro),
            municipio: t(&self.municipio),
            uf: t(&self.uf),
            cep: t(&self.cep),
            codigo_ibge: None,
            telefones,
            email: t(&self.email),
            opcao_simples: t(&simples.optante),
            data_opcao_simples: t(&simples.data_opcao),
            opcao_mei: t(&simei.optante),
            data_opcao_mei: t(&simei.data_opcao),
            socios: lista(&self.qsa)
                .iter()
                .map(|s| SocioBruto {
                    nome: t(&s.nome),
                    qualificacao: t(&s.qual),
                    ..SocioBruto::default()
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// União das respostas
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Payload {
    CnpjWs(CnpjWs),
    MinhaReceita(MinhaReceita),
    OpenCnpj(OpenCnpj),
    ReceitaWs(ReceitaWs),
}

impl Payload {
    /// Decodifica o corpo JSON no formato da API que o produziu.
    pub fn decode(tipo: TipoFonte, corpo: Value) -> Result<Self, serde_json::Error> {
        if !corpo.is_object() {
            return Err(serde::de::Error::custom("resposta não é um objeto JSON"));
        }
        Ok(match tipo {
            TipoFonte::CnpjWs => Self::CnpjWs(serde_json::from_value(corpo)?),
            TipoFonte::MinhaReceita => Self::MinhaReceita(serde_json::from_value(corpo)?),
            TipoFonte::OpenCnpj => Self::OpenCnpj(serde_json::from_value(corpo)?),
            TipoFonte::ReceitaWs => Self::ReceitaWs(serde_json::from_value(corpo)?),
        })
    }

    /// Mensagem de erro que a API devolveu dentro de uma resposta 2xx.
    pub fn erro_reportado(&self) -> Option<String> {
        match self {
            Self::ReceitaWs(dados) => dados.erro_reportado(),
            _ => None,
        }
    }

    pub fn registro(&self) -> Registro {
        match self {
            Self::CnpjWs(dados) => dados.registro(),
            Self::MinhaReceita(dados) => dados.registro(),
            Self::OpenCnpj(dados) => dados.registro(),
            Self::ReceitaWs(dados) => dados.registro(),
        }
    }
}
