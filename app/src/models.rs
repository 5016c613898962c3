use serde::{Deserialize, Serialize};

/// Registro unificado devolvido ao cliente, independente da API de origem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DadosCnpj {
    pub cnpj: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razao_social: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome_fantasia: Option<String>,

    pub situacao_cadastral: SituacaoCadastral,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub natureza_juridica: Option<CodigoDescricao>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub porte: Option<String>,
    pub capital_social: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_inicio_atividade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matriz_filial: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnae_principal: Option<CodigoDescricao>,
    pub cnaes_secundarios: Vec<CodigoDescricao>,

    #[serde(flatten)]
    pub endereco: Endereco,

    pub telefones: Vec<Telefone>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub opcao_simples: SimNao,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_opcao_simples: Option<String>,
    pub opcao_mei: SimNao,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_opcao_mei: Option<String>,

    pub quadro_societario: Vec<Socio>,

    #[serde(rename = "_api_info")]
    pub api_info: ApiInfo,
}

impl DadosCnpj {
    /// Tem ao menos um telefone ou e-mail.
    pub fn tem_contato(&self) -> bool {
        !self.telefones.is_empty() || self.email.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SituacaoCadastral {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situacao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_situacao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub situacao_especial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_situacao_especial: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodigoDescricao {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
}

impl CodigoDescricao {
    /// `None` quando não há nem código nem descrição.
    pub fn montar(codigo: Option<String>, descricao: Option<String>) -> Option<Self> {
        if codigo.is_none() && descricao.is_none() {
            None
        } else {
            Some(Self { codigo, descricao })
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endereco {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logradouro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complemento: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bairro: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo_ibge: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telefone {
    pub ddd: String,
    pub numero: String,
    pub is_fax: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimNao {
    #[serde(rename = "S")]
    Sim,
    #[serde(rename = "N")]
    Nao,
}

impl From<bool> for SimNao {
    fn from(valor: bool) -> Self {
        if valor {
            Self::Sim
        } else {
            Self::Nao
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipoSocio {
    /// Pessoa física
    #[serde(rename = "PF")]
    PessoaFisica,
    /// Pessoa jurídica ou qualquer outro caso
    #[serde(rename = "PJ")]
    PessoaJuridica,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documento: Option<String>,
    pub tipo: TipoSocio,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualificacao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_entrada: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faixa_etaria: Option<String>,
}

/// Procedência da consulta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub fonte: String,
    pub url: String,
    pub timestamp: String,
    /// Falhas das APIs tentadas antes da que respondeu, na ordem.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub falhas_anteriores: Vec<String>,
}
