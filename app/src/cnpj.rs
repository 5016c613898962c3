use std::fmt;

use crate::errors::CnpjError;
use crate::utils;

pub const TAMANHO_CNPJ: usize = 14;

/// CNPJ já limpo: exatamente 14 dígitos.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cnpj(String);

impl Cnpj {
    /// Remove tudo que não é dígito e valida o tamanho.
    ///
    /// O dígito verificador não é conferido aqui: quem decide se o CNPJ
    /// existe são as APIs consultadas.
    pub fn parse(bruto: &str) -> Result<Self, CnpjError> {
        let limpo = utils::somente_digitos(bruto);
        if limpo.len() != TAMANHO_CNPJ {
            return Err(CnpjError::TamanhoInvalido {
                recebido: limpo.len(),
            });
        }
        Ok(Self(limpo))
    }

    /// Igual a `parse`, mas trata a ausência do parâmetro da query string.
    pub fn from_query(bruto: Option<&str>) -> Result<Self, CnpjError> {
        match bruto {
            Some(valor) if !valor.is_empty() => Self::parse(valor),
            _ => Err(CnpjError::Ausente),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Máscara XX.XXX.XXX/XXXX-XX
    pub fn formatado(&self) -> String {
        let c = &self.0;
        format!(
            "{}.{}.{}/{}-{}",
            &c[0..2],
            &c[2..5],
            &c[5..8],
            &c[8..12],
            &c[12..14]
        )
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
