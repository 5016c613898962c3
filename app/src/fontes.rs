// Catálogo das APIs públicas de CNPJ, em ordem de prioridade

use crate::cnpj::Cnpj;

const MARCADOR_CNPJ: &str = "{cnpj}";

/// Formato de resposta de cada API. Define como o JSON é decodificado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipoFonte {
    CnpjWs,
    MinhaReceita,
    OpenCnpj,
    ReceitaWs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fonte {
    pub nome: String,
    pub tipo: TipoFonte,
    /// URL com o marcador `{cnpj}`
    pub url_template: String,
    /// Algumas APIs recusam clientes sem um User-Agent "de navegador".
    pub user_agent: String,
}

impl Fonte {
    pub fn new(
        nome: impl Into<String>,
        tipo: TipoFonte,
        url_template: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            nome: nome.into(),
            tipo,
            url_template: url_template.into(),
            user_agent: user_agent.into(),
        }
    }

    pub fn url(&self, cnpj: &Cnpj) -> String {
        self.url_template.replace(MARCADOR_CNPJ, cnpj.as_str())
    }

    /// Cabeçalhos estáticos enviados em toda requisição a esta API.
    pub fn headers(&self) -> [(&'static str, &str); 2] {
        [("Accept", "application/json"), ("User-Agent", self.user_agent.as_str())]
    }

    /// Mesma fonte apontando para outro host (usado em testes e proxies).
    pub fn com_base(mut self, base: &str) -> Self {
        let caminho = match self.tipo {
            TipoFonte::CnpjWs => "/cnpj/{cnpj}",
            TipoFonte::MinhaReceita => "/{cnpj}",
            TipoFonte::OpenCnpj => "/cnpj/{cnpj}",
            TipoFonte::ReceitaWs => "/v1/cnpj/{cnpj}",
        };
        self.url_template = format!("{}{}", base.trim_end_matches('/'), caminho);
        self
    }
}

/// Lista padrão: a ordem define a prioridade do fallback.
pub fn fontes_padrao() -> Vec<Fonte> {
    vec![
        Fonte::new(
            "CNPJ.ws (pública)",
            TipoFonte::CnpjWs,
            "https://publica.cnpj.ws/cnpj/{cnpj}",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        ),
        Fonte::new(
            "MinhaReceita",
            TipoFonte::MinhaReceita,
            "https://minhareceita.org/{cnpj}",
            "curl/7.68.0",
        ),
        Fonte::new(
            "OpenCNPJ",
            TipoFonte::OpenCnpj,
            "https://api.opencnpj.org/cnpj/{cnpj}",
            "Java/11.0.1",
        ),
        Fonte::new(
            "ReceitaWS (backup)",
            TipoFonte::ReceitaWs,
            "https://receitaws.com.br/v1/cnpj/{cnpj}",
            "Python/3.9.0",
        ),
    ]
}

pub fn nomes(fontes: &[Fonte]) -> Vec<String> {
    fontes.iter().map(|f| f.nome.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordem_padrao() {
        let fontes = fontes_padrao();
        assert_eq!(
            nomes(&fontes),
            vec!["CNPJ.ws (pública)", "MinhaReceita", "OpenCNPJ", "ReceitaWS (backup)"]
        );
    }

    #[test]
    fn monta_url_e_headers() {
        let cnpj = Cnpj::parse("45259906000163").unwrap();
        let fonte = &fontes_padrao()[3];
        assert_eq!(fonte.url(&cnpj), "https://receitaws.com.br/v1/cnpj/45259906000163");
        assert_eq!(fonte.headers()[0], ("Accept", "application/json"));
        assert_eq!(fonte.headers()[1], ("User-Agent", "Python/3.9.0"));
    }

    #[test]
    fn troca_base() {
        let cnpj = Cnpj::parse("45259906000163").unwrap();
        let fonte = fontes_padrao()[1].clone().com_base("http://127.0.0.1:9000/");
        assert_eq!(fonte.url(&cnpj), "http://127.0.0.1:9000/45259906000163");
    }
}
