/// Mantém apenas os dígitos ASCII de uma string.
pub fn somente_digitos(valor: &str) -> String {
    valor.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normaliza um valor textual: remove espaços nas pontas e descarta vazio.
pub fn nao_vazio(valor: Option<String>) -> Option<String> {
    valor
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Primeiro candidato presente (não nulo e não vazio), na ordem dada.
pub fn primeiro<I>(candidatos: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidatos.into_iter().find_map(nao_vazio)
}

/// Corta o texto em `max` caracteres para caber numa linha de log.
pub fn resumo(texto: &str, max: usize) -> String {
    match texto.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &texto[..idx]),
        None => texto.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primeiro_ignora_vazios() {
        let valor = primeiro([None, Some("  ".to_string()), Some(" ACME ".to_string()), Some("B".into())]);
        assert_eq!(valor.as_deref(), Some("ACME"));
        assert_eq!(primeiro([None, Some(String::new())]), None);
    }

    #[test]
    fn resumo_respeita_utf8() {
        assert_eq!(resumo("ação", 2), "aç…");
        assert_eq!(resumo("abc", 10), "abc");
    }

    #[test]
    fn digitos() {
        assert_eq!(somente_digitos("(38) 9123-4567"), "3891234567");
    }
}
