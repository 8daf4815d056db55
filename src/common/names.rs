// src/common/names.rs

//! Comparação de nomes de vendedor e normalização de seguradoras.
//!
//! Vendas e indicações apontam para o vendedor pelo nome, não pelo id.
//! Toda comparação passa por [`normalize_name`]: espaços nas pontas removidos,
//! espaços internos colapsados e tudo em maiúsculas.

pub const SUHAI_LABEL: &str = "SUHAI SEGURADORA";
pub const OTHERS_LABEL: &str = "OUTRAS";

pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

pub fn same_person(a: &str, b: &str) -> bool {
    normalize_name(a) == normalize_name(b)
}

/// Rótulo canônico da seguradora para os relatórios.
/// Vazio ou qualquer variação de "Suhai" vira `SUHAI SEGURADORA`; "outra(s)"/"outro(s)" vira `OUTRAS`.
pub fn normalize_insurer(raw: &str) -> String {
    let name = normalize_name(raw);

    if name.is_empty() || name.contains("SUHAI") {
        return SUHAI_LABEL.to_string();
    }

    let first_word = name.split(' ').next().unwrap_or_default();
    if matches!(first_word, "OUTRA" | "OUTRAS" | "OUTRO" | "OUTROS") {
        return OTHERS_LABEL.to_string();
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_ignore_case_and_spacing() {
        assert_eq!(normalize_name("  ana   beatriz "), "ANA BEATRIZ");
        assert!(same_person("Igor Vicente", "IGOR  VICENTE "));
        assert!(!same_person("Igor", "Igor Vicente"));
    }

    #[test]
    fn accents_survive_uppercasing() {
        assert_eq!(normalize_name("joão"), "JOÃO");
    }

    #[test]
    fn blank_and_suhai_variants_collapse() {
        assert_eq!(normalize_insurer(""), SUHAI_LABEL);
        assert_eq!(normalize_insurer("   "), SUHAI_LABEL);
        assert_eq!(normalize_insurer("suhai"), SUHAI_LABEL);
        assert_eq!(normalize_insurer("Suhai Seguros Gold"), SUHAI_LABEL);
    }

    #[test]
    fn others_variants_collapse() {
        assert_eq!(normalize_insurer("outras"), OTHERS_LABEL);
        assert_eq!(normalize_insurer("Outros "), OTHERS_LABEL);
        assert_eq!(normalize_insurer("OUTRA SEGURADORA"), OTHERS_LABEL);
    }

    #[test]
    fn other_insurers_are_uppercased() {
        assert_eq!(normalize_insurer(" porto  seguro"), "PORTO SEGURO");
        assert_eq!(normalize_insurer("Outubro Seguros"), "OUTUBRO SEGUROS");
    }
}
