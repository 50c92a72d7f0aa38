/// Derive a URL-safe slug from a course title. Deterministic and total:
/// lowercases, folds Latin diacritics to ASCII, collapses every run of
/// non-alphanumeric characters into a single hyphen and trims the ends.
/// A title that normalizes to nothing yields "untitled".
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        let c = fold_diacritic(c);
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c);
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Intro to X"), "intro-to-x");
        assert_eq!(slugify("JavaScript Fundamentos Completo"), "javascript-fundamentos-completo");
    }

    #[test]
    fn folds_diacritics() {
        assert_eq!(
            slugify("Meu Curso de FastAPI Avançado"),
            "meu-curso-de-fastapi-avancado"
        );
        assert_eq!(slugify("Programação Básica"), "programacao-basica");
    }

    #[test]
    fn collapses_symbol_runs_and_trims() {
        assert_eq!(slugify("  Node.js & Express!!  "), "node-js-express");
        assert_eq!(slugify("---CSS Grid---"), "css-grid");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(slugify("Vue.js 3 Composition API"), "vue-js-3-composition-api");
    }

    #[test]
    fn falls_back_when_title_normalizes_to_empty() {
        assert_eq!(slugify(""), "untitled");
        assert_eq!(slugify("!!! ???"), "untitled");
    }

    #[test]
    fn is_deterministic_and_idempotent() {
        let first = slugify("Intro to X");
        let second = slugify("Intro to X");
        assert_eq!(first, second);
        // Slugifying an existing slug leaves it unchanged.
        assert_eq!(slugify(&first), first);
    }
}
