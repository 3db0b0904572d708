use crate::chart::{Big3, Placement};

fn sign_of(planets: &[Placement], name: &str) -> String {
    planets
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .map(|p| p.sign.clone())
        .unwrap_or_default()
}

/// Pick the ascendant, sun and moon signs. The first matching name wins.
pub fn extract_big3(planets: &[Placement]) -> Big3 {
    Big3 {
        ascendant: sign_of(planets, "ascendant"),
        sun: sign_of(planets, "sun"),
        moon: sign_of(planets, "moon"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(name: &str, sign: &str) -> Placement {
        Placement {
            name: name.to_string(),
            sign: sign.to_string(),
        }
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        for name in ["Sun", "SUN", "sun"] {
            let big3 = extract_big3(&[placement(name, "Aries")]);
            assert_eq!(big3.sun, "Aries");
        }
    }

    #[test]
    fn test_missing_placements_default_to_empty() {
        let big3 = extract_big3(&[placement("Mars", "Virgo")]);
        assert_eq!(big3, Big3::default());
        assert_eq!(extract_big3(&[]), Big3::default());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let planets = [
            placement("Moon", "Pisces"),
            placement("moon", "Libra"),
            placement("Ascendant", "Leo"),
        ];
        let big3 = extract_big3(&planets);
        assert_eq!(big3.moon, "Pisces");
        assert_eq!(big3.ascendant, "Leo");
        assert_eq!(big3.sun, "");
    }
}
