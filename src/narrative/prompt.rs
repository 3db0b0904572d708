use crate::chart::{HousePlacement, Placement};

pub fn planet_prompt(name: &str, planets: &[Placement]) -> String {
    let names = planets
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let listing = serde_json::to_string_pretty(planets).unwrap_or_default();

    format!(
        "In short and concise way, Interpret the following astrological planet placements for {name} ({names}). \
         For each, explain what it means for the personality.\n\n{listing} \
         return in markdown format and 1000 characters or less"
    )
}

pub fn house_prompt(name: &str, houses: &[HousePlacement]) -> String {
    let listing = serde_json::to_string_pretty(houses).unwrap_or_default();

    format!(
        "In short and concise way, Interpret the following astrological house placements for {name}. \
         For each house, explain what the sign means for the personality.\n\n{listing} \
         return in markdown format and 1000 characters or less"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planet_prompt_lists_names_and_json() {
        let planets = vec![
            Placement { name: "Sun".into(), sign: "Aries".into() },
            Placement { name: "Moon".into(), sign: "Cancer".into() },
        ];
        let prompt = planet_prompt("Rina", &planets);
        assert!(prompt.contains("for Rina (Sun, Moon)"));
        assert!(prompt.contains("\"sign\": \"Cancer\""));
        assert!(prompt.ends_with("1000 characters or less"));
    }

    #[test]
    fn test_house_prompt_embeds_houses() {
        let houses = vec![HousePlacement { house: 7, sign: "Libra".into() }];
        let prompt = house_prompt("Rina", &houses);
        assert!(prompt.contains("house placements for Rina."));
        assert!(prompt.contains("\"house\": 7"));
    }
}
