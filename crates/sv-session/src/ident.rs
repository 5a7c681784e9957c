//! Anonymous display-name generation.

use rand::Rng;

const ADJECTIVES: [&str; 10] = [
    "Brave", "Calm", "Wise", "Kind", "Strong", "Gentle", "Bright", "True", "Silent", "Free",
];

const NOUNS: [&str; 10] = [
    "Owl", "Phoenix", "Lion", "Dolphin", "Eagle", "Wolf", "Tiger", "Bear", "Fox", "Hawk",
];

/// `AdjectiveNoun###`, e.g. `BraveOwl417`. The trailing number is always
/// three digits.
pub fn generate_anonymous_id() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    let number: u16 = rng.gen_range(100..1000);
    format!("{adjective}{noun}{number}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_well_formed() {
        for _ in 0..100 {
            let id = generate_anonymous_id();
            let digits: String = id.chars().filter(|c| c.is_ascii_digit()).collect();
            assert_eq!(digits.len(), 3, "unexpected id shape: {id}");
            let word: String = id.chars().take_while(|c| !c.is_ascii_digit()).collect();
            assert!(
                ADJECTIVES.iter().any(|a| word.starts_with(a)),
                "unexpected id shape: {id}"
            );
            assert!(
                NOUNS.iter().any(|n| word.ends_with(n)),
                "unexpected id shape: {id}"
            );
        }
    }
}
