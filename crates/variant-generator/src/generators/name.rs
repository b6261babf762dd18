//! Person name generator.

use rand::Rng;

pub const FIRST_NAMES: [&str; 15] = [
    "Alex", "Jordan", "Taylor", "Morgan", "Casey", "Riley", "Sam", "Jamie", "Dee", "Kris",
    "Avery", "Cameron", "Hayden", "Rowan", "Sydney",
];

pub const LAST_NAMES: [&str; 13] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Wilson", "Anderson",
    "Thomas", "Jackson", "White", "Harris",
];

/// The parts of a generated name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub first: &'static str,
    pub middle_initial: char,
    pub last: &'static str,
}

impl PersonName {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
        let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
        let middle_initial = char::from(b'A' + rng.random_range(0..26u8));
        Self {
            first,
            middle_initial,
            last,
        }
    }

    /// All rendered layouts: `First Last`, `Last, First`, `First M. Last`,
    /// upper case and lower case.
    pub fn formats(&self) -> [String; 5] {
        let Self {
            first,
            middle_initial,
            last,
        } = self;
        [
            format!("{first} {last}"),
            format!("{last}, {first}"),
            format!("{first} {middle_initial}. {last}"),
            format!("{} {}", first.to_uppercase(), last.to_uppercase()),
            format!("{} {}", first.to_lowercase(), last.to_lowercase()),
        ]
    }
}

/// Generate a name in one uniformly chosen layout.
pub fn generate_name<R: Rng>(rng: &mut R) -> String {
    let name = PersonName::random(rng);
    let mut formats = name.formats();
    let idx = rng.random_range(0..formats.len());
    std::mem::take(&mut formats[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_formats() {
        let name = PersonName {
            first: "Alex",
            middle_initial: 'Q',
            last: "Smith",
        };
        assert_eq!(
            name.formats(),
            [
                "Alex Smith".to_string(),
                "Smith, Alex".to_string(),
                "Alex Q. Smith".to_string(),
                "ALEX SMITH".to_string(),
                "alex smith".to_string(),
            ]
        );
    }

    #[test]
    fn test_generated_name_uses_pools() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let value = generate_name(&mut rng).to_lowercase();
            assert!(FIRST_NAMES
                .iter()
                .any(|f| value.contains(&f.to_lowercase())));
            assert!(LAST_NAMES.iter().any(|l| value.contains(&l.to_lowercase())));
        }
    }

    #[test]
    fn test_every_layout_appears() {
        let mut rng = StdRng::seed_from_u64(42);
        let values: Vec<String> = (0..500).map(|_| generate_name(&mut rng)).collect();

        assert!(values.iter().any(|v| v.contains(", ")));
        assert!(values.iter().any(|v| v.contains(". ")));
        assert!(values
            .iter()
            .any(|v| v.chars().all(|c| !c.is_lowercase())));
        assert!(values
            .iter()
            .any(|v| v.chars().all(|c| !c.is_uppercase())));
    }

    #[test]
    fn test_deterministic_generation() {
        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(generate_name(&mut rng1), generate_name(&mut rng2));
        }
    }
}
