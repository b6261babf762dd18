//! Locale-conditioned postal address generator.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Address style used for generated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// US-style cities, two-letter states and five-digit ZIP codes
    #[default]
    Generic,
    /// Australian cities, state abbreviations and four-digit postcodes
    Au,
}

impl Locale {
    fn pools(self) -> &'static LocalePools {
        match self {
            Locale::Generic => &GENERIC,
            Locale::Au => &AU,
        }
    }

    pub fn country(self) -> &'static str {
        self.pools().country
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Generic => f.write_str("generic"),
            Locale::Au => f.write_str("au"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(Locale::Generic),
            "au" => Ok(Locale::Au),
            other => Err(format!("unknown locale '{other}' (expected generic or au)")),
        }
    }
}

struct LocalePools {
    streets: &'static [&'static str],
    cities: &'static [&'static str],
    regions: &'static [&'static str],
    postcodes: RangeInclusive<u32>,
    country: &'static str,
}

static GENERIC: LocalePools = LocalePools {
    streets: &[
        "Main St",
        "High St",
        "Park Ave",
        "Oak St",
        "Maple Ave",
        "Cedar St",
        "Pine St",
        "Elm St",
        "Washington Ave",
        "Lakeview Dr",
    ],
    cities: &[
        "Springfield",
        "Fairview",
        "Riverton",
        "Greenville",
        "Madison",
        "Georgetown",
        "Franklin",
        "Arlington",
        "Clinton",
        "Dayton",
    ],
    regions: &["CA", "NY", "TX", "WA", "MA", "FL", "IL", "PA", "OH", "MI"],
    postcodes: 10000..=99999,
    country: "USA",
};

static AU: LocalePools = LocalePools {
    streets: &[
        "George St",
        "Pitt St",
        "Elizabeth St",
        "King St",
        "Market St",
        "Oxford St",
        "Queen St",
        "Collins St",
        "Bourke St",
        "Bridge St",
    ],
    cities: &[
        "Sydney",
        "Melbourne",
        "Brisbane",
        "Perth",
        "Adelaide",
        "Canberra",
        "Hobart",
        "Newcastle",
        "Wollongong",
        "Geelong",
    ],
    regions: &["NSW", "VIC", "QLD", "SA", "WA", "TAS", "ACT", "NT"],
    postcodes: 2000..=7999,
    country: "Australia",
};

/// Street numbers are drawn from this range.
pub const STREET_NUMBERS: RangeInclusive<u32> = 1..=9999;

/// The parts of a generated address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalAddress {
    pub number: u32,
    pub street: &'static str,
    pub city: &'static str,
    pub region: &'static str,
    pub postcode: u32,
    pub country: &'static str,
}

impl PostalAddress {
    pub fn random<R: Rng>(rng: &mut R, locale: Locale) -> Self {
        let pools = locale.pools();
        let number = rng.random_range(STREET_NUMBERS);
        let street = pools.streets[rng.random_range(0..pools.streets.len())];
        let city = pools.cities[rng.random_range(0..pools.cities.len())];
        let region = pools.regions[rng.random_range(0..pools.regions.len())];
        let postcode = rng.random_range(pools.postcodes.clone());
        Self {
            number,
            street,
            city,
            region,
            postcode,
            country: pools.country,
        }
    }

    /// Single line, multi-line, with country, and without region.
    pub fn formats(&self) -> [String; 4] {
        let Self {
            number,
            street,
            city,
            region,
            postcode,
            country,
        } = self;
        [
            format!("{number} {street}, {city} {region} {postcode}"),
            format!("{number} {street}\n{city} {region} {postcode}"),
            format!("{number} {street}, {city} {region} {postcode}, {country}"),
            format!("{number} {street}, {city} {postcode}"),
        ]
    }
}

/// Generate an address in one uniformly chosen layout.
pub fn generate_address<R: Rng>(rng: &mut R, locale: Locale) -> String {
    let address = PostalAddress::random(rng, locale);
    let mut formats = address.formats();
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
        let address = PostalAddress {
            number: 12,
            street: "King St",
            city: "Sydney",
            region: "NSW",
            postcode: 2000,
            country: "Australia",
        };
        let formats = address.formats();
        assert_eq!(formats[0], "12 King St, Sydney NSW 2000");
        assert_eq!(formats[1], "12 King St\nSydney NSW 2000");
        assert_eq!(formats[2], "12 King St, Sydney NSW 2000, Australia");
        assert_eq!(formats[3], "12 King St, Sydney 2000");
    }

    #[test]
    fn test_locale_pools_and_postcodes() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let au = PostalAddress::random(&mut rng, Locale::Au);
            assert!((2000..=7999).contains(&au.postcode));
            assert!(AU.cities.contains(&au.city));
            assert_eq!(au.country, "Australia");

            let generic = PostalAddress::random(&mut rng, Locale::Generic);
            assert!((10000..=99999).contains(&generic.postcode));
            assert!(GENERIC.regions.contains(&generic.region));
            assert_eq!(generic.country, "USA");

            assert!(STREET_NUMBERS.contains(&au.number));
            assert!(STREET_NUMBERS.contains(&generic.number));
        }
    }

    #[test]
    fn test_every_layout_appears() {
        let mut rng = StdRng::seed_from_u64(1);
        let values: Vec<String> = (0..400)
            .map(|_| generate_address(&mut rng, Locale::Generic))
            .collect();
        assert!(values.iter().any(|v| v.contains('\n')));
        assert!(values.iter().any(|v| v.ends_with(", USA")));
        assert!(values
            .iter()
            .any(|v| !v.contains('\n') && !v.ends_with("USA")));
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("AU".parse::<Locale>(), Ok(Locale::Au));
        assert_eq!("generic".parse::<Locale>(), Ok(Locale::Generic));
        assert!("fr".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::Generic);
        assert_eq!(Locale::Au.to_string(), "au");
    }
}
