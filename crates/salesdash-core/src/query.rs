use std::str::FromStr;

use crate::CoreError;

/// Sales region accepted by the remote API. `Brasil` means the whole country
/// and sends no region filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    Brasil,
    CentroOeste,
    Nordeste,
    Norte,
    Sudeste,
    Sul,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Brasil,
        Region::CentroOeste,
        Region::Nordeste,
        Region::Norte,
        Region::Sudeste,
        Region::Sul,
    ];

    /// Value for the `regiao` query parameter, or `None` for the whole country.
    #[must_use]
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            Region::Brasil => None,
            Region::CentroOeste => Some("centro-oeste"),
            Region::Nordeste => Some("nordeste"),
            Region::Norte => Some("norte"),
            Region::Sudeste => Some("sudeste"),
            Region::Sul => Some("sul"),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Region::Brasil => "Brasil",
            Region::CentroOeste => "Centro-Oeste",
            Region::Nordeste => "Nordeste",
            Region::Norte => "Norte",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
        };
        f.write_str(label)
    }
}

impl FromStr for Region {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Region::ALL
            .into_iter()
            .find(|r| r.to_string().to_lowercase() == wanted)
            .ok_or_else(|| CoreError::UnknownRegion(s.to_owned()))
    }
}

/// Server-side filters sent with the API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SalesQuery {
    pub region: Region,
    /// `None` requests every year.
    pub year: Option<i32>,
}

impl SalesQuery {
    #[must_use]
    pub fn new(region: Region, year: Option<i32>) -> Self {
        Self { region, year }
    }

    /// Query-string pairs for the request. Unset filters are omitted.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(region) = self.region.query_value() {
            pairs.push(("regiao", region.to_owned()));
        }
        if let Some(year) = self.year {
            pairs.push(("ano", year.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_parses_case_insensitively() {
        assert_eq!("centro-oeste".parse::<Region>().unwrap(), Region::CentroOeste);
        assert_eq!("SUL".parse::<Region>().unwrap(), Region::Sul);
        assert_eq!(" Brasil ".parse::<Region>().unwrap(), Region::Brasil);
    }

    #[test]
    fn unknown_region_fails() {
        let err = "Atlantida".parse::<Region>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownRegion(ref r) if r == "Atlantida"));
    }

    #[test]
    fn whole_country_sends_no_filters() {
        assert!(SalesQuery::default().query_pairs().is_empty());
    }

    #[test]
    fn region_and_year_become_query_pairs() {
        let query = SalesQuery::new(Region::Nordeste, Some(2022));
        assert_eq!(
            query.query_pairs(),
            vec![("regiao", "nordeste".to_owned()), ("ano", "2022".to_owned())]
        );
    }
}
