// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles fixture case lists and user-supplied ecosystem catalogs.

use nonempty::NonEmpty;
use serde::Deserialize;

use crate::suite::FixtureCase;
use crate::detect::{EcosystemSignature, SignatureCatalog};

pub fn deserialize_cases<'de, D>(deserializer: D) -> Result<Option<NonEmpty<FixtureCase>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<Vec<FixtureCase>> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(cases) => {
            let mut seen = std::collections::HashSet::new();
            for case in &cases {
                if !seen.insert(case.id.as_str()) {
                    return Err(serde::de::Error::custom(format!(
                        "fixture case '{}' is declared more than once",
                        case.id
                    )));
                }
            }
            let cases = NonEmpty::from_vec(cases)
                .ok_or_else(|| serde::de::Error::custom("suite cases list cannot be empty"))?;
            Ok(Some(cases))
        }
    }
}

pub fn deserialize_catalog<'de, D>(deserializer: D) -> Result<Option<SignatureCatalog>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<Vec<EcosystemSignature>> = Option::deserialize(deserializer)?;
    opt.map(|entries| SignatureCatalog::new(entries).map_err(serde::de::Error::custom))
        .transpose()
}
