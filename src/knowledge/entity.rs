//! Linked-data entity payload and the facts extracted from it.

use serde::Deserialize;

/// `{"@value": "..."}`: one localized literal.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedValue {
    #[serde(rename = "@value")]
    pub value: String,
    #[serde(rename = "@language", default)]
    pub language: Option<String>,
}

/// A linked entity that carries a `name` (capital city, person, …).
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRecord {
    #[serde(default)]
    pub name: Vec<LocalizedValue>,
}

/// The subset of a country entity the skill reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default)]
    pub name: Option<Vec<LocalizedValue>>,
    #[serde(default)]
    pub capital: Option<Vec<NamedRecord>>,
    #[serde(default)]
    pub political_leader: Option<Vec<NamedRecord>>,
}

impl Entity {
    /// First localized value of each field. `Err` names the first field
    /// that is present but empty.
    pub fn country_facts(&self) -> Result<CountryFacts, &'static str> {
        let country = first_value(self.name.as_deref()).ok_or("name")?;
        let capital = first_record_name(self.capital.as_deref()).ok_or("capital name")?;
        let political_leader =
            first_record_name(self.political_leader.as_deref()).ok_or("politicalLeader name")?;

        Ok(CountryFacts {
            country: country.to_string(),
            capital: capital.to_string(),
            political_leader: political_leader.to_string(),
        })
    }
}

fn first_value(values: Option<&[LocalizedValue]>) -> Option<&str> {
    values?.first().map(|v| v.value.as_str())
}

fn first_record_name(records: Option<&[NamedRecord]>) -> Option<&str> {
    first_value(Some(records?.first()?.name.as_slice()))
}

/// What gets spoken for a resolved country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryFacts {
    pub country: String,
    pub capital: String,
    pub political_leader: String,
}

impl CountryFacts {
    pub fn to_speech(&self) -> String {
        format!(
            "{}'s political leader is {}. Its capital city is {}.",
            self.country, self.political_leader, self.capital
        )
    }
}
