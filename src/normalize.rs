use crate::error::{Result, ScrapeError};
use crate::types::RankRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::info;

/// Which record field a replace rule rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleField {
    CountryFull,
    CountryAbrv,
}

/// One identity correction. The archive carries three decades of naming
/// drift for a fixed, known set of teams; these rules are data, not
/// algorithm, and apply once in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Rewrites any of the `from` values of `field` to `to`.
    Replace {
        field: RuleField,
        from: Vec<String>,
        to: String,
    },
    /// Removes rows carrying this entity id, optionally only at one
    /// erroneous snapshot date.
    Drop {
        id: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<NaiveDate>,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct RuleFile {
    #[serde(rename = "rule")]
    rules: Vec<Rule>,
}

pub struct IdentityNormalizer {
    rules: Vec<Rule>,
}

impl IdentityNormalizer {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The known corrections for the FIFA archive, in their required
    /// application order.
    pub fn with_default_rules() -> Self {
        Self::new(default_rules())
    }

    /// Loads a rule table from a TOML file of `[[rule]]` entries.
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScrapeError::Config(format!("Failed to read rules file '{}': {}", path, e))
        })?;
        let file: RuleFile = toml::from_str(&content)?;
        info!("Loaded {} identity rules from {}", file.rules.len(), path);
        Ok(Self::new(file.rules))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Applies every rule once, in order. Re-applying the same table to the
    /// output produces no further change.
    pub fn apply(&self, mut records: Vec<RankRecord>) -> Vec<RankRecord> {
        for rule in &self.rules {
            match rule {
                Rule::Replace { field, from, to } => {
                    for record in &mut records {
                        let value = match field {
                            RuleField::CountryFull => &mut record.country_full,
                            RuleField::CountryAbrv => &mut record.country_abrv,
                        };
                        if from.iter().any(|f| f == value) {
                            *value = to.clone();
                        }
                    }
                }
                Rule::Drop { id, date } => {
                    records.retain(|r| r.id != *id || date.map_or(false, |d| r.rank_date != d));
                }
            }
        }
        records
    }
}

/// Serializes a rule table back to TOML, for seeding an external rules
/// file from the built-in defaults.
pub fn rules_to_toml(rules: &[Rule]) -> Result<String> {
    toml::to_string_pretty(&RuleFile {
        rules: rules.to_vec(),
    })
    .map_err(|e| ScrapeError::Config(format!("Failed to serialize rules: {}", e)))
}

fn replace_full(from: &[&str], to: &str) -> Rule {
    Rule::Replace {
        field: RuleField::CountryFull,
        from: from.iter().map(|s| s.to_string()).collect(),
        to: to.to_string(),
    }
}

pub fn default_rules() -> Vec<Rule> {
    vec![
        // Lebanon has two abbreviations
        Rule::Replace {
            field: RuleField::CountryAbrv,
            from: vec!["LIB".to_string()],
            to: "LBN".to_string(),
        },
        // Montenegro duplicates
        Rule::Drop {
            id: 1903356,
            date: None,
        },
        replace_full(&["FYR Macedonia"], "North Macedonia"),
        replace_full(&["Cape Verde Islands"], "Cabo Verde"),
        replace_full(
            &["St. Vincent and the Grenadines"],
            "St. Vincent / Grenadines",
        ),
        replace_full(&["Eswatini"], "Swaziland"),
        replace_full(&["Curacao"], "Curaçao"),
        replace_full(
            &["Sao Tome e Principe", "São Tomé e Príncipe"],
            "São Tomé and Príncipe",
        ),
    ]
}
