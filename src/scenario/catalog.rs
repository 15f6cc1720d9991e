use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::info;

/// One practice scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario ID (also the conversational agent ID)
    pub id: String,

    /// Program the scenario belongs to
    pub program: String,

    /// Display title
    pub title: String,

    /// Background story shown to the trainee
    pub narrative: String,

    /// Instructions for the audit, or `None` when the scenario has no rubric
    pub rating_prompt_template: Option<String>,
}

/// Scenario entry as written in the configuration file
#[derive(Debug, Deserialize)]
struct ScenarioEntry {
    #[serde(rename = "Title")]
    title: String,

    #[serde(rename = "Scenario ID")]
    id: String,

    #[serde(rename = "Scenario Narrative", default)]
    narrative: String,

    #[serde(rename = "AI Rating Prompt", default)]
    rating_prompt: Option<String>,
}

type ProgramScenarios = BTreeMap<String, ScenarioEntry>;

/// Read-only lookup of scenarios by ID
#[derive(Debug, Clone, Default)]
pub struct ScenarioCatalog {
    /// Scenarios ordered by program, then scenario name
    scenarios: Vec<Scenario>,
    by_id: HashMap<String, usize>,
}

impl ScenarioCatalog {
    /// Load the catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario catalog {}", path.display()))?;

        let catalog = Self::from_json_str(&json)
            .with_context(|| format!("Invalid scenario catalog {}", path.display()))?;

        info!("Loaded {} scenarios from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse the `program → scenario name → entry` mapping
    pub fn from_json_str(json: &str) -> Result<Self> {
        let programs: BTreeMap<String, ProgramScenarios> = serde_json::from_str(json)?;

        let scenarios = programs
            .into_iter()
            .flat_map(|(program, entries)| {
                entries.into_values().map(move |entry| Scenario {
                    id: entry.id,
                    program: program.clone(),
                    title: entry.title,
                    narrative: entry.narrative,
                    rating_prompt_template: entry
                        .rating_prompt
                        .filter(|prompt| !prompt.trim().is_empty()),
                })
            })
            .collect();

        Self::from_scenarios(scenarios)
    }

    /// Build a catalog from already-resolved scenarios
    pub fn from_scenarios(scenarios: Vec<Scenario>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(scenarios.len());

        for (index, scenario) in scenarios.iter().enumerate() {
            if scenario.id.trim().is_empty() {
                bail!("Scenario '{}' has an empty Scenario ID", scenario.title);
            }
            if by_id.insert(scenario.id.clone(), index).is_some() {
                bail!("Duplicate Scenario ID: {}", scenario.id);
            }
        }

        Ok(Self { scenarios, by_id })
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.by_id.get(id).map(|&index| &self.scenarios[index])
    }

    pub fn list(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
