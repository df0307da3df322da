use serde::{Deserialize, Serialize};
use tracing::debug;

use super::criteria::{extract_criteria, CriteriaValues, FinancialResult, ScenarioOutcome};
use super::topsis::rank_alternatives;

/// A renovation scenario with the outcomes computed by the external services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioEvaluation {
    pub id: String,
    #[serde(default)]
    pub measures: Vec<String>,
    #[serde(flatten)]
    pub outcome: ScenarioOutcome,
    #[serde(default)]
    pub financial: Option<FinancialResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScenario {
    /// 1-based position in the final ranking.
    pub rank: usize,
    /// Position in the input sequence.
    pub index: usize,
    pub scenario_id: String,
    pub criteria: CriteriaValues,
    pub closeness: f64,
}

/// Extracts criteria for each scenario and orders them with TOPSIS.
#[derive(Debug, Clone)]
pub struct ScenarioRanker {
    weights: CriteriaValues,
}

impl Default for ScenarioRanker {
    fn default() -> Self {
        Self::new(CriteriaValues::equal_weights())
    }
}

impl ScenarioRanker {
    pub fn new(weights: CriteriaValues) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &CriteriaValues {
        &self.weights
    }

    pub fn rank_scenarios(
        &self,
        scenarios: &[ScenarioEvaluation],
        baseline_energy: f64,
    ) -> Vec<RankedScenario> {
        let criteria: Vec<CriteriaValues> = scenarios
            .iter()
            .map(|scenario| {
                extract_criteria(
                    &scenario.outcome,
                    scenario.financial.as_ref(),
                    baseline_energy,
                )
            })
            .collect();

        debug!(
            scenarios = scenarios.len(),
            baseline_energy, "ranking renovation scenarios"
        );

        rank_alternatives(&criteria, &self.weights)
            .into_iter()
            .enumerate()
            .map(|(position, ranked)| RankedScenario {
                rank: position + 1,
                index: ranked.index,
                scenario_id: scenarios[ranked.index].id.clone(),
                criteria: criteria[ranked.index],
                closeness: ranked.closeness,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scenarios() -> Vec<ScenarioEvaluation> {
        serde_json::from_value(json!([
            {
                "id": "baseline-plus-windows",
                "measures": ["windows"],
                "annual_energy_needs": 9000.0,
                "epc_class": "D",
                "comfort_index": 60.0
            },
            {
                "id": "deep-retrofit",
                "measures": ["wall_insulation", "roof_insulation", "heat_pump", "pv"],
                "annual_energy_needs": 3500.0,
                "epc_class": "A",
                "comfort_index": 88.0,
                "financial": {"roi": 0.9, "npv": 42000.0}
            },
            {
                "id": "heat-pump-only",
                "measures": ["heat_pump"],
                "annual_energy_needs": 6000.0,
                "epc_class": "C",
                "comfort_index": 70.0,
                "financial": {"roi": 0.4, "npv": 5000.0}
            }
        ]))
        .expect("scenarios deserialize")
    }

    #[test]
    fn deep_retrofit_ranks_first() {
        let ranked = ScenarioRanker::default().rank_scenarios(&scenarios(), 10_000.0);
        let ids: Vec<&str> = ranked.iter().map(|r| r.scenario_id.as_str()).collect();
        assert_eq!(ids, vec!["deep-retrofit", "heat-pump-only", "baseline-plus-windows"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[0].closeness, 1.0);
        assert_eq!(ranked[2].closeness, 0.0);
    }

    #[test]
    fn empty_scenarios_rank_to_nothing() {
        assert!(ScenarioRanker::default()
            .rank_scenarios(&[], 10_000.0)
            .is_empty());
    }
}
