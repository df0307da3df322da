use serde::{Deserialize, Serialize};

/// EPC classes from worst to best.
pub const EPC_SCALE: [&str; 8] = ["G", "F", "E", "D", "C", "B", "A", "A+"];

/// ROI (as a fraction) at which the ROI sub-score saturates.
pub const ROI_SATURATION: f64 = 2.0;
/// NPV scale of the tanh squashing, in currency units.
pub const NPV_SCALE: f64 = 50_000.0;

pub const CRITERIA_COUNT: usize = 5;

/// Five normalized decision criteria, each in `[0, 1]`. Also used as weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaValues {
    pub energy_efficiency: f64,
    pub res_integration: f64,
    pub sustainability: f64,
    pub user_comfort: f64,
    pub financial: f64,
}

impl CriteriaValues {
    pub const fn uniform(value: f64) -> Self {
        Self {
            energy_efficiency: value,
            res_integration: value,
            sustainability: value,
            user_comfort: value,
            financial: value,
        }
    }

    /// Default weighting: every criterion counts the same.
    pub fn equal_weights() -> Self {
        Self::uniform(1.0 / CRITERIA_COUNT as f64)
    }

    /// Column order of the decision matrix.
    pub const fn to_array(&self) -> [f64; CRITERIA_COUNT] {
        [
            self.energy_efficiency,
            self.res_integration,
            self.sustainability,
            self.user_comfort,
            self.financial,
        ]
    }
}

/// Simulation output for one renovation scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    /// Annual energy needs, same unit as the baseline.
    pub annual_energy_needs: f64,
    pub epc_class: String,
    /// Comfort index on a 0–100 scale.
    pub comfort_index: f64,
}

/// Financial-risk output for one renovation scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialResult {
    /// Return on investment as a fraction (`1.0` = 100 %).
    pub roi: f64,
    pub npv: f64,
}

/// Position of `class` on [`EPC_SCALE`], normalized to `[0, 1]`.
pub fn epc_score(class: &str) -> f64 {
    let class = class.trim();
    EPC_SCALE
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(class))
        .map(|index| index as f64 / (EPC_SCALE.len() - 1) as f64)
        .unwrap_or(0.0)
}

/// `0.5` at zero NPV, tending to 1 for large gains and 0 for large losses.
pub fn npv_score(npv: f64) -> f64 {
    clamp01(0.5 * (1.0 + (npv / NPV_SCALE).tanh()))
}

pub fn roi_score(roi: f64) -> f64 {
    clamp01(roi / ROI_SATURATION)
}

pub fn extract_criteria(
    scenario: &ScenarioOutcome,
    financial: Option<&FinancialResult>,
    baseline_energy: f64,
) -> CriteriaValues {
    let energy_efficiency = if baseline_energy > 0.0 {
        clamp01(1.0 - scenario.annual_energy_needs / baseline_energy)
    } else {
        0.0
    };
    let res_integration = epc_score(&scenario.epc_class);
    let financial = financial
        .map(|result| (roi_score(result.roi) + npv_score(result.npv)) / 2.0)
        .unwrap_or(0.0);

    CriteriaValues {
        energy_efficiency,
        res_integration,
        sustainability: (energy_efficiency + res_integration) / 2.0,
        user_comfort: clamp01(scenario.comfort_index / 100.0),
        financial,
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub(crate) fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
