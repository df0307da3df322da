//! Multi-criteria ranking of renovation scenarios.

mod criteria;
mod scenario;
mod topsis;

pub use criteria::{
    epc_score, extract_criteria, npv_score, roi_score, CriteriaValues, FinancialResult,
    ScenarioOutcome, CRITERIA_COUNT, EPC_SCALE, NPV_SCALE, ROI_SATURATION,
};
pub use scenario::{RankedScenario, ScenarioEvaluation, ScenarioRanker};
pub use topsis::{rank, rank_alternatives, RankedAlternative, DEGENERATE_CLOSENESS};
