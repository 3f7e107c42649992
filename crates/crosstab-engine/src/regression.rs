//! Model-based row statistics: odds ratios and hazard ratios.
//!
//! The heavy numerics live behind the [`ModelFitter`] trait. One model is
//! fitted per independent variable; the fitter returns exponentiated
//! coefficients per non-reference level, which the row functions format
//! level-for-level against the variable's rows. A closed-form
//! [`CrudeBinaryFitter`] ships in-crate for unadjusted odds ratios;
//! adjusted and time-to-event models are injected by the caller.

use crosstab_model::{ResolvedVariable, Result, TableError};

use crate::dataset::Dataset;
use crate::summary::RowFn;

/// The model response the fitter should target.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Logistic response: `column == event_level` is the event.
    Binary { column: String, event_level: String },
    /// Proportional-hazards response over a follow-up time column and an
    /// event indicator column.
    Survival {
        time_column: String,
        event_column: String,
        event_level: String,
    },
}

impl Response {
    /// The outcome column named in estimation errors.
    fn outcome_column(&self) -> &str {
        match self {
            Self::Binary { column, .. } => column,
            Self::Survival { event_column, .. } => event_column,
        }
    }
}

/// One model request: response, variable under study, reference level,
/// adjustment columns, and the confidence level for intervals.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    pub response: Response,
    pub variable: ResolvedVariable,
    pub reference: String,
    pub adjust_for: Vec<String>,
    pub confidence: Option<f64>,
}

/// An exponentiated coefficient for one non-reference level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelEstimate {
    pub level: String,
    pub ratio: f64,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// The regression collaborator. Implementations fit one model per call
/// and report estimates for every non-reference level of
/// `spec.variable`; anything they cannot estimate must surface as
/// [`TableError::Estimation`], never as a partial result.
pub trait ModelFitter {
    fn fit(&self, spec: &ModelSpec, data: &Dataset) -> Result<Vec<LevelEstimate>>;
}

/// Reference-level selection rule.
///
/// `MostFrequent` breaks frequency ties by declaration order, so the
/// choice is deterministic for any input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Baseline {
    #[default]
    FirstLevel,
    MostFrequent,
}

impl Baseline {
    pub fn select(&self, data: &Dataset, variable: &ResolvedVariable) -> Result<String> {
        match self {
            Self::FirstLevel => variable.levels.first().cloned().ok_or_else(|| {
                TableError::Configuration(format!("variable `{}` has no levels", variable.column))
            }),
            Self::MostFrequent => {
                let mut best: Option<(usize, &String)> = None;
                for level in &variable.levels {
                    let count = data.count_eq(&variable.column, level)?;
                    let replace = match best {
                        Some((best_count, _)) => count > best_count,
                        None => true,
                    };
                    if replace {
                        best = Some((count, level));
                    }
                }
                best.map(|(_, level)| level.clone()).ok_or_else(|| {
                    TableError::Configuration(format!(
                        "variable `{}` has no levels",
                        variable.column
                    ))
                })
            }
        }
    }
}

/// Shared core of the ratio row functions.
struct RatioRow {
    response: Response,
    adjusted: bool,
    confidence: Option<f64>,
    baseline: Baseline,
    digits: usize,
    fitter: Box<dyn ModelFitter>,
}

impl RatioRow {
    fn evaluate(
        &self,
        data: &Dataset,
        variable: &ResolvedVariable,
        independents: &[ResolvedVariable],
    ) -> Result<Vec<String>> {
        let reference = self.baseline.select(data, variable)?;
        let adjust_for: Vec<String> = if self.adjusted {
            independents
                .iter()
                .filter(|v| v.column != variable.column)
                .map(|v| v.column.clone())
                .collect()
        } else {
            Vec::new()
        };
        let spec = ModelSpec {
            response: self.response.clone(),
            variable: variable.clone(),
            reference: reference.clone(),
            adjust_for,
            confidence: self.confidence,
        };
        let estimates = self.fitter.fit(&spec, data)?;

        let mut cells = Vec::with_capacity(variable.levels.len());
        for level in &variable.levels {
            if *level == reference {
                cells.push(format!("{:.digits$}", 1.0, digits = self.digits));
                continue;
            }
            let estimate = estimates.iter().find(|e| e.level == *level).ok_or_else(|| {
                TableError::Estimation {
                    variable: variable.column.clone(),
                    outcome: Some(self.response.outcome_column().to_string()),
                    message: format!("fitter returned no estimate for level `{level}`"),
                }
            })?;
            cells.push(self.render(estimate));
        }
        Ok(cells)
    }

    fn render(&self, estimate: &LevelEstimate) -> String {
        let digits = self.digits;
        match (estimate.lower, estimate.upper) {
            (Some(lower), Some(upper)) => format!(
                "{:.digits$} ({lower:.digits$}, {upper:.digits$})",
                estimate.ratio
            ),
            _ => format!("{:.digits$}", estimate.ratio),
        }
    }
}

/// Odds ratios per level of an independent variable against a binary
/// outcome, reference level rendered as `1.00`.
pub struct OddsRatio {
    inner: RatioRow,
}

impl OddsRatio {
    pub fn new(
        outcome: impl Into<String>,
        event_level: impl Into<String>,
        fitter: impl ModelFitter + 'static,
    ) -> Self {
        Self {
            inner: RatioRow {
                response: Response::Binary {
                    column: outcome.into(),
                    event_level: event_level.into(),
                },
                adjusted: false,
                confidence: Some(0.95),
                baseline: Baseline::FirstLevel,
                digits: 2,
                fitter: Box::new(fitter),
            },
        }
    }

    /// Unadjusted odds ratios from 2x2 counts, no external fitter needed.
    pub fn crude(outcome: impl Into<String>, event_level: impl Into<String>) -> Self {
        Self::new(outcome, event_level, CrudeBinaryFitter)
    }

    /// Adjust for all other independent variables in the table.
    pub fn adjusted(mut self) -> Self {
        self.inner.adjusted = true;
        self
    }

    /// Confidence level for intervals, e.g. `0.95`. `None` suppresses
    /// intervals.
    pub fn confidence(mut self, level: Option<f64>) -> Self {
        self.inner.confidence = level;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.inner.baseline = baseline;
        self
    }

    pub fn digits(mut self, digits: usize) -> Self {
        self.inner.digits = digits;
        self
    }
}

impl RowFn for OddsRatio {
    fn evaluate(
        &self,
        data: &Dataset,
        variable: &ResolvedVariable,
        independents: &[ResolvedVariable],
    ) -> Result<Vec<String>> {
        self.inner.evaluate(data, variable, independents)
    }
}

/// Hazard ratios per level of an independent variable for a time-to-event
/// outcome. Always requires an injected proportional-hazards fitter.
pub struct HazardRatio {
    inner: RatioRow,
}

impl HazardRatio {
    pub fn new(
        time_column: impl Into<String>,
        event_column: impl Into<String>,
        event_level: impl Into<String>,
        fitter: impl ModelFitter + 'static,
    ) -> Self {
        Self {
            inner: RatioRow {
                response: Response::Survival {
                    time_column: time_column.into(),
                    event_column: event_column.into(),
                    event_level: event_level.into(),
                },
                adjusted: false,
                confidence: Some(0.95),
                baseline: Baseline::FirstLevel,
                digits: 2,
                fitter: Box::new(fitter),
            },
        }
    }

    pub fn adjusted(mut self) -> Self {
        self.inner.adjusted = true;
        self
    }

    pub fn confidence(mut self, level: Option<f64>) -> Self {
        self.inner.confidence = level;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.inner.baseline = baseline;
        self
    }

    pub fn digits(mut self, digits: usize) -> Self {
        self.inner.digits = digits;
        self
    }
}

impl RowFn for HazardRatio {
    fn evaluate(
        &self,
        data: &Dataset,
        variable: &ResolvedVariable,
        independents: &[ResolvedVariable],
    ) -> Result<Vec<String>> {
        self.inner.evaluate(data, variable, independents)
    }
}

/// Closed-form odds ratios from 2x2 counts with Wald intervals.
///
/// Refuses adjusted requests and survival responses; those need a real
/// regression library behind [`ModelFitter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CrudeBinaryFitter;

impl ModelFitter for CrudeBinaryFitter {
    fn fit(&self, spec: &ModelSpec, data: &Dataset) -> Result<Vec<LevelEstimate>> {
        let Response::Binary {
            column,
            event_level,
        } = &spec.response
        else {
            return Err(TableError::Estimation {
                variable: spec.variable.column.clone(),
                outcome: Some(spec.response.outcome_column().to_string()),
                message: "crude fitter supports binary responses only".to_string(),
            });
        };
        if !spec.adjust_for.is_empty() {
            return Err(TableError::Estimation {
                variable: spec.variable.column.clone(),
                outcome: Some(column.clone()),
                message: "adjusted models require an external fitter".to_string(),
            });
        }

        let reference_rows = data.filter_eq(&spec.variable.column, &spec.reference)?;
        let ref_events = reference_rows.count_eq(column, event_level)?;
        let ref_nonevents = reference_rows.height() - ref_events;

        let mut estimates = Vec::new();
        for level in &spec.variable.levels {
            if *level == spec.reference {
                continue;
            }
            let rows = data.filter_eq(&spec.variable.column, level)?;
            let events = rows.count_eq(column, event_level)?;
            let nonevents = rows.height() - events;
            if events == 0 || nonevents == 0 || ref_events == 0 || ref_nonevents == 0 {
                return Err(TableError::Estimation {
                    variable: spec.variable.column.clone(),
                    outcome: Some(column.clone()),
                    message: format!("zero cell count for level `{level}`"),
                });
            }
            let ratio =
                (events * ref_nonevents) as f64 / (nonevents * ref_events) as f64;
            let (lower, upper) = match spec.confidence {
                Some(confidence) => {
                    let z = normal_quantile(0.5 + confidence / 2.0);
                    let se = (1.0 / events as f64
                        + 1.0 / nonevents as f64
                        + 1.0 / ref_events as f64
                        + 1.0 / ref_nonevents as f64)
                        .sqrt();
                    let log_ratio = ratio.ln();
                    (
                        Some((log_ratio - z * se).exp()),
                        Some((log_ratio + z * se).exp()),
                    )
                }
                None => (None, None),
            };
            estimates.push(LevelEstimate {
                level: level.clone(),
                ratio,
                lower,
                upper,
            });
        }
        Ok(estimates)
    }
}

/// Inverse standard-normal CDF, Acklam's rational approximation.
/// Relative error below 1.15e-9 over (0, 1).
fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, DataFrame, NamedFrom, Series};

    fn dataset(rows: &[(&str, &str)]) -> Dataset {
        let sex: Vec<&str> = rows.iter().map(|(s, _)| *s).collect();
        let treated: Vec<&str> = rows.iter().map(|(_, t)| *t).collect();
        let columns: Vec<Column> = vec![
            Series::new("sex".into(), sex).into(),
            Series::new("treated".into(), treated).into(),
        ];
        Dataset::new(DataFrame::new(columns).unwrap())
    }

    fn repeated(counts: &[(&'static str, &'static str, usize)]) -> Dataset {
        let mut rows = Vec::new();
        for (sex, treated, n) in counts {
            for _ in 0..*n {
                rows.push((*sex, *treated));
            }
        }
        dataset(&rows)
    }

    fn sex_variable() -> ResolvedVariable {
        ResolvedVariable {
            label: "Sex".to_string(),
            column: "sex".to_string(),
            levels: vec!["M".to_string(), "F".to_string()],
        }
    }

    #[test]
    fn normal_quantile_matches_reference_values() {
        assert!((normal_quantile(0.975) - 1.959964).abs() < 1e-5);
        assert!((normal_quantile(0.5)).abs() < 1e-9);
        assert!((normal_quantile(0.025) + 1.959964).abs() < 1e-5);
    }

    #[test]
    fn crude_odds_ratio_from_counts() {
        // M: 30 events / 40 non-events, F: 10 / 20 -> OR = (10*40)/(20*30)
        let data = repeated(&[("M", "Yes", 30), ("M", "No", 40), ("F", "Yes", 10), ("F", "No", 20)]);
        let or = OddsRatio::crude("treated", "Yes").confidence(None);
        let cells = or.evaluate(&data, &sex_variable(), &[sex_variable()]).unwrap();
        assert_eq!(cells, vec!["1.00", "0.67"]);
    }

    #[test]
    fn crude_odds_ratio_with_interval_brackets_estimate() {
        let data = repeated(&[("M", "Yes", 30), ("M", "No", 40), ("F", "Yes", 10), ("F", "No", 20)]);
        let or = OddsRatio::crude("treated", "Yes");
        let cells = or.evaluate(&data, &sex_variable(), &[sex_variable()]).unwrap();
        assert_eq!(cells[0], "1.00");
        assert!(cells[1].starts_with("0.67 ("));
        assert!(cells[1].ends_with(')'));
    }

    #[test]
    fn zero_cell_is_an_estimation_error() {
        let data = repeated(&[("M", "Yes", 30), ("M", "No", 40), ("F", "No", 20)]);
        let or = OddsRatio::crude("treated", "Yes");
        let err = or
            .evaluate(&data, &sex_variable(), &[sex_variable()])
            .unwrap_err();
        assert!(matches!(err, TableError::Estimation { .. }));
        assert!(err.to_string().contains("`sex`"));
        assert!(err.to_string().contains("`treated`"));
    }

    #[test]
    fn crude_fitter_rejects_adjustment() {
        let data = repeated(&[("M", "Yes", 5), ("M", "No", 5), ("F", "Yes", 5), ("F", "No", 5)]);
        let other = ResolvedVariable {
            label: "Arm".to_string(),
            column: "arm".to_string(),
            levels: vec!["A".to_string(), "B".to_string()],
        };
        let or = OddsRatio::crude("treated", "Yes").adjusted();
        let err = or
            .evaluate(&data, &sex_variable(), &[sex_variable(), other])
            .unwrap_err();
        assert!(err.to_string().contains("external fitter"));
    }

    #[test]
    fn most_frequent_baseline_breaks_ties_by_declaration_order() {
        let data = repeated(&[("M", "Yes", 3), ("F", "Yes", 3)]);
        let baseline = Baseline::MostFrequent;
        assert_eq!(baseline.select(&data, &sex_variable()).unwrap(), "M");

        let skewed = repeated(&[("M", "Yes", 2), ("F", "Yes", 3)]);
        assert_eq!(baseline.select(&skewed, &sex_variable()).unwrap(), "F");
    }

    #[test]
    fn hazard_ratio_formats_injected_estimates() {
        struct StubFitter;
        impl ModelFitter for StubFitter {
            fn fit(&self, spec: &ModelSpec, _data: &Dataset) -> Result<Vec<LevelEstimate>> {
                assert!(matches!(spec.response, Response::Survival { .. }));
                Ok(vec![LevelEstimate {
                    level: "F".to_string(),
                    ratio: 1.8214,
                    lower: Some(1.1008),
                    upper: Some(3.0135),
                }])
            }
        }
        let data = repeated(&[("M", "Yes", 2), ("F", "No", 2)]);
        let hr = HazardRatio::new("fu_time", "died", "Yes", StubFitter);
        let cells = hr.evaluate(&data, &sex_variable(), &[sex_variable()]).unwrap();
        assert_eq!(cells, vec!["1.00", "1.82 (1.10, 3.01)"]);
    }
}
