//! Holdout validation of a fitted model

use crate::models::{FittedModel, HOLDOUT_DAYS};
use cash_math::accuracy::{mean_absolute_error, root_mean_squared_error};
use serde::{Deserialize, Serialize};

/// What the validation numbers do and do not claim
pub const VALIDATION_SCOPE: &str = "Retrospective in-sample accuracy over the most recent \
observed days; not a guarantee of accuracy for the forecast horizon";

/// Accuracy of a model's retrospective predictions over the holdout window
///
/// `mae` and `rmse` are `None` when the holdout window is shorter than
/// [`HOLDOUT_DAYS`]; the reason is listed in `warnings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub mae: Option<f64>,
    pub rmse: Option<f64>,
    pub holdout_actuals: Vec<f64>,
    pub holdout_predicted: Vec<f64>,
    pub warnings: Vec<String>,
    pub scope: String,
}

impl ValidationMetrics {
    /// Whether both error measures could be computed
    pub fn is_defined(&self) -> bool {
        self.mae.is_some() && self.rmse.is_some()
    }
}

impl std::fmt::Display for ValidationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Holdout Validation Metrics:")?;
        match self.mae {
            Some(mae) => writeln!(f, "  MAE:  {:.4}", mae)?,
            None => writeln!(f, "  MAE:  undefined")?,
        }
        match self.rmse {
            Some(rmse) => writeln!(f, "  RMSE: {:.4}", rmse)?,
            None => writeln!(f, "  RMSE: undefined")?,
        }
        writeln!(f, "  ({})", self.scope)?;
        Ok(())
    }
}

/// Score held-out actual daily totals against the model's predictions for the same dates
pub fn validate(actuals: &[f64], predicted: &[f64]) -> ValidationMetrics {
    let mut warnings = Vec::new();

    let scores = if actuals.len() != predicted.len() {
        warnings.push(format!(
            "Holdout has {} actual values but {} predictions; metrics undefined",
            actuals.len(),
            predicted.len()
        ));
        None
    } else if actuals.len() < HOLDOUT_DAYS {
        warnings.push(format!(
            "Holdout window has only {} of {} days; metrics undefined",
            actuals.len(),
            HOLDOUT_DAYS
        ));
        None
    } else {
        match (
            mean_absolute_error(actuals, predicted),
            root_mean_squared_error(actuals, predicted),
        ) {
            (Ok(mae), Ok(rmse)) if mae.is_finite() && rmse.is_finite() => Some((mae, rmse)),
            _ => {
                warnings.push("Holdout errors are not finite; metrics undefined".to_string());
                None
            }
        }
    };

    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    ValidationMetrics {
        mae: scores.map(|(mae, _)| mae),
        rmse: scores.map(|(_, rmse)| rmse),
        holdout_actuals: actuals.to_vec(),
        holdout_predicted: predicted.to_vec(),
        warnings,
        scope: VALIDATION_SCOPE.to_string(),
    }
}

/// Score a fitted model on its own holdout window
pub fn evaluate_model<M: FittedModel + ?Sized>(model: &M) -> ValidationMetrics {
    let holdout = model.holdout();
    validate(&holdout.actuals, &holdout.predicted)
}
