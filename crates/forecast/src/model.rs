use crate::error::ModelFitError;

/// A univariate forecasting model.
///
/// Implementations must be deterministic: the same series always yields the same
/// fitted model. Fitting may run on any worker thread, one item per call.
pub trait ForecastModel: Send + Sync {
    type Fitted: FittedModel;

    /// Fit the model to one item's history (oldest observation first).
    fn fit(&self, series: &[f64]) -> Result<Self::Fitted, ModelFitError>;
}

/// A model fitted to one series, ready to produce point forecasts.
pub trait FittedModel: Send {
    /// Point forecasts for the `steps` periods after the fitted history.
    fn forecast(&self, steps: usize) -> Vec<f64>;
}
