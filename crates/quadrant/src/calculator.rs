//! The calculator facade: one request in, one response out.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use quadrant_core::ExprArena;
use quadrant_integrate::IntegrationOptions;
use quadrant_plot::{render_plot, PlotOptions};

use crate::calculus::{compute_area, compute_volume, Quantity};
use crate::error::CalcError;
use crate::validate::{validate_bounds, validate_function};

/// Format of the response timestamp.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y - %H:%M:%S";

/// Calculator configuration.
#[derive(Clone, Debug)]
pub struct CalculatorConfig {
    /// Name of the function variable.
    pub variable: String,
    /// Integration settings.
    pub integration: IntegrationOptions,
    /// Plot settings.
    pub plot: PlotOptions,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            variable: "x".to_owned(),
            integration: IntegrationOptions::default(),
            plot: PlotOptions::default(),
        }
    }
}

/// A calculation request. Missing fields are empty or `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationRequest {
    /// Function text.
    pub function: String,
    /// Lower bound text.
    pub lower: String,
    /// Upper bound text.
    pub upper: String,
    /// Compute the area under the curve.
    pub compute_area: bool,
    /// Compute the volume of revolution.
    pub compute_volume: bool,
    /// Include the area derivation.
    pub show_area_steps: bool,
    /// Include the volume derivation.
    pub show_volume_steps: bool,
}

/// A successful calculation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// The function as parsed.
    pub function: String,
    /// The lower bound as parsed.
    pub lower: String,
    /// The upper bound as parsed.
    pub upper: String,
    /// Local time of the calculation.
    pub timestamp: String,
    /// Area block, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Quantity>,
    /// Volume block, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Quantity>,
    /// Base64-encoded PNG.
    pub plot: String,
}

/// Integral calculator.
#[derive(Clone, Debug, Default)]
pub struct Calculator {
    config: CalculatorConfig,
}

impl Calculator {
    /// Creates a calculator with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a calculator with the given settings.
    #[must_use]
    pub fn with_config(config: CalculatorConfig) -> Self {
        Self { config }
    }

    /// The active settings.
    #[must_use]
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Validates the input, computes the requested quantities and renders
    /// the plot.
    ///
    /// # Errors
    ///
    /// `NoComputationSelected` when neither quantity is requested (checked
    /// before anything else), then the first input, integration or plot
    /// error.
    pub fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResponse, CalcError> {
        if !request.compute_area && !request.compute_volume {
            return Err(CalcError::NoComputationSelected);
        }
        let span = info_span!("calculate", function = %request.function);
        let _guard = span.enter();

        let mut arena = ExprArena::new();
        let f = validate_function(&mut arena, &request.function, &self.config.variable)?;
        let bounds = validate_bounds(&mut arena, &request.lower, &request.upper)?;
        debug!(
            lower = %arena.display(bounds.lower),
            upper = %arena.display(bounds.upper),
            "input validated"
        );

        let options = &self.config.integration;
        let area = request
            .compute_area
            .then(|| compute_area(&mut arena, &f, &bounds, request.show_area_steps, options))
            .transpose()?;
        let volume = request
            .compute_volume
            .then(|| compute_volume(&mut arena, &f, &bounds, request.show_volume_steps, options))
            .transpose()?;

        let png = render_plot(
            &arena,
            f.expr,
            f.var,
            bounds.lower,
            bounds.upper,
            request.compute_area,
            &self.config.plot,
        )?;
        info!(
            area = ?area.as_ref().map(|q| &q.symbolic),
            volume = ?volume.as_ref().map(|q| &q.symbolic),
            plot_bytes = png.len(),
            "calculation complete"
        );

        Ok(CalculationResponse {
            function: arena.to_text(f.expr),
            lower: arena.to_text(bounds.lower),
            upper: arena.to_text(bounds.upper),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            area,
            volume,
            plot: STANDARD.encode(png),
        })
    }
}
