//! Plot rendering.
//!
//! The curve is drawn over the integration interval widened by half its
//! width on each side. Text uses an embedded copy of DejaVu Sans, so the
//! output does not depend on system fonts.

use std::sync::OnceLock;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;
use plotters::style::register_font;
use tracing::debug;

use quadrant_core::{ExprArena, ExprHandle};

use crate::error::PlotError;
use crate::sample::Samples;

const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);
const GRID_GRAY: RGBColor = RGBColor(176, 176, 176);

const FONT_FAMILY: &str = "sans-serif";
static FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Plot configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlotOptions {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Curve samples over the widened range.
    pub samples: usize,
    /// Samples used for the shaded region and the fallback curve.
    pub shade_samples: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 900,
            samples: 1000,
            shade_samples: 100,
        }
    }
}

/// Renders `f` around `[lower, upper]` as a PNG.
///
/// With `shade` set, the region between the curve and the x-axis over
/// `[lower, upper]` is filled.
///
/// # Errors
///
/// Fails when a bound is not a finite number or the function has no finite
/// value on the plot range. Font, drawing and encoding failures are
/// reported too.
pub fn render_plot(
    arena: &ExprArena,
    f: ExprHandle,
    var: ExprHandle,
    lower: ExprHandle,
    upper: ExprHandle,
    shade: bool,
    options: &PlotOptions,
) -> Result<Vec<u8>, PlotError> {
    let a = numeric_bound(arena, lower, "lower")?;
    let b = numeric_bound(arena, upper, "upper")?;
    if a >= b {
        return Err(PlotError::EmptyRange { lower: a, upper: b });
    }

    let half = 0.5 * (b - a);
    let (curve, x_range) =
        match Samples::strict(arena, f, var, a - half, b + half, options.samples) {
            Ok(s) => (s, (a - half, b + half)),
            Err(e) => {
                debug!(error = %e, "widened range failed, plotting [a, b] only");
                (Samples::lenient(arena, f, var, a, b, options.shade_samples), (a, b))
            }
        };
    let area = shade.then(|| Samples::lenient(arena, f, var, a, b, options.shade_samples));

    let (mut y_lo, mut y_hi) = curve.value_range().ok_or(PlotError::NoFiniteSamples)?;
    if let Some((lo, hi)) = area.as_ref().and_then(Samples::value_range) {
        y_lo = y_lo.min(lo);
        y_hi = y_hi.max(hi);
    }
    // The x-axis is always in view.
    y_lo = y_lo.min(0.0);
    y_hi = y_hi.max(0.0);
    let margin = if y_hi > y_lo { 0.1 * (y_hi - y_lo) } else { 1.0 };
    let y_range = (y_lo - margin, y_hi + margin);

    ensure_font()?;
    let labels = Labels {
        function: arena.to_text(f),
        lower: arena.to_text(lower),
        upper: arena.to_text(upper),
    };
    let (width, height) = (options.width, options.height);
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    let drawn = draw(
        &mut pixels,
        options,
        &labels,
        x_range,
        y_range,
        (a, b),
        &curve,
        area.as_ref(),
    );
    drawn.map_err(|e| PlotError::Drawing(e.to_string()))?;

    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(&pixels, width, height, ExtendedColorType::Rgb8)?;
    debug!(bytes = png.len(), width, height, "plot rendered");
    Ok(png)
}

fn numeric_bound(arena: &ExprArena, h: ExprHandle, which: &'static str) -> Result<f64, PlotError> {
    let v = arena
        .evaluate(h)
        .map_err(|source| PlotError::BoundNotNumeric { which, source })?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PlotError::InfiniteBound { which })
    }
}

/// Text drawn on the plot.
struct Labels {
    function: String,
    lower: String,
    upper: String,
}

/// Registers the embedded font under [`FONT_FAMILY`] on first use.
fn ensure_font() -> Result<(), PlotError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let registered = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_DATA).is_ok());
    if registered {
        Ok(())
    } else {
        Err(PlotError::Font)
    }
}

/// Pixel size scaled from the default 900-pixel-high canvas.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled(options: &PlotOptions, size: f64, min: u32) -> u32 {
    let factor = f64::from(options.height) / 900.0;
    ((size * factor).round() as u32).max(min)
}

#[allow(clippy::too_many_arguments)]
fn draw(
    pixels: &mut [u8],
    options: &PlotOptions,
    labels: &Labels,
    (x0, x1): (f64, f64),
    (y0, y1): (f64, f64),
    (a, b): (f64, f64),
    curve: &Samples,
    area: Option<&Samples>,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::with_buffer(pixels, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let title = (FONT_FAMILY, scaled(options, 32.0, 10));
    let text = (FONT_FAMILY, scaled(options, 20.0, 8));
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("f(x) = {}", labels.function), title)
        .margin(scaled(options, 20.0, 4))
        .x_label_area_size(scaled(options, 60.0, 12))
        .y_label_area_size(scaled(options, 90.0, 16))
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("f(x)")
        .label_style(text)
        .axis_desc_style(text)
        .bold_line_style(GRID_GRAY.mix(0.3))
        .light_line_style(GRID_GRAY.mix(0.1))
        .draw()?;

    if let Some(area) = area {
        let fill = LIGHT_BLUE.mix(0.3);
        for (i, segment) in area.segments().enumerate() {
            let series = chart.draw_series(AreaSeries::new(segment, 0.0, fill))?;
            if i == 0 {
                series
                    .label("Area under the curve")
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], fill.filled()));
            }
        }
    }

    let marker = RED.mix(0.7).stroke_width(2);
    for (x, label) in [(a, &labels.lower), (b, &labels.upper)] {
        chart
            .draw_series(DashedLineSeries::new([(x, y0), (x, y1)], 12, 8, marker))?
            .label(format!("x = {label}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], marker));
    }
    chart.draw_series(LineSeries::new([(x0, 0.0), (x1, 0.0)], BLACK.stroke_width(1)))?;

    let line = BLUE.stroke_width(2);
    for (i, segment) in curve.segments().enumerate() {
        let series = chart.draw_series(LineSeries::new(segment, line))?;
        if i == 0 {
            series
                .label(format!("f(x) = {}", labels.function))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));
        }
    }

    chart
        .configure_series_labels()
        .label_font(text)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn small() -> PlotOptions {
        PlotOptions {
            width: 300,
            height: 200,
            ..PlotOptions::default()
        }
    }

    fn render(src: &str, lower: &str, upper: &str, shade: bool) -> Result<Vec<u8>, PlotError> {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let f = arena.parse(src).unwrap();
        let a = arena.parse(lower).unwrap();
        let b = arena.parse(upper).unwrap();
        render_plot(&arena, f, x, a, b, shade, &small())
    }

    #[test]
    fn test_png_of_configured_size() {
        let png = render("sin(x)", "0", "pi", true).unwrap();
        assert_eq!(png[..8], PNG_SIGNATURE);
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (300, 200));
    }

    #[test]
    fn test_shading_changes_image() {
        let shaded = render("x**2", "0", "2", true).unwrap();
        let plain = render("x**2", "0", "2", false).unwrap();
        assert_ne!(shaded, plain);
    }

    #[test]
    fn test_domain_fallback() {
        // The widened range [-0.5, 2.5] reaches negative x.
        assert!(render("log(x)", "0.5", "2", true).is_ok());
        assert!(render("sqrt(x)", "0", "4", true).is_ok());
    }

    #[test]
    fn test_bound_errors() {
        assert!(matches!(
            render("x", "0", "oo", true),
            Err(PlotError::InfiniteBound { which: "upper" })
        ));
        assert!(matches!(
            render("x", "t", "1", true),
            Err(PlotError::BoundNotNumeric { which: "lower", .. })
        ));
        assert!(matches!(
            render("x", "2", "1", true),
            Err(PlotError::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_no_finite_samples() {
        assert!(matches!(
            render("log(x)", "-2", "-1", false),
            Err(PlotError::NoFiniteSamples)
        ));
    }

    #[test]
    fn test_embedded_font_registers() {
        assert!(ensure_font().is_ok());
        assert!(ensure_font().is_ok());
    }

    #[test]
    fn test_caption_is_drawn() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let f = arena.parse("x**2").unwrap();
        let (a, b) = (arena.zero(), arena.integer(2));
        let options = PlotOptions {
            width: 600,
            height: 400,
            ..PlotOptions::default()
        };
        let png = render_plot(&arena, f, x, a, b, true, &options).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgb8();

        // The caption sits in the band above the chart.
        let dark = (0..img.height() / 20)
            .flat_map(|y| (0..img.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| img.get_pixel(x, y).0.iter().all(|&c| c < 128))
            .count();
        assert!(dark > 0);
    }
}
