//! Built-in example inputs.

use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// A ready-to-submit example.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamplePreset {
    /// Function text.
    pub function: String,
    /// Lower bound text.
    pub lower: String,
    /// Upper bound text.
    pub upper: String,
    /// Whether the example computes the area.
    pub compute_area: bool,
    /// Whether the example computes the volume.
    pub compute_volume: bool,
}

/// `(name, function, lower, upper, area, volume)`
const PRESETS: [(&str, &str, &str, &str, bool, bool); 4] = [
    ("parabola", "x**2", "0", "2", true, false),
    ("sine", "sin(x)", "0", "pi", true, false),
    ("exponential", "exp(x)", "0", "1", true, false),
    ("cubic", "x**3", "-1", "1", true, true),
];

/// Names of the built-in examples.
pub fn example_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.0)
}

/// Looks up a built-in example by name.
///
/// # Errors
///
/// `UnknownExample` when no preset has this name.
pub fn load_example(name: &str) -> Result<ExamplePreset, CalcError> {
    PRESETS
        .iter()
        .find(|p| p.0 == name)
        .map(|&(_, function, lower, upper, compute_area, compute_volume)| ExamplePreset {
            function: function.to_owned(),
            lower: lower.to_owned(),
            upper: upper.to_owned(),
            compute_area,
            compute_volume,
        })
        .ok_or_else(|| CalcError::UnknownExample(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parabola() {
        let p = load_example("parabola").unwrap();
        assert_eq!(p.function, "x**2");
        assert_eq!((p.lower.as_str(), p.upper.as_str()), ("0", "2"));
        assert!(p.compute_area);
        assert!(!p.compute_volume);
    }

    #[test]
    fn test_catalog() {
        let names: Vec<_> = example_names().collect();
        assert_eq!(names, ["parabola", "sine", "exponential", "cubic"]);
        assert!(load_example("cubic").unwrap().compute_volume);
    }

    #[test]
    fn test_unknown() {
        let err = load_example("hyperbola").unwrap_err();
        assert_eq!(err.to_string(), "example not found: hyperbola");
    }
}
