//! Gauss-Kronrod Quadrature Rules
//!
//! A Kronrod rule extends an n-point Gauss rule with n+1 extra nodes. Both
//! sums share every Gauss evaluation, and their difference is the error
//! estimate of a single panel.
//!
//! Node tables list the non-negative abscissae in decreasing order, ending
//! with the center. Gauss nodes sit at the odd positions of the Kronrod
//! table; the last Gauss weight belongs to the center.
//!
//! # Available Rules
//!
//! - G7K15: 7-point Gauss, 15-point Kronrod (default)
//! - G15K31: 15-point Gauss, 31-point Kronrod

/// A Gauss-Kronrod rule on the reference interval `[-1, 1]`.
#[derive(Clone, Copy, Debug)]
pub struct GaussKronrodRule {
    nodes: &'static [f64],
    kronrod_weights: &'static [f64],
    gauss_weights: &'static [f64],
}

/// Integral estimate over one panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelEstimate {
    /// Kronrod estimate of the integral.
    pub value: f64,
    /// Absolute difference between the Kronrod and Gauss estimates.
    pub error: f64,
    /// Number of integrand evaluations.
    pub evaluations: usize,
}

impl PanelEstimate {
    /// True when both the value and the error are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.error.is_finite()
    }
}

const G7K15_NODES: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_838_258_730,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

const G7K15_KRONROD: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

const G7K15_GAUSS: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

const G15K31_NODES: [f64; 16] = [
    0.998_002_298_693_397_060_285_172_840_152_271,
    0.987_992_518_020_485_428_489_565_718_586_613,
    0.967_739_075_679_139_134_257_347_978_784_337,
    0.937_273_392_400_705_904_307_758_947_710_209,
    0.897_264_532_344_081_900_882_509_656_454_496,
    0.848_206_583_410_427_216_200_648_320_774_217,
    0.790_418_501_442_465_932_967_649_294_817_947,
    0.724_417_731_360_170_047_416_186_054_613_938,
    0.650_996_741_297_416_970_533_735_895_313_275,
    0.570_972_172_608_538_847_537_226_737_253_911,
    0.485_081_863_640_239_680_693_655_740_232_351,
    0.394_151_347_077_563_369_897_207_370_981_045,
    0.299_180_007_153_168_812_166_780_024_266_389,
    0.201_194_093_997_434_522_300_628_303_394_596,
    0.101_142_066_918_717_499_027_074_231_447_392,
    0.0,
];

const G15K31_KRONROD: [f64; 16] = [
    0.005_377_479_872_923_348_987_792_051_430_128,
    0.015_007_947_329_316_122_538_374_763_075_807,
    0.025_460_847_326_715_320_186_874_001_019_653,
    0.035_346_360_791_375_846_222_037_948_478_360,
    0.044_589_751_324_764_876_608_227_299_373_280,
    0.053_481_524_690_928_087_265_343_147_239_430,
    0.062_009_567_800_670_640_285_139_230_960_803,
    0.069_854_121_318_728_258_709_520_077_099_147,
    0.076_849_680_757_720_378_894_432_777_482_659,
    0.083_080_502_823_133_021_038_289_247_286_104,
    0.088_564_443_056_211_770_647_275_443_693_774,
    0.093_126_598_170_825_321_225_486_872_747_346,
    0.096_642_726_983_623_678_505_179_907_627_589,
    0.099_173_598_721_791_959_332_393_173_484_603,
    0.100_769_845_523_875_595_044_946_662_617_570,
    0.101_330_389_185_927_371_339_204_261_356_068,
];

const G15K31_GAUSS: [f64; 8] = [
    0.030_753_241_996_117_268_354_628_393_577_204,
    0.070_366_047_488_108_124_709_267_416_450_667,
    0.107_159_220_467_171_935_011_869_546_685_869,
    0.139_570_677_926_154_314_447_804_794_511_028,
    0.166_269_205_816_993_933_553_200_860_481_209,
    0.186_161_000_015_562_211_026_800_561_866_423,
    0.198_431_485_327_111_576_456_118_326_443_839,
    0.202_578_241_925_561_272_880_620_199_967_519,
];

impl GaussKronrodRule {
    /// The G7K15 rule (7-point Gauss, 15-point Kronrod).
    ///
    /// This is the workhorse rule of the adaptive driver.
    #[must_use]
    pub const fn g7k15() -> Self {
        Self {
            nodes: &G7K15_NODES,
            kronrod_weights: &G7K15_KRONROD,
            gauss_weights: &G7K15_GAUSS,
        }
    }

    /// The G15K31 rule (15-point Gauss, 31-point Kronrod).
    #[must_use]
    pub const fn g15k31() -> Self {
        Self {
            nodes: &G15K31_NODES,
            kronrod_weights: &G15K31_KRONROD,
            gauss_weights: &G15K31_GAUSS,
        }
    }

    /// Number of integrand evaluations per panel.
    #[must_use]
    pub const fn points(&self) -> usize {
        2 * self.nodes.len() - 1
    }

    /// Estimates the integral of `f` over `[a, b]`.
    ///
    /// Only interior points are sampled, so an integrable singularity at an
    /// endpoint does not poison the estimate.
    pub fn estimate<F: Fn(f64) -> f64>(&self, f: &F, a: f64, b: f64) -> PanelEstimate {
        let center = 0.5 * (a + b);
        let half = 0.5 * (b - a);
        let last = self.nodes.len() - 1;

        let f_center = f(center);
        let mut kronrod = self.kronrod_weights[last] * f_center;
        let mut gauss = self.gauss_weights[self.gauss_weights.len() - 1] * f_center;

        for (i, (&node, &weight)) in self.nodes[..last]
            .iter()
            .zip(self.kronrod_weights)
            .enumerate()
        {
            let dx = half * node;
            let pair = f(center - dx) + f(center + dx);
            kronrod += weight * pair;
            if i % 2 == 1 {
                gauss += self.gauss_weights[i / 2] * pair;
            }
        }

        PanelEstimate {
            value: kronrod * half,
            error: ((kronrod - gauss) * half).abs(),
            evaluations: self.points(),
        }
    }
}

impl Default for GaussKronrodRule {
    fn default() -> Self {
        Self::g7k15()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{E, PI};

    #[test]
    fn test_weights_sum_to_interval_length() {
        for rule in [GaussKronrodRule::g7k15(), GaussKronrodRule::g15k31()] {
            let one = rule.estimate(&|_| 1.0, -1.0, 1.0);
            assert!((one.value - 2.0).abs() < 1e-14);
            assert!(one.error < 1e-14);
        }
    }

    #[test]
    fn test_points() {
        assert_eq!(GaussKronrodRule::g7k15().points(), 15);
        assert_eq!(GaussKronrodRule::g15k31().points(), 31);
    }

    #[test]
    fn test_polynomial_is_exact() {
        // ∫₀¹ x⁵ dx = 1/6, well within the Gauss degree of exactness
        let r = GaussKronrodRule::g7k15().estimate(&|x: f64| x.powi(5), 0.0, 1.0);
        assert!((r.value - 1.0 / 6.0).abs() < 1e-14);
        assert!(r.error < 1e-14);
    }

    #[test]
    fn test_sine() {
        let r = GaussKronrodRule::g7k15().estimate(&f64::sin, 0.0, PI);
        assert!((r.value - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_exponential() {
        let r = GaussKronrodRule::g15k31().estimate(&f64::exp, 0.0, 1.0);
        assert!((r.value - (E - 1.0)).abs() < 1e-14);
    }

    #[test]
    fn test_error_estimate_flags_rough_integrand() {
        let smooth = GaussKronrodRule::g7k15().estimate(&|x: f64| x * x, 0.0, 1.0);
        let rough = GaussKronrodRule::g7k15().estimate(&|x: f64| x.abs().sqrt(), -1.0, 1.0);
        assert!(rough.error > smooth.error);
    }

    #[test]
    fn test_pole_at_center_is_not_finite() {
        let r = GaussKronrodRule::g7k15().estimate(&|x: f64| 1.0 / (x * x), -1.0, 1.0);
        assert!(!r.is_finite());
    }
}
