//! Two-path interference setups built on [`PathAmplitudeModel`].

use serde::{Deserialize, Serialize};

use crate::amplitude::PathAmplitudeModel;
use crate::error::{Result, check_probability};
use crate::path::{Medium, Path};
use crate::random::RandomSource;
use crate::sampler::StochasticOutcomeSampler;

/// Chain a fallible path step onto a path that may already be blocked.
fn then(
    path: Option<Path>,
    step: impl FnOnce(Path) -> Result<Option<Path>>,
) -> Result<Option<Path>> {
    Ok(path.map(step).transpose()?.flatten())
}

/// Where a photon ends up in a Mach-Zehnder interferometer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Port {
    /// The detector that lights up when both arms are equal.
    Bright,
    /// The detector that stays dark when both arms are equal.
    Dark,
    /// Stopped by a blocker in one of the arms.
    Absorbed,
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bright => write!(f, "bright"),
            Self::Dark => write!(f, "dark"),
            Self::Absorbed => write!(f, "absorbed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortProbabilities {
    pub bright: f64,
    pub dark: f64,
    pub absorbed: f64,
}

/// Mach-Zehnder interferometer with two identical beam splitters.
///
/// Upper arm: reflected at the first splitter. Lower arm: transmitted.
/// Reflections from the air side of a splitter and off the mirrors turn the
/// clock by π; the second splitter's reflection toward the dark port happens
/// from the glass side and adds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MachZehnder {
    pub reflectance: f64,
    pub upper_length: f64,
    pub lower_length: f64,
    pub upper_open: bool,
    pub lower_open: bool,
}

impl Default for MachZehnder {
    fn default() -> Self {
        Self {
            reflectance: 0.5,
            upper_length: 1.0,
            lower_length: 1.0,
            upper_open: true,
            lower_open: true,
        }
    }
}

impl MachZehnder {
    pub fn balanced(arm_length: f64) -> Self {
        Self {
            upper_length: arm_length,
            lower_length: arm_length,
            ..Self::default()
        }
    }

    /// Path sets reaching the bright and dark ports. Blocked arms are left out.
    pub fn port_paths(&self) -> Result<(Vec<Path>, Vec<Path>)> {
        let r = check_probability(self.reflectance)?;
        let t = 1.0 - r;

        let upper = if self.upper_open {
            let p = Path::new(self.upper_length).reflect(r, Medium::AIR, Medium::GLASS)?;
            then(p, |p| p.reflect(1.0, Medium::AIR, Medium::MIRROR))?
        } else {
            None
        };
        let lower = if self.lower_open {
            let p = Path::new(self.lower_length).transmit(t)?;
            then(p, |p| p.reflect(1.0, Medium::AIR, Medium::MIRROR))?
        } else {
            None
        };

        let mut bright = Vec::with_capacity(2);
        let mut dark = Vec::with_capacity(2);
        bright.extend(then(upper, |p| p.transmit(t))?);
        bright.extend(then(lower, |p| p.reflect(r, Medium::AIR, Medium::GLASS))?);
        dark.extend(then(upper, |p| p.reflect(r, Medium::GLASS, Medium::AIR))?);
        dark.extend(then(lower, |p| p.transmit(t))?);
        Ok((bright, dark))
    }

    pub fn probabilities(
        &self,
        model: &PathAmplitudeModel,
        frequency_constant: f64,
    ) -> Result<PortProbabilities> {
        let (bright_paths, dark_paths) = self.port_paths()?;
        let bright = model.detection_probability(&bright_paths, frequency_constant);
        let dark = model.detection_probability(&dark_paths, frequency_constant);
        // Rounding can push the sum a hair past 1 when nothing is blocked.
        let absorbed = (1.0 - bright - dark).max(0.0);
        Ok(PortProbabilities {
            bright,
            dark,
            absorbed,
        })
    }

    /// Send one photon through. One draw.
    pub fn fire<R: RandomSource + ?Sized>(
        &self,
        model: &PathAmplitudeModel,
        frequency_constant: f64,
        sampler: &StochasticOutcomeSampler,
        rng: &mut R,
    ) -> Result<Port> {
        let p = self.probabilities(model, frequency_constant)?;
        sampler.sample_weighted(
            &[
                (Port::Bright, p.bright),
                (Port::Dark, p.dark),
                (Port::Absorbed, p.absorbed),
            ],
            rng,
        )
    }
}

/// Partial reflection from a sheet of glass.
///
/// Front surface: reflection from air onto glass, π. Back surface: reflection
/// from inside the glass toward air, no offset, after an extra `2·thickness`
/// of travel in glass. Surface transmission losses are neglected, so the
/// probability swings between 0 and `4·surface_reflectance`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThinGlass {
    pub thickness: f64,
    pub refractive_index: f64,
    pub surface_reflectance: f64,
}

impl Default for ThinGlass {
    fn default() -> Self {
        Self {
            thickness: 0.0,
            refractive_index: Medium::GLASS.refractive_index,
            surface_reflectance: 0.04,
        }
    }
}

impl ThinGlass {
    pub fn with_thickness(thickness: f64) -> Self {
        Self {
            thickness,
            ..Self::default()
        }
    }

    pub fn reflection_paths(&self) -> Result<Vec<Path>> {
        let glass = Medium::new(self.refractive_index);
        let r = self.surface_reflectance;
        let front = Path::new(0.0).reflect(r, Medium::AIR, glass)?;
        let back = Path::new(0.0)
            .travel(2.0 * self.thickness, glass)
            .reflect(r, glass, Medium::AIR)?;
        Ok(front.into_iter().chain(back).collect())
    }

    pub fn reflection_probability(
        &self,
        model: &PathAmplitudeModel,
        frequency_constant: f64,
    ) -> Result<f64> {
        let paths = self.reflection_paths()?;
        Ok(model.detection_probability(&paths, frequency_constant))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::check_junction;
    use crate::random::SeededRandom;
    use crate::statistics::StatisticsAggregator;
    use std::f64::consts::PI;

    #[test]
    fn test_balanced_all_bright() {
        let model = PathAmplitudeModel::default();
        let p = MachZehnder::balanced(3.3).probabilities(&model, 1.0).unwrap();
        assert!((p.bright - 1.0).abs() < 1e-12);
        assert!(p.dark < 1e-20);
        assert!(p.absorbed < 1e-12);
    }

    #[test]
    fn test_half_wave_shift_swaps_ports() {
        let model = PathAmplitudeModel::default();
        let mz = MachZehnder {
            lower_length: 1.5,
            ..MachZehnder::default()
        };
        let p = mz.probabilities(&model, 1.0).unwrap();
        assert!(p.bright < 1e-20);
        assert!((p.dark - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ports_conserve_probability_for_any_splitter() {
        let model = PathAmplitudeModel::new(0.8);
        for r in [0.0, 0.1, 0.3, 0.5, 0.77, 1.0] {
            for dl in [0.0, 0.13, 0.4, 1.1] {
                let mz = MachZehnder {
                    reflectance: r,
                    lower_length: 1.0 + dl,
                    ..MachZehnder::default()
                };
                let p = mz.probabilities(&model, 1.0).unwrap();
                assert!((p.bright + p.dark - 1.0).abs() < 1e-9, "r={r} dl={dl}");
                assert!(p.absorbed < 1e-9);
            }
        }
    }

    #[test]
    fn test_single_arm_is_classical() {
        let model = PathAmplitudeModel::default();
        let mz = MachZehnder {
            upper_open: false,
            ..MachZehnder::default()
        };
        let p = mz.probabilities(&model, 1.0).unwrap();
        assert!((p.bright - 0.25).abs() < 1e-12);
        assert!((p.dark - 0.25).abs() < 1e-12);
        assert!((p.absorbed - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_first_splitter_is_unitary() {
        let upper = Path::new(0.0)
            .reflect(0.3, Medium::AIR, Medium::GLASS)
            .unwrap()
            .unwrap();
        let lower = Path::new(0.0).transmit(0.7).unwrap().unwrap();
        assert!(check_junction(&[upper, lower]).is_ok());
    }

    #[test]
    fn test_fire_frequencies() {
        let model = PathAmplitudeModel::default();
        let sampler = StochasticOutcomeSampler::new();
        let mut rng = SeededRandom::from_seed(1887);
        let mz = MachZehnder {
            lower_open: false,
            ..MachZehnder::default()
        };
        let mut stats = StatisticsAggregator::new();
        for _ in 0..40_000 {
            stats.record(mz.fire(&model, 1.0, &sampler, &mut rng).unwrap());
        }
        assert!((stats.frequency(Port::Absorbed).unwrap() - 0.5).abs() < 0.01);
        assert!((stats.frequency(Port::Bright).unwrap() - 0.25).abs() < 0.01);
    }

    #[test]
    fn test_balanced_never_fires_dark() {
        let model = PathAmplitudeModel::default();
        let sampler = StochasticOutcomeSampler::new();
        let mut rng = SeededRandom::from_seed(3);
        let mz = MachZehnder::balanced(2.0);
        for _ in 0..5_000 {
            assert_eq!(mz.fire(&model, 1.0, &sampler, &mut rng).unwrap(), Port::Bright);
        }
    }

    #[test]
    fn test_default_interferometer_fires() {
        let model = PathAmplitudeModel::default();
        let sampler = StochasticOutcomeSampler::new();
        let mut rng = SeededRandom::from_seed(1);
        let mz = MachZehnder::default();
        let p = mz.probabilities(&model, 1.0).unwrap();
        assert_eq!(p.bright, 1.0);
        for _ in 0..100 {
            assert_eq!(mz.fire(&model, 1.0, &sampler, &mut rng).unwrap(), Port::Bright);
        }
    }

    #[test]
    fn test_balanced_ports_stay_in_unit_interval() {
        let model = PathAmplitudeModel::default();
        let sampler = StochasticOutcomeSampler::new();
        let mut rng = SeededRandom::from_seed(2);
        for len in [0.0, 0.25, 1.0, 2.0, 3.3, 7.0] {
            let mz = MachZehnder::balanced(len);
            let p = mz.probabilities(&model, 1.0).unwrap();
            for v in [p.bright, p.dark, p.absorbed] {
                assert!((0.0..=1.0).contains(&v), "len={len}: {v:e}");
            }
            assert!(mz.fire(&model, 1.0, &sampler, &mut rng).is_ok(), "len={len}");
        }
    }

    #[test]
    fn test_invalid_reflectance() {
        let mz = MachZehnder {
            reflectance: 1.5,
            ..MachZehnder::default()
        };
        assert!(mz.port_paths().is_err());
    }

    #[test]
    fn test_thin_glass_oscillates() {
        let model = PathAmplitudeModel::default();
        let n = Medium::GLASS.refractive_index;
        let mut max: f64 = 0.0;
        let mut min: f64 = 1.0;
        for i in 0..400 {
            let glass = ThinGlass::with_thickness(i as f64 * 0.005);
            let p = glass.reflection_probability(&model, 1.0).unwrap();
            // Closed form: 4R·sin²(φ/2), φ = 2π·2·t·n.
            let phi = 2.0 * PI * 2.0 * glass.thickness * n;
            let expected = 4.0 * 0.04 * (phi / 2.0).sin().powi(2);
            assert!((p - expected).abs() < 1e-12);
            max = max.max(p);
            min = min.min(p);
        }
        assert!(min < 1e-6);
        assert!(max > 0.159 && max <= 0.16 + 1e-12);
    }

    #[test]
    fn test_zero_thickness_cancels() {
        let model = PathAmplitudeModel::default();
        let p = ThinGlass::default().reflection_probability(&model, 1.0).unwrap();
        assert!(p < 1e-20);
    }
}
