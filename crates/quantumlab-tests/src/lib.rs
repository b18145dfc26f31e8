//! Statistical verification battery for simulated outcome frequencies.
//!
//! A simulation is only useful if its empirical frequencies converge to the
//! probabilities it claims. The tests here take plain counts and boolean trial
//! sequences, so they work with any sampler. Each returns a [`TestResult`]
//! with a p-value (where applicable), a pass/fail determination, and a letter
//! grade (A through F).

use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::erf::erfc;

/// Significance threshold used by every test in the battery.
pub const DEFAULT_THRESHOLD: f64 = 0.01;

/// Result of a single verification test.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Pass when the p-value is at or above `threshold`.
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        p.is_some_and(|p| p >= threshold)
    }

    fn from_p(name: &str, p: f64, statistic: f64, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed: Self::pass_from_p(Some(p), DEFAULT_THRESHOLD),
            p_value: Some(p),
            statistic,
            details,
            grade: Self::grade_from_p(Some(p)),
        }
    }

    fn failed(name: &str, details: String) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            p_value: None,
            statistic: 0.0,
            details,
            grade: 'F',
        }
    }
}

/// Two-sided p-value of a standard normal deviate.
fn two_sided(z: f64) -> f64 {
    erfc(z.abs() / std::f64::consts::SQRT_2)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Convergence
// ═══════════════════════════════════════════════════════════════════════════════

/// Does `successes / trials` agree with `expected`? Normal approximation to
/// the binomial, two-sided.
///
/// `expected` of exactly 0 or 1 is a certainty: any contrary trial fails.
pub fn proportion_test(successes: u64, trials: u64, expected: f64) -> TestResult {
    let name = "Proportion";
    if trials == 0 {
        return TestResult::failed(name, "No trials recorded".to_string());
    }
    if !(0.0..=1.0).contains(&expected) {
        return TestResult::failed(name, format!("Expected probability {expected} out of range"));
    }
    let observed = successes as f64 / trials as f64;

    if expected == 0.0 || expected == 1.0 {
        let contrary = if expected == 0.0 {
            successes
        } else {
            trials - successes
        };
        let p = if contrary == 0 { 1.0 } else { 0.0 };
        return TestResult::from_p(
            name,
            p,
            contrary as f64,
            format!("certain outcome, {contrary} contrary of {trials}"),
        );
    }

    let se = (expected * (1.0 - expected) / trials as f64).sqrt();
    let z = (observed - expected) / se;
    TestResult::from_p(
        name,
        two_sided(z),
        z,
        format!("observed={observed:.5}, expected={expected:.5}, n={trials}"),
    )
}

/// Chi-squared goodness of fit of category counts against probabilities.
///
/// Categories with zero expected probability must stay empty.
pub fn goodness_of_fit(observed: &[u64], expected_probs: &[f64]) -> TestResult {
    let name = "Goodness of Fit";
    if observed.len() != expected_probs.len() {
        return TestResult::failed(
            name,
            format!(
                "{} categories observed, {} expected",
                observed.len(),
                expected_probs.len()
            ),
        );
    }
    let n: u64 = observed.iter().sum();
    if n == 0 {
        return TestResult::failed(name, "No trials recorded".to_string());
    }

    let mut chi2 = 0.0;
    let mut live = 0usize;
    let mut sparse = 0usize;
    for (&o, &p) in observed.iter().zip(expected_probs) {
        if p <= 0.0 {
            if o > 0 {
                return TestResult::from_p(
                    name,
                    0.0,
                    f64::INFINITY,
                    format!("{o} trials in an impossible category"),
                );
            }
            continue;
        }
        let e = p * n as f64;
        if e < 5.0 {
            sparse += 1;
        }
        chi2 += (o as f64 - e).powi(2) / e;
        live += 1;
    }

    if live < 2 {
        // Only one possible category and every trial landed in it.
        return TestResult::from_p(name, 1.0, 0.0, format!("single category, n={n}"));
    }
    let df = (live - 1) as f64;
    let p = match ChiSquared::new(df) {
        Ok(dist) => dist.sf(chi2),
        Err(e) => return TestResult::failed(name, format!("chi-squared({df}): {e}")),
    };
    let mut details = format!("chi2={chi2:.3}, df={df}, n={n}");
    if sparse > 0 {
        details.push_str(&format!(", {sparse} categories expect < 5"));
    }
    TestResult::from_p(name, p, chi2, details)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Independence
// ═══════════════════════════════════════════════════════════════════════════════

/// Wald-Wolfowitz runs test: are successive trials independent?
///
/// Works for any success rate, not just 1/2.
pub fn runs_test(sequence: &[bool]) -> TestResult {
    let name = "Runs Test";
    let n = sequence.len();
    if n < 20 {
        return TestResult::failed(name, format!("Insufficient data: need 20, got {n}"));
    }
    let n1 = sequence.iter().filter(|&&b| b).count() as f64;
    let n0 = n as f64 - n1;
    if n1 == 0.0 || n0 == 0.0 {
        return TestResult::failed(name, "Zero variance: every trial identical".to_string());
    }

    let runs = 1 + sequence.windows(2).filter(|w| w[0] != w[1]).count();
    let nf = n as f64;
    let mean = 2.0 * n1 * n0 / nf + 1.0;
    let var = 2.0 * n1 * n0 * (2.0 * n1 * n0 - nf) / (nf * nf * (nf - 1.0));
    if var < 1e-12 {
        return TestResult::failed(name, "Zero variance".to_string());
    }
    let z = (runs as f64 - mean) / var.sqrt();
    TestResult::from_p(
        name,
        two_sided(z),
        z,
        format!("runs={runs}, expected={mean:.1}"),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// Invariants
// ═══════════════════════════════════════════════════════════════════════════════

/// A law that must hold on every trial (e.g. equal-basis anti-correlation).
/// There is no tolerance: one violation fails.
pub fn exact_invariant(name: &str, violations: u64, trials: u64) -> TestResult {
    if trials == 0 {
        return TestResult::failed(name, "No trials recorded".to_string());
    }
    let passed = violations == 0;
    TestResult {
        name: name.to_string(),
        passed,
        p_value: None,
        statistic: violations as f64,
        details: format!("{violations} violations in {trials} trials"),
        grade: if passed { 'A' } else { 'F' },
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Probabilities this close to 0 or 1 are treated as certain by
/// [`run_battery`]; amplitude sums rarely land on exactly 0 or 1.
pub const CERTAINTY_TOLERANCE: f64 = 1e-9;

/// Run the battery over a boolean trial sequence (`true` = primary outcome)
/// whose primary outcome should occur with probability `expected`.
///
/// The runs test is skipped for certain outcomes, where it has no variance.
pub fn run_battery(sequence: &[bool], expected: f64) -> Vec<TestResult> {
    let expected = if expected.abs() < CERTAINTY_TOLERANCE {
        0.0
    } else if (1.0 - expected).abs() < CERTAINTY_TOLERANCE {
        1.0
    } else {
        expected
    };
    let successes = sequence.iter().filter(|&&b| b).count() as u64;
    let trials = sequence.len() as u64;
    let mut results = vec![
        proportion_test(successes, trials, expected),
        goodness_of_fit(&[successes, trials - successes], &[expected, 1.0 - expected]),
    ];
    if expected > 0.0 && expected < 1.0 {
        results.push(runs_test(sequence));
    }
    results
}

fn grade_score(grade: char) -> f64 {
    match grade {
        'A' => 100.0,
        'B' => 75.0,
        'C' => 50.0,
        'D' => 25.0,
        _ => 0.0,
    }
}

/// Overall quality score (0-100): the mean of per-test grade scores
/// (A=100, B=75, C=50, D=25, F=0).
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| grade_score(r.grade)).sum::<f64>() / results.len() as f64
}
