//! Distance estimation from RSSI.
//!
//! Uses the log-distance path loss model with free-space constants. The
//! result is a rough indication only; real environments attenuate very
//! differently from free space.

/// Calibrated signal strength at one meter, in dBm.
const REFERENCE_POWER_DBM: f64 = -59.0;

/// Free-space path loss exponent.
const PATH_LOSS_EXPONENT: f64 = 2.0;

/// Lower bound on the estimate, in meters. Strong or noisy readings can
/// otherwise produce near-zero artifacts.
const MIN_DISTANCE_M: f64 = 0.1;

/// Estimate the distance to a transmitter from its RSSI reading.
///
/// `distance = 10^((reference_power - rssi) / (10 * path_loss_exponent))`
///
/// An RSSI of exactly 0 means "no reading available" and yields 0.0 rather
/// than a finite but misleading distance. All other inputs produce a value
/// of at least 0.1 meters.
///
/// # Example
///
/// ```
/// use blesniff_core::distance::estimate_distance;
///
/// // The calibration point: -59 dBm is one meter away.
/// assert!((estimate_distance(-59) - 1.0).abs() < 1e-9);
/// assert_eq!(estimate_distance(0), 0.0);
/// ```
pub fn estimate_distance(rssi: i16) -> f64 {
    if rssi == 0 {
        return 0.0;
    }
    let distance = 10f64.powf((REFERENCE_POWER_DBM - f64::from(rssi)) / (10.0 * PATH_LOSS_EXPONENT));
    distance.max(MIN_DISTANCE_M)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_point() {
        // -59 dBm is the calibrated signal strength at one meter.
        assert!((estimate_distance(-59) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_reading_yields_zero() {
        assert_eq!(estimate_distance(0), 0.0);
    }

    #[test]
    fn test_minimum_floor() {
        // Strong signals would otherwise map below 0.1m.
        assert_eq!(estimate_distance(-20), 0.1);
        assert_eq!(estimate_distance(30), 0.1);
        assert_eq!(estimate_distance(i16::MAX), 0.1);
    }

    #[test]
    fn test_weak_signal_far_away() {
        // -99 dBm -> 10^(40/20) = 100 meters.
        assert!((estimate_distance(-99) - 100.0).abs() < 1e-9);
        assert!(estimate_distance(i16::MIN) > estimate_distance(-99));
    }

    #[test]
    fn test_always_at_least_floor() {
        for rssi in (-120..=120).filter(|r| *r != 0) {
            assert!(
                estimate_distance(rssi) >= MIN_DISTANCE_M,
                "estimate for {} dBm below floor",
                rssi
            );
        }
    }

    #[test]
    fn test_monotonically_non_increasing() {
        // Stronger signal means closer; skip 0, which is "no reading".
        let mut previous = f64::INFINITY;
        for rssi in (-120..=120).filter(|r| *r != 0) {
            let estimate = estimate_distance(rssi);
            assert!(
                estimate <= previous,
                "estimate increased between {} and {} dBm",
                rssi - 1,
                rssi
            );
            previous = estimate;
        }
    }
}
