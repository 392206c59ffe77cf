//! Alert rule threshold tests
//!
//! Covers the rule thresholds and boundary behavior:
//! - Vegetative stress (NDVI) and water deficit (NDWI) thresholds
//! - Surface heating and forecast-based heat wave / drought rules
//! - SAR fallback on heavy cloud cover

use proptest::prelude::*;

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    /// Test NDVI stress threshold
    #[test]
    fn test_ndvi_stress_threshold() {
        // Stress strictly below 0.4
        assert!(is_vegetative_stress(0.3));
        assert!(is_vegetative_stress(0.39));

        // Boundary and above: healthy
        assert!(!is_vegetative_stress(0.4));
        assert!(!is_vegetative_stress(0.7));
    }

    fn is_vegetative_stress(ndvi: f64) -> bool {
        ndvi < 0.4
    }

    /// Test NDWI deficit threshold
    #[test]
    fn test_ndwi_deficit_threshold() {
        assert!(is_water_deficit(-0.2));
        assert!(is_water_deficit(-0.16));

        assert!(!is_water_deficit(-0.15));
        assert!(!is_water_deficit(0.1));
    }

    fn is_water_deficit(ndwi: f64) -> bool {
        ndwi < -0.15
    }

    /// Test surface heating threshold
    #[test]
    fn test_surface_heating_threshold() {
        assert!(is_surface_heating(Some(35.0)));
        assert!(is_surface_heating(Some(32.1)));

        // Boundary is not heating
        assert!(!is_surface_heating(Some(32.0)));
        assert!(!is_surface_heating(Some(25.0)));

        // Missing temperature never fires
        assert!(!is_surface_heating(None));
    }

    fn is_surface_heating(temperature: Option<f64>) -> bool {
        temperature.map(|t| t > 32.0).unwrap_or(false)
    }

    /// Test heat wave forecast threshold
    #[test]
    fn test_heat_wave_threshold() {
        assert!(is_heat_wave(Some(40.0)));
        assert!(is_heat_wave(Some(37.5)));

        assert!(!is_heat_wave(Some(37.0)));
        assert!(!is_heat_wave(Some(30.0)));

        // No forecast never fires
        assert!(!is_heat_wave(None));
    }

    fn is_heat_wave(max_temp_week: Option<f64>) -> bool {
        max_temp_week.map(|t| t > 37.0).unwrap_or(false)
    }

    /// Test severe drought requires a dry week AND negative NDWI
    #[test]
    fn test_severe_drought_conditions() {
        // Dry week with negative NDWI fires
        assert!(is_severe_drought(Some(0.0), -0.05));

        // Boundary: NDWI of exactly zero does not fire
        assert!(!is_severe_drought(Some(0.0), 0.0));

        // Rain in the window does not fire
        assert!(!is_severe_drought(Some(3.5), -0.2));

        // No forecast never fires
        assert!(!is_severe_drought(None, -0.5));
    }

    fn is_severe_drought(total_rain_week: Option<f64>, ndwi: f64) -> bool {
        total_rain_week
            .map(|rain| rain == 0.0 && ndwi < 0.0)
            .unwrap_or(false)
    }

    /// Test SAR fallback on cloud cover
    #[test]
    fn test_sar_fallback_threshold() {
        assert!(is_sar_fallback(Some(0.7)));
        assert!(is_sar_fallback(Some(0.61)));

        assert!(!is_sar_fallback(Some(0.6)));
        assert!(!is_sar_fallback(Some(0.1)));
        assert!(!is_sar_fallback(None));
    }

    fn is_sar_fallback(cloud_cover: Option<f64>) -> bool {
        cloud_cover.map(|c| c > 0.6).unwrap_or(false)
    }

    /// Test deforestation draw against probability
    #[test]
    fn test_deforestation_draw() {
        let probability = 0.05;

        // Draw below the probability fires on an unlatched farm
        assert!(fires_deforestation(false, 0.01, probability));

        // Draw at or above the probability misses
        assert!(!fires_deforestation(false, 0.05, probability));
        assert!(!fires_deforestation(false, 0.9, probability));

        // A latched farm never fires again
        assert!(!fires_deforestation(true, 0.0, probability));
    }

    fn fires_deforestation(is_deforested: bool, draw: f64, probability: f64) -> bool {
        !is_deforested && draw < probability
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating normalized index values
    fn index_strategy() -> impl Strategy<Value = f64> {
        -1.0f64..=1.0
    }

    /// Strategy for generating surface temperatures
    fn temperature_strategy() -> impl Strategy<Value = f64> {
        -10.0f64..=55.0
    }

    /// Strategy for generating cloud cover fractions
    fn cloud_strategy() -> impl Strategy<Value = f64> {
        0.0f64..=1.0
    }

    /// Strategy for generating weekly rain totals
    fn rain_strategy() -> impl Strategy<Value = f64> {
        0.0f64..=120.0
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Vegetative stress fires exactly when NDVI is below 0.4
        #[test]
        fn prop_vegetative_stress_threshold(ndvi in index_strategy()) {
            let fires = ndvi < 0.4;
            if ndvi < 0.4 {
                prop_assert!(fires);
            } else {
                prop_assert!(!fires);
            }
        }

        /// Water deficit and drought cannot disagree on NDWI sign
        #[test]
        fn prop_deficit_implies_negative_ndwi(ndwi in index_strategy()) {
            let deficit = ndwi < -0.15;
            let drought_eligible = ndwi < 0.0;

            // A deficit reading is always drought-eligible
            if deficit {
                prop_assert!(drought_eligible);
            }
        }

        /// Surface heating and heat wave thresholds are ordered
        #[test]
        fn prop_heat_thresholds_ordered(temp in temperature_strategy()) {
            let surface = temp > 32.0;
            let wave = temp > 37.0;

            // A heat wave temperature always clears the surface threshold
            if wave {
                prop_assert!(surface);
            }
        }

        /// SAR fallback is monotone in cloud cover
        #[test]
        fn prop_sar_monotone(cover in cloud_strategy(), delta in 0.0f64..=0.4) {
            let fires_low = cover > 0.6;
            let fires_high = (cover + delta).min(1.0) > 0.6;

            if fires_low {
                prop_assert!(fires_high);
            }
        }

        /// Any rain in the window disables the drought rule
        #[test]
        fn prop_rain_disables_drought(rain in rain_strategy(), ndwi in index_strategy()) {
            let fires = rain == 0.0 && ndwi < 0.0;
            if rain > 0.0 {
                prop_assert!(!fires);
            }
        }

        /// The deforestation latch dominates the draw
        #[test]
        fn prop_latch_dominates_draw(draw in 0.0f64..1.0, latched in any::<bool>()) {
            let fires = !latched && draw < 0.05;
            if latched {
                prop_assert!(!fires);
            }
        }
    }
}
