#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusScale {
    max_amount: f64,
    range: [f32; 2],
    exponent: f64,
}

impl RadiusScale {
    pub fn new(max_amount: f64, range: [f32; 2], exponent: f64) -> Self {
        Self {
            max_amount: max_amount.max(0.0),
            range,
            exponent,
        }
    }

    fn normalize(&self, amount: f64) -> f64 {
        let span = self.max_amount.powf(self.exponent);
        if span <= 0.0 || !span.is_finite() {
            // Degenerate domain: every amount maps to the middle of the range.
            return 0.5;
        }

        (amount.max(0.0).powf(self.exponent) / span).clamp(0.0, 1.0)
    }

    pub fn radius(&self, amount: f64) -> f32 {
        let [min, max] = self.range;
        let t = self.normalize(amount);
        (f64::from(min) + (f64::from(max) - f64::from(min)) * t) as f32
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn square_root_scale_spacing() {
        let scale = RadiusScale::new(900.0, [2.0, 45.0], 0.5);
        let small = scale.radius(100.0);
        let medium = scale.radius(400.0);
        let large = scale.radius(900.0);

        assert!(large > medium && medium > small);
        assert_relative_eq!(large, 45.0);
        assert_relative_eq!((large - 2.0) / (small - 2.0), 3.0, epsilon = 1e-4);
        assert_relative_eq!((medium - 2.0) / (small - 2.0), 2.0, epsilon = 1e-4);
    }

    #[test]
    fn zero_domain_maps_to_midpoint() {
        let scale = RadiusScale::new(0.0, [2.0, 45.0], 0.5);
        assert_relative_eq!(scale.radius(0.0), 23.5);
    }

    proptest! {
        #[test]
        fn radius_is_monotonic_and_bounded(
            max in 1.0f64..1.0e9,
            a in 0.0f64..1.0,
            b in 0.0f64..1.0,
        ) {
            let scale = RadiusScale::new(max, [2.0, 45.0], 0.5);
            let (low, high) = if a <= b { (a * max, b * max) } else { (b * max, a * max) };
            let low_radius = scale.radius(low);
            let high_radius = scale.radius(high);

            prop_assert!(low_radius <= high_radius);
            prop_assert!((2.0..=45.0).contains(&low_radius));
            prop_assert!((2.0..=45.0).contains(&high_radius));
        }
    }
}
