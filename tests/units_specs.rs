extern crate ndarray;
extern crate rand;
extern crate strata;

#[cfg(test)]
mod units_specs {
    use ndarray::{arr1, Array1};
    use rand::{SeedableRng, StdRng};
    use strata::error::{ConfigError, Error};
    use strata::units::UnitType;

    fn rng() -> StdRng {
        StdRng::from_seed(&[7usize, 0][..])
    }

    #[test]
    fn binary_probabilities_are_sigmoid() {
        let mut x = arr1(&[0f64, 100f64, -100f64]);
        UnitType::Binary.probabilities(x.view_mut()).unwrap();
        assert_eq!(0.5f64, x[0]);
        assert!(x[1] > 0.999f64 && x[1] <= 1f64);
        assert!(x[2] < 0.001f64 && x[2] >= 0f64);
    }

    #[test]
    fn binary_samples_are_zero_or_one() {
        let probabilities = arr1(&[0f64, 1f64, 0.5f64, 0.5f64]);
        let mut samples = arr1(&[0.3f64; 4]);
        UnitType::Binary.sample(probabilities.view(), samples.view_mut(), &mut rng()).unwrap();
        assert_eq!(0f64, samples[0]);
        assert_eq!(1f64, samples[1]);
        assert!(samples.iter().all(|&s| s == 0f64 || s == 1f64));
    }

    #[test]
    fn relu_variants_are_capped() {
        let input = arr1(&[-2f64, 0.5f64, 3f64, 10f64]);

        let mut relu = input.clone();
        UnitType::ReLU.probabilities(relu.view_mut()).unwrap();
        assert_eq!(arr1(&[0f64, 0.5f64, 3f64, 10f64]), relu);

        let mut relu1 = input.clone();
        UnitType::ReLU1.probabilities(relu1.view_mut()).unwrap();
        assert_eq!(arr1(&[0f64, 0.5f64, 1f64, 1f64]), relu1);

        let mut relu6 = input.clone();
        UnitType::ReLU6.probabilities(relu6.view_mut()).unwrap();
        assert_eq!(arr1(&[0f64, 0.5f64, 3f64, 6f64]), relu6);

        let mut samples: Array1<f64> = Array1::zeros(4);
        UnitType::ReLU6.sample(relu6.view(), samples.view_mut(), &mut rng()).unwrap();
        assert!(samples.iter().all(|&s| s >= 0f64 && s <= 6f64));
    }

    #[test]
    fn gaussian_mean_is_the_input() {
        let mut x = arr1(&[-1.5f64, 0f64, 2.25f64]);
        UnitType::Gaussian.probabilities(x.view_mut()).unwrap();
        assert_eq!(arr1(&[-1.5f64, 0f64, 2.25f64]), x);

        let mut samples: Array1<f64> = Array1::zeros(3);
        UnitType::Gaussian.sample(x.view(), samples.view_mut(), &mut rng()).unwrap();
        assert!(samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn softmax_is_a_distribution() {
        let mut x = arr1(&[1f64, 3f64, 2f64]);
        UnitType::Softmax.probabilities(x.view_mut()).unwrap();
        assert!((x.sum() - 1f64).abs() < 1e-12);

        let mut samples: Array1<f64> = Array1::zeros(3);
        UnitType::Softmax.sample(x.view(), samples.view_mut(), &mut rng()).unwrap();
        assert_eq!(arr1(&[0f64, 1f64, 0f64]), samples);
    }

    #[test]
    fn non_finite_values_are_fatal() {
        let mut x = arr1(&[0f64, ::std::f64::NAN]);
        match UnitType::Binary.probabilities(x.view_mut()) {
            Err(Error::Numerical(err)) => assert_eq!(1, err.index),
            other => panic!("expected a numerical error, got {:?}", other),
        }

        let mut y = arr1(&[::std::f64::INFINITY]);
        assert!(UnitType::ReLU.probabilities(y.view_mut()).is_err());
    }

    #[test]
    fn samples_need_one_slot_per_unit() {
        let probabilities = arr1(&[0.5f64, 0.5f64]);
        let mut samples: Array1<f64> = Array1::zeros(3);
        match UnitType::Binary.sample(probabilities.view(), samples.view_mut(), &mut rng()) {
            Err(Error::Config(ConfigError::LengthMismatch { expected: 2, actual: 3, .. })) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unit_support() {
        assert!(!UnitType::Softmax.supports_visible());
        assert!(!UnitType::Gaussian.supports_hidden());
        assert!(UnitType::ReLU1.is_relu());
        assert!(!UnitType::Binary.is_relu());
    }
}
