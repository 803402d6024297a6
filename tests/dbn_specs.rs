extern crate ndarray;
extern crate strata;

#[cfg(test)]
mod dbn_specs {
    use ndarray::{arr1, Array1, Array2};
    use strata::dbn::{Dbn, DbnConfig, GibbsVisible};
    use strata::error::{ConfigError, Error};
    use strata::rbm::RbmConfig;
    use strata::solvers::TrainerKind;
    use strata::watcher::WatcherKind;

    fn labelled_config(num_labels: usize) -> DbnConfig {
        let mut layers = vec![RbmConfig::new(6, 4), RbmConfig::new(4 + num_labels, 8)];
        for layer in &mut layers {
            layer.batch_size = 2;
            layer.learning_rate = Some(0.1);
        }
        DbnConfig {
            watcher: WatcherKind::Silent,
            seed: Some(31),
            ..DbnConfig::new(layers)
        }
    }

    fn data() -> (Vec<Vec<f64>>, Vec<usize>) {
        let data = vec![vec![1f64, 1f64, 0f64, 0f64, 0f64, 0f64],
                        vec![0f64, 0f64, 1f64, 1f64, 0f64, 0f64],
                        vec![0f64, 0f64, 0f64, 0f64, 1f64, 1f64]];
        (data, vec![0, 1, 2])
    }

    #[test]
    fn labels_are_injected_as_one_hot() {
        let dbn = Dbn::from_config(&labelled_config(3)).unwrap();
        let (data, labels) = data();
        let propagated = dbn.propagate(0, &data, Some((&labels[..], 3))).unwrap();

        assert_eq!(3, propagated.len());
        assert_eq!(&[1f64, 0f64, 0f64], &propagated[0][4..]);
        assert_eq!(&[0f64, 1f64, 0f64], &propagated[1][4..]);
        assert_eq!(&[0f64, 0f64, 1f64], &propagated[2][4..]);
        assert!(propagated.iter().all(|p| p[..4].iter().all(|&h| h > 0f64 && h < 1f64)));
    }

    #[test]
    fn labels_stay_out_of_lower_layers() {
        let config = DbnConfig {
            watcher: WatcherKind::Silent,
            ..DbnConfig::new(vec![RbmConfig::new(6, 4), RbmConfig::new(4, 4), RbmConfig::new(7, 5)])
        };
        let dbn = Dbn::from_config(&config).unwrap();
        let (data, labels) = data();
        assert_eq!(4, dbn.propagate(0, &data, Some((&labels[..], 3))).unwrap()[0].len());
    }

    fn error_rate(predictions: &[usize], labels: &[usize]) -> f64 {
        let wrong = predictions.iter().zip(labels.iter()).filter(|&(p, l)| p != l).count();
        wrong as f64 / labels.len() as f64
    }

    #[test]
    fn reconstruction_ties_resolve_to_the_first_label() {
        let config = DbnConfig {
            watcher: WatcherKind::Silent,
            seed: Some(3),
            ..DbnConfig::new(vec![RbmConfig::new(2, 2), RbmConfig::new(5, 2)])
        };
        let mut dbn = Dbn::from_config(&config).unwrap();
        // Without weights the reconstruction is the sigmoid of the visible
        // bias: 0.5 for the first label, 0.73 for the other two.
        dbn.layers_mut()[1]
            .set_parameters(Array2::zeros((5, 2)), arr1(&[0f64, 0f64, 0f64, 1f64, 1f64]), Array1::zeros(2))
            .unwrap();

        for item in &[vec![0f64, 0f64], vec![1f64, 0f64], vec![1f64, 1f64]] {
            assert_eq!(1, dbn.predict(item, 3).unwrap());
            assert_eq!(1, dbn.deep_predict(item, 3, 4).unwrap());
            assert_eq!(1, dbn.deep_predict_with(item, 3, 4, GibbsVisible::Sample).unwrap());
        }
    }

    #[test]
    fn labels_are_injected_after_labelled_pretraining() {
        let mut dbn = Dbn::from_config(&labelled_config(3)).unwrap();
        let (data, labels) = data();
        dbn.pretrain_with_labels(&data, &labels, 3, 10).unwrap();

        let propagated = dbn.propagate(0, &data, Some((&labels[..], 3))).unwrap();
        for (output, &label) in propagated.iter().zip(labels.iter()) {
            assert_eq!(7, output.len());
            for (j, &unit) in output[4..].iter().enumerate() {
                assert_eq!(if j == label { 1f64 } else { 0f64 }, unit);
            }
        }
    }

    #[test]
    fn gibbs_variants_agree_with_forward_prediction() {
        let (data, labels) = data();
        let trained = || {
            let mut dbn = Dbn::from_config(&labelled_config(3)).unwrap();
            dbn.pretrain_with_labels(&data, &labels, 3, 30).unwrap();
            dbn
        };
        let predict_all = |dbn: &mut Dbn, steps: Option<(usize, GibbsVisible)>| -> Vec<usize> {
            data.iter()
                .map(|item| match steps {
                    None => dbn.predict(item, 3).unwrap(),
                    Some((steps, visible)) => dbn.deep_predict_with(item, 3, steps, visible).unwrap(),
                })
                .collect()
        };

        // Zero Gibbs rounds draw the same samples as the forward pass.
        let forward = predict_all(&mut trained(), None);
        assert_eq!(forward, predict_all(&mut trained(), Some((0, GibbsVisible::Mean))));
        assert_eq!(forward, predict_all(&mut trained(), Some((0, GibbsVisible::Sample))));

        let forward_error = error_rate(&forward, &labels);
        let mean_error = error_rate(&predict_all(&mut trained(), Some((5, GibbsVisible::Mean))), &labels);
        let sample_error = error_rate(&predict_all(&mut trained(), Some((5, GibbsVisible::Sample))), &labels);
        for &rate in &[forward_error, mean_error, sample_error] {
            assert!(rate >= 0f64 && rate <= 1f64);
        }

        let accuracy = trained().evaluate(&data, &labels, 3).unwrap();
        assert_eq!(forward_error, accuracy.error_rate());
    }

    #[test]
    fn labelled_pretraining_and_prediction() {
        let mut dbn = Dbn::from_config(&labelled_config(3)).unwrap();
        let (data, labels) = data();
        dbn.pretrain_with_labels(&data, &labels, 3, 30).unwrap();

        for item in &data {
            assert!(dbn.predict(item, 3).unwrap() < 3);
            assert!(dbn.deep_predict(item, 3, 5).unwrap() < 3);
            assert!(dbn.deep_predict_with(item, 3, 5, GibbsVisible::Sample).unwrap() < 3);
        }

        let accuracy = dbn.evaluate(&data, &labels, 3).unwrap();
        assert_eq!(3, accuracy.num_samples());
        assert!(accuracy.ratio() >= 0f64 && accuracy.ratio() <= 1f64);
    }

    #[test]
    fn label_capacity_is_checked_before_training() {
        let mut dbn = Dbn::from_config(&labelled_config(3)).unwrap();
        let before = dbn.layers()[0].weights().clone();
        let (data, labels) = data();
        match dbn.pretrain_with_labels(&data, &labels, 2, 1) {
            Err(Error::Config(ConfigError::LabelCapacity { visible, hidden, labels })) => {
                assert_eq!((7, 4, 2), (visible, hidden, labels));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(&before, dbn.layers()[0].weights());
        assert!(dbn.predict(&data[0], 2).is_err());
    }

    #[test]
    fn label_count_must_match_the_data() {
        let mut dbn = Dbn::from_config(&labelled_config(3)).unwrap();
        let (data, _) = data();
        assert!(dbn.pretrain_with_labels(&data, &[0, 1], 3, 1).is_err());
        assert!(dbn.evaluate(&data, &[0, 1, 5], 3).is_err());
    }

    #[test]
    fn unlabelled_pretraining_needs_matching_layers() {
        let (data, _) = data();

        let mut labelled = Dbn::from_config(&labelled_config(3)).unwrap();
        assert!(labelled.pretrain(&data, 1).is_err());

        let config = DbnConfig {
            trainer: Some(TrainerKind::CDk(2)),
            watcher: WatcherKind::Silent,
            seed: Some(5),
            ..DbnConfig::new(vec![RbmConfig::new(6, 4), RbmConfig::new(4, 2)])
        };
        let mut dbn = Dbn::from_config(&config).unwrap();
        dbn.pretrain(&data, 5).unwrap();
        assert_eq!(2, dbn.len());
        assert!(dbn.layers().iter().all(|l| l.weights().iter().all(|w| w.is_finite())));
    }

    #[test]
    fn single_layer_can_not_hold_labels() {
        let config = DbnConfig { watcher: WatcherKind::Silent, ..DbnConfig::new(vec![RbmConfig::new(6, 4)]) };
        let mut dbn = Dbn::from_config(&config).unwrap();
        let (data, labels) = data();
        match dbn.pretrain_with_labels(&data, &labels, 3, 1) {
            Err(Error::Config(ConfigError::TooFewLayers { required: 2, actual: 1 })) => {}
            other => panic!("unexpected {:?}", other),
        }
        dbn.pretrain(&data, 2).unwrap();
    }
}
