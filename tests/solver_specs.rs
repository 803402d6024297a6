extern crate strata;

#[cfg(test)]
mod solver_specs {
    use std::cell::RefCell;
    use std::rc::Rc;
    use strata::context::TrainingContext;
    use strata::rbm::{DecayKind, Rbm, RbmConfig, SparsityMethod};
    use strata::solver::Solver;
    use strata::solvers::TrainerKind;
    use strata::watcher::{IWatcher, WatcherKind};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Begin,
        Epoch(usize, TrainingContext, f64),
        End,
    }

    struct Recorder {
        events: Rc<RefCell<Vec<Event>>>,
    }

    impl IWatcher for Recorder {
        fn training_begin(&mut self, _rbm: &Rbm) {
            self.events.borrow_mut().push(Event::Begin);
        }

        fn epoch_end(&mut self, epoch: usize, context: &TrainingContext, rbm: &Rbm) {
            self.events.borrow_mut().push(Event::Epoch(epoch, *context, rbm.effective_momentum()));
        }

        fn training_end(&mut self, _rbm: &Rbm) {
            self.events.borrow_mut().push(Event::End);
        }
    }

    fn recording_solver() -> (Solver, Rc<RefCell<Vec<Event>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let solver = Solver::new(Box::new(Recorder { events: events.clone() }));
        (solver, events)
    }

    fn epochs(events: &[Event]) -> Vec<(usize, TrainingContext, f64)> {
        events.iter()
            .filter_map(|e| match *e {
                Event::Epoch(epoch, context, momentum) => Some((epoch, context, momentum)),
                _ => None,
            })
            .collect()
    }

    fn patterns() -> Vec<Vec<f64>> {
        vec![vec![1f64, 1f64, 1f64, 1f64, 0f64, 0f64, 0f64, 0f64],
             vec![0f64, 0f64, 0f64, 0f64, 1f64, 1f64, 1f64, 1f64],
             vec![1f64, 1f64, 0f64, 0f64, 1f64, 1f64, 0f64, 0f64],
             vec![0f64, 0f64, 1f64, 1f64, 0f64, 0f64, 1f64, 1f64]]
    }

    fn config() -> RbmConfig {
        RbmConfig { seed: Some(2016), watcher: WatcherKind::Silent, ..RbmConfig::new(8, 4) }
    }

    #[test]
    fn reconstruction_error_decreases() {
        let mut rbm = Rbm::from_config(&config()).unwrap();
        let (mut solver, events) = recording_solver();
        let last = solver.train(&mut rbm, &patterns(), 100).unwrap();

        let epochs = epochs(&events.borrow());
        assert_eq!(100, epochs.len());
        let first = epochs[0].1.reconstruction_error;
        assert_eq!(last, epochs[99].1.reconstruction_error);
        assert!(last < first, "{} >= {}", last, first);
    }

    #[test]
    fn watcher_sees_the_whole_lifecycle() {
        let mut rbm = Rbm::from_config(&RbmConfig { batch_size: 3, ..config() }).unwrap();
        let (mut solver, events) = recording_solver();
        solver.train(&mut rbm, &patterns(), 2).unwrap();

        let events = events.borrow();
        assert_eq!(4, events.len());
        assert_eq!(Event::Begin, events[0]);
        assert_eq!(Event::End, events[3]);
        for (i, &(epoch, context, _)) in epochs(&events).iter().enumerate() {
            assert_eq!(i + 1, epoch);
            assert_eq!(2, context.batches);
            assert_eq!(4, context.samples);
        }
    }

    #[test]
    fn momentum_switches_at_the_configured_epoch() {
        let mut rbm = Rbm::from_config(&RbmConfig {
            momentum: true,
            initial_momentum: 0.5,
            final_momentum: 0.9,
            momentum_switch_epoch: 5,
            ..config()
        }).unwrap();
        let (mut solver, events) = recording_solver();
        solver.train(&mut rbm, &patterns(), 7).unwrap();

        let momenta: Vec<f64> = epochs(&events.borrow()).iter().map(|&(_, _, m)| m).collect();
        assert_eq!(vec![0.5, 0.5, 0.5, 0.5, 0.9, 0.9, 0.9], momenta);
    }

    #[test]
    fn momentum_switch_at_epoch_zero_uses_the_final_momentum() {
        let mut rbm = Rbm::from_config(&RbmConfig {
            momentum: true,
            momentum_switch_epoch: 0,
            ..config()
        }).unwrap();
        let (mut solver, events) = recording_solver();
        solver.train(&mut rbm, &patterns(), 4).unwrap();

        let momenta: Vec<f64> = epochs(&events.borrow()).iter().map(|&(_, _, m)| m).collect();
        assert_eq!(vec![0.9, 0.9, 0.9, 0.9], momenta);
    }

    #[test]
    fn momentum_restarts_with_every_training() {
        let mut rbm = Rbm::from_config(&RbmConfig { momentum: true, momentum_switch_epoch: 1, ..config() }).unwrap();
        rbm.train(&patterns(), 1).unwrap();
        assert_eq!(0.9, rbm.effective_momentum());

        let (mut solver, events) = recording_solver();
        rbm.momentum_switch_epoch = 3;
        solver.train(&mut rbm, &patterns(), 1).unwrap();
        assert_eq!(0.5, epochs(&events.borrow())[0].2);
    }

    #[test]
    fn free_energy_is_reported_on_request() {
        let mut rbm = Rbm::from_config(&RbmConfig { free_energy: true, ..config() }).unwrap();
        let (mut solver, events) = recording_solver();
        solver.train(&mut rbm, &patterns(), 1).unwrap();
        assert!(epochs(&events.borrow())[0].1.free_energy < 0f64);

        let mut quiet = Rbm::from_config(&config()).unwrap();
        let (mut solver, events) = recording_solver();
        solver.train(&mut quiet, &patterns(), 1).unwrap();
        assert_eq!(0f64, epochs(&events.borrow())[0].1.free_energy);
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut sequential = Rbm::from_config(&RbmConfig { batch_size: 2, ..config() }).unwrap();
        let mut parallel = Rbm::from_config(&RbmConfig { batch_size: 2, parallel: true, ..config() }).unwrap();
        sequential.train(&patterns(), 10).unwrap();
        parallel.train(&patterns(), 10).unwrap();
        assert_eq!(sequential.weights(), parallel.weights());
        assert_eq!(sequential.visible_bias(), parallel.visible_bias());
        assert_eq!(sequential.hidden_bias(), parallel.hidden_bias());
    }

    #[test]
    fn persistent_and_multi_step_trainers_learn() {
        for &trainer in &[TrainerKind::CDk(3), TrainerKind::PCD(1), TrainerKind::PCD(2)] {
            let mut rbm = Rbm::from_config(&RbmConfig { trainer: trainer, batch_size: 2, ..config() }).unwrap();
            let error = rbm.train(&patterns(), 20).unwrap();
            assert!(error.is_finite() && error >= 0f64, "{:?}: {}", trainer, error);
            assert!(rbm.weights().iter().all(|w| w.is_finite()));
        }
    }

    #[test]
    fn weight_decay_shrinks_the_weights() {
        let norm = |rbm: &Rbm| rbm.weights().iter().map(|w| w * w).sum::<f64>();

        let mut plain = Rbm::from_config(&config()).unwrap();
        plain.train(&patterns(), 50).unwrap();

        let mut decayed = Rbm::from_config(&RbmConfig { decay: DecayKind::L2Full, decay_rate: 2.0, ..config() }).unwrap();
        decayed.train(&patterns(), 50).unwrap();

        assert!(norm(&decayed) < norm(&plain));
    }

    #[test]
    fn sparsity_lowers_hidden_activity() {
        let mut plain = Rbm::from_config(&config()).unwrap();
        let (mut solver, events) = recording_solver();
        solver.train(&mut plain, &patterns(), 50).unwrap();
        let plain_activity = epochs(&events.borrow())[49].1.sparsity;

        for &method in &[SparsityMethod::GlobalTarget, SparsityMethod::LocalTarget] {
            let mut sparse = Rbm::from_config(&RbmConfig {
                sparsity: method,
                sparsity_target: 0.01,
                ..config()
            }).unwrap();
            let (mut solver, events) = recording_solver();
            solver.train(&mut sparse, &patterns(), 50).unwrap();
            let sparse_activity = epochs(&events.borrow())[49].1.sparsity;
            assert!(sparse_activity < plain_activity, "{:?}: {} >= {}", method, sparse_activity, plain_activity);
        }
    }

    #[test]
    fn denoising_compares_against_the_clean_data() {
        let clean = patterns();
        let noisy: Vec<Vec<f64>> = clean.iter()
            .map(|s| {
                let mut s = s.clone();
                s[0] = 1f64 - s[0];
                s
            })
            .collect();

        let mut rbm = Rbm::from_config(&RbmConfig { shuffle: true, ..config() }).unwrap();
        let mut solver = Solver::from_kind(WatcherKind::Silent);
        let error = solver.train_denoising(&mut rbm, &noisy, &clean, 10).unwrap();
        assert!(error.is_finite());

        assert!(solver.train_denoising(&mut rbm, &noisy, &clean[..3], 1).is_err());
    }

    #[test]
    fn empty_data_is_rejected() {
        let mut rbm = Rbm::from_config(&config()).unwrap();
        assert!(rbm.train(&[], 1).is_err());
    }
}
