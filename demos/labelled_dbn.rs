extern crate env_logger;
extern crate rand;
extern crate strata;

use std::env;
use rand::{Rng, SeedableRng, StdRng};
use strata::dbn::{Dbn, DbnConfig};
use strata::rbm::RbmConfig;
use strata::solvers::TrainerKind;
use strata::watcher::WatcherKind;

const NUM_LABELS: usize = 4;
const WIDTH: usize = 16;

fn main() {
    env_logger::init().unwrap();

    let epochs = match env::args().nth(1).map(|arg| arg.parse::<usize>()) {
        Some(Ok(epochs)) => epochs,
        Some(Err(_)) => {
            println!("Sorry, the number of epochs must be a positive number. Default: 50");
            50
        }
        None => {
            println!("No `epochs` argument specified. Default: 50");
            50
        }
    };

    let mut rng = StdRng::from_seed(&[2016usize][..]);
    let (train_data, train_labels) = patterns(&mut rng, 200);
    let (test_data, test_labels) = patterns(&mut rng, 50);

    let mut layers = vec![RbmConfig::new(WIDTH, 12), RbmConfig::new(12 + NUM_LABELS, 24)];
    for layer in &mut layers {
        layer.batch_size = 10;
        layer.momentum = true;
        layer.shuffle = true;
        layer.init_weights = true;
    }
    let config = DbnConfig {
        trainer: Some(TrainerKind::CD1),
        watcher: WatcherKind::Default,
        seed: Some(7),
        ..DbnConfig::new(layers)
    };

    let mut dbn = Dbn::from_config(&config).unwrap();
    dbn.pretrain_with_labels(&train_data, &train_labels, NUM_LABELS, epochs).unwrap();

    let train_accuracy = dbn.evaluate(&train_data, &train_labels, NUM_LABELS).unwrap();
    let test_accuracy = dbn.evaluate(&test_data, &test_labels, NUM_LABELS).unwrap();
    println!("Training accuracy: {}", train_accuracy);
    println!("Test accuracy: {}", test_accuracy);
}

/// `count` noisy bar patterns: label `l` switches on the `l`-th quarter of the units,
/// and every unit is flipped with a probability of 5%.
fn patterns(rng: &mut StdRng, count: usize) -> (Vec<Vec<f64>>, Vec<usize>) {
    let quarter = WIDTH / NUM_LABELS;
    let mut data = Vec::with_capacity(count);
    let mut labels = Vec::with_capacity(count);
    for _ in 0..count {
        let label = rng.gen_range(0, NUM_LABELS);
        let sample: Vec<f64> = (0..WIDTH)
            .map(|i| {
                let on = i / quarter == label;
                let flip = rng.gen::<f64>() < 0.05;
                if on != flip { 1f64 } else { 0f64 }
            })
            .collect();
        data.push(sample);
        labels.push(label);
    }
    (data, labels)
}
