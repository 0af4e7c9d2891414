use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Hidden layer width used when a configuration does not name one.
pub const DEFAULT_HIDDEN: usize = 27;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("failed to read network weights from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode network weights: {0}")]
    Json(#[from] serde_json::Error),
    #[error("network shape invalid: {0}")]
    Shape(String),
    #[error("expected {expected} inputs, found {found}")]
    InputLength { expected: usize, found: usize },
}

/// Feed-forward value network with one sigmoid hidden layer and a single
/// linear output.
///
/// `hidden` holds `n_input + 1` rows of `n_hidden` weights; row 0 is the
/// hidden-layer bias. The output layer has no bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueNetwork {
    n_input: usize,
    n_hidden: usize,
    hidden: Vec<Vec<f64>>,
    output: Vec<f64>,
}

impl ValueNetwork {
    /// Weights drawn independently from the uniform distribution on [-1, 1).
    pub fn random<R: Rng + ?Sized>(n_input: usize, n_hidden: usize, rng: &mut R) -> Self {
        let hidden = (0..=n_input)
            .map(|_| (0..n_hidden).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .collect();
        let output = (0..n_hidden).map(|_| rng.gen_range(-1.0..1.0)).collect();
        Self {
            n_input,
            n_hidden,
            hidden,
            output,
        }
    }

    pub fn from_seed(n_input: usize, n_hidden: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::random(n_input, n_hidden, &mut rng)
    }

    pub fn from_json(raw: &str) -> Result<Self, NetworkError> {
        let network: ValueNetwork = serde_json::from_str(raw)?;
        network.validate()?;
        Ok(network)
    }

    pub fn from_path(path: &Path) -> Result<Self, NetworkError> {
        let raw = fs::read_to_string(path).map_err(|source| NetworkError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn to_json(&self) -> Result<String, NetworkError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn n_input(&self) -> usize {
        self.n_input
    }

    pub fn n_hidden(&self) -> usize {
        self.n_hidden
    }

    fn validate(&self) -> Result<(), NetworkError> {
        if self.n_hidden == 0 {
            return Err(NetworkError::Shape("hidden layer is empty".into()));
        }
        if self.hidden.len() != self.n_input + 1 {
            return Err(NetworkError::Shape(format!(
                "expected {} hidden rows, found {}",
                self.n_input + 1,
                self.hidden.len()
            )));
        }
        if let Some(row) = self.hidden.iter().find(|row| row.len() != self.n_hidden) {
            return Err(NetworkError::Shape(format!(
                "hidden row has {} weights, expected {}",
                row.len(),
                self.n_hidden
            )));
        }
        if self.output.len() != self.n_hidden {
            return Err(NetworkError::Shape(format!(
                "expected {} output weights, found {}",
                self.n_hidden,
                self.output.len()
            )));
        }
        Ok(())
    }

    pub fn feedforward(&self, input: &[f64]) -> Result<f64, NetworkError> {
        if input.len() != self.n_input {
            return Err(NetworkError::InputLength {
                expected: self.n_input,
                found: input.len(),
            });
        }
        let mut activations = self.hidden[0].clone();
        for (x, row) in input.iter().zip(&self.hidden[1..]) {
            if *x == 0.0 {
                continue;
            }
            for (acc, weight) in activations.iter_mut().zip(row) {
                *acc += x * weight;
            }
        }
        Ok(activations
            .iter()
            .zip(&self.output)
            .map(|(z, w)| sigmoid(*z) * w)
            .sum())
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::{NetworkError, ValueNetwork};

    fn fixed() -> ValueNetwork {
        ValueNetwork {
            n_input: 2,
            n_hidden: 2,
            hidden: vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, -1.0]],
            output: vec![2.0, -1.0],
        }
    }

    #[test]
    fn feedforward_applies_bias_and_sigmoid() {
        let net = fixed();
        // Hidden pre-activations: [0, 1] at zero input.
        let zero = net.feedforward(&[0.0, 0.0]).unwrap();
        let expected = 2.0 * 0.5 - 1.0 / (1.0 + (-1.0f64).exp());
        assert!((zero - expected).abs() < 1e-12);

        let lifted = net.feedforward(&[1.0, 1.0]).unwrap();
        // Pre-activations: [1, 0].
        let expected = 2.0 / (1.0 + (-1.0f64).exp()) - 0.5;
        assert!((lifted - expected).abs() < 1e-12);
    }

    #[test]
    fn rejects_wrong_input_width() {
        let err = fixed().feedforward(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            NetworkError::InputLength {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn seeded_weights_are_reproducible_and_bounded() {
        let a = ValueNetwork::from_seed(90, 27, 11);
        let b = ValueNetwork::from_seed(90, 27, 11);
        let c = ValueNetwork::from_seed(90, 27, 12);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.hidden.len(), 91);
        assert!(
            a.hidden
                .iter()
                .flatten()
                .chain(&a.output)
                .all(|w| (-1.0..1.0).contains(w))
        );
    }

    #[test]
    fn json_round_trip_and_shape_check() {
        let net = ValueNetwork::from_seed(4, 3, 5);
        let raw = net.to_json().unwrap();
        assert_eq!(ValueNetwork::from_json(&raw).unwrap(), net);

        let broken = r#"{"n_input":2,"n_hidden":2,"hidden":[[0.0,0.0]],"output":[1.0,1.0]}"#;
        assert!(matches!(
            ValueNetwork::from_json(broken),
            Err(NetworkError::Shape(_))
        ));
        assert!(matches!(
            ValueNetwork::from_json("not json"),
            Err(NetworkError::Json(_))
        ));
    }
}
