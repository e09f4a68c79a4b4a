use crate::error::ModelError;
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::models::PitStopPrediction;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::{DynValue, Tensor},
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Scores a single feature vector
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError>;
}

/// ONNX-backed predictor
///
/// `Session::run` needs `&mut`, so the session is guarded by a mutex.
pub struct OnnxPredictor {
    session: Mutex<Session>,
    input_name: String,
}

impl OnnxPredictor {
    /// Load an ONNX model from file
    pub fn load<P: AsRef<Path>>(path: P, intra_threads: usize) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }

        info!("Loading model: {:?}", path);
        let session = build_session(path, intra_threads).map_err(|source| ModelError::Load {
            path: path.to_path_buf(),
            source,
        })?;

        // Converted sklearn/xgboost graphs take one float input, name varies by exporter
        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "input".to_string());
        debug!(input = %input_name, "Model input resolved");

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }
}

fn build_session(path: &Path, intra_threads: usize) -> ort::Result<Session> {
    Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .commit_from_file(path)
}

impl Predictor for OnnxPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let mut session = lock_session(&self.session);

        let input_tensor = Tensor::from_array(([1usize, FEATURE_COUNT], features.to_f32()))?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        first_value(&outputs[0])
    }
}

/// Scoring keeps no state between runs, so a lock poisoned by a panicking
/// request is still safe to reuse.
fn lock_session<T>(session: &Mutex<T>) -> MutexGuard<'_, T> {
    session.lock().unwrap_or_else(|poisoned| {
        warn!("Model session lock was poisoned, recovering");
        session.clear_poison();
        poisoned.into_inner()
    })
}

/// First element of an output tensor
///
/// Classifiers emit an int64 label, regressors a float score.
fn first_value(output: &DynValue) -> Result<f64, ModelError> {
    if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
        return data.first().map(|&v| v as f64).ok_or(ModelError::EmptyOutput);
    }
    if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
        return data.first().map(|&v| v as f64).ok_or(ModelError::EmptyOutput);
    }
    let (_, data) = output.try_extract_tensor::<f64>()?;
    data.first().copied().ok_or(ModelError::EmptyOutput)
}

/// Artifact locations for both models
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub classifier: PathBuf,
    pub regressor: PathBuf,
}

/// Pit classifier and laps-left regressor, read-only after startup
#[derive(Clone)]
pub struct ModelStore {
    classifier: Arc<dyn Predictor>,
    regressor: Arc<dyn Predictor>,
}

impl ModelStore {
    pub fn new(classifier: Arc<dyn Predictor>, regressor: Arc<dyn Predictor>) -> Self {
        Self {
            classifier,
            regressor,
        }
    }

    /// Load both models, failing on the first one that cannot be loaded
    pub fn load(paths: &ModelPaths, intra_threads: usize) -> Result<Self, ModelError> {
        let classifier = OnnxPredictor::load(&paths.classifier, intra_threads)?;
        let regressor = OnnxPredictor::load(&paths.regressor, intra_threads)?;

        info!("Loaded classifier and regressor models");
        Ok(Self::new(Arc::new(classifier), Arc::new(regressor)))
    }

    /// Predict whether the driver pits and, if so, in how many laps
    ///
    /// The regressor only runs when the classifier predicts a stop.
    pub fn predict(&self, features: &FeatureVector) -> Result<PitStopPrediction, ModelError> {
        let will_pit = pit_label(self.classifier.predict(features)?)?;
        if !will_pit {
            return Ok(PitStopPrediction::no_stop());
        }

        let laps_left = self.regressor.predict(features)?;
        Ok(PitStopPrediction::stop_in(laps_until_stop(laps_left)?))
    }
}

fn pit_label(raw: f64) -> Result<bool, ModelError> {
    if raw == 1.0 {
        Ok(true)
    } else if raw == 0.0 {
        Ok(false)
    } else {
        Err(ModelError::InvalidLabel(raw))
    }
}

/// Round the regressor estimate up to whole laps
fn laps_until_stop(raw: f64) -> Result<u32, ModelError> {
    if !raw.is_finite() {
        return Err(ModelError::InvalidOutput(raw));
    }

    let laps = raw.ceil();
    if laps < 0.0 {
        warn!(raw, "Regressor returned negative laps, clamping to 0");
        return Ok(0);
    }

    // saturating cast
    Ok(laps as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubPredictor {
        value: f64,
        calls: AtomicUsize,
    }

    impl StubPredictor {
        fn new(value: f64) -> Arc<Self> {
            Arc::new(Self {
                value,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Predictor for StubPredictor {
        fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.value)
        }
    }

    struct FailingPredictor;

    impl Predictor for FailingPredictor {
        fn predict(&self, _features: &FeatureVector) -> Result<f64, ModelError> {
            Err(ModelError::EmptyOutput)
        }
    }

    fn sample_features() -> FeatureVector {
        let mut row = [0.0; FEATURE_COUNT];
        row[0] = 5.0; // TyreLife
        row[9] = 20.0; // LapNumber
        row[12] = 3.0; // Position
        FeatureVector::new(row)
    }

    #[test]
    fn test_pit_predicted_rounds_up() {
        let classifier = StubPredictor::new(1.0);
        let regressor = StubPredictor::new(3.2);
        let store = ModelStore::new(classifier.clone(), regressor.clone());

        let prediction = store.predict(&sample_features()).unwrap();

        assert_eq!(prediction, PitStopPrediction::stop_in(4));
        assert_eq!(classifier.calls(), 1);
        assert_eq!(regressor.calls(), 1);
    }

    #[test]
    fn test_no_pit_skips_regressor() {
        let classifier = StubPredictor::new(0.0);
        let regressor = StubPredictor::new(7.9);
        let store = ModelStore::new(classifier.clone(), regressor.clone());

        let prediction = store.predict(&sample_features()).unwrap();

        assert_eq!(prediction, PitStopPrediction::no_stop());
        assert_eq!(regressor.calls(), 0);
    }

    #[test]
    fn test_no_pit_ignores_failing_regressor() {
        let store = ModelStore::new(StubPredictor::new(0.0), Arc::new(FailingPredictor));
        assert_eq!(
            store.predict(&sample_features()).unwrap(),
            PitStopPrediction::no_stop()
        );
    }

    #[test]
    fn test_whole_lap_output_unchanged() {
        let store = ModelStore::new(StubPredictor::new(1.0), StubPredictor::new(6.0));
        let prediction = store.predict(&sample_features()).unwrap();
        assert_eq!(prediction.lap_time_prediction, 6);
    }

    #[test]
    fn test_non_binary_label_is_error() {
        let store = ModelStore::new(StubPredictor::new(2.0), StubPredictor::new(1.0));
        assert!(matches!(
            store.predict(&sample_features()),
            Err(ModelError::InvalidLabel(_))
        ));
    }

    #[test]
    fn test_model_errors_propagate() {
        let store = ModelStore::new(Arc::new(FailingPredictor), StubPredictor::new(1.0));
        assert!(matches!(
            store.predict(&sample_features()),
            Err(ModelError::EmptyOutput)
        ));

        let store = ModelStore::new(StubPredictor::new(1.0), Arc::new(FailingPredictor));
        assert!(store.predict(&sample_features()).is_err());
    }

    #[test]
    fn test_laps_until_stop() {
        assert_eq!(laps_until_stop(0.0).unwrap(), 0);
        assert_eq!(laps_until_stop(0.1).unwrap(), 1);
        assert_eq!(laps_until_stop(12.999).unwrap(), 13);
        assert_eq!(laps_until_stop(-0.4).unwrap(), 0);
        assert_eq!(laps_until_stop(-3.5).unwrap(), 0);
        assert_eq!(laps_until_stop(1e12).unwrap(), u32::MAX);
    }

    #[test]
    fn test_laps_until_stop_rejects_non_finite() {
        assert!(matches!(
            laps_until_stop(f64::NAN),
            Err(ModelError::InvalidOutput(_))
        ));
        assert!(laps_until_stop(f64::INFINITY).is_err());
        assert!(laps_until_stop(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_poisoned_session_lock_recovers() {
        let session = Arc::new(Mutex::new(7u32));

        let poisoner = session.clone();
        let result = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("scoring panicked");
        })
        .join();
        assert!(result.is_err());
        assert!(session.is_poisoned());

        assert_eq!(*lock_session(&session), 7);
        assert!(!session.is_poisoned());
        assert_eq!(*lock_session(&session), 7);
    }

    #[test]
    fn test_load_missing_model() {
        let result = OnnxPredictor::load("does/not/exist.onnx", 1);
        assert!(matches!(result, Err(ModelError::NotFound(_))));

        let paths = ModelPaths {
            classifier: PathBuf::from("does/not/exist_classifier.onnx"),
            regressor: PathBuf::from("does/not/exist_regressor.onnx"),
        };
        assert!(ModelStore::load(&paths, 1).is_err());
    }
}
