//! HTTP inference service for a pretrained SMS spam/ham classifier.
//!
//! Three artifacts are loaded once at startup from `<models_dir>/spam-sms/`:
//! an ONNX export of the trained network, the tokenizer vocabulary and a
//! metadata file holding the padding length and the label legend. The
//! resulting [`Classifier`] is immutable and shared by every request.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use spam_sms::Classifier;
//!
//! let classifier = Classifier::builder()
//!     .with_models_dir("models")
//!     .build()?;
//!
//! let prediction = classifier.predict("WIN A FREE PRIZE NOW")?;
//! println!("Predicted class: {}", prediction.top.label);
//! for score in &prediction.predictions {
//!     println!("  {}: {:.3}", score.label, score.confidence);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Serving
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use spam_sms::{create_router, AppState, Classifier};
//!
//! let classifier = Classifier::builder().with_models_dir("models").build()?;
//! let app = create_router(AppState::new(classifier));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod classifier;
pub mod metadata;
mod runtime;
pub mod server;

pub use artifacts::{ArtifactError, ArtifactPaths};
pub use classifier::{
    Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, LabelScore, Prediction,
    VocabTokenizer, label_predictions, pad_sequence,
};
pub use metadata::{ModelMetadata, MetadataError, DEFAULT_MAX_SEQUENCE};
pub use runtime::{RuntimeConfig, create_session_builder};
pub use server::{create_router, AppState, Predictor, QueryResponse, DEFAULT_QUERY};

/// Initializes `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
