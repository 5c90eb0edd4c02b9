pub mod assembly;
pub mod collaborative;
pub mod content;
pub mod fallback;
pub mod hybrid;
pub mod preference;
pub mod scorer;

pub use assembly::OutfitAssembler;
pub use collaborative::{CollaborativeFilter, Prediction};
pub use content::ItemFeatureIndex;
pub use fallback::FallbackGenerator;
pub use hybrid::HybridBlender;
pub use preference::PreferenceMatcher;
pub use scorer::{select_scorer, DeterministicScorer, Scorer, TrainedScorer};
