pub mod artifact_locator;
pub mod directory_classifier;

pub use artifact_locator::{ArtifactKind, ArtifactLocator, ArtifactSet, MatchPolicy};
pub use directory_classifier::{is_tag_directory_name, DirectoryClassifier, TagDirectory};
