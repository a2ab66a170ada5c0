pub mod classifier;
pub mod cleaner;
pub mod inference;

pub use classifier::{Classification, Classifier, DefaultReason, SentimentModel};
pub use cleaner::clean_text;
pub use inference::HostedInference;
