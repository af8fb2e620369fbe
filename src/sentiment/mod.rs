// Sentiment analysis
// Lexicon-based polarity scoring and threshold classification

mod classifier;
mod lexicon;

pub use classifier::{SentimentClassifier, SentimentLabel};
pub use lexicon::polarity;
