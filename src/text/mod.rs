pub mod normalize;

pub use normalize::{char_ngrams, jaccard, normalize, word_set};
