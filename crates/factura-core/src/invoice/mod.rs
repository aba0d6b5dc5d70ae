//! Invoice line-item extraction.
//!
//! Text flows through [`classifier`] (which lines may hold items), then
//! [`strategies`] (fields of each line), then catalog matching in [`parser`].

pub mod classifier;
pub mod line;
mod parser;
pub mod rules;
pub mod segment;
pub mod strategies;
pub mod vocabulary;

pub use classifier::{Candidates, LineClassifier};
pub use line::Line;
pub use parser::{InvoiceItemParser, InvoiceParser};
pub use strategies::{RawItem, StrategyContext, StrategyFn, PIPELINE};
pub use vocabulary::Vocabulary;
