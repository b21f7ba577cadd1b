//! Wikipedia summary lookup for the Lim editor.
//!
//! Given a topic, [`SummaryExtractor`] builds the article locator, fetches
//! the page, and reduces it to a short plain-text summary:
//!
//! - [`query`]: query normalisation and locator construction
//! - [`extract`]: HTML reduction (content container, first paragraphs,
//!   infobox exclusion, citation stripping)
//! - [`summary`]: the result types and their rendering for insertion
//! - [`error`]: the lookup error taxonomy
//!
//! A page without usable paragraphs is a successful
//! [`ExtractionResult::NotFound`], not an error.
//!
//! ```no_run
//! use lim_wiki::SummaryExtractor;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = SummaryExtractor::new("https://en.wikipedia.org")?;
//! let result = extractor.extract("Cat").await?;
//! println!("{}", result.render());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod extractor;
pub mod query;
pub mod summary;

pub use error::{FetchError, FetchErrorKind, LookupError};
pub use extractor::SummaryExtractor;
pub use query::{Query, SourceLocator};
pub use summary::{ExtractionResult, Summary};
