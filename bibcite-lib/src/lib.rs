//! `bibcite-lib` splits a BibTeX bibliography into one citation file per
//! entry, the building block behind the `bibcite` CLI.
//!
//! The library parses BibTeX text into ordered [`Entry`] values, derives a
//! filesystem-safe name from each citation key, and re-serializes every entry
//! on its own. [`split::run`] ties these together and also publishes a
//! verbatim copy of the source file.
//!
//! # Example
//!
//! ```rust
//! use bibcite_lib::{entry_to_bib, safe_filename, Bibliography};
//!
//! # fn demo() -> Result<(), bibcite_lib::error::ParseError> {
//! let bib: Bibliography = "@Article{doe-2021:x, title = {A   Title}, note = { }}".parse()?;
//! let entry = &bib.entries()[0];
//!
//! assert_eq!(safe_filename(entry.key()), "doe-2021_x");
//! assert_eq!(entry_to_bib(entry), "@article{doe-2021:x,\n  title = {A Title}\n}\n");
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

pub mod entry;
pub mod error;
pub mod parser;
pub mod sanitize;
pub mod serialize;
pub mod split;

pub use entry::{Entry, Field};
pub use parser::{parse, Bibliography};
pub use sanitize::safe_filename;
pub use serialize::entry_to_bib;
pub use split::{run, SplitConfig, SplitReport};
