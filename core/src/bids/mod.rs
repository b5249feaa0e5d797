//! BIDS naming convention and dataset indexing.
//!
//! ```text
//!  sub-01_ses-a_T1w.nii.gz ──► name::parse_bids_name ──► ParsedName
//!
//!  dataset root ──► layout::BidsLayout (walk + parse) ──► Vec<BidsFile>
//!                          │
//!                          ▼
//!                   query::Query ──► matching paths
//! ```

pub mod entities;
pub mod layout;
pub mod name;
pub mod query;

pub use layout::{BidsFile, BidsLayout, DatasetDescription, DatasetLayout, LayoutOptions};
pub use name::{parse_bids_name, EntityParser, NameParser, ParsedName};
pub use query::{EntityFilter, Query, QueryFilter, ReturnType};
