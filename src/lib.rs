//! Tag frequency and weight statistics over an OpenStreetMap PBF extract.
//!
//! An [`OsmParser`] streams batches of nodes, ways and relations into a
//! [`TagCounter`], and the [`report`] functions rank what was counted.

pub mod counter;
pub mod element;
pub mod parser;
pub mod report;

pub use counter::TagCounter;
pub use element::{Element, ElementType, Member, Node, Relation, Tags, Way};
pub use parser::{Handler, OsmParser};
