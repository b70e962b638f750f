pub mod api;
pub mod atoms;
pub mod known_atoms;
pub mod normalize;
pub mod parser;
pub mod registry;
pub mod search;
pub mod stsd;
pub mod tracks;
pub mod util;

pub use api::{Analysis, analyze, analyze_file, locate_atom, read_metadata};
pub use atoms::{AtomHeader, AtomNode, FourCC, HEADER_SIZE};
pub use normalize::prune;
pub use parser::{ParseError, Result, build_tree, build_tree_with, read_atom_header};
pub use registry::{AtomDecoder, Payload, Registry, default_registry};
pub use search::find;
pub use stsd::sample_rates;
pub use tracks::{Fact, collect};
