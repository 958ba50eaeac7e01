mod load;
mod parse;
mod table;

pub use load::{DataSources, load_graph_data, load_or_fallback};
pub use table::{GraphData, LinkKind, LinkRecord, NodeKind, NodeRecord};
