mod common;
mod ground;
mod landsat;
mod modis;

pub(crate) use common::{field, line_index, parse_cell, read_table, Cell};
pub use ground::{CombinedInstantParser, SplitColumnsParser};
pub use landsat::LandsatTableParser;
pub use modis::ModisTableParser;
