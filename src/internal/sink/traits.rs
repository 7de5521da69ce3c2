pub mod sink_backing;

pub use sink_backing::{SinkBacking, SinkReader};
