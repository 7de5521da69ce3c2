pub(crate) mod buffer_pool;
pub mod concurrent_write_sink;
pub mod file_backing;
pub mod memory_backing;
pub mod null_backing;
pub(crate) mod packet;
pub mod sink_error;
pub mod sink_stats;
pub mod stream_backing;

pub use concurrent_write_sink::ConcurrentWriteSink;
pub use file_backing::FileBacking;
pub use memory_backing::MemoryBacking;
pub use null_backing::NullBacking;
pub use sink_error::{DrainFailure, SinkError};
pub use sink_stats::SinkStats;
pub use stream_backing::StreamBacking;
