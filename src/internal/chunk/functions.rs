pub mod partition;

pub use partition::partition;
