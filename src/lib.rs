//! # segmented_download
//!
//! 分段下载执行核心：把已知大小的资源切成互不重叠的分片，
//! 再把各分片下载器乱序送来的字节，经由一个异步写入管道拼成一个完整产物。
//!
//! - [`chunk`]：分片描述、分片器与分片下载器接入点
//! - [`sink`]：多生产者、单后台写入任务的并发写入管道
//! - [`merger`]：文件 / 内存两种合并器
//! - [`http`]：基于 HTTP Range 请求的分片下载器
//! - [`config`]：共享配置

/// 内部实现模块
mod internal;

#[cfg(test)]
mod tests;

pub mod config {
    use crate::internal;
    pub use internal::config::structs::*;
}

pub mod chunk {
    use crate::internal;
    pub use internal::chunk::functions::*;
    pub use internal::chunk::structs::*;
    pub use internal::chunk::traits::*;
}

pub mod sink {
    use crate::internal;
    pub use internal::sink::structs::*;
    pub use internal::sink::traits::*;
}

pub mod merger {
    use crate::internal;
    pub use internal::merger::structs::*;
    pub use internal::merger::traits::*;
}

/// 分片下载器的 HTTP 实现，不属于核心，可按需替换
pub mod http {
    use crate::internal;
    pub use internal::http::functions::*;
    pub use internal::http::structs::*;
}
