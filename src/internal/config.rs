//! 下载配置：分片时读取重试次数与超时，合并时读取并发数与写入管道参数。

pub mod structs;
