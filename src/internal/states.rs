pub(crate) mod idle_signal;
pub(crate) mod work_queue;
