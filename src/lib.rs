pub mod config;
pub mod context;
pub mod error;
pub mod server;
pub mod task;
pub mod task_runner;
pub mod task_store;
pub mod work;

#[cfg(test)]
pub mod test_utils;
