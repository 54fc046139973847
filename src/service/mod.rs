pub mod compositor;
pub mod error;
pub mod image_host;
pub mod pipeline;

#[cfg(test)]
pub mod test_helpers;
