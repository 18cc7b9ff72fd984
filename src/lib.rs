pub mod api;
pub mod fallback;
pub mod hooks;
pub mod models;
#[cfg(feature = "bevy")]
pub mod plugin;
pub mod resource;

#[cfg(test)]
pub(crate) mod test_utils;
