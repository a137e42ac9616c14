// File-backed settings store for the mod menu: flat JSON object on
// disk, one-way default merge on boot, point read/save, hard reset.

mod retry;
mod store;

pub use retry::RetryPolicy;
pub use store::{ConfigMap, ConfigStore};
