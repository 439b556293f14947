//! Configuration loaders covering bootstrap failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use pocket_config::Config;

use crate::bootstrap::ConfigLoader;

/// Loader that fails by passing an unsupported endpoint on the command line.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("pocket-relay"),
            OsString::from("--endpoint"),
            OsString::from("http://127.0.0.1:8888"),
        ];
        Config::load_from_iter(args)
    }
}

/// Loader producing a configuration whose channels could never hold a frame.
pub struct ZeroCapacityConfigLoader;

impl ConfigLoader for ZeroCapacityConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            channel_capacity: 0,
            ..Config::default()
        })
    }
}
