use std::sync::Arc;

use anyhow::Result;

use super::startup;
use crate::api;
use crate::core::AppConfig;

pub async fn run(host: String, port: String) -> Result<()> {
    let config = startup(AppConfig::from_env())?;
    // A model that can't be set up means there is nothing to serve
    let model = startup(config.model())?;
    api::serve(host, port, config, Arc::new(model)).await
}
