//! Startup resynchronization: every submission identity's sequence number is
//! read from the execution target before it enters rotation. In-memory
//! tracking drifts across restarts; the target is the only ground truth.

use actix_web::web::ThinData;
use color_eyre::{eyre::WrapErr, Report, Result};
use futures::future::try_join_all;
use log::info;

use crate::{models::AppState, services::ExecutionTargetTrait};

pub async fn resync_submission_identities(app_state: &ThinData<AppState>) -> Result<()> {
    let addresses = app_state.wallet_pool.addresses().await;

    let sync_futures = addresses.iter().map(|address| async move {
        let sequence = app_state
            .provider
            .get_transaction_count(*address)
            .await
            .wrap_err_with(|| format!("Failed to read sequence for identity {}", address))?;
        app_state.wallet_pool.set_sequence(address, sequence).await;
        info!("identity {} synchronized at sequence {}", address, sequence);
        Ok::<(), Report>(())
    });

    try_join_all(sync_futures)
        .await
        .wrap_err("Failed to synchronize submission identities")?;

    info!("{} submission identities ready", addresses.len());
    Ok(())
}
