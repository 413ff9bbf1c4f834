use cilt_core::config::load_config;
use cilt_core::types::SequenceId;
use cilt_service::ScheduleService;
use cilt_store::HttpScheduleStore;
use futures::future::try_join_all;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

mod agenda;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    if config.agenda.sequence_ids.is_empty() {
        tracing::warn!("No sequences configured under agenda.sequence_ids, nothing to do");
        return Ok(());
    }

    let store = HttpScheduleStore::new(&config.remote)?;
    let service = ScheduleService::new(store, config.schedule.clone());
    let window = agenda::Window::from_today(config.schedule.horizon_days)?;
    let limit = config.schedule.max_occurrences;

    tracing::info!(from = %window.from, to = %window.to, "Building agenda");

    let agendas = try_join_all(config.agenda.sequence_ids.iter().map(|&id| {
        let sequence_id = SequenceId(id);
        let service = &service;
        async move {
            let entries = service
                .agenda(sequence_id, window.from, window.to, limit)
                .await?;
            anyhow::Ok((sequence_id, entries))
        }
    }))
    .await?;

    for (sequence_id, entries) in &agendas {
        print!("{}", agenda::render(*sequence_id, entries));
    }

    Ok(())
}
