#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use roster_scheduler::{AppConfig, Schedule, http_api, logging};

    let config = AppConfig::load()?;
    logging::init_tracing(&config.logging.filter)?;
    let addr = config.http_addr()?;

    let schedule = match initial_schedule(&config)? {
        Some(schedule) => schedule,
        None => Schedule::new(Vec::new(), Vec::new(), config.schedule_period()),
    };
    tracing::info!(
        target: "http_api",
        %addr,
        employees = schedule.employees().len(),
        tasks = schedule.tasks().len(),
        "roster-scheduler HTTP API listening"
    );
    http_api::serve(addr, schedule)
        .await
        .with_context(|| format!("serve http api on {addr}"))?;
    Ok(())
}

#[cfg(all(feature = "http_api", feature = "sqlite"))]
fn initial_schedule(
    config: &roster_scheduler::AppConfig,
) -> anyhow::Result<Option<roster_scheduler::Schedule>> {
    use anyhow::Context;
    use roster_scheduler::{ScheduleStore, SqliteScheduleStore};

    let Some(path) = config.storage.sqlite_path.as_ref() else {
        return Ok(None);
    };
    let store =
        SqliteScheduleStore::new(path).with_context(|| format!("open {}", path.display()))?;
    Ok(store.load_schedule()?)
}

#[cfg(all(feature = "http_api", not(feature = "sqlite")))]
fn initial_schedule(
    _config: &roster_scheduler::AppConfig,
) -> anyhow::Result<Option<roster_scheduler::Schedule>> {
    Ok(None)
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
