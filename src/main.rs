//! Headless smoke run: load the catalog, filter it, place a lecture.

use anyhow::Context;
use timetabler::catalog::{CatalogClient, CatalogConfig, CatalogLoader};
use timetabler::filter::{distinct_majors, filter_lectures};
use timetabler::session::Session;
use timetabler::state::search::SearchInfo;
use tracing::{info, Level};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let config = CatalogConfig::from_env();
    info!(base_url = %config.base_url, "starting timetabler");
    let client = CatalogClient::with_config(config)?;
    let mut session = Session::new(CatalogLoader::new(client));

    let target = session
        .schedules()
        .tables()
        .keys()
        .next()
        .cloned()
        .context("session has no timetable")?;
    session.open_search(SearchInfo::for_table(target.clone()));

    let catalog = session.lectures().await?;
    info!(
        total = catalog.len(),
        majors = distinct_majors(&catalog).len(),
        "catalog ready"
    );

    if let Ok(query) = std::env::var("CATALOG_QUERY") {
        session.search()?.query_writer().set(query);
    }

    let mut options = session.search()?.options();
    let hits = filter_lectures(&catalog, &options.current());
    info!(hits = hits.len(), "filtered catalog");
    for lecture in hits.iter().take(10) {
        info!(id = %lecture.id, title = %lecture.title, major = %lecture.major, "hit");
    }

    if let Some(first) = hits.first() {
        session.add_selected_lecture(first)?;
        let entries = session
            .schedules()
            .tables()
            .get(&target)
            .map_or(0, |list| list.len());
        info!(table = %target, entries, "placed first hit");
    }
    session.close_search();

    Ok(())
}
