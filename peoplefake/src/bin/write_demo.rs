//! Inserts one random person, then fifty more, into `local.peopleFake`.

use peoplefake::{
    error::DemoResult,
    logging,
    person::PersonDocument,
    settings::ConnectionSettings,
    writer,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> DemoResult<()> {
    logging::init();

    let settings = ConnectionSettings::default();
    info!(uri = %settings.uri, database = %settings.database, "connecting");
    let store = settings.connect().await?;

    let people = store.typed_collection::<PersonDocument>();
    let result = writer::run_write_demo(&people, &mut std::io::stdout().lock()).await;

    match &result {
        Ok(inserted) => info!(inserted, "write demo finished"),
        Err(err) => error!(%err, "write demo failed"),
    }

    store.shutdown().await?;
    result.map(|_| ())
}
