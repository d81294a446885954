//! Runs the six query demonstrations against `local.peopleFake`.

use peoplefake::{
    error::DemoResult,
    logging,
    person::PersonDocument,
    reader::{self, ReadDemoParams},
    settings::ConnectionSettings,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> DemoResult<()> {
    logging::init();

    let settings = ConnectionSettings::default();
    info!(uri = %settings.uri, database = %settings.database, "connecting");
    let store = settings.connect().await?;

    let people = store.typed_collection::<PersonDocument>();
    let params = ReadDemoParams::default();
    let result = reader::run_read_demo(&people, &params, &mut std::io::stdout().lock()).await;

    if let Err(err) = &result {
        error!(%err, "read demo failed");
    }

    store.shutdown().await?;
    result
}
