//! Startup connection to the MongoDB database.

use mongodb::{Client, Database, bson::doc};

/// Connect to the MongoDB deployment at `uri` and open `database_name`.
///
/// The server is pinged so that an unreachable deployment fails here, at
/// startup, rather than on the first request. Callers should treat a failure
/// as fatal.
///
/// # Errors
/// Returns an error if the URI cannot be parsed or the server does not
/// respond to the ping.
pub async fn connect(uri: &str, database_name: &str) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri).await?;
    let database = client.database(database_name);

    database.run_command(doc! { "ping": 1 }).await?;

    Ok(database)
}
