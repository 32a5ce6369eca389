use mongodb::{Client, bson::doc};

use crate::common::{DatabaseError, DatabaseResult};

/// Run the `ping` command against the admin database
pub async fn ping(client: &Client) -> DatabaseResult<()> {
    let reply = client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    // `ok` comes back as a double or an int depending on server version
    let ok = reply
        .get_f64("ok")
        .ok()
        .or_else(|| reply.get_i32("ok").ok().map(f64::from))
        .unwrap_or(0.0);

    if ok >= 1.0 {
        Ok(())
    } else {
        Err(DatabaseError::HealthCheckFailed(format!("ping replied {}", reply)))
    }
}
