//! Web server command

use anyhow::Result;

pub async fn cmd_serve(host: &str, port: u16) -> Result<()> {
    moneymap_server::serve(host, port).await
}
