//! Lists case files with WSSE credentials passed on the command line.
//!
//! ```sh
//! cargo run --example list_casefiles -- https://sandbox.penneo.com/api/v3/ <key> <secret>
//! ```

// std
use std::env;
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use penneo_sdk::{ConfigUpdate, ReqwestConnector};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut args = env::args().skip(1);
	let (Some(base_url), Some(key), Some(secret)) = (args.next(), args.next(), args.next()) else {
		return Err(eyre!("Usage: list_casefiles <base-url> <key> <secret>"));
	};
	let connector = ReqwestConnector::new();

	connector.init(ConfigUpdate::new().base_url(base_url).key(key).secret(secret))?;

	let envelope = connector.casefiles().list().await?;

	if !envelope.is_success() {
		return Err(eyre!("Penneo responded with HTTP {}: {}", envelope.status, envelope.body));
	}

	for casefile in envelope.body.as_array().into_iter().flatten() {
		println!("{}: {}", casefile["id"], casefile["title"]);
	}

	Ok(())
}
