use std::collections::BTreeMap;

use clap::Parser;
use reqwest::Client;
use serde_json::{Value, json};

/// Fires concurrent redemptions at a running server and tallies the responses
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Staff passes to redeem with, cycled across attempts
    #[arg(required = true)]
    staff_pass_ids: Vec<String>,

    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    #[arg(long, default_value_t = 100)]
    attempts: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = Client::new();
    let endpoint = format!("{}/redemption", args.url.trim_end_matches('/'));

    let tasks: Vec<_> = (0..args.attempts)
        .map(|i| {
            let client = client.clone();
            let endpoint = endpoint.clone();
            let staff_pass_id = args.staff_pass_ids[i % args.staff_pass_ids.len()].clone();

            tokio::spawn(async move {
                let response = client
                    .post(&endpoint)
                    .json(&json!({ "staff_pass_id": staff_pass_id }))
                    .send()
                    .await?;

                let status = response.status().as_u16();
                let body: Value = response.json().await?;

                Ok::<_, reqwest::Error>((status, body))
            })
        })
        .collect();

    let mut statuses = BTreeMap::new();
    for task in tasks {
        let (status, body) = task.await??;

        if status == 200 {
            println!("Winner: {body}");
        }

        *statuses.entry(status).or_insert(0) += 1;
    }

    for (status, count) in &statuses {
        println!("{status}: {count}");
    }

    Ok(())
}
