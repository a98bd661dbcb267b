/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use clap::Parser;
use dynamo_marshal::{dynamo_item, marshal};
use dynamo_types::input::PutItemRequest;
use serde::Serialize;
use std::collections::BTreeMap;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints the PutItem body that stores a movie.
///
/// Run with `RUST_LOG=dynamo_marshal=trace` to see each field decision.
#[derive(Debug, Parser)]
#[command(about, version)]
struct Args {
    #[arg(long, default_value = "movies")]
    table: String,
    #[arg(long)]
    title: String,
    #[arg(long, default_value_t = 0)]
    year: u16,
    #[arg(long)]
    rating: Option<f64>,
    /// May be repeated.
    #[arg(long = "genre")]
    genres: Vec<String>,
    /// `role=actor`, may be repeated. Stored as JSON text.
    #[arg(long = "cast", value_parser = parse_role)]
    cast: Vec<(String, String)>,
    #[arg(long, default_value = "")]
    notes: String,
}

fn parse_role(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(role, actor)| (role.to_string(), actor.to_string()))
        .ok_or_else(|| format!("expected role=actor, found `{}`", arg))
}

#[derive(Serialize)]
struct Movie {
    title: String,
    year: u16,
    rating: Option<f64>,
    genres: Vec<String>,
    cast: BTreeMap<String, String>,
    notes: String,
}

dynamo_item!(Movie {
    title: "Title",
    year: "Year,omitempty",
    rating: "Rating",
    genres: "Genres,SS",
    cast: "Cast",
    notes: "-",
});

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let movie = Movie {
        title: args.title,
        year: args.year,
        rating: args.rating,
        genres: args.genres,
        cast: args.cast.into_iter().collect(),
        notes: args.notes,
    };
    let item = match marshal(&movie) {
        Ok(item) => item,
        Err(err) => {
            tracing::error!(error = %err, "failed to marshal movie");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(attributes = item.len(), table = %args.table, "movie marshaled");
    match serde_json::to_string_pretty(&PutItemRequest::new(args.table, item)) {
        Ok(body) => {
            println!("{}", body);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize request");
            ExitCode::FAILURE
        }
    }
}
