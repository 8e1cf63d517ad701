#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Snapshot inspection CLI for the relief map core.
//!
//! Operates on a JSON dump of the report store: show the nearby-recent feed
//! for an anchor, list every sanitized report, print triage bucket counts,
//! or estimate the distance between two geohashes.

mod source;

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use relief_map_feed::{FeedIncident, filter_nearby_recent, sort_by_distance};
use relief_map_incident_models::IncidentRecord;
use relief_map_location::AnchorLocation;
use relief_map_snapshot::{fetch_or_empty, sanitize_all};
use relief_map_triage::classify;

use crate::source::FileSnapshotSource;

/// Geohash precision used for the anchor point of distance annotations.
const DISTANCE_ANCHOR_PRECISION: usize = 9;

#[derive(Parser)]
#[command(name = "relief_map_cli", about = "Relief map snapshot inspection tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show reports near an anchor that were submitted within the last week
    Nearby {
        /// Path to a snapshot JSON dump (object keyed by composite id)
        snapshot: PathBuf,
        /// Anchor latitude (with --lng; alternative to --prefix)
        #[arg(long, requires = "lng", conflicts_with = "prefix")]
        lat: Option<f64>,
        /// Anchor longitude
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
        /// Anchor geohash prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Evaluate the freshness window at this Unix time instead of now
        #[arg(long)]
        now: Option<i64>,
        /// Sort by distance from the anchor instead of snapshot order
        #[arg(long)]
        sort: bool,
    },
    /// List every report, sanitized, regardless of location or age
    List {
        /// Path to a snapshot JSON dump
        snapshot: PathBuf,
    },
    /// Show triage bucket counts and membership
    Triage {
        /// Path to a snapshot JSON dump
        snapshot: PathBuf,
    },
    /// Estimate the distance between two geohashes
    Distance {
        /// Anchor geohash
        anchor: String,
        /// Target geohash
        target: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Nearby {
            snapshot,
            lat,
            lng,
            prefix,
            now,
            sort,
        } => {
            let (anchor_prefix, anchor_geohash) = resolve_anchor(lat, lng, prefix)?;
            let now = now.unwrap_or_else(|| Utc::now().timestamp());

            let store = fetch_or_empty(&FileSnapshotSource::new(snapshot)).await;
            let mut feed = filter_nearby_recent(&store, &anchor_prefix, now);
            log::info!(
                "{} of {} report(s) near {anchor_prefix:?}",
                feed.len(),
                store.len()
            );

            if sort {
                feed = sort_by_distance(feed, &anchor_geohash);
            }

            for incident in &feed {
                print_incident(incident, &anchor_geohash);
            }
            println!("{} report(s)", feed.len());
        }
        Commands::List { snapshot } => {
            let store = fetch_or_empty(&FileSnapshotSource::new(snapshot)).await;
            let listing = sanitize_all(&store);

            for (unique_id, payload) in &listing {
                let record = IncidentRecord::from_payload(unique_id, payload);
                println!(
                    "{unique_id}  {} {} [{}]",
                    record.emergency_type, record.urgency_level, record.status
                );
            }
            println!("{} report(s)", listing.len());
        }
        Commands::Triage { snapshot } => {
            let store = fetch_or_empty(&FileSnapshotSource::new(snapshot)).await;
            let records: Vec<IncidentRecord> = sanitize_all(&store)
                .iter()
                .map(|(unique_id, payload)| IncidentRecord::from_payload(unique_id, payload))
                .collect();

            let buckets = classify(records);
            let counts = buckets.counts();
            println!(
                "active: {}  pending: {}  archived: {}",
                counts.active, counts.pending, counts.archived
            );

            for (label, bucket) in [
                ("active", &buckets.active),
                ("pending", &buckets.pending),
                ("archived", &buckets.archived),
            ] {
                println!("{label}:");
                for record in bucket {
                    println!(
                        "  {}  {} {} [{}]",
                        record.unique_id,
                        record.emergency_type,
                        record.urgency_level,
                        record.status
                    );
                }
            }
        }
        Commands::Distance { anchor, target } => {
            println!("{}", relief_map_geo::estimate_distance(&anchor, &target));
        }
    }

    Ok(())
}

/// Resolves the anchor prefix (for filtering) and anchor geohash (for
/// distance annotation) from the CLI flags.
fn resolve_anchor(
    lat: Option<f64>,
    lng: Option<f64>,
    prefix: Option<String>,
) -> Result<(String, String), Box<dyn std::error::Error>> {
    if let Some(prefix) = prefix {
        // A bare prefix doubles as a coarse distance anchor.
        return Ok((prefix.clone(), prefix));
    }

    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            let anchor = AnchorLocation::new(lat, lng, Utc::now())?;
            let full = relief_map_geo::encode(lat, lng, DISTANCE_ANCHOR_PRECISION)?;
            Ok((anchor.geohash_prefix, full))
        }
        _ => Err("provide either --prefix or both --lat and --lng".into()),
    }
}

fn print_incident(incident: &FeedIncident, anchor_geohash: &str) {
    let record = incident.record();
    let distance = incident.distance_from(anchor_geohash);
    println!(
        "{}  {} {} [{}]  {}  {}",
        record.unique_id,
        record.emergency_type,
        record.urgency_level,
        record.status,
        distance,
        record.situation
    );
}
