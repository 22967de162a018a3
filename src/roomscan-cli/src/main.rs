// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Deserialize;

use roomscan_engine::{Config, Point, Room, identify};

const EXIT_FAILURE: u8 = 1;

#[macro_export]
macro_rules! die(
    ($($arg:tt)*) => { {
        eprintln!($($arg)*);
        return ExitCode::from(EXIT_FAILURE);
    } }
);

/// Reconstruct rectangular rooms from a floor plan's wall-centerline polylines.
#[derive(Parser, Debug)]
#[command(name = "roomscan", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the room-identification pipeline over a polyline document.
    Identify(Args),
}

#[derive(clap::Args, Debug)]
struct Args {
    /// Path to a JSON file of polylines; reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Path to write the JSON room list; writes stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Minimum wall stroke width; accepted for parity with the upstream
    /// reader's contract, but the Flattener assumes this filter has already
    /// been applied and does not re-filter, so this is a documentation-only
    /// no-op here.
    #[arg(long)]
    stroke_thresh: Option<f64>,

    /// Pseudo-random sampling seed for the Caster stage.
    #[arg(long)]
    seed: Option<u64>,

    /// Pair-Seeder's maximum-gap allowance, as a multiple of mate distance.
    #[arg(long)]
    max_gap_ratio: Option<f64>,

    /// Polygoniser's minimum face area; faces smaller than this are dropped.
    #[arg(long)]
    min_room_area: Option<f64>,
}

/// Input document: `{"polylines": [[[x, y], ...], ...]}`, mirroring the
/// `{"rooms": [...]}` shape of the output.
#[derive(Deserialize)]
struct InputDoc {
    polylines: Vec<Vec<[f64; 2]>>,
}

fn read_input(args: &Args) -> io::Result<String> {
    let mut buf = String::new();
    match &args.input {
        Some(path) => {
            File::open(path)?.read_to_string(&mut buf)?;
        }
        None => {
            io::stdin().read_to_string(&mut buf)?;
        }
    }
    Ok(buf)
}

#[derive(serde::Serialize)]
struct OutputDoc<'a> {
    rooms: &'a [Room],
}

fn write_output(args: &Args, rooms: &[Room]) -> io::Result<()> {
    let doc = OutputDoc { rooms };
    let json = serde_json::to_string_pretty(&doc).expect("Room serialization cannot fail");
    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            writeln!(file, "{json}")
        }
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let Commands::Identify(args) = cli.command;

    let raw = match read_input(&args) {
        Ok(raw) => raw,
        Err(err) => die!("roomscan: failed to read input: {err}"),
    };

    let doc: InputDoc = match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(err) => die!("roomscan: invalid input JSON: {err}"),
    };

    let polylines: Vec<Vec<Point>> = doc
        .polylines
        .into_iter()
        .map(|poly| poly.into_iter().map(|[x, y]| Point::new(x, y)).collect())
        .collect();

    let mut config = Config::default();
    if let Some(stroke_thresh) = args.stroke_thresh {
        // Documentation-only: the Flattener never re-filters by stroke
        // width, so this only records the caller's intent in `Config`.
        config.stroke_thresh = stroke_thresh;
    }
    if let Some(seed) = args.seed {
        config.random_seed = seed;
    }
    if let Some(ratio) = args.max_gap_ratio {
        config.max_gap_ratio = ratio;
    }
    if let Some(area) = args.min_room_area {
        config.min_room_area = area;
    }
    config.validate();

    let rooms = identify(&polylines, &config);

    if let Err(err) = write_output(&args, &rooms) {
        die!("roomscan: failed to write output: {err}");
    }

    ExitCode::SUCCESS
}
