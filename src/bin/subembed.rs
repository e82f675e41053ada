//! an executable for embedding subreddits from their overlap counts
//! example usage:
//! subembed --csv "subreddit-overlap.csv" --dim 500 --seed 1 --output subreddits
//! subembed --csv "overlaps.tsv" --delim "\t" --dim 100 --tiebreak lexico --drop-unknown --nbiter 3
//!
//! The csv file must have a header t1_subreddit,t2_subreddit,NumOverlaps.
//! The embedding is dumped in bson format with its entity indexation, see module io::embeddedbson.
//!

use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command};

use cpu_time::ProcessTime;
use std::time::SystemTime;

use subembed::prelude::*;

// parse an optional numeric argument, returning default if absent
fn parse_or<T: std::str::FromStr>(matches: &ArgMatches, name: &str, default: T) -> Result<T, anyhow::Error> {
    match matches.value_of(name) {
        Some(str) => match str.parse::<T>() {
            Ok(val) => Ok(val),
            _ => Err(anyhow!("error parsing {}, got {:?}", name, str)),
        },
        None => Ok(default),
    }
} // end of parse_or

fn parse_params(matches: &ArgMatches) -> Result<EmbedParams, anyhow::Error> {
    log::debug!("in parse_params");
    //
    let defaults = EmbedParams::default();
    let dimension = parse_or::<usize>(matches, "dim", defaults.get_dimension())?;
    let seed = parse_or::<u64>(matches, "seed", defaults.get_seed())?;
    let nb_power_iter = parse_or::<usize>(matches, "nbiter", defaults.get_nb_power_iter())?;
    let oversampling = parse_or::<usize>(matches, "oversampling", defaults.get_oversampling())?;
    let tie_break = match matches.value_of("tiebreak") {
        Some("first") | None => TieBreak::FirstSeen,
        Some("lexico") => TieBreak::Lexicographic,
        Some(other) => {
            return Err(anyhow!("tiebreak must be first or lexico, got {:?}", other));
        }
    };
    let unknown_policy = if matches.is_present("dropunknown") {
        UnknownEntityPolicy::Drop
    } else {
        UnknownEntityPolicy::Fail
    };
    //
    let params = EmbedParams::new(dimension, seed)
        .with_tie_break(tie_break)
        .with_unknown_policy(unknown_policy)
        .with_power_iter(nb_power_iter)
        .with_oversampling(oversampling);
    Ok(params)
} // end of parse_params

// accepts a single byte delimiter, "\t" or "tab" for tabulation
fn parse_delimiter(matches: &ArgMatches) -> Result<u8, anyhow::Error> {
    match matches.value_of("delim") {
        None => Ok(b','),
        Some("\\t") | Some("tab") => Ok(b'\t'),
        Some(str) if str.len() == 1 => Ok(str.as_bytes()[0]),
        Some(str) => Err(anyhow!("delimiter must be a single byte, got {:?}", str)),
    }
} // end of parse_delimiter

pub fn main() {
    //
    env_logger::Builder::from_default_env().init();
    log::info!("logger initialized");
    //
    let matches = Command::new("subembed")
        .arg_required_else_help(true)
        .arg(
            Arg::new("csvfile")
                .long("csv")
                .takes_value(true)
                .required(true)
                .help("expecting a csv file with header t1_subreddit,t2_subreddit,NumOverlaps"),
        )
        .arg(
            Arg::new("delim")
                .long("delim")
                .takes_value(true)
                .help("csv delimiter, default is ','"),
        )
        .arg(
            Arg::new("dim")
                .short('d')
                .long("dim")
                .takes_value(true)
                .help("the embedding dimension, default 500"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .takes_value(true)
                .help("seed of random generator, default 1"),
        )
        .arg(
            Arg::new("tiebreak")
                .long("tiebreak")
                .takes_value(true)
                .possible_values(["first", "lexico"])
                .help("order of entities with equal popularity : first (first seen) or lexico"),
        )
        .arg(
            Arg::new("dropunknown")
                .long("drop-unknown")
                .help("drop edges whose source is never a target instead of failing"),
        )
        .arg(
            Arg::new("nbiter")
                .long("nbiter")
                .takes_value(true)
                .help("number of power iterations in randomized svd, default 5"),
        )
        .arg(
            Arg::new("oversampling")
                .long("oversampling")
                .takes_value(true)
                .help("number of random vectors added to dimension, default 10"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .takes_value(true)
                .help("name of bson output, default embedding.bson"),
        )
        .get_matches();

    // decode args
    let fname = match matches.value_of("csvfile") {
        Some(str) if !str.is_empty() => String::from(str),
        _ => {
            log::error!("parsing of csv file name failed");
            std::process::exit(1);
        }
    };
    log::info!("input file : {:?}", fname);
    let params = match parse_params(&matches) {
        Ok(params) => params,
        Err(e) => {
            log::error!("error : {:?}", e);
            std::process::exit(1);
        }
    };
    let delim = match parse_delimiter(&matches) {
        Ok(delim) => delim,
        Err(e) => {
            log::error!("error : {:?}", e);
            std::process::exit(1);
        }
    };
    let output = Output::new(Format::BSON, true, &matches.value_of("output").map(String::from));
    log::info!("params : {:?}, output : {:?}", params, output);
    //
    let start_t = SystemTime::now();
    let cpu_start = ProcessTime::now();
    //
    let path = std::path::Path::new(&fname);
    let edges = match csv_to_edges(path, delim) {
        Ok(edges) => edges,
        Err(e) => {
            log::error!("error : {:?}", e);
            log::error!("subembed failed in csv_to_edges, reading {:?}", &path);
            std::process::exit(1);
        }
    };
    //
    let mut embedder = OverlapEmbedder::new(edges, params);
    let embedding = match embedder.embed() {
        Ok(embedding) => embedding,
        Err(e) => {
            log::error!("error : {}", e);
            log::error!("overlap embedding failed");
            std::process::exit(1);
        }
    };
    log::info!(
        "embedding done, nb entities : {}, dimension : {}, sys time(ms) {:?} cpu time(ms) {:?}",
        embedding.get_nb_entities(),
        embedding.get_dimension(),
        start_t.elapsed().map(|d| d.as_millis()).unwrap_or(0),
        cpu_start.elapsed().as_millis()
    );
    //
    if let Err(e) = bson_dump(&embedding, Some(&params), &output) {
        log::error!("error : {:?}", e);
        log::error!("bson dump in {} failed", output.get_output_name());
        std::process::exit(1);
    }
    log::info!("embedding dumped in {}", output.get_output_name());
} // end of main
