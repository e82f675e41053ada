//! Load the overlap edge list from a csv file.
//!
//! The expected layout is the one of the subreddit overlap dataset : a header line
//! `t1_subreddit,t2_subreddit,NumOverlaps` then one line per (source, target, weight).
//! Lines beginning with # are skipped.

use anyhow::anyhow;

use std::fs::OpenOptions;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;

use crate::errors::EmbedError;
use crate::tools::edge::EdgeRecord;

// a raw line, weight is kept as a string to report line of malformed weights
#[derive(Debug, Deserialize)]
struct OverlapRow {
    #[serde(rename = "t1_subreddit")]
    source: String,
    #[serde(rename = "t2_subreddit")]
    target: String,
    #[serde(rename = "NumOverlaps")]
    weight: String,
} // end of OverlapRow

/// reads edges from a csv file with delimiter delim.
/// A malformed line is an error, returned to the caller. A weight that cannot be parsed
/// gives an EmbedError::InvalidInput (accessible by downcast) with the line number.
pub fn csv_to_edges(filepath: &Path, delim: u8) -> anyhow::Result<Vec<EdgeRecord>> {
    //
    let fileres = OpenOptions::new().read(true).open(filepath);
    let file = match fileres {
        Ok(file) => file,
        Err(e) => {
            log::error!("csv_to_edges could not open file {:?}", filepath.as_os_str());
            return Err(anyhow!("csv_to_edges could not open file {:?} : {}", filepath, e));
        }
    };
    log::info!("csv_to_edges reading file {:?}", filepath);
    let edges = edges_from_reader(BufReader::new(file), delim)?;
    Ok(edges)
} // end of csv_to_edges

/// reads edges from any reader, see [csv_to_edges]
pub fn edges_from_reader<R: Read>(reader: R, delim: u8) -> anyhow::Result<Vec<EdgeRecord>> {
    //
    let mut rdr = ReaderBuilder::new()
        .delimiter(delim)
        .flexible(false)
        .has_headers(true)
        .comment(Some(b'#'))
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    log::debug!("edges_from_reader headers : {:?}", headers);
    //
    let mut edges = Vec::<EdgeRecord>::with_capacity(100_000);
    let mut nb_record = 0;
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::error!("edges_from_reader error after {} records : {}", nb_record, e);
                return Err(anyhow!("csv parse error : {}", e));
            }
        };
        let line = record.position().map(|p| p.line() as usize);
        let row: OverlapRow = match record.deserialize(Some(&headers)) {
            Ok(row) => row,
            Err(e) => {
                log::error!("edges_from_reader could not decode line {:?} : {}", line, e);
                return Err(anyhow!("csv decode error at line {:?} : {}", line, e));
            }
        };
        let weight = match row.weight.trim().parse::<f64>() {
            Ok(weight) => weight,
            Err(_) => {
                log::error!("edges_from_reader bad weight {:?} at line {:?}", row.weight, line);
                return Err(EmbedError::invalid_input(line, format!("could not parse weight {:?}", row.weight)).into());
            }
        };
        edges.push(EdgeRecord {
            source: row.source,
            target: row.target,
            weight,
        });
        nb_record += 1;
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("{:?}", record);
        }
    }
    log::info!("edges_from_reader nb records : {}", nb_record);
    Ok(edges)
} // end of edges_from_reader

// end of mod tests
