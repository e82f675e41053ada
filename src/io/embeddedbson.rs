//! module to do bson io for embedding results
//!
//!  Data are formatted in a sequence of bson Documents, each value has a key.
//!
//!  The encoding is done in 3 parts:
//! 1. A document with key "header" containing the structure described below see struct [Header](EmbeddedBsonHeader)
//! - a version index
//! - base type name of vectors (f64) encoded as a String. key is type_name.
//! - dimension of vectors
//! - number of vectors
//! - the parameters of the embedding if they were given to the dump, under key "params"
//!
//! 2. The embedded vectors, one document per vector, in rank order.
//!    Each vector has a key corresponding to its rank so the first vector of embedding has key "0",
//!    the second "1" ...
//!
//! 3. The entity indexation can also be encoded in a last document.
//!    The dump of indexation is not mandatory as it can be retrieved by running the ranking on the original csv again.
//!    If the document is present : each entity name is a key associated to the entity rank as i64.
//!

// Note : a Bson document must not be larger than 16Mb!
// So we need to have many Documents in the file dumped

use anyhow::anyhow;

use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};

use indexmap::IndexSet;
use ndarray::{Array2, ArrayView1};
use num_traits::cast::FromPrimitive;

use crate::embedding::Embedding;
use crate::io::output::Output;
use crate::params::EmbedParams;

/// version of the dump format
pub const BSON_DUMP_VERSION: i64 = 1;

/// This structure defines the header of the bson document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedBsonHeader {
    /// version of dump format
    pub version: i64,
    /// encodes type of vectors used in the embedding.
    pub type_name: String,
    /// dimension of the embedding (length of vectors)
    pub dimension: i64,
    /// number of vectors.
    pub nbdata: i64,
    /// parameters used to compute the embedding, if dumped
    #[serde(default)]
    pub params: Option<EmbedParams>,
} // end of EmbeddedBsonHeader

/// dump an embedding in bson format in file output.get_output_name().
/// If output.get_indexation() is true, entity indexation will also be dumped, and retrieved from bson file.
/// The dump consists in a header document. Then each entity vector is dumped in its document (a bson document must less than 16Mb)
/// The last document contains the indexation if dump is asked for.
///
pub fn bson_dump(embedding: &Embedding, params: Option<&EmbedParams>, output: &Output) -> Result<(), anyhow::Error> {
    //
    log::info!("entering bson_dump");
    //
    let path = Path::new(output.get_output_name());
    let fileres = OpenOptions::new().write(true).create(true).truncate(true).open(path);
    let file = match fileres {
        Ok(file) => file,
        Err(e) => {
            log::error!("bson_dump could not open file : {}", path.display());
            return Err(anyhow!("could not open file : {}, {}", path.display(), e));
        }
    };
    let mut bufwriter = BufWriter::new(file);
    let mut doc = Document::new();
    // dump header part
    let dim: i64 = FromPrimitive::from_usize(embedding.get_dimension()).ok_or_else(|| anyhow!("dimension overflow"))?;
    let nbdata: i64 =
        FromPrimitive::from_usize(embedding.get_nb_entities()).ok_or_else(|| anyhow!("nb entities overflow"))?;
    let mut bson_header = doc! {
        "version": BSON_DUMP_VERSION,
        "type_name": std::any::type_name::<f64>(),
        "dimension": dim,
        "nbdata": nbdata
    };
    if let Some(params) = params {
        let bson_params = bson::to_bson(params).map_err(|e| anyhow!("could not encode params : {}", e))?;
        bson_header.insert("params", bson_params);
    }
    doc.insert("header", bson_header);
    let res = doc.to_writer(&mut bufwriter);
    if let Err(e) = res {
        log::error!("dump header bson in {} failed", path.display());
        return Err(anyhow!("dump of bson failed: {}", e));
    }
    // now loop on data vectors
    for i in 0..embedding.get_nb_entities() {
        let mut doc = Document::new();
        let data: Vec<Bson> = embedding.get_embedded_entity(i).iter().map(|x| Bson::Double(*x)).collect();
        doc.insert(i.to_string(), data);
        let res = doc.to_writer(&mut bufwriter);
        if let Err(e) = res {
            log::error!("bson dump error in entity {i}");
            return Err(anyhow!("bson dump error for entity {i} {}", e));
        }
    }
    // We dump indexation as a document with each key being the entity name
    if output.get_indexation() {
        log::info!("\t dumping entity indexation");
        let mut bson_indexation = Document::new();
        for (rank, entity) in embedding.get_entity_indexation().iter().enumerate() {
            bson_indexation.insert(entity.clone(), rank as i64);
        }
        let res = bson_indexation.to_writer(&mut bufwriter);
        if let Err(e) = res {
            log::error!("dump indexation bson in {} failed", path.display());
            return Err(anyhow!("dump of bson failed: {}", e));
        }
        log::debug!("\t entity indexation bson encoded");
    } // end dump indexation
    bufwriter.flush()?;
    //
    log::info!("bson dump in file {} finished", path.display());
    //
    Ok(())
} // end of bson_dump

// opens file and decodes the header document
fn read_header(bufreader: &mut BufReader<std::fs::File>, path: &Path) -> Result<EmbeddedBsonHeader, anyhow::Error> {
    let doc = match Document::from_reader(bufreader) {
        Ok(doc) => doc,
        Err(e) => {
            log::error!("could not load document from file {}", path.display());
            return Err(anyhow!(e));
        }
    };
    let bson_header = match doc.get("header") {
        Some(header) => header.clone(),
        None => {
            log::error!("could not load header from file {}", path.display());
            return Err(anyhow!("could not find header in document"));
        }
    };
    let header: EmbeddedBsonHeader = bson::from_bson(bson_header).map_err(|e| anyhow!("could not decode header : {}", e))?;
    Ok(header)
} // end of read_header

fn open_dump(fname: &str) -> Result<BufReader<std::fs::File>, anyhow::Error> {
    let path = Path::new(fname);
    let fileres = OpenOptions::new().read(true).open(path);
    match fileres {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) => {
            log::error!("reload of bson dump {} failed", path.display());
            Err(anyhow!("reload failed: {}", e))
        }
    }
} // end of open_dump

/// returns the bson header of an embedding dump.
pub fn get_bson_header(fname: &str) -> Result<EmbeddedBsonHeader, anyhow::Error> {
    log::info!("get_bson_header: trying to open file : {:?}", fname);
    let mut bufreader = open_dump(fname)?;
    let header = read_header(&mut bufreader, Path::new(fname))?;
    log::info!(" bson header reloaded");
    Ok(header)
} // end of get_bson_header

/// The structure returned by bson_load.
pub struct EmbeddedBsonReload {
    ///
    pub(crate) header: EmbeddedBsonHeader,
    /// the (n, d) embedded vectors
    pub(crate) embedded: Array2<f64>,
    /// If indexation was dumped in bson
    pub(crate) entities: Option<IndexSet<String>>,
} // end of EmbeddedBsonReload

impl EmbeddedBsonReload {
    /// returns embedded data.
    pub fn get_embedded(&self) -> &Array2<f64> {
        &self.embedded
    }
    /// returns entity indexation if present
    pub fn get_entity_indexation(&self) -> Option<&IndexSet<String>> {
        self.entities.as_ref()
    }
    /// returns header
    pub fn get_header(&self) -> &EmbeddedBsonHeader {
        &self.header
    }

    pub(crate) fn into_parts(self) -> (Array2<f64>, Option<IndexSet<String>>) {
        (self.embedded, self.entities)
    }
} // end of impl EmbeddedBsonReload

/// reloads embedded data from a previous bson dump and returns a EmbeddedBsonReload structure.
/// The structure Embedding can be reconstituted from it with [from_bson_reload](crate::embedding::from_bson_reload)
///
pub fn bson_load(fname: &str) -> Result<EmbeddedBsonReload, anyhow::Error> {
    //
    log::info!("entering bson_load, file name : {:?}", fname);
    //
    let path = Path::new(fname);
    let mut bufreader = open_dump(fname)?;
    let header = read_header(&mut bufreader, path)?;
    log::info!("header : {:?}", header);
    if header.version != BSON_DUMP_VERSION {
        log::error!("header format version : {}", header.version);
        return Err(anyhow!("format version error, inconsistent with header"));
    }
    let type_name = std::any::type_name::<f64>();
    if header.type_name != type_name {
        log::error!("header as type name : {}, reloading with : {}", header.type_name, type_name);
        return Err(anyhow!("type error, inconsistent with header"));
    }
    let nb_data: usize = FromPrimitive::from_i64(header.nbdata).ok_or_else(|| anyhow!("bad nbdata in header"))?;
    let dim: usize = FromPrimitive::from_i64(header.dimension).ok_or_else(|| anyhow!("bad dimension in header"))?;
    log::debug!("bson_load , nb_data = {nb_data}, dim : {dim}");
    //
    let mut embedded = Array2::<f64>::zeros((0, dim));
    for i in 0..nb_data {
        // we have one document for each entity
        let doc = match Document::from_reader(&mut bufreader) {
            Ok(doc) => doc,
            Err(e) => {
                log::error!("could not load document for entity {i} from file {}", path.display());
                return Err(anyhow!(e));
            }
        };
        let key = i.to_string();
        let bson_vec = match doc.get(&key) {
            Some(bson_vec) => bson_vec.clone(),
            None => {
                log::error!("could not get record for key {:?}", key);
                return Err(anyhow!("could not get record for key {:?}", key));
            }
        };
        let data_1d: Vec<f64> = match bson::from_bson(bson_vec) {
            Ok(data) => data,
            Err(e) => {
                log::error!("bson decoding error for entity {i}, key : {key}, err : {:?}", e);
                return Err(anyhow!("bson decoding error for entity {i}"));
            }
        };
        let res = embedded.push_row(ArrayView1::from(data_1d.as_slice()));
        if res.is_err() {
            return Err(anyhow!("could not insert vector {:?}, length {}", i, data_1d.len()));
        }
    }
    log::info!("\t finished bson decoding of embedded vectors");
    // trying indexation
    let res = Document::from_reader(&mut bufreader);
    let bson_indexation = match res {
        Ok(doc) => doc,
        Err(e) => {
            log::info!("could not find indexation document from file {}, err : {:?}", path.display(), e);
            return Ok(EmbeddedBsonReload {
                header,
                embedded,
                entities: None,
            });
        }
    };
    log::info!("\t found document, entity indexation");
    let mut by_rank: Vec<Option<String>> = vec![None; nb_data];
    for (name, bson_rank) in bson_indexation.iter() {
        let rank = bson_rank.as_i64().and_then(|r| usize::from_i64(r));
        match rank {
            Some(rank) if rank < nb_data && by_rank[rank].is_none() => {
                by_rank[rank] = Some(name.clone());
            }
            _ => {
                log::error!("could not get rank for entity {}", name);
                return Err(anyhow!("could not get rank for entity {}", name));
            }
        }
    }
    let mut entities = IndexSet::<String>::with_capacity(nb_data);
    for (rank, name) in by_rank.into_iter().enumerate() {
        match name {
            Some(name) => {
                entities.insert(name);
            }
            None => {
                return Err(anyhow!("no entity with rank {} in indexation", rank));
            }
        }
    }
    Ok(EmbeddedBsonReload {
        header,
        embedded,
        entities: Some(entities),
    })
} // end of bson_load

// end of mod tests
