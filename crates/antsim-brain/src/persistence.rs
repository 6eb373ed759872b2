//! Weight dump format
//!
//! Layout, all values big-endian:
//!
//! ```text
//! i32 layer_count
//! per transition:
//!     i32 rows (inputs + 1 for the bias)
//!     i32 cols (outputs)
//!     rows * cols f64 weights, row-major
//! ```
//!
//! Only weights are stored. Loading requires the topology up front and
//! rejects any stored dimension that does not match it.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use ndarray::Array2;
use rand::Rng;

use crate::error::NetworkError;
use crate::layer::Layer;
use crate::network::Network;

/// Write `network`'s weights to `writer`
pub fn write_weights<W: Write>(network: &Network, writer: &mut W) -> Result<(), NetworkError> {
    write_count(writer, network.layers().len())?;
    for matrix in network.weights() {
        write_count(writer, matrix.nrows())?;
        write_count(writer, matrix.ncols())?;
        for weight in matrix.iter() {
            writer.write_all(&weight.to_be_bytes())?;
        }
    }
    Ok(())
}

/// Read weights for a network with the given `layers`
pub fn read_weights<R: Read>(
    layers: impl Into<Arc<[Layer]>>,
    reader: &mut R,
) -> Result<Network, NetworkError> {
    let layers = layers.into();

    let layer_count = read_count(reader)?;
    if layer_count != layers.len() {
        return Err(NetworkError::LayerCountMismatch {
            expected: layers.len(),
            found: layer_count,
        });
    }

    let mut weights = Vec::with_capacity(layers.len().saturating_sub(1));
    for (transition, pair) in layers.windows(2).enumerate() {
        let rows = read_count(reader)?;
        let cols = read_count(reader)?;
        let expected_rows = pair[0].neuron_count + 1;
        let expected_cols = pair[1].neuron_count;
        if rows != expected_rows || cols != expected_cols {
            return Err(NetworkError::DimensionMismatch {
                transition,
                expected_rows,
                expected_cols,
                found_rows: rows,
                found_cols: cols,
            });
        }

        let mut values = Vec::with_capacity(rows * cols);
        let mut buf = [0u8; 8];
        for _ in 0..rows * cols {
            reader.read_exact(&mut buf)?;
            values.push(f64::from_be_bytes(buf));
        }
        let matrix = Array2::from_shape_vec((rows, cols), values)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        weights.push(matrix);
    }

    Network::from_weights(layers, weights)
}

/// Write `network` to `path`, replacing any existing file
pub fn save_to_file(network: &Network, path: impl AsRef<Path>) -> Result<(), NetworkError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_weights(network, &mut writer)?;
    writer.flush()?;
    log::info!("Saved {} network to {}", network, path.display());
    Ok(())
}

/// Load a network of topology `layers` from `path`
pub fn load_from_file(
    layers: impl Into<Arc<[Layer]>>,
    path: impl AsRef<Path>,
) -> Result<Network, NetworkError> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let network = read_weights(layers, &mut reader)?;
    log::info!("Loaded {} network from {}", network, path.display());
    Ok(network)
}

/// Load from `path` when it exists
///
/// A missing file is `Ok(None)`. Any other failure (unreadable file, wrong
/// dimensions) is returned.
pub fn load_if_exists(
    layers: impl Into<Arc<[Layer]>>,
    path: impl AsRef<Path>,
) -> Result<Option<Network>, NetworkError> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("Weights file {} not found", path.display());
        return Ok(None);
    }
    load_from_file(layers, path).map(Some)
}

/// Load from `path`, or build a random network when the file does not exist
pub fn load_or_randomize<R: Rng + ?Sized>(
    layers: impl Into<Arc<[Layer]>>,
    path: impl AsRef<Path>,
    rng: &mut R,
) -> Result<Network, NetworkError> {
    let layers = layers.into();
    match load_if_exists(layers.clone(), path)? {
        Some(network) => Ok(network),
        None => Network::new_random(layers, rng),
    }
}

impl Network {
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), NetworkError> {
        save_to_file(self, path)
    }
}

fn write_count<W: Write>(writer: &mut W, value: usize) -> Result<(), NetworkError> {
    let value = i32::try_from(value).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "dimension exceeds i32 range")
    })?;
    writer.write_all(&value.to_be_bytes())?;
    Ok(())
}

fn read_count<R: Read>(reader: &mut R) -> Result<usize, NetworkError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    let value = i32::from_be_bytes(buf);
    usize::try_from(value).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("negative dimension {value} in weight data"),
        )
        .into()
    })
}
