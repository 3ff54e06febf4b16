//! GeoTIFF raster resources decoded with the `tiff` crate.
//!
//! Only the georeferencing tags are interpreted: `ModelPixelScaleTag` and `ModelTiepointTag`
//! give the grid extent in the source CRS. No reprojection is done here, so a resource in a
//! projected CRS reports a projected extent, which the viewport logic rejects as implausible.

use std::io::{Cursor, Read, Seek};
use std::sync::Arc;

use futures::{stream, StreamExt};
use stressmap_types::{Crs, Extent};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tiff::TiffError;

use super::{RasterSourceProvider, SourceState, StateStream};
use crate::loader::ResourceLoader;

/// Opens GeoTIFF resources through a [`ResourceLoader`].
pub struct GeoTiffSourceProvider {
    loader: Arc<dyn ResourceLoader>,
}

impl GeoTiffSourceProvider {
    /// Creates a provider fetching resources with `loader`.
    pub fn new(loader: Arc<dyn ResourceLoader>) -> Self {
        Self { loader }
    }
}

impl RasterSourceProvider for GeoTiffSourceProvider {
    fn open(&self, url: &str, source_crs: Crs) -> StateStream {
        let loader = self.loader.clone();
        let url = url.to_owned();

        let terminal = stream::once(async move {
            let bytes = match loader.load_bytes(&url).await {
                Ok(bytes) => bytes,
                Err(err) => return SourceState::Error(format!("failed to fetch {url}: {err}")),
            };

            match read_tile_grid_extent(Cursor::new(bytes)) {
                Ok(tile_grid_extent) => {
                    log::debug!("GeoTIFF {url} ({source_crs}) extent: {tile_grid_extent:?}");
                    SourceState::Ready { tile_grid_extent }
                }
                Err(err) => SourceState::Error(format!("failed to decode {url}: {err}")),
            }
        });

        let states = stream::iter([SourceState::Loading]).chain(terminal);
        #[cfg(not(target_arch = "wasm32"))]
        let states = states.boxed();
        #[cfg(target_arch = "wasm32")]
        let states = states.boxed_local();

        states
    }
}

/// Reads the grid extent from the georeferencing tags.
///
/// Returns `Ok(None)` for a valid TIFF without georeferencing.
pub fn read_tile_grid_extent<R: Read + Seek>(reader: R) -> Result<Option<Extent>, TiffError> {
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;

    let Ok(scale) = decoder.get_tag_f64_vec(Tag::ModelPixelScaleTag) else {
        return Ok(None);
    };
    let Ok(tiepoint) = decoder.get_tag_f64_vec(Tag::ModelTiepointTag) else {
        return Ok(None);
    };

    Ok(extent_from_tags(&scale, &tiepoint, width, height))
}

/// Extent of a `width x height` grid from pixel scale `[sx, sy, sz]` and tiepoint
/// `[i, j, k, x, y, z]`. North-up grids only.
fn extent_from_tags(scale: &[f64], tiepoint: &[f64], width: u32, height: u32) -> Option<Extent> {
    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    let x_min = tiepoint[3] - tiepoint[0] * scale[0];
    let y_max = tiepoint[4] + tiepoint[1] * scale[1];
    let x_max = x_min + width as f64 * scale[0];
    let y_min = y_max - height as f64 * scale[1];

    Some(Extent::new(x_min, y_min, x_max, y_max))
}

/// Decodes the first band of the image as `f64` samples, with the image dimensions.
///
/// Interleaved multi-sample images are reduced to their first sample per pixel.
pub fn read_first_band<R: Read + Seek>(reader: R) -> Result<(u32, u32, Vec<f64>), TiffError> {
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;

    let samples: Vec<f64> = match decoder.read_image()? {
        DecodingResult::U8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F64(buf) => buf,
    };

    let pixels = width as usize * height as usize;
    let samples_per_pixel = if pixels == 0 { 1 } else { (samples.len() / pixels).max(1) };
    let band = if samples_per_pixel == 1 {
        samples
    } else {
        samples.into_iter().step_by(samples_per_pixel).collect()
    };

    Ok((width, height, band))
}
