use crate::capacity::{analyze_region, check_capacity, check_extractable, CapacityAnalysis};
use crate::config::StegConfig;
use crate::container::{locate, ContainerKind, FormatDescriptor, PngRaster};
use crate::error::{Result, StegError};
use crate::header::{header_len, SecurityToken};
use crate::pipeline::{embed_stream, extract_stream, TransferStats};
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Result of one encode or decode call
#[derive(Debug, Clone)]
pub struct CarrierReport {
    pub descriptor: FormatDescriptor,
    pub offset: u64,
    pub stats: TransferStats,
}

/// Hide `payload_path` inside `cover_path`, writing the carrier to `dest_path`
/// with default configuration. The container kind follows the cover extension.
pub fn encode(
    cover_path: &Path,
    payload_path: &Path,
    dest_path: &Path,
    token: &SecurityToken,
) -> Result<CarrierReport> {
    hide_payload(cover_path, payload_path, dest_path, token, &StegConfig::default(), None)
}

/// Recover the payload hidden in `cover_path` into `dest_path` with default
/// configuration.
pub fn decode(cover_path: &Path, dest_path: &Path, token: &SecurityToken) -> Result<CarrierReport> {
    recover_payload(cover_path, dest_path, token, &StegConfig::default(), None)
}

/// Open → ValidateCapacity → SkipPreamble → Header → BulkTransfer → Close
///
/// The destination only appears once every stage has succeeded: output is
/// staged in a temporary file beside it and renamed into place at the end.
pub fn hide_payload(
    cover_path: &Path,
    payload_path: &Path,
    dest_path: &Path,
    token: &SecurityToken,
    config: &StegConfig,
    format: Option<ContainerKind>,
) -> Result<CarrierReport> {
    // Open
    ensure_file(cover_path, "source")?;
    ensure_file(payload_path, "data")?;
    let kind = ContainerKind::resolve(cover_path, format)?;

    let descriptor = locate(cover_path, kind)?;
    let payload_len = std::fs::metadata(payload_path)?.len();
    let offset = config.offset as u64;
    let header_bytes = header_len(token) as u64;

    // ValidateCapacity
    check_capacity(&descriptor, offset, header_bytes, payload_len)?;

    let mut payload = BufReader::new(File::open(payload_path)?);
    let mut staged = stage_destination(dest_path)?;

    let (descriptor, stats) = if kind.is_raster() {
        let mut raster = PngRaster::open(cover_path)?;
        let descriptor = raster.descriptor();
        check_capacity(&descriptor, offset, header_bytes, payload_len)?;

        let mut pixels = Vec::with_capacity(raster.pixels.len());
        let stats = embed_stream(
            &mut Cursor::new(&raster.pixels),
            &mut payload,
            payload_len,
            &mut pixels,
            token,
            offset,
            config,
        )?;
        raster.pixels = pixels;

        let mut writer = BufWriter::new(staged.as_file_mut());
        raster.write_png(&mut writer)?;
        writer.flush()?;
        (descriptor, stats)
    } else {
        let mut cover = BufReader::new(File::open(cover_path)?);
        let mut writer = BufWriter::new(staged.as_file_mut());
        let stats = embed_stream(
            &mut cover,
            &mut payload,
            payload_len,
            &mut writer,
            token,
            descriptor.start_offset + offset,
            config,
        )?;
        writer.flush()?;
        (descriptor, stats)
    };

    // Close
    persist(staged, dest_path)?;
    info!(
        "hid {} bytes in {} ({} cover, sha256 {})",
        stats.payload_bytes,
        dest_path.display(),
        descriptor.kind,
        stats.payload_sha256
    );

    Ok(CarrierReport {
        descriptor,
        offset,
        stats,
    })
}

/// Decode counterpart of [`hide_payload`]. Fails with `InvalidKey` when the
/// embedded token differs from `token`; nothing is written in that case.
pub fn recover_payload(
    cover_path: &Path,
    dest_path: &Path,
    token: &SecurityToken,
    config: &StegConfig,
    format: Option<ContainerKind>,
) -> Result<CarrierReport> {
    ensure_file(cover_path, "source")?;
    let kind = ContainerKind::resolve(cover_path, format)?;

    let descriptor = locate(cover_path, kind)?;
    let offset = config.offset as u64;
    check_extractable(
        descriptor.capacity_bytes.saturating_sub(offset),
        header_len(token) as u64,
    )?;

    let mut staged = stage_destination(dest_path)?;

    let (descriptor, stats) = if kind.is_raster() {
        let raster = PngRaster::open(cover_path)?;
        let descriptor = raster.descriptor();
        let mut writer = BufWriter::new(staged.as_file_mut());
        let stats = extract_stream(
            &mut Cursor::new(&raster.pixels),
            &mut writer,
            token,
            offset,
            descriptor.capacity_bytes.saturating_sub(offset),
            config,
        )?;
        writer.flush()?;
        (descriptor, stats)
    } else {
        let mut cover = BufReader::new(File::open(cover_path)?);
        let mut writer = BufWriter::new(staged.as_file_mut());
        let stats = extract_stream(
            &mut cover,
            &mut writer,
            token,
            descriptor.start_offset + offset,
            descriptor.capacity_bytes.saturating_sub(offset),
            config,
        )?;
        writer.flush()?;
        (descriptor, stats)
    };

    persist(staged, dest_path)?;
    info!(
        "recovered {} bytes from {} into {} (sha256 {})",
        stats.payload_bytes,
        cover_path.display(),
        dest_path.display(),
        stats.payload_sha256
    );

    Ok(CarrierReport {
        descriptor,
        offset,
        stats,
    })
}

/// Report how much payload `cover_path` can carry for `token` at the
/// configured offset, without modifying anything.
pub fn analyze_cover(
    cover_path: &Path,
    token: &SecurityToken,
    config: &StegConfig,
    format: Option<ContainerKind>,
) -> Result<CapacityAnalysis> {
    ensure_file(cover_path, "source")?;
    let kind = ContainerKind::resolve(cover_path, format)?;
    let descriptor = locate(cover_path, kind)?;
    Ok(analyze_region(&descriptor, config.offset as u64, token))
}

fn ensure_file(path: &Path, role: &'static str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(StegError::FileNotFound {
            role,
            path: path.to_path_buf(),
        })
    }
}

fn stage_destination(dest_path: &Path) -> Result<NamedTempFile> {
    let dir = match dest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = NamedTempFile::new_in(dir)?;
    debug!("staging output in {}", staged.path().display());
    Ok(staged)
}

fn persist(staged: NamedTempFile, dest_path: &Path) -> Result<()> {
    staged.persist(dest_path).map_err(|e| StegError::Io(e.error))?;
    Ok(())
}
