//! Weekly maintenance: sweep aged engagement submissions out of the live
//! store into checksummed archive files.
//!
//! Each batch is written and fsynced before any of its records are deleted,
//! so a crash mid-run can duplicate archived rows but never lose them.
//!
//! File format:
//! - Version magic (8 bytes)
//! - Compressed-payload length (4 bytes)
//! - Gzipped bincode payload (variable length)
//! - SHA256 checksum over the three fields above (32 bytes)

use crate::core::constants::{
    ARCHIVE_BATCH_SIZE, ARCHIVE_RETENTION_SECONDS, ARCHIVE_VERSION_MAGIC,
};
use crate::core::ids::PlayerId;
use crate::core::store::Store;
use crate::engagement::types::Submission;
use directories::ProjectDirs;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedSubmission {
    pub player_id: PlayerId,
    pub submission: Submission,
}

/// JSON sidecar describing one archive file, for operators and tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchManifest {
    pub file: String,
    pub entries: usize,
    pub created_at: i64,
    pub checksum: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    pub batches: usize,
    pub archived: usize,
}

/// Platform data directory for archive output.
pub fn default_archive_dir() -> io::Result<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "classquest").ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "could not determine data directory")
    })?;
    Ok(project_dirs.data_dir().join("archive"))
}

/// Entry point for the weekly scheduled job.
pub fn run_weekly_archive(store: &Store, dir: &Path) -> io::Result<ArchiveReport> {
    run_archive(store, dir, chrono::Utc::now().timestamp())
}

/// Archive-then-delete all submissions older than the retention window, in
/// size-bounded batches. A batch is deleted from the store only after its
/// file (and manifest) are fully on disk.
pub fn run_archive(store: &Store, dir: &Path, now: i64) -> io::Result<ArchiveReport> {
    let cutoff = now - ARCHIVE_RETENTION_SECONDS;

    let mut aged = Vec::new();
    for (player_id, player) in store.players_snapshot() {
        for submission in &player.engagement.submissions {
            if submission.submitted_at < cutoff {
                aged.push(ArchivedSubmission {
                    player_id: player_id.clone(),
                    submission: submission.clone(),
                });
            }
        }
    }
    if aged.is_empty() {
        return Ok(ArchiveReport::default());
    }

    fs::create_dir_all(dir)?;
    let mut report = ArchiveReport::default();
    for (index, batch) in aged.chunks(ARCHIVE_BATCH_SIZE).enumerate() {
        let file_name = format!("submissions-{now}-{index:04}.caq");
        let path = dir.join(&file_name);
        let checksum = write_batch(&path, batch)?;
        write_manifest(
            &path.with_extension("json"),
            &BatchManifest {
                file: file_name.clone(),
                entries: batch.len(),
                created_at: now,
                checksum,
            },
        )?;

        delete_batch(store, batch, cutoff)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        tracing::info!(file = %file_name, entries = batch.len(), "archived submission batch");
        report.batches += 1;
        report.archived += batch.len();
    }
    Ok(report)
}

/// Write one batch file and return its checksum as lowercase hex.
fn write_batch(path: &Path, batch: &[ArchivedSubmission]) -> io::Result<String> {
    let data = bincode::serialize(batch)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&data)?;
    let compressed = encoder.finish()?;
    let payload_len = compressed.len() as u32;

    let mut hasher = Sha256::new();
    hasher.update(ARCHIVE_VERSION_MAGIC.to_le_bytes());
    hasher.update(payload_len.to_le_bytes());
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut file = fs::File::create(path)?;
    file.write_all(&ARCHIVE_VERSION_MAGIC.to_le_bytes())?;
    file.write_all(&payload_len.to_le_bytes())?;
    file.write_all(&compressed)?;
    file.write_all(&checksum)?;
    file.sync_all()?;

    Ok(checksum.iter().map(|b| format!("{b:02x}")).collect())
}

fn write_manifest(path: &Path, manifest: &BatchManifest) -> io::Result<()> {
    let json = serde_json::to_string_pretty(manifest)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

/// Read a batch file back, verifying magic and checksum.
pub fn read_batch(path: &Path) -> io::Result<Vec<ArchivedSubmission>> {
    let mut file = fs::File::open(path)?;

    let mut magic_bytes = [0u8; 8];
    file.read_exact(&mut magic_bytes)?;
    if u64::from_le_bytes(magic_bytes) != ARCHIVE_VERSION_MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "unrecognized archive format",
        ));
    }

    let mut len_bytes = [0u8; 4];
    file.read_exact(&mut len_bytes)?;
    let payload_len = u32::from_le_bytes(len_bytes) as usize;

    let mut compressed = vec![0u8; payload_len];
    file.read_exact(&mut compressed)?;

    let mut stored_checksum = [0u8; 32];
    file.read_exact(&mut stored_checksum)?;

    let mut hasher = Sha256::new();
    hasher.update(magic_bytes);
    hasher.update(len_bytes);
    hasher.update(&compressed);
    if hasher.finalize().as_slice() != stored_checksum {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "archive checksum mismatch",
        ));
    }

    let mut data = Vec::new();
    GzDecoder::new(compressed.as_slice()).read_to_end(&mut data)?;
    bincode::deserialize(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Remove archived submissions from their players, pruning cooldown
/// entries old enough to be meaningless along the way.
fn delete_batch(
    store: &Store,
    batch: &[ArchivedSubmission],
    cutoff: i64,
) -> crate::core::errors::EngineResult<()> {
    let mut per_player: HashMap<&PlayerId, HashSet<Uuid>> = HashMap::new();
    for entry in batch {
        per_player
            .entry(&entry.player_id)
            .or_default()
            .insert(entry.submission.id);
    }

    for (player_id, ids) in per_player {
        store.update_player(player_id, |player| {
            player
                .engagement
                .submissions
                .retain(|submission| !ids.contains(&submission.id));
            player
                .engagement
                .last_by_resource
                .retain(|_, last| *last >= cutoff);
            Ok(())
        })?;
    }
    Ok(())
}
