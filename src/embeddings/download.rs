// download.rs — Model file download with SHA256 verification.
//
// Downloads model weights on first use, caches locally at ~/.things/models/.
// Files are verified against known SHA256 hashes to ensure integrity.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use sha2::{Digest, Sha256};

use crate::{config, paths};

const MODEL_FILES: [(&str, &str); 3] = [
    ("model.safetensors", config::embedding::MODEL_SAFETENSORS_SHA256),
    ("tokenizer.json", config::embedding::TOKENIZER_JSON_SHA256),
    ("config.json", config::embedding::CONFIG_JSON_SHA256),
];

/// Returns the local model directory path (~/.things/models/all-MiniLM-L6-v2/).
pub fn model_dir() -> anyhow::Result<PathBuf> {
    Ok(paths::home_dir()?.join(config::embedding::MODEL_DIR_REL))
}

fn model_files_exist(dir: &Path) -> bool {
    MODEL_FILES.iter().all(|(name, _)| dir.join(name).exists())
}

/// Download all model files if not already cached. Returns the model directory path.
pub fn ensure_model_files() -> anyhow::Result<PathBuf> {
    let dir = model_dir()?;

    if model_files_exist(&dir) {
        log::info!("Model files already cached at {}", dir.display());
        return Ok(dir);
    }

    log::info!("Downloading embedding model to {}", dir.display());
    paths::ensure_dir(&dir)?;

    let base = config::embedding::MODEL_CDN_BASE;
    for (name, sha256) in MODEL_FILES {
        let dest = dir.join(name);
        if dest.exists() {
            continue;
        }
        download_and_verify(&format!("{base}/{name}"), &dest, sha256)?;
    }

    log::info!("Model download complete");
    Ok(dir)
}

/// Download a file from URL and verify its SHA256 hash.
fn download_and_verify(url: &str, dest: &Path, expected_sha256: &str) -> anyhow::Result<()> {
    let filename = dest.file_name().unwrap_or_default().to_string_lossy();
    log::info!("Downloading {} from {}", filename, url);

    let resp = ureq::get(url)
        .timeout(Duration::from_secs(config::embedding::DOWNLOAD_TIMEOUT_SECS))
        .call()
        .with_context(|| format!("failed to download {url}"))?;

    let status = resp.status();
    if status != 200 {
        bail!("HTTP {status} downloading {url}");
    }

    // Model is ~87 MB, fits in RAM.
    let mut body = Vec::new();
    resp.into_reader()
        .read_to_end(&mut body)
        .with_context(|| format!("failed to read response body for {url}"))?;

    verify_sha256(&body, expected_sha256).with_context(|| format!("integrity check for {filename}"))?;
    log::info!("SHA256 verified for {}", filename);

    // Write atomically: write to .tmp, then rename
    let tmp_path = dest.with_extension("tmp");
    let mut file = fs::File::create(&tmp_path)
        .with_context(|| format!("failed to create {}", tmp_path.display()))?;
    file.write_all(&body)?;
    file.flush()?;
    drop(file);

    fs::rename(&tmp_path, dest)
        .with_context(|| format!("failed to rename {} -> {}", tmp_path.display(), dest.display()))?;

    Ok(())
}

fn verify_sha256(body: &[u8], expected_sha256: &str) -> anyhow::Result<()> {
    let mut hasher = Sha256::new();
    hasher.update(body);
    let actual = hex::encode(hasher.finalize());
    if !actual.eq_ignore_ascii_case(expected_sha256) {
        bail!("SHA256 mismatch: expected {}, got {}", expected_sha256, actual);
    }
    Ok(())
}
