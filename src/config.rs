// IMPORTANT:
// Keep ALL numeric values centralized here (repo rule: no hardcoded numeric values scattered around).

// NOTE: HOST_VERSION must stay in sync with the `version` field in Cargo.toml.
pub const HOST_VERSION: &str = "0.1.0";

/// Per-user data root (relative to home) holding the catalog db, logs and models.
pub const DATA_DIR_REL: &str = ".things";

pub mod logging {
    pub const LOG_DIR_REL: &str = ".things/logs";
    pub const LOG_FILE_NAME: &str = "things_catalog";

    pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
    pub const LOG_ROTATE_KEEP_FILES: usize = 5;
}

pub mod messaging {
    pub const MAX_MESSAGE_SIZE_BYTES: u32 = 128 * 1024 * 1024;
}

pub mod sqlite {
    pub const DEFAULT_DB_FILE_NAME: &str = "things.db";

    pub const PRAGMA_BUSY_TIMEOUT_MS: i64 = 5000;
    pub const PRAGMA_CACHE_SIZE_KIB_NEG: i64 = -16000;
}

pub mod catalog {
    pub const SEARCH_DEFAULT_LIMIT: i64 = 5;

    // Only used to keep log lines readable; stored descriptions are never truncated.
    pub const LOG_PREVIEW_CHARS: usize = 80;
}

pub mod embedding {
    pub const EMBEDDING_DIMS: usize = 384;
    pub const EMBEDDING_MODEL_NAME: &str = "all-MiniLM-L6-v2";

    // Max word-piece tokens for all-MiniLM-L6-v2 (model context limit is 256).
    // We pre-truncate to control what gets embedded.
    pub const MAX_TOKENS: usize = 256;

    // Word budget for item text; word-piece expands ~1.3x so 180 words stays under MAX_TOKENS.
    pub const MAX_INPUT_WORDS: usize = 180;

    // Model download URL base (lazy download on first use).
    pub const MODEL_CDN_BASE: &str =
        "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main";

    // SHA256 hashes for integrity verification
    pub const MODEL_SAFETENSORS_SHA256: &str =
        "53aa51172d142c89d9012cce15ae4d6cc0ca6895895114379cacb4fab128d9db";
    pub const TOKENIZER_JSON_SHA256: &str =
        "be50c3628f2bf5bb5e3a7f17b1f74611b2561a3a27eeab05e5aa30f411572037";
    pub const CONFIG_JSON_SHA256: &str =
        "953f9c0d463486b10a6871cc2fd59f223b2c70184f49815e7efbcab5d8908b41";

    // Local model storage directory (relative to home)
    pub const MODEL_DIR_REL: &str = ".things/models/all-MiniLM-L6-v2";

    pub const DOWNLOAD_TIMEOUT_SECS: u64 = 90;
}

pub mod remote {
    // OpenAI-compatible embeddings endpoint; defaults target a local Ollama.
    pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";
    pub const DEFAULT_MODEL: &str = "nomic-embed-text";
    // Ollama ignores the key but OpenAI-compatible servers expect the header.
    pub const DEFAULT_API_KEY: &str = "ollama";

    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}
