// engine.rs — Candle BERT embedding engine with attention-mask-aware mean pooling.
//
// Loads all-MiniLM-L6-v2 from safetensors, generates 384-dim sentence embeddings.
// Uses mean pooling over non-padding tokens (not naive average, not CLS token),
// then L2 normalisation, matching sentence-transformers output.

use std::path::Path;

use anyhow::{bail, Context};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use crate::config;
use crate::embeddings::Embedder;

/// The embedding engine holds the loaded model and tokenizer.
pub struct EmbeddingEngine {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl EmbeddingEngine {
    /// Load the model from a local directory containing model.safetensors,
    /// tokenizer.json, and config.json.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let device = Device::Cpu;

        let config_path = model_dir.join("config.json");
        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("read {}", config_path.display()))?;
        let bert_config: BertConfig = serde_json::from_str(&config_str)
            .with_context(|| format!("parse {}", config_path.display()))?;

        log::info!(
            "Loading embedding model: hidden_size={}, layers={}, heads={}",
            bert_config.hidden_size,
            bert_config.num_hidden_layers,
            bert_config.num_attention_heads,
        );

        let weights_path = model_dir.join("model.safetensors");
        // SAFETY: the weights file is only read, and was verified by SHA256 before first use.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.clone()], DType::F32, &device)
                .with_context(|| format!("load weights from {}", weights_path.display()))?
        };

        let model = BertModel::load(vb, &bert_config).context("load BERT model")?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;

        log::info!("Embedding model loaded successfully (dims={})", bert_config.hidden_size);

        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    /// Generate a sentence embedding for the given text.
    /// Returns a Vec<f32> of `EMBEDDING_DIMS` dimensions.
    pub fn try_embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        if text.trim().is_empty() {
            // Zero vector for empty input: scores 0.0 against everything.
            return Ok(vec![0.0; config::embedding::EMBEDDING_DIMS]);
        }

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let token_ids = encoding.get_ids();
        let attention_mask = encoding.get_attention_mask();

        let len = token_ids.len().min(config::embedding::MAX_TOKENS);
        let token_ids = &token_ids[..len];
        let attention_mask = &attention_mask[..len];

        // [1, seq_len]
        let token_ids_t = Tensor::new(
            token_ids.iter().map(|&id| i64::from(id)).collect::<Vec<_>>().as_slice(),
            &self.device,
        )?
        .unsqueeze(0)?;

        let attention_mask_t = Tensor::new(
            attention_mask.iter().map(|&m| i64::from(m)).collect::<Vec<_>>().as_slice(),
            &self.device,
        )?
        .unsqueeze(0)?;

        let token_type_ids = token_ids_t.zeros_like()?;

        // [1, seq_len, hidden_size]
        let output = self
            .model
            .forward(&token_ids_t, &token_type_ids, Some(&attention_mask_t))?;

        let embedding = mean_pooling(&output, &attention_mask_t)?;
        let embedding = l2_normalize(&embedding)?;

        let emb_vec: Vec<f32> = embedding.squeeze(0)?.to_vec1()?;

        if emb_vec.len() != config::embedding::EMBEDDING_DIMS {
            bail!(
                "unexpected embedding dims: got {}, expected {}",
                emb_vec.len(),
                config::embedding::EMBEDDING_DIMS
            );
        }

        Ok(emb_vec)
    }
}

impl Embedder for EmbeddingEngine {
    fn embed(&self, text: &str) -> Vec<f32> {
        match self.try_embed(text) {
            Ok(v) => v,
            Err(e) => {
                log::error!("Local embedding failed: {:?}", e);
                Vec::new()
            }
        }
    }

    fn describe(&self) -> String {
        format!("local:{}", config::embedding::EMBEDDING_MODEL_NAME)
    }

    fn dims(&self) -> Option<usize> {
        Some(config::embedding::EMBEDDING_DIMS)
    }
}

/// Attention-mask-aware mean pooling.
///
/// input_embeds: [batch, seq_len, hidden_size]
/// attention_mask: [batch, seq_len] (1 for real tokens, 0 for padding)
/// output: [batch, hidden_size]
fn mean_pooling(input_embeds: &Tensor, attention_mask: &Tensor) -> anyhow::Result<Tensor> {
    // [batch, seq_len] → [batch, seq_len, hidden_size]
    let mask_expanded = attention_mask
        .to_dtype(DType::F32)?
        .unsqueeze(2)?
        .broadcast_as(input_embeds.shape())?;

    let sum_embeddings = (input_embeds * &mask_expanded)?.sum(1)?;

    // Clamp so an all-padding row divides by ~0 instead of 0.
    let sum_mask = mask_expanded.sum(1)?.clamp(1e-9, f64::MAX)?;

    Ok((sum_embeddings / sum_mask)?)
}

/// L2 normalize a tensor along the last dimension.
fn l2_normalize(tensor: &Tensor) -> anyhow::Result<Tensor> {
    let norm = tensor.sqr()?.sum_keepdim(1)?.sqrt()?;
    let norm = norm.clamp(1e-12, f64::MAX)?;
    Ok(tensor.broadcast_div(&norm)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_pooling_ignores_padding() {
        let embeds = Tensor::new(&[[[1.0f32, 2.0], [3.0, 4.0], [100.0, 100.0]]], &Device::Cpu).unwrap();
        let mask = Tensor::new(&[[1i64, 1, 0]], &Device::Cpu).unwrap();
        let pooled: Vec<Vec<f32>> = mean_pooling(&embeds, &mask).unwrap().to_vec2().unwrap();
        assert_eq!(pooled.len(), 1);
        assert!((pooled[0][0] - 2.0).abs() < 1e-6);
        assert!((pooled[0][1] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_unit_length() {
        let t = Tensor::new(&[[3.0f32, 4.0]], &Device::Cpu).unwrap();
        let n: Vec<Vec<f32>> = l2_normalize(&t).unwrap().to_vec2().unwrap();
        assert!((n[0][0] - 0.6).abs() < 1e-6);
        assert!((n[0][1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_row_stays_finite() {
        let t = Tensor::new(&[[0.0f32, 0.0]], &Device::Cpu).unwrap();
        let n: Vec<Vec<f32>> = l2_normalize(&t).unwrap().to_vec2().unwrap();
        assert!(n[0].iter().all(|x| x.is_finite() && *x == 0.0));
    }
}
