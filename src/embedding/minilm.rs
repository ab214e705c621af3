use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use tokenizers::{Encoding, Tokenizer};
use tracing::{debug, info};

use super::device::select_device;
use super::error::EmbeddingError;
use super::provider::EmbeddingProvider;
use super::utils::load_batch_tokenizer;
use crate::constants::{MINILM_MAX_SEQ_LEN, MODEL_FILES};

/// Sentence embedder for BERT-family models such as `all-MiniLM-L6-v2`.
///
/// Runs one batched forward pass, mean-pools token states under the attention mask and
/// L2-normalizes the result.
pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
    name: String,
}

impl std::fmt::Debug for MiniLmEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiniLmEmbedder")
            .field("name", &self.name)
            .field("device", &format!("{:?}", self.device))
            .field("hidden_size", &self.hidden_size)
            .finish()
    }
}

impl MiniLmEmbedder {
    /// Loads `config.json`, `model.safetensors` and `tokenizer.json` from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P, name: &str) -> Result<Self, EmbeddingError> {
        let model_dir = model_dir.as_ref();
        for file in MODEL_FILES {
            let path = model_dir.join(file);
            if !path.exists() {
                return Err(EmbeddingError::ModelNotFound { path });
            }
        }

        let device = select_device()?;
        debug!(?device, "Selected compute device for embedder");

        let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
        let config: Config =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to parse config.json: {}", e),
            })?;

        let weights_path = model_dir.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device).map_err(
                |e| EmbeddingError::ModelLoadFailed {
                    reason: format!("Failed to map weights: {}", e),
                },
            )?
        };

        // Sentence-transformers exports omit the `bert.` prefix; HF exports keep it.
        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &config)
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("roberta"), &config)
        } else {
            BertModel::load(vb, &config)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("Failed to load BERT weights: {}", e),
        })?;

        let tokenizer = load_batch_tokenizer(model_dir, MINILM_MAX_SEQ_LEN).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        info!(
            model_dir = %model_dir.display(),
            hidden_size = config.hidden_size,
            num_layers = config.num_hidden_layers,
            "Embedding model loaded"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size: config.hidden_size,
            name: name.to_string(),
        })
    }

    fn stack_field<F>(&self, encodings: &[Encoding], field: F) -> Result<Tensor, EmbeddingError>
    where
        F: Fn(&Encoding) -> &[u32],
    {
        let rows = encodings
            .iter()
            .map(|e| Tensor::new(field(e), &self.device))
            .collect::<candle_core::Result<Vec<_>>>()?;
        Ok(Tensor::stack(&rows, 0)?)
    }

    fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
        // hidden: [batch, seq, hidden], mask: [batch, seq]
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = (mask.sum(1)? + 1e-9)?;
        let pooled = summed.broadcast_div(&counts)?;

        let norms = (pooled.sqr()?.sum_keepdim(1)?.sqrt()? + 1e-12)?;
        pooled.broadcast_div(&norms)
    }
}

impl EmbeddingProvider for MiniLmEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let encodings = self.tokenizer.encode_batch(inputs, true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        debug!(
            batch = encodings.len(),
            seq_len = encodings.first().map(|e| e.get_ids().len()),
            "Running embedding forward pass"
        );

        let input_ids = self.stack_field(&encodings, Encoding::get_ids)?;
        let type_ids = self.stack_field(&encodings, Encoding::get_type_ids)?;
        let attention_mask = self.stack_field(&encodings, Encoding::get_attention_mask)?;

        let hidden = self
            .model
            .forward(&input_ids, &type_ids, Some(&attention_mask))
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Transformer forward pass failed: {}", e),
            })?;

        let pooled = Self::mean_pool(&hidden, &attention_mask)?;
        let vectors = pooled.to_vec2::<f32>()?;

        if let Some(v) = vectors.first()
            && v.len() != self.hidden_size
        {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.hidden_size,
                actual: v.len(),
            });
        }

        Ok(vectors)
    }

    fn embedding_dim(&self) -> usize {
        self.hidden_size
    }

    fn name(&self) -> &str {
        &self.name
    }
}
