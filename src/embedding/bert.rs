//! BERT loading shared by the sentence encoder and the cross-encoder.

use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

pub const CONFIG_FILE: &str = "config.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

fn read_config(model_dir: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(model_dir.join(CONFIG_FILE))?;
    serde_json::from_str(&content)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))
}

fn var_builder(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_dir.join(WEIGHTS_FILE);
    unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device) }
}

/// Prefix the checkpoint stores the encoder body under: `bert.`, `roberta.` or none.
fn body_prefix(vb: &VarBuilder) -> Option<&'static str> {
    ["bert", "roberta"]
        .into_iter()
        .find(|prefix| vb.contains_tensor(&format!("{prefix}.embeddings.word_embeddings.weight")))
}

fn body_builder<'a>(vb: &VarBuilder<'a>) -> VarBuilder<'a> {
    match body_prefix(vb) {
        Some(prefix) => vb.pp(prefix),
        None => vb.clone(),
    }
}

fn load_body(vb: &VarBuilder, config: &Config) -> Result<BertModel> {
    BertModel::load(body_builder(vb), config)
}

/// Bare BERT encoder returning per-token hidden states.
pub struct BertEncoder {
    model: BertModel,
    hidden_size: usize,
}

impl BertEncoder {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config = read_config(model_dir)?;
        let vb = var_builder(model_dir, device)?;
        let model = load_body(&vb, &config)?;

        Ok(Self {
            model,
            hidden_size: config.hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Hidden states shaped `[batch, seq_len, hidden_size]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.model
            .forward(input_ids, token_type_ids, attention_mask)
    }
}

/// Sequence-classification head: `tanh(pooler.dense(cls))` followed by a single-logit
/// linear layer. Checkpoints without pooler weights feed `[CLS]` to the classifier directly.
pub(crate) struct ClassificationHead {
    pooler: Option<Linear>,
    classifier: Linear,
}

impl ClassificationHead {
    pub(crate) fn load(vb: &VarBuilder, hidden_size: usize) -> Result<Self> {
        let body = body_builder(vb);
        let pooler = if body.contains_tensor("pooler.dense.weight") {
            Some(candle_nn::linear(
                hidden_size,
                hidden_size,
                body.pp("pooler").pp("dense"),
            )?)
        } else {
            None
        };
        let classifier = candle_nn::linear(hidden_size, 1, vb.pp("classifier"))?;

        Ok(Self { pooler, classifier })
    }

    /// Logits shaped `[batch, 1]` from hidden states shaped `[batch, seq_len, hidden]`.
    pub(crate) fn forward(&self, hidden_states: &Tensor) -> Result<Tensor> {
        let cls_token = hidden_states.i((.., 0, ..))?;
        let pooled = match &self.pooler {
            Some(dense) => dense.forward(&cls_token)?.tanh()?,
            None => cls_token,
        };
        self.classifier.forward(&pooled)
    }
}

/// BERT with a single-logit classification head over the pooled `[CLS]` token.
pub struct BertClassifier {
    bert: BertModel,
    head: ClassificationHead,
}

impl BertClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config = read_config(model_dir)?;
        let vb = var_builder(model_dir, device)?;

        let bert = load_body(&vb, &config)?;
        let head = ClassificationHead::load(&vb, config.hidden_size)?;

        Ok(Self { bert, head })
    }

    /// Raw logits shaped `[batch, 1]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        self.head.forward(&output)
    }
}
