//! Model hyperparameters and device selection.

use std::{fmt, fs, path::Path, str::FromStr};

use attention::{Config as AttentionConfig, ScoreScale};
use candle_core::Device;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Where parameters and activations live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeviceSpec {
    #[default]
    Cpu,
    Cuda(usize),
    Metal(usize),
}

impl DeviceSpec {
    /// Opens the device; fails when the backend was not compiled in.
    pub fn resolve(&self) -> candle_core::Result<Device> {
        match self {
            DeviceSpec::Cpu => Ok(Device::Cpu),
            DeviceSpec::Cuda(ordinal) => Device::new_cuda(*ordinal),
            DeviceSpec::Metal(ordinal) => Device::new_metal(*ordinal),
        }
    }
}

impl FromStr for DeviceSpec {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim().to_lowercase();
        let (kind, ordinal) = match value.split_once(':') {
            Some((kind, ordinal)) => {
                let ordinal = ordinal.parse::<usize>().map_err(|_| {
                    ModelError::InvalidConfig(format!("invalid device ordinal in '{value}'"))
                })?;
                (kind, ordinal)
            }
            None => (value.as_str(), 0),
        };
        match kind {
            "cpu" if ordinal == 0 => Ok(DeviceSpec::Cpu),
            "cuda" | "gpu" => Ok(DeviceSpec::Cuda(ordinal)),
            "metal" | "mps" => Ok(DeviceSpec::Metal(ordinal)),
            _ => Err(ModelError::InvalidConfig(format!(
                "unknown device '{value}', expected cpu, cuda[:N] or metal[:N]"
            ))),
        }
    }
}

impl TryFrom<String> for DeviceSpec {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DeviceSpec> for String {
    fn from(spec: DeviceSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceSpec::Cpu => f.write_str("cpu"),
            DeviceSpec::Cuda(ordinal) => write!(f, "cuda:{ordinal}"),
            DeviceSpec::Metal(ordinal) => write!(f, "metal:{ordinal}"),
        }
    }
}

/// Hyperparameters for the encoder-decoder transformer.
///
/// Vocabulary sizes and pad indices have no meaningful default and must be
/// set before [`validate`](Self::validate) passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformerConfig {
    pub src_vocab_size: usize,
    pub trg_vocab_size: usize,
    pub src_pad_idx: u32,
    pub trg_pad_idx: u32,
    pub embed_size: usize,
    pub num_layers: usize,
    pub forward_expansion: usize,
    pub heads: usize,
    pub dropout: f32,
    pub device: DeviceSpec,
    pub max_length: usize,
    pub score_scale: ScoreScale,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            src_vocab_size: 0,
            trg_vocab_size: 0,
            src_pad_idx: 0,
            trg_pad_idx: 0,
            embed_size: 512,
            num_layers: 6,
            forward_expansion: 4,
            heads: 8,
            dropout: 0.0,
            device: DeviceSpec::Cpu,
            max_length: 100,
            score_scale: ScoreScale::EmbedSize,
        }
    }
}

impl TransformerConfig {
    /// Default hyperparameters for the given vocabularies and pad tokens.
    pub fn new(
        src_vocab_size: usize,
        trg_vocab_size: usize,
        src_pad_idx: u32,
        trg_pad_idx: u32,
    ) -> Self {
        Self {
            src_vocab_size,
            trg_vocab_size,
            src_pad_idx,
            trg_pad_idx,
            ..Self::default()
        }
    }

    /// Loads a configuration from `.toml` or `.json`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents)?,
            Some("toml") | None => toml::from_str(&contents)?,
            Some(other) => {
                return Err(ModelError::InvalidConfig(format!(
                    "unsupported configuration extension '{other}'"
                )))
            }
        };
        Ok(config)
    }

    pub fn attention_config(&self) -> AttentionConfig {
        AttentionConfig {
            embed_size: self.embed_size,
            heads: self.heads,
            score_scale: self.score_scale,
        }
    }

    /// Checks structural invariants; head divisibility surfaces as an attention error.
    pub fn validate(&self) -> Result<()> {
        self.attention_config().validate()?;

        let mut errors = Vec::new();
        if self.src_vocab_size == 0 {
            errors.push("src_vocab_size must be greater than zero".to_string());
        }
        if self.trg_vocab_size == 0 {
            errors.push("trg_vocab_size must be greater than zero".to_string());
        }
        if self.src_vocab_size > 0 && self.src_pad_idx as usize >= self.src_vocab_size {
            errors.push(format!(
                "src_pad_idx {} outside source vocabulary of size {}",
                self.src_pad_idx, self.src_vocab_size
            ));
        }
        if self.trg_vocab_size > 0 && self.trg_pad_idx as usize >= self.trg_vocab_size {
            errors.push(format!(
                "trg_pad_idx {} outside target vocabulary of size {}",
                self.trg_pad_idx, self.trg_vocab_size
            ));
        }
        if self.num_layers == 0 {
            errors.push("num_layers must be greater than zero".to_string());
        }
        if self.forward_expansion == 0 {
            errors.push("forward_expansion must be greater than zero".to_string());
        }
        if self.max_length == 0 {
            errors.push("max_length must be greater than zero".to_string());
        }
        if !(0.0..1.0).contains(&self.dropout) {
            errors.push(format!("dropout must be in [0, 1), got {}", self.dropout));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ModelError::InvalidConfig(errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attention::AttentionError;

    #[test]
    fn defaults_follow_the_reference_hyperparameters() {
        let config = TransformerConfig::new(10, 12, 0, 0);
        assert_eq!(config.embed_size, 512);
        assert_eq!(config.num_layers, 6);
        assert_eq!(config.forward_expansion, 4);
        assert_eq!(config.heads, 8);
        assert_eq!(config.dropout, 0.0);
        assert_eq!(config.device, DeviceSpec::Cpu);
        assert_eq!(config.max_length, 100);
        assert_eq!(config.score_scale, ScoreScale::EmbedSize);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn indivisible_heads_are_an_attention_error() {
        let config = TransformerConfig {
            embed_size: 10,
            heads: 3,
            ..TransformerConfig::new(5, 5, 0, 0)
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ModelError::Attention(AttentionError::IndivisibleHeads { .. })
        ));
    }

    #[test]
    fn validation_collects_every_problem() {
        let config = TransformerConfig {
            dropout: 1.0,
            max_length: 0,
            ..TransformerConfig::new(0, 4, 0, 4)
        };
        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("src_vocab_size"));
        assert!(message.contains("trg_pad_idx 4"));
        assert!(message.contains("max_length"));
        assert!(message.contains("dropout"));
    }

    #[test]
    fn device_spec_parsing() {
        assert_eq!("cpu".parse::<DeviceSpec>().unwrap(), DeviceSpec::Cpu);
        assert_eq!("CUDA".parse::<DeviceSpec>().unwrap(), DeviceSpec::Cuda(0));
        assert_eq!("cuda:1".parse::<DeviceSpec>().unwrap(), DeviceSpec::Cuda(1));
        assert_eq!("metal:0".parse::<DeviceSpec>().unwrap(), DeviceSpec::Metal(0));
        assert!("tpu".parse::<DeviceSpec>().is_err());
        assert!("cuda:x".parse::<DeviceSpec>().is_err());
        assert_eq!(DeviceSpec::Cuda(2).to_string(), "cuda:2");
    }

    #[test]
    fn parses_toml_with_defaults() {
        let config: TransformerConfig = toml::from_str(
            r#"
            src_vocab_size = 40
            trg_vocab_size = 40
            embed_size = 64
            heads = 4
            device = "cpu"
            score_scale = "head_dim"
            "#,
        )
        .unwrap();
        assert_eq!(config.embed_size, 64);
        assert_eq!(config.num_layers, 6);
        assert_eq!(config.score_scale, ScoreScale::HeadDim);
        assert!(config.validate().is_ok());
    }
}
