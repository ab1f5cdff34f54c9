//! Position-wise feed-forward blocks.
//!
//! MLPs operate on hidden states shaped `(batch, seq, hidden)` and return the
//! same layout. The first projection expands the hidden dimension by
//! `expansion`, a ReLU is applied, then the second projection contracts back
//! to the model hidden size.

use candle_core::{Error, Result, Tensor};
use candle_nn::{Linear, Module, VarBuilder};

use crate::checks;

/// Configuration shared by transformer feed-forward networks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedForwardConfig {
    /// Model hidden size.
    pub hidden_size: usize,
    /// Multiplier applied to `hidden_size` for the inner activation width.
    pub expansion: usize,
}

impl FeedForwardConfig {
    pub fn new(hidden_size: usize, expansion: usize) -> Self {
        Self {
            hidden_size,
            expansion,
        }
    }

    /// Width of the activation space.
    pub fn intermediate_size(&self) -> usize {
        self.hidden_size * self.expansion
    }
}

/// `Linear(hidden -> expansion * hidden) -> ReLU -> Linear(expansion * hidden -> hidden)`.
#[derive(Debug, Clone)]
pub struct FeedForward {
    config: FeedForwardConfig,
    expand: Linear,
    contract: Linear,
}

impl FeedForward {
    pub fn new(config: FeedForwardConfig, vb: VarBuilder) -> Result<Self> {
        if config.hidden_size == 0 || config.expansion == 0 {
            return Err(Error::Msg(format!(
                "feed-forward requires non-zero hidden size and expansion, got {} x {}",
                config.hidden_size, config.expansion
            )));
        }
        let inner = config.intermediate_size();
        let expand = candle_nn::linear(config.hidden_size, inner, vb.pp("expand"))?;
        let contract = candle_nn::linear(inner, config.hidden_size, vb.pp("contract"))?;
        Ok(Self {
            config,
            expand,
            contract,
        })
    }

    pub fn config(&self) -> &FeedForwardConfig {
        &self.config
    }
}

impl Module for FeedForward {
    fn forward(&self, hidden: &Tensor) -> Result<Tensor> {
        checks::expect_batch_seq_hidden("feed_forward.input", hidden, self.config.hidden_size)?;
        let inner = self.expand.forward(hidden)?.relu()?;
        self.contract.forward(&inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn preserves_layout_and_registers_parameters() -> Result<()> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let ff = FeedForward::new(FeedForwardConfig::new(6, 4), vb.pp("ff"))?;

        let hidden = Tensor::randn(0f32, 1.0, (2, 5, 6), &device)?;
        let output = ff.forward(&hidden)?;
        assert_eq!(output.dims(), &[2, 5, 6]);

        let data = varmap.data().lock().unwrap();
        let expand = data.get("ff.expand.weight").expect("expand weight");
        assert_eq!(expand.as_tensor().dims(), &[24, 6]);
        let contract = data.get("ff.contract.weight").expect("contract weight");
        assert_eq!(contract.as_tensor().dims(), &[6, 24]);
        Ok(())
    }

    #[test]
    fn rejects_wrong_hidden_width() -> Result<()> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let ff = FeedForward::new(FeedForwardConfig::new(4, 2), vb)?;
        let hidden = Tensor::zeros((1, 2, 3), DType::F32, &device)?;
        assert!(ff.forward(&hidden).is_err());
        Ok(())
    }
}
