use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use embedding::{EmbeddingError, TokenEmbedding, TokenEmbeddingConfig};

fn make_ids(data: &[i64], shape: (usize, usize)) -> Result<Tensor> {
    Ok(Tensor::from_slice(data, shape, &Device::Cpu)?)
}

fn build(vocab_size: usize, hidden_dim: usize) -> Result<(TokenEmbedding, VarMap)> {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    let embedding = TokenEmbedding::new(
        TokenEmbeddingConfig {
            vocab_size,
            hidden_dim,
        },
        vb.pp("tok"),
    )?;
    Ok((embedding, varmap))
}

#[test]
fn forward_shape_matches_config() -> Result<()> {
    let (embedding, _varmap) = build(8, 4)?;
    let token_ids = make_ids(&[0, 1, 2, 3], (2, 2))?;

    let output = embedding.forward(&token_ids)?;

    assert_eq!(output.dims(), &[2, 2, 4]);
    assert_eq!(output.dtype(), DType::F32);
    Ok(())
}

#[test]
fn identical_ids_share_a_row() -> Result<()> {
    let (embedding, _varmap) = build(5, 3)?;
    let token_ids = make_ids(&[2, 2], (1, 2))?;

    let output = embedding.forward(&token_ids)?.squeeze(0)?.to_vec2::<f32>()?;
    assert_eq!(output[0], output[1]);

    let row = embedding.weight().get(2)?.to_vec1::<f32>()?;
    assert_eq!(output[0], row);
    Ok(())
}

#[test]
fn forward_rejects_out_of_range_ids() -> Result<()> {
    let (embedding, _varmap) = build(4, 3)?;
    let token_ids = make_ids(&[0, 4], (1, 2))?;

    let err = embedding.forward(&token_ids).unwrap_err();
    assert!(matches!(
        err,
        EmbeddingError::TokenOutOfRange {
            id: 4,
            vocab_size: 4
        }
    ));
    assert!(err.to_string().contains("token id 4 outside vocabulary"));
    Ok(())
}

#[test]
fn zero_vocab_is_a_config_error() {
    match build(0, 4) {
        Ok(_) => panic!("zero vocab must be rejected"),
        Err(err) => {
            let err = err.downcast::<EmbeddingError>().unwrap();
            assert!(matches!(err, EmbeddingError::InvalidConfig(_)));
        }
    }
}

#[test]
fn weights_are_registered_by_name() -> Result<()> {
    let (_embedding, varmap) = build(6, 2)?;
    let data = varmap.data().lock().unwrap();
    let weight = data.get("tok.weight").expect("registered weight");
    assert_eq!(weight.as_tensor().dims(), &[6, 2]);
    Ok(())
}
