use std::path::PathBuf;

use anyhow::{Context, Result};
use char_transformer::{
    config_for_vocab, encode_batch, model::parameter_count, setup_device, CharVocab, DeviceSpec,
    Transformer, TransformerConfig,
};
use clap::Parser;
use env_logger::Env;

/// Builds a character vocabulary from a corpus and runs the transformer once.
#[derive(Debug, Parser)]
#[command(name = "char-transformer", version, about)]
struct Args {
    /// Text file the vocabulary is built from.
    #[arg(long)]
    corpus: PathBuf,

    /// TOML or JSON model configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source text; defaults to the start of the corpus.
    #[arg(long)]
    prompt: Option<String>,

    /// Target text; defaults to the start of the corpus.
    #[arg(long)]
    target: Option<String>,

    /// Write the freshly initialised parameters as safetensors.
    #[arg(long)]
    save_weights: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let corpus = std::fs::read_to_string(&args.corpus)
        .with_context(|| format!("failed to read corpus {}", args.corpus.display()))?;
    let vocab = CharVocab::from_text(&corpus)?;
    log::info!(
        "vocabulary: {} characters from a corpus of {}",
        vocab.vocab_size(),
        vocab.data_size()
    );

    let config = match &args.config {
        Some(path) => TransformerConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => TransformerConfig::default(),
    };
    let mut config = config_for_vocab(config, &vocab);

    let device = setup_device(config.device);
    if device.is_cpu() {
        config.device = DeviceSpec::Cpu;
    }
    let (model, varmap) = Transformer::init(config)?;
    log::info!("parameters: {}", parameter_count(&varmap));

    let prefix: String = corpus.chars().take(model.config().max_length).collect();
    let prompt = args.prompt.as_deref().unwrap_or(&prefix);
    let target = args.target.as_deref().unwrap_or(&prefix);
    let max_length = model.config().max_length;
    let src_len = prompt.chars().count().clamp(1, max_length);
    let trg_len = target.chars().count().clamp(1, max_length);

    let src = encode_batch(
        &vocab,
        &[prompt],
        src_len,
        model.config().src_pad_idx,
        model.device(),
    )?;
    let trg = encode_batch(
        &vocab,
        &[target],
        trg_len,
        model.config().trg_pad_idx,
        model.device(),
    )?;

    let logits = model.forward(&src, &trg)?;
    log::info!("logits shape: {:?}", logits.dims());

    if let Some(path) = &args.save_weights {
        varmap
            .save(path)
            .with_context(|| format!("failed to save weights to {}", path.display()))?;
        log::info!("saved weights to {}", path.display());
    }
    Ok(())
}
