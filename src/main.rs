use std::fmt::Debug;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use huffkit::config::{CodecConfig, DEFAULT_CONFIG_FILE};
use huffkit::engine::bits::bit_string;
use huffkit::engine::{decode_chunked, encode_chunked};
use huffkit::image::GrayImage;
use huffkit::{CodeBook, CodingStats, EncodedBits, HuffmanCodec};

#[derive(Parser)]
#[command(name = "huffkit")]
#[command(about = "Huffman coding for text and grayscale images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Config file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Output as JSON")]
    json: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Encode and decode a piece of text
    Text {
        #[arg(long, conflicts_with = "text", help = "Read text from a file")]
        input: Option<PathBuf>,
        #[arg(long, help = "Text given on the command line")]
        text: Option<String>,
        #[arg(long, help = "Print the tree structure")]
        show_tree: bool,
    },
    /// Encode and decode the pixels of a PGM image
    Image {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, help = "Where to write the reconstructed image")]
        output: Option<PathBuf>,
    },
    /// Round-trip a file's bytes in parallel shards
    Chunked {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, help = "Symbols per shard (overrides config)")]
        chunk_size: Option<usize>,
    },
    GenerateConfig {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE, help = "Config file path")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CodecConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Text { input, text, show_tree } => {
            let text = match (input, text) {
                (Some(path), _) => std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, Some(text)) => text,
                (None, None) => anyhow::bail!("pass --input FILE or --text STRING"),
            };
            config.check_input_size(text.len())?;
            run_text(&text, show_tree, &config, cli.json)
        }
        Commands::Image { input, output } => {
            let data = std::fs::read(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            config.check_input_size(data.len())?;
            let image = GrayImage::parse_pgm(&data)
                .with_context(|| format!("parsing {}", input.display()))?;
            run_image(image, output, &config, cli.json)
        }
        Commands::Chunked { input, chunk_size } => {
            let data = std::fs::read(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            config.check_input_size(data.len())?;
            let chunk_size = chunk_size.unwrap_or(config.chunk_size);
            run_chunked(data, chunk_size, cli.json).await
        }
        Commands::GenerateConfig { output } => {
            CodecConfig::default().save(&output)?;
            if cli.json {
                println!("{}", serde_json::json!({"config": output}));
            } else {
                println!("✅ Wrote default config to {}", output);
            }
            Ok(())
        }
    }
}

fn run_text(text: &str, show_tree: bool, config: &CodecConfig, json: bool) -> Result<()> {
    let symbols: Vec<char> = text.chars().collect();
    let codec = HuffmanCodec::from_symbols(&symbols)?;
    let encoded = codec.encode(&symbols)?;
    let decoded: String = codec.decode(&encoded)?.into_iter().collect();
    let matches = decoded == text;
    let stats = codec.stats(&encoded);

    if json {
        let mut out = report_json(codec.codebook(), &encoded, &stats, matches);
        if show_tree {
            out["tree"] = serde_json::Value::String(codec.tree().render());
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("📝 Text Round-Trip");
        println!("==================");
        if show_tree {
            print!("{}", codec.tree().render());
        }
        if config.show_codebook {
            print_codebook(codec.codebook());
        }
        println!("Encoded: {}", encoded);
        print_stats(&stats);
        print_verdict(matches);
    }

    verify(matches)
}

fn run_image(
    image: GrayImage,
    output: Option<PathBuf>,
    config: &CodecConfig,
    json: bool,
) -> Result<()> {
    let shape = image.shape();
    info!(width = shape.width, height = shape.height, "loaded image");

    let codec = HuffmanCodec::from_symbols(image.pixels())?;
    let encoded = codec.encode(image.pixels())?;
    let decoded = GrayImage::from_pixels(shape, codec.decode(&encoded)?)?;
    let matches = decoded == image;
    let stats = codec.stats(&encoded);

    if let Some(path) = &output {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        decoded.write_pgm(&mut file)?;
        info!("Wrote decoded image: {}", path.display());
    }

    if json {
        let mut out = report_json(codec.codebook(), &encoded, &stats, matches);
        out["shape"] = serde_json::to_value(shape)?;
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("🖼️  Image Round-Trip");
        println!("===================");
        println!("Shape: {}x{}", shape.width, shape.height);
        if config.show_codebook {
            print_codebook(codec.codebook());
        }
        print_stats(&stats);
        if let Some(path) = &output {
            println!("Decoded image: {}", path.display());
        }
        print_verdict(matches);
    }

    verify(matches)
}

async fn run_chunked(data: Vec<u8>, chunk_size: usize, json: bool) -> Result<()> {
    let codec = Arc::new(HuffmanCodec::from_symbols(&data)?);
    let symbols: Arc<[u8]> = Arc::from(data);

    let chunks = encode_chunked(Arc::clone(&codec), Arc::clone(&symbols), chunk_size).await?;
    let mut whole = EncodedBits::new();
    for chunk in &chunks {
        whole.concat(chunk);
    }
    let chunk_count = chunks.len();

    let decoded = decode_chunked(Arc::clone(&codec), chunks).await?;
    let matches = decoded[..] == symbols[..];
    let stats = codec.stats(&whole);

    if json {
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({
            "chunks": chunk_count,
            "chunk_size": chunk_size,
            "stats": stats,
            "roundtrip": matches,
        }))?);
    } else {
        println!("🧩 Chunked Round-Trip");
        println!("=====================");
        println!("Chunks: {} x {} symbols", chunk_count, chunk_size);
        print_stats(&stats);
        print_verdict(matches);
    }

    verify(matches)
}

fn report_json<S>(
    book: &CodeBook<S>,
    encoded: &EncodedBits,
    stats: &CodingStats,
    matches: bool,
) -> serde_json::Value
where
    S: Eq + Hash + Clone + Debug,
{
    let codebook: serde_json::Map<String, serde_json::Value> = book
        .iter()
        .map(|(symbol, code)| {
            let code = serde_json::Value::String(bit_string(code));
            (format!("{:?}", symbol), code)
        })
        .collect();
    serde_json::json!({
        "codebook": codebook,
        "encoded_bits": encoded.len(),
        "encoded_hex": hex::encode(encoded.as_raw_bytes()),
        "stats": stats,
        "roundtrip": matches,
    })
}

fn print_codebook<S>(book: &CodeBook<S>)
where
    S: Eq + Hash + Clone + Debug,
{
    println!("Codebook ({} symbols):", book.len());
    for (symbol, code) in book.iter() {
        println!("   {:>8} -> {}", format!("{:?}", symbol), bit_string(code));
    }
}

fn print_stats(stats: &CodingStats) {
    println!("Symbols: {} ({} distinct)", stats.symbols, stats.distinct_symbols);
    println!(
        "Encoded: {} bits (fixed width: {} bits, {:.1}%)",
        stats.encoded_bits,
        stats.fixed_width_bits,
        stats.compression_ratio * 100.0
    );
    println!(
        "Average code length: {:.3} bits (entropy {:.3})",
        stats.average_code_length, stats.entropy_bits
    );
}

fn print_verdict(matches: bool) {
    if matches {
        println!("✅ Decoded output matches the input");
    } else {
        println!("❌ Decoded output differs from the input");
    }
}

fn verify(matches: bool) -> Result<()> {
    if !matches {
        anyhow::bail!("round-trip verification failed");
    }
    Ok(())
}
