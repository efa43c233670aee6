use std::sync::Arc;

use huffkit::config::CodecConfig;
use huffkit::engine::{decode_chunked, encode_chunked};
use huffkit::image::{GrayImage, Shape};
use huffkit::HuffmanCodec;

fn gradient(shape: Shape) -> GrayImage {
    let pixels = (0..shape.area())
        .map(|i| ((i % shape.width) * 255 / shape.width.max(1)) as u8 & 0xf0)
        .collect();
    GrayImage::from_pixels(shape, pixels).unwrap()
}

#[test]
fn image_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.pgm");
    let target = dir.path().join("decoded.pgm");

    let image = gradient(Shape::new(40, 25));
    image.write_pgm(&mut std::fs::File::create(&source).unwrap()).unwrap();

    let loaded = GrayImage::read_pgm(&mut std::fs::File::open(&source).unwrap()).unwrap();
    let shape = loaded.shape();
    let codec = HuffmanCodec::from_symbols(loaded.pixels()).unwrap();
    let bits = codec.encode(loaded.pixels()).unwrap();
    assert!(bits.len() < loaded.pixels().len() * 8);

    let decoded = GrayImage::from_pixels(shape, codec.decode(&bits).unwrap()).unwrap();
    decoded.write_pgm(&mut std::fs::File::create(&target).unwrap()).unwrap();

    let reread = GrayImage::read_pgm(&mut std::fs::File::open(&target).unwrap()).unwrap();
    assert_eq!(reread, image);
}

#[test]
fn flat_image_uses_single_leaf() {
    let image = GrayImage::from_pixels(Shape::new(4, 4), vec![128; 16]).unwrap();
    let codec = HuffmanCodec::from_symbols(image.pixels()).unwrap();
    assert!(codec.tree().is_single_leaf());
    let bits = codec.encode(image.pixels()).unwrap();
    assert_eq!(bits.len(), 16);
    assert_eq!(codec.decode(&bits).unwrap(), image.pixels());
}

#[tokio::test]
async fn shared_tree_serves_concurrent_decoders() {
    let image = gradient(Shape::new(64, 64));
    let pixels = image.into_pixels();
    let codec = Arc::new(HuffmanCodec::from_symbols(&pixels).unwrap());

    let chunks = encode_chunked(Arc::clone(&codec), Arc::from(pixels.clone()), 333)
        .await
        .unwrap();
    let decoded = decode_chunked(codec, chunks).await.unwrap();
    assert_eq!(decoded, pixels);
}

#[test]
fn config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huffkit.toml");
    let path = path.to_str().unwrap();

    let config = CodecConfig {
        chunk_size: 4096,
        show_codebook: false,
        ..CodecConfig::default()
    };
    config.save(path).unwrap();
    assert_eq!(CodecConfig::load(Some(path)).unwrap(), config);
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(CodecConfig::load(Some(path.to_str().unwrap())).is_err());
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "chunk_size = 0\n").unwrap();
    assert!(CodecConfig::load(Some(path.to_str().unwrap())).is_err());
}
