use std::error::Error;
use std::fs;

use qrforge::{ECLevel, MaskPattern, MaskSearch, QRBuilder};

fn main() -> Result<(), Box<dyn Error>> {
    let data = "This example shows all available configuration options for QR code generation.";

    let qr = QRBuilder::new(data.as_bytes())
        .ec_level(ECLevel::H)        // Error correction level - if not provided, defaults to ECLevel::L
        .detect_kanji(false)         // Kanji mode for Shift JIS input - if not provided, defaults to false
        .mask(MaskPattern::new(2))   // Mask pattern - if not provided, finds best mask based on penalty score
        .build()?;

    // Every renderer on one symbol
    fs::write("configured_qr.svg", qr.to_svg(6, 6, "#1a1a1a")?)?;
    fs::write("configured_qr.html", qr.to_html(6, 6, "black")?)?;
    fs::write("configured_qr.png", qr.to_png(6, 6, [0x1a, 0x1a, 0x1a])?)?;
    qr.to_image(6).save("configured_qr_quiet_zone.png")?;

    println!("Configured QR code saved to: configured_qr.{{svg,html,png}}");
    println!("QR metadata: {}", qr.metadata());

    // Faster build scoring a seeded subset of the masks
    let sampled = QRBuilder::new(data.as_bytes())
        .ec_level(ECLevel::H)
        .mask_search(MaskSearch::Sampled { count: 3, seed: 42 })
        .build()?;
    println!("Sampled search metadata: {}", sampled.metadata());

    Ok(())
}
