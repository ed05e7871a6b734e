use std::error::Error;

use qrforge::QRBuilder;

fn main() -> Result<(), Box<dyn Error>> {
    // Simplest usage - provide only data, all other settings have defaults
    let qr = QRBuilder::new(b"Hello, World!").build()?;

    // Convert to image and save
    let img = qr.to_image(4); // 4x scale factor
    img.save("simple_qr.png")?;

    println!("Simple QR code saved to: simple_qr.png");
    println!("{}", qr.to_str(1));
    Ok(())
}
