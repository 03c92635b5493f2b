use std::fmt::Write;

/// Random bytes per barcode; each byte renders as two hex characters.
pub const BARCODE_BYTES: usize = 5;
pub const BARCODE_LEN: usize = BARCODE_BYTES * 2;

pub trait BarcodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Ten lowercase hex characters drawn from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomHexBarcodes;

impl BarcodeGenerator for RandomHexBarcodes {
    fn generate(&self) -> String {
        let bytes: [u8; BARCODE_BYTES] = rand::random();
        bytes.iter().fold(String::with_capacity(BARCODE_LEN), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
    }
}
