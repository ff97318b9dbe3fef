// Base64 утилиты для текстового хранения конвертов

use base64::{engine::general_purpose, Engine};

pub fn encode(data: &[u8]) -> String {
    general_purpose::STANDARD.encode(data)
}

/// Окружающие пробелы и переводы строк игнорируются.
pub fn decode(data: &str) -> Result<Vec<u8>, String> {
    general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| format!("Base64 decode failed: {}", e))
}
