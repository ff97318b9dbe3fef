// Утилиты

pub mod b64;
pub mod serialization;
