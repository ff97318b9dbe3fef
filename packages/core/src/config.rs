//! Централизованная конфигурация для GordianKnot Core
//!
//! Здесь только то, что безопасно менять между развёртываниями.
//! Константы совместимости (корни идентификаторов, WRAP_COUNT,
//! integrity pattern) живут рядом с кодом и не настраиваются.

use std::sync::OnceLock;

/// Глобальная конфигурация (синглтон)
static GLOBAL_CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Config {
    // ============================================
    // PBE
    // ============================================

    /// PBKDF2: количество итераций по умолчанию
    pub pbe_iterations: u32,

    /// Минимальная длина соли для PBE (в байтах)
    pub pbe_salt_length: usize,

    // ============================================
    // KEY WRAP
    // ============================================

    /// Максимальный размер данных для key wrap (в байтах)
    pub max_wrap_input_length: usize,

    // ============================================
    // AGREEMENT
    // ============================================

    /// Длина ключа, выводимого из shared secret через HKDF
    pub derived_key_length: usize,

    /// HKDF info для вывода ключа из shared secret
    pub agreement_kdf_info: &'static [u8],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pbe_iterations: 100_000,
            pbe_salt_length: 32,
            max_wrap_input_length: 1 << 20,
            derived_key_length: 32,
            agreement_kdf_info: b"GordianKnot Agreement",
        }
    }
}

impl Config {
    /// Создать конфигурацию из переменных окружения
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GORDIAN_PBE_ITERATIONS") {
            if let Ok(parsed) = val.parse() {
                config.pbe_iterations = parsed;
            }
        }

        if let Ok(val) = std::env::var("GORDIAN_MAX_WRAP_INPUT") {
            if let Ok(parsed) = val.parse() {
                config.max_wrap_input_length = parsed;
            }
        }

        if let Ok(val) = std::env::var("GORDIAN_DERIVED_KEY_LENGTH") {
            if let Ok(parsed) = val.parse() {
                config.derived_key_length = parsed;
            }
        }

        config
    }

    /// Получить глобальный экземпляр конфигурации
    ///
    /// При первом вызове инициализируется значениями по умолчанию
    pub fn global() -> &'static Config {
        GLOBAL_CONFIG.get_or_init(Config::default)
    }

    /// # Errors
    ///
    /// Возвращает ошибку, если конфигурация уже была инициализирована
    pub fn init() -> Result<(), &'static str> {
        GLOBAL_CONFIG
            .set(Self::default())
            .map_err(|_| "Config already initialized")
    }

    /// # Errors
    ///
    /// Возвращает ошибку, если конфигурация уже была инициализирована
    pub fn init_from_env() -> Result<(), &'static str> {
        GLOBAL_CONFIG
            .set(Self::from_env())
            .map_err(|_| "Config already initialized")
    }

    /// # Errors
    ///
    /// Возвращает ошибку, если конфигурация уже была инициализирована
    pub fn init_with(config: Config) -> Result<(), &'static str> {
        GLOBAL_CONFIG
            .set(config)
            .map_err(|_| "Config already initialized")
    }

    pub fn is_initialized() -> bool {
        GLOBAL_CONFIG.get().is_some()
    }
}
