//! Криптографический модуль
//!
//! # Архитектура
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │        CryptoFactory / AgreementSession / KeyWrapCodec      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              CryptoProvider (Crypto-Agility)                │
//! │  - Block primitive (AES)                                    │
//! │  - KEM (X25519, Kyber768)                                   │
//! │  - Agreement (X25519)                                       │
//! │  - Signatures (Ed25519)                                     │
//! │  - Private key encoding                                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Модули
//!
//! - [`provider`]: трейты примитивов и провайдера
//! - [`suites`]: реализации провайдера
//! - [`keys`]: ключевые пары и публичные ключи

// ============================================================================
// Core Traits
// ============================================================================

/// CryptoProvider trait для crypto-agility
pub mod provider;

// ============================================================================
// Implementations
// ============================================================================

pub mod suites;

// ============================================================================
// Utilities
// ============================================================================

pub mod keys;

// ============================================================================
// Re-exports для удобства
// ============================================================================

pub use keys::{KeyPair, PublicKey};
pub use provider::{CryptoProvider, KeyTypePolicy, SymmetricPrimitive};
pub use suites::classic::ClassicSuiteProvider;
