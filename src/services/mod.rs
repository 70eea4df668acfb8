// Services module - Issuance workflow and wallet provider integration

pub mod class_ensurer;
pub mod oauth;
pub mod pass_issuer;
pub mod token_signer;
pub mod wallet_api;
