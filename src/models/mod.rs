// Models module - Wallet provider payload representations

pub mod pass_class;
pub mod pass_object;
pub mod save_token;
