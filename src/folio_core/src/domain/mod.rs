pub mod email;
pub mod password;
pub mod policy;
pub mod reset_token;
pub mod user;
pub mod username;
pub mod verification_code;
