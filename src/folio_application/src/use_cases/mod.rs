pub mod check_username;
pub mod forgot_password;
pub mod login;
pub mod resend_code;
pub mod reset_password;
pub mod signup;
pub mod verify_email;
