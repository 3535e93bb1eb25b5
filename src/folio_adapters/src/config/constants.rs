pub mod env {
    pub const JWT_SECRET_ENV_VAR: &str = "FOLIO__AUTH__JWT__SECRET";
    pub const ALLOWED_ORIGINS_ENV_VAR: &str = "FOLIO__AUTH__ALLOWED_ORIGINS";
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const REDIS_HOST_NAME_ENV_VAR: &str = "FOLIO__REDIS__HOST_NAME";
    pub const RESEND_AUTH_TOKEN_ENV_VAR: &str = "FOLIO__EMAIL_CLIENT__AUTH_TOKEN";
}

pub mod prod {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";

    pub mod email_client {
        use std::time::Duration;

        pub const BASE_URL: &str = "https://api.resend.com/";
        pub const SENDER: &str = "no-reply@portfoliomaker.app";
        pub const TIMEOUT: Duration = Duration::from_secs(10);
    }
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";

    pub mod email_client {
        use std::time::Duration;

        pub const SENDER: &str = "test@email.com";
        pub const TIMEOUT: Duration = Duration::from_millis(200);
    }
}
