pub mod operator_auth;
