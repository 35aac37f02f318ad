pub mod authorizer;
pub mod credentials;
pub mod resolver;

pub use authorizer::AccessAuthorizer;
pub use resolver::CredentialResolver;
