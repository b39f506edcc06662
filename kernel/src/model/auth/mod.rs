pub mod event;

/// Opaque bearer token handed out at login and resolved through the
/// key value store on every authenticated request.
pub struct AccessToken(pub String);
