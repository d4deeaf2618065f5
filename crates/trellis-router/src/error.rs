use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouterError {
    // Construction errors
    #[error("Invalid route configuration: {message}")]
    InvalidConfiguration { message: String },

    // Assembly errors
    #[error("Route parameter \"{name}\" is not specified")]
    MissingRouteParameter { name: String },

    #[error("Invalid value for route parameter \"{name}\": {reason}")]
    InvalidRouteParameter { name: String, reason: String },

    // Stack errors
    #[error("Route not found: {name}")]
    RouteNotFound { name: String },
}

impl RouterError {
    pub(crate) fn invalid_configuration(message: impl Into<String>) -> Self {
        RouterError::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub(crate) fn missing_parameter(name: impl Into<String>) -> Self {
        RouterError::MissingRouteParameter { name: name.into() }
    }
}

pub type Result<T> = std::result::Result<T, RouterError>;
