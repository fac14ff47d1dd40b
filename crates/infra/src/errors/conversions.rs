//! Conversions from external infrastructure errors into domain errors.

use horizon_domain::HorizonError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub HorizonError);

impl From<InfraError> for HorizonError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<HorizonError> for InfraError {
    fn from(value: HorizonError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoHorizonError {
    fn into_horizon(self) -> HorizonError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → HorizonError */
/* -------------------------------------------------------------------------- */

impl IntoHorizonError for HttpError {
    fn into_horizon(self) -> HorizonError {
        let target = self.url().map(|url| format!(" ({url})")).unwrap_or_default();

        if self.is_timeout() {
            return HorizonError::Transport(format!("HTTP request timed out{target}"));
        }

        if self.is_connect() {
            return HorizonError::Transport(format!("HTTP connection failure{target}: {self}"));
        }

        if self.is_builder() {
            return HorizonError::Transport(format!("cannot build HTTP client or request: {self}"));
        }

        HorizonError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_horizon())
    }
}

/// Convert a reqwest error straight into the domain error.
pub fn transport_error(err: HttpError) -> HorizonError {
    InfraError::from(err).into()
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
